//! Persistent key-value store for homebase.
//!
//! Components keep their state as JSON values under well-known keys
//! (`history`, `settings`, `bookmarks`, ...). Every write replaces the whole
//! value stored under a key; there are no partial or merge updates.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use homebase_types::error::Result;
use serde_json::Value;

/// Key under which the command history is stored.
pub const HISTORY_KEY: &str = "history";
/// Key under which user settings are stored.
pub const SETTINGS_KEY: &str = "settings";
/// Key under which bookmarks are stored.
pub const BOOKMARKS_KEY: &str = "bookmarks";
/// Key under which the weather collaborator caches its data.
pub const WEATHER_KEY: &str = "weather";

/// A key-value store that survives reloads.
pub trait KvStore {
    /// Fetch the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Overwrite the value stored under `key`.
    fn set(&mut self, key: &str, value: Value) -> Result<()>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// All keys, in sorted order.
    fn keys(&self) -> Result<Vec<String>>;

    /// Overwrite several keys at once.
    ///
    /// Backends that can persist the batch in a single write override this
    /// so a failure leaves none of the entries applied.
    fn set_many(&mut self, entries: Vec<(String, Value)>) -> Result<()> {
        for (key, value) in entries {
            self.set(&key, value)?;
        }
        Ok(())
    }
}
