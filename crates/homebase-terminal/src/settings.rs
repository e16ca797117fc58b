//! User settings: a JSON object addressed by dotted paths.
//!
//! `terminal.name` addresses `{"terminal": {"name": ...}}`. Bracket indexes
//! are accepted as path segments (`css[0]` is `css.0`) and a leading dot is
//! ignored.

use homebase_store::{KvStore, SETTINGS_KEY};
use homebase_types::error::Result;
use serde_json::{Map, Value};

/// Setting that overrides the configured history bound.
pub const MAX_HISTORY_SETTING: &str = "maxhistory";
/// Setting for the prompt's user name.
pub const NAME_SETTING: &str = "terminal.name";
/// Setting for the prompt's machine name.
pub const MACHINE_SETTING: &str = "terminal.machine";

/// User settings tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    root: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Empty settings.
    pub fn new() -> Self {
        Self { root: Map::new() }
    }

    /// Wrap a stored value. Anything other than an object yields empty
    /// settings.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(root) => Self { root },
            Value::Null => Self::new(),
            other => {
                log::warn!("ignoring malformed settings value: {other}");
                Self::new()
            },
        }
    }

    /// Load settings from the store. A failing store yields empty settings.
    pub fn load(store: &dyn KvStore) -> Self {
        match store.get(SETTINGS_KEY) {
            Ok(Some(value)) => Self::from_value(value),
            Ok(None) => Self::new(),
            Err(e) => {
                log::warn!("settings unavailable, starting empty: {e}");
                Self::new()
            },
        }
    }

    /// Write the whole settings object to the store.
    pub fn save(&self, store: &mut dyn KvStore) -> Result<()> {
        store.set(SETTINGS_KEY, self.to_value())
    }

    /// The settings as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// Look up the value at `path`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let segments = split_path(path);
        let (last, parents) = segments.split_last()?;
        let mut current = &self.root;
        for seg in parents {
            current = current.get(seg.as_str())?.as_object()?;
        }
        current.get(last.as_str())
    }

    /// The value at `path` as display text. Strings are returned without
    /// quotes; other scalars use their JSON form.
    pub fn get_text(&self, path: &str) -> Option<String> {
        match self.get(path)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Set the value at `path`, creating (or replacing non-object)
    /// intermediate nodes as needed.
    pub fn set(&mut self, path: &str, value: Value) {
        let segments = split_path(path);
        let Some((last, parents)) = segments.split_last() else {
            return;
        };
        let mut current = &mut self.root;
        for seg in parents {
            let slot = current
                .entry(seg.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Value::Object(next) = slot else {
                return;
            };
            current = next;
        }
        current.insert(last.clone(), value);
    }

    /// Remove the value at `path`, returning it. Missing parents are not an
    /// error.
    pub fn delete(&mut self, path: &str) -> Option<Value> {
        let segments = split_path(path);
        let (last, parents) = segments.split_last()?;
        let mut current = &mut self.root;
        for seg in parents {
            current = current.get_mut(seg.as_str())?.as_object_mut()?;
        }
        current.remove(last.as_str())
    }

    /// History bound: the `maxhistory` setting (number or numeric string)
    /// when it is a positive integer, otherwise `default`.
    pub fn max_history(&self, default: usize) -> usize {
        let parsed = match self.get(MAX_HISTORY_SETTING) {
            Some(Value::Number(n)) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
            Some(Value::String(s)) => s.trim().parse::<usize>().ok(),
            _ => None,
        };
        match parsed {
            Some(n) if n > 0 => n,
            _ => default,
        }
    }
}

/// Split a settings path into segments: `a[0].b` → `["a", "0", "b"]`.
fn split_path(path: &str) -> Vec<String> {
    let normalized = path.replace('[', ".").replace(']', "");
    let normalized = normalized.strip_prefix('.').unwrap_or(&normalized);
    normalized.split('.').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use homebase_store::MemoryStore;
    use serde_json::json;

    use super::*;

    #[test]
    fn split_path_forms() {
        assert_eq!(split_path("terminal.name"), vec!["terminal", "name"]);
        assert_eq!(split_path(".terminal.name"), vec!["terminal", "name"]);
        assert_eq!(split_path("css[0]"), vec!["css", "0"]);
        assert_eq!(split_path("city"), vec!["city"]);
    }

    #[test]
    fn set_creates_intermediates() {
        let mut s = Settings::new();
        s.set("terminal.name", json!("alice"));
        assert_eq!(s.to_value(), json!({"terminal": {"name": "alice"}}));
        assert_eq!(s.get_text("terminal.name").as_deref(), Some("alice"));
    }

    #[test]
    fn set_replaces_scalar_parent() {
        let mut s = Settings::new();
        s.set("terminal", json!("flat"));
        s.set("terminal.name", json!("bob"));
        assert_eq!(s.get("terminal.name"), Some(&json!("bob")));
    }

    #[test]
    fn get_missing_segment() {
        let mut s = Settings::new();
        s.set("a.b", json!(1));
        assert!(s.get("a.c").is_none());
        assert!(s.get("x.y.z").is_none());
        assert!(s.get("a.b.c").is_none());
    }

    #[test]
    fn get_text_for_numbers() {
        let mut s = Settings::new();
        s.set("maxhistory", json!(25));
        assert_eq!(s.get_text("maxhistory").as_deref(), Some("25"));
    }

    #[test]
    fn delete_leaf() {
        let mut s = Settings::new();
        s.set("terminal.name", json!("alice"));
        s.set("terminal.machine", json!("box"));
        assert_eq!(s.delete("terminal.name"), Some(json!("alice")));
        assert_eq!(s.to_value(), json!({"terminal": {"machine": "box"}}));
    }

    #[test]
    fn delete_missing_parent_is_noop() {
        let mut s = Settings::new();
        assert_eq!(s.delete("no.such.path"), None);
    }

    #[test]
    fn bracket_paths_address_objects() {
        let mut s = Settings::new();
        s.set("css[0]", json!("body{}"));
        assert_eq!(s.get("css.0"), Some(&json!("body{}")));
    }

    #[test]
    fn max_history_sources() {
        let mut s = Settings::new();
        assert_eq!(s.max_history(1000), 1000);
        s.set(MAX_HISTORY_SETTING, json!("50"));
        assert_eq!(s.max_history(1000), 50);
        s.set(MAX_HISTORY_SETTING, json!(7));
        assert_eq!(s.max_history(1000), 7);
        s.set(MAX_HISTORY_SETTING, json!("lots"));
        assert_eq!(s.max_history(1000), 1000);
        s.set(MAX_HISTORY_SETTING, json!(0));
        assert_eq!(s.max_history(1000), 1000);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let mut store = MemoryStore::new();
        let mut s = Settings::new();
        s.set("city", json!("2759794"));
        s.save(&mut store).unwrap();
        let loaded = Settings::load(&store);
        assert_eq!(loaded, s);
    }

    #[test]
    fn malformed_stored_value_is_ignored() {
        let mut store = MemoryStore::new();
        store.set(SETTINGS_KEY, json!([1, 2])).unwrap();
        assert_eq!(Settings::load(&store), Settings::new());
    }
}
