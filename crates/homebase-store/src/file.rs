//! JSON file store.
//!
//! The whole store is a single JSON object on disk. Every mutation rewrites
//! the file through a sibling temp file followed by a rename, so readers
//! never observe a half-written document and a failed write leaves both the
//! file and the in-memory copy untouched.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use homebase_types::error::{HomebaseError, Result};
use serde_json::{Map, Value};

use crate::KvStore;

/// A key-value store persisted as one JSON document.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl FileStore {
    /// Open the store at `path`. A missing file yields an empty store; the
    /// file is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let text = fs::read_to_string(&path)?;
            parse_document(&text, &path)?
        } else {
            log::debug!("Store {} does not exist yet", path.display());
            BTreeMap::new()
        };
        log::info!("Opened store {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `entries` and, only on success, adopt them.
    fn commit(&mut self, entries: BTreeMap<String, Value>) -> Result<()> {
        let doc: Map<String, Value> = entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let text = serde_json::to_string(&Value::Object(doc))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, text)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        self.entries = entries;
        Ok(())
    }
}

fn parse_document(text: &str, path: &Path) -> Result<BTreeMap<String, Value>> {
    if text.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(HomebaseError::Store(format!(
            "{} does not contain a JSON object",
            path.display()
        ))),
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value);
        self.commit(next)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.remove(key);
        self.commit(next)
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn set_many(&mut self, entries: Vec<(String, Value)>) -> Result<()> {
        let mut next = self.entries.clone();
        next.extend(entries);
        self.commit(next)
    }
}
