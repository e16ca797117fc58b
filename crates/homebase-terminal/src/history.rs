//! Command history: a bounded, deduplicated, newest-first log with a
//! browsing cursor.
//!
//! The cursor starts on the live (unsubmitted) line. Browsing older moves
//! towards the end of the log; browsing newer moves back towards the live
//! line. Browsing never changes the log itself.

use homebase_store::{HISTORY_KEY, KvStore};
use serde_json::Value;

/// Command history with a browsing cursor.
#[derive(Debug, Clone)]
pub struct History {
    /// Newest first.
    entries: Vec<String>,
    /// `None` while on the live line, otherwise an index into `entries`.
    cursor: Option<usize>,
    max_entries: usize,
}

impl History {
    /// Empty history holding at most `max_entries` lines.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            max_entries: max_entries.max(1),
        }
    }

    /// Load the persisted log. Non-string entries and duplicates are
    /// dropped; an unreadable store yields an empty history.
    pub fn load(store: &dyn KvStore, max_entries: usize) -> Self {
        let mut history = Self::new(max_entries);
        let stored = match store.get(HISTORY_KEY) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("history unavailable, starting empty: {e}");
                None
            },
        };
        if let Some(Value::Array(items)) = stored {
            for item in items {
                if let Value::String(line) = item
                    && !history.entries.contains(&line)
                {
                    history.entries.push(line);
                }
            }
        }
        history.entries.truncate(history.max_entries);
        log::debug!("loaded {} history entries", history.entries.len());
        history
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cursor position; `None` means the live line.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Change the bound. Takes effect on the next submission.
    pub fn set_max_entries(&mut self, max_entries: usize) {
        self.max_entries = max_entries.max(1);
    }

    /// Return the cursor to the live line.
    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    /// Record a submitted line and persist the log.
    ///
    /// An existing copy of `line` is moved to the front. If the store
    /// cannot be written the in-memory log is still updated.
    pub fn submit(&mut self, line: &str, store: &mut dyn KvStore) {
        self.entries.retain(|entry| entry != line);
        self.entries.insert(0, line.to_string());
        self.entries.truncate(self.max_entries);
        self.cursor = None;

        let value = Value::Array(self.entries.iter().cloned().map(Value::String).collect());
        if let Err(e) = store.set(HISTORY_KEY, value) {
            log::warn!("history not persisted: {e}");
        }
    }

    /// Step to an older entry and load it into `buffer`.
    ///
    /// Returns `false` (leaving `buffer` alone) when already on the oldest
    /// entry or the log is empty.
    pub fn navigate_older(&mut self, buffer: &mut String) -> bool {
        let next = self.cursor.map_or(0, |c| c + 1);
        if next >= self.entries.len() {
            return false;
        }
        self.cursor = Some(next);
        buffer.clone_from(&self.entries[next]);
        true
    }

    /// Step to a newer entry and load it into `buffer`; stepping past the
    /// newest entry clears `buffer` and returns to the live line.
    ///
    /// Returns `false` when already on the live line.
    pub fn navigate_newer(&mut self, buffer: &mut String) -> bool {
        match self.cursor {
            None => false,
            Some(0) => {
                self.cursor = None;
                buffer.clear();
                true
            },
            Some(c) => {
                self.cursor = Some(c - 1);
                buffer.clone_from(&self.entries[c - 1]);
                true
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use homebase_store::MemoryStore;
    use homebase_types::error::{HomebaseError, Result};
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    /// Store whose writes always fail.
    struct FailingStore;
    impl KvStore for FailingStore {
        fn get(&self, _: &str) -> Result<Option<Value>> {
            Err(HomebaseError::Store("offline".into()))
        }
        fn set(&mut self, _: &str, _: Value) -> Result<()> {
            Err(HomebaseError::Store("offline".into()))
        }
        fn remove(&mut self, _: &str) -> Result<()> {
            Err(HomebaseError::Store("offline".into()))
        }
        fn keys(&self) -> Result<Vec<String>> {
            Err(HomebaseError::Store("offline".into()))
        }
    }

    fn filled(lines: &[&str]) -> (History, MemoryStore) {
        let mut store = MemoryStore::new();
        let mut h = History::new(1000);
        for line in lines {
            h.submit(line, &mut store);
        }
        (h, store)
    }

    #[test]
    fn submit_prepends_and_persists() {
        let (h, store) = filled(&["echo a", "echo b"]);
        assert_eq!(h.entries(), ["echo b", "echo a"]);
        assert_eq!(
            store.get(HISTORY_KEY).unwrap(),
            Some(json!(["echo b", "echo a"]))
        );
    }

    #[test]
    fn resubmission_moves_to_front() {
        let (h, _) = filled(&["a", "b", "c", "a"]);
        assert_eq!(h.entries(), ["a", "c", "b"]);
    }

    #[test]
    fn bound_evicts_oldest() {
        let mut store = MemoryStore::new();
        let mut h = History::new(3);
        for line in ["1", "2", "3", "4"] {
            h.submit(line, &mut store);
        }
        assert_eq!(h.entries(), ["4", "3", "2"]);
    }

    #[test]
    fn lowering_bound_applies_on_next_submit() {
        let (mut h, mut store) = filled(&["1", "2", "3", "4"]);
        h.set_max_entries(2);
        assert_eq!(h.len(), 4);
        h.submit("5", &mut store);
        assert_eq!(h.entries(), ["5", "4"]);
    }

    #[test]
    fn submit_resets_cursor() {
        let (mut h, mut store) = filled(&["a", "b"]);
        let mut buf = String::new();
        h.navigate_older(&mut buf);
        assert_eq!(h.cursor(), Some(0));
        h.submit("c", &mut store);
        assert_eq!(h.cursor(), None);
    }

    #[test]
    fn navigate_older_stops_at_oldest() {
        let (mut h, _) = filled(&["old", "mid", "new"]);
        let mut buf = String::new();
        assert!(h.navigate_older(&mut buf));
        assert_eq!(buf, "new");
        assert!(h.navigate_older(&mut buf));
        assert_eq!(buf, "mid");
        assert!(h.navigate_older(&mut buf));
        assert_eq!(buf, "old");
        assert!(!h.navigate_older(&mut buf));
        assert_eq!(buf, "old");
        assert_eq!(h.cursor(), Some(2));
    }

    #[test]
    fn navigate_newer_returns_to_live_line() {
        let (mut h, _) = filled(&["old", "new"]);
        let mut buf = String::from("draft");
        h.navigate_older(&mut buf);
        h.navigate_older(&mut buf);
        assert_eq!(buf, "old");
        assert!(h.navigate_newer(&mut buf));
        assert_eq!(buf, "new");
        assert!(h.navigate_newer(&mut buf));
        assert_eq!(buf, "");
        assert_eq!(h.cursor(), None);
    }

    #[test]
    fn navigate_newer_on_live_line_is_noop() {
        let (mut h, _) = filled(&["a"]);
        let mut buf = String::from("typing");
        assert!(!h.navigate_newer(&mut buf));
        assert_eq!(buf, "typing");
    }

    #[test]
    fn navigate_empty_history() {
        let mut h = History::new(10);
        let mut buf = String::from("x");
        assert!(!h.navigate_older(&mut buf));
        assert_eq!(buf, "x");
        assert_eq!(h.cursor(), None);
    }

    #[test]
    fn navigation_does_not_mutate_log() {
        let (mut h, _) = filled(&["a", "b", "c"]);
        let before = h.entries().to_vec();
        let mut buf = String::new();
        h.navigate_older(&mut buf);
        h.navigate_older(&mut buf);
        h.navigate_newer(&mut buf);
        assert_eq!(h.entries(), before.as_slice());
    }

    #[test]
    fn load_filters_and_bounds() {
        let mut store = MemoryStore::new();
        store
            .set(HISTORY_KEY, json!(["c", 5, "b", "c", "a", null]))
            .unwrap();
        let h = History::load(&store, 2);
        assert_eq!(h.entries(), ["c", "b"]);
    }

    #[test]
    fn load_from_failing_store_is_empty() {
        let h = History::load(&FailingStore, 10);
        assert!(h.is_empty());
    }

    #[test]
    fn submit_survives_failing_store() {
        let mut store = FailingStore;
        let mut h = History::new(10);
        h.submit("echo hi", &mut store);
        assert_eq!(h.entries(), ["echo hi"]);
    }

    proptest! {
        #[test]
        fn bound_holds(max in 1usize..20, count in 0usize..60) {
            let mut store = MemoryStore::new();
            let mut h = History::new(max);
            for i in 0..count {
                h.submit(&format!("cmd {i}"), &mut store);
            }
            prop_assert_eq!(h.len(), count.min(max));
            if count > 0 {
                prop_assert_eq!(&h.entries()[0], &format!("cmd {}", count - 1));
            }
        }

        #[test]
        fn older_n_times_then_newer_n_times(len in 1usize..12, n_seed in 0usize..100) {
            let mut store = MemoryStore::new();
            let mut h = History::new(100);
            for i in 0..len {
                h.submit(&format!("line {i}"), &mut store);
            }
            let n = 1 + n_seed % len;
            let mut buf = String::new();
            for _ in 0..n {
                h.navigate_older(&mut buf);
            }
            prop_assert_eq!(&buf, &h.entries()[n - 1]);
            for _ in 0..n {
                h.navigate_newer(&mut buf);
            }
            prop_assert_eq!(h.cursor(), None);
            prop_assert!(buf.is_empty());
        }

        #[test]
        fn duplicates_never_accumulate(lines in proptest::collection::vec("[ab]{1,2}", 0..30)) {
            let mut store = MemoryStore::new();
            let mut h = History::new(100);
            for line in &lines {
                h.submit(line, &mut store);
            }
            let mut sorted = h.entries().to_vec();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), h.len());
        }
    }
}
