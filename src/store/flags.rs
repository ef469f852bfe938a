use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::store::schema::{FLAGS_KEY, FlaggedData, parse_flagged};
use crate::store::slot::{KeyValueSlot, MemorySlot};

/// The persisted set of flagged question ids.
///
/// Never fails toward the caller. An unreadable slot leaves the stored set
/// alone; unparseable contents count as an empty set and are overwritten on
/// the next change. Each mutating call reads and writes within itself.
pub struct FlagStore {
    slot: Box<dyn KeyValueSlot>,
}

impl FlagStore {
    pub fn new(slot: impl KeyValueSlot + 'static) -> Self {
        Self {
            slot: Box::new(slot),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemorySlot::new())
    }

    pub fn list(&self) -> BTreeSet<String> {
        self.load().map(|ids| ids.into_iter().collect()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.load().map(|ids| ids.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.load().is_some_and(|ids| ids.iter().any(|i| i == id))
    }

    pub fn add(&self, id: &str) {
        self.update(id, |ids| {
            if ids.iter().any(|i| i == id) {
                return false;
            }
            ids.push(id.to_string());
            true
        });
    }

    pub fn remove(&self, id: &str) {
        self.update(id, |ids| {
            let before = ids.len();
            ids.retain(|i| i != id);
            ids.len() != before
        });
    }

    /// Flip `id` and return whether it is flagged afterwards.
    pub fn toggle(&self, id: &str) -> bool {
        self.update(id, |ids| {
            match ids.iter().position(|i| i == id) {
                Some(i) => {
                    ids.remove(i);
                }
                None => ids.push(id.to_string()),
            }
            true
        })
        .is_some_and(|ids| ids.iter().any(|i| i == id))
    }

    /// Read, apply `change`, and write back if it reports a modification.
    /// Returns the ids as persisted afterwards, or `None` if nothing could be read.
    fn update(
        &self,
        id: &str,
        change: impl FnOnce(&mut Vec<String>) -> bool,
    ) -> Option<Vec<String>> {
        let mut ids = self.load()?;
        let before = ids.clone();
        if !change(&mut ids) {
            return Some(ids);
        }
        match self.save(&ids) {
            Ok(()) => {
                debug!(question = id, flagged = ids.len(), "flag set updated");
                Some(ids)
            }
            Err(err) => {
                warn!(question = id, error = %err, "could not persist flagged questions");
                Some(before)
            }
        }
    }

    fn load(&self) -> Option<Vec<String>> {
        match self.try_load() {
            Ok(ids) => Some(ids),
            Err(err @ (StoreError::Json(_) | StoreError::Encoding(_))) => {
                warn!(error = %err, "flagged questions unreadable, treating as empty");
                Some(Vec::new())
            }
            Err(err) => {
                warn!(error = %err, "could not read flagged questions");
                None
            }
        }
    }

    fn try_load(&self) -> Result<Vec<String>, StoreError> {
        match self.slot.read(FLAGS_KEY)? {
            Some(json) => Ok(parse_flagged(&json)?.ids),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, ids: &[String]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&FlaggedData::new(ids.to_vec()))?;
        self.slot.write(FLAGS_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io;
    use std::rc::Rc;

    use super::*;
    use crate::store::json_store::JsonStore;

    /// Slot whose reads and writes can be switched off.
    #[derive(Default)]
    struct FlakySlot {
        inner: MemorySlot,
        fail_reads: Cell<bool>,
        fail_writes: Cell<bool>,
    }

    impl KeyValueSlot for FlakySlot {
        fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
            if self.fail_reads.get() {
                return Err(io::Error::other("disk gone").into());
            }
            self.inner.read(key)
        }

        fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.fail_writes.get() {
                return Err(io::Error::other("read-only").into());
            }
            self.inner.write(key, value)
        }
    }

    #[test]
    fn add_is_idempotent() {
        let store = FlagStore::in_memory();
        store.add("q1");
        store.add("q1");
        assert_eq!(store.len(), 1);
        assert!(store.contains("q1"));
    }

    #[test]
    fn remove_absent_is_noop() {
        let store = FlagStore::in_memory();
        store.add("q1");
        store.remove("q2");
        assert_eq!(store.list().into_iter().collect::<Vec<_>>(), vec!["q1"]);
        store.remove("q1");
        assert!(store.is_empty());
    }

    #[test]
    fn toggle_twice_restores_state() {
        let store = FlagStore::in_memory();
        assert!(store.toggle("q1"));
        assert!(!store.toggle("q1"));
        assert!(!store.contains("q1"));
    }

    #[test]
    fn persists_in_flag_order() {
        let slot = Rc::new(MemorySlot::new());
        let store = FlagStore::new(Rc::clone(&slot));
        store.add("b");
        store.add("a");
        let raw = slot.read(FLAGS_KEY).unwrap().unwrap();
        assert_eq!(parse_flagged(&raw).unwrap().ids, vec!["b", "a"]);
    }

    #[test]
    fn read_failure_degrades_to_empty_and_leaves_store_alone() {
        let slot = Rc::new(FlakySlot::default());
        let store = FlagStore::new(Rc::clone(&slot));
        store.add("q1");

        slot.fail_reads.set(true);
        assert!(store.list().is_empty());
        assert!(!store.contains("q1"));
        store.add("q2");
        store.remove("q1");
        assert!(!store.toggle("q3"));

        slot.fail_reads.set(false);
        assert_eq!(store.list().into_iter().collect::<Vec<_>>(), vec!["q1"]);
    }

    #[test]
    fn write_failure_keeps_previous_contents() {
        let slot = Rc::new(FlakySlot::default());
        let store = FlagStore::new(Rc::clone(&slot));
        store.add("q1");

        slot.fail_writes.set(true);
        store.add("q2");
        assert!(store.toggle("q1"));
        assert_eq!(store.len(), 1);
        assert!(!store.contains("q2"));
    }

    #[test]
    fn corrupt_contents_are_replaced_on_next_change() {
        let slot = Rc::new(MemorySlot::new());
        slot.write(FLAGS_KEY, "{broken").unwrap();
        let store = FlagStore::new(Rc::clone(&slot));
        assert!(store.is_empty());
        store.add("q1");
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn non_utf8_file_is_replaced_on_next_change() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(format!("{FLAGS_KEY}.json"));
        std::fs::write(&path, [0xff, 0xfe, b'[', b']']).unwrap();

        let store = FlagStore::new(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap());
        assert!(store.is_empty());
        store.add("q1");
        assert!(store.contains("q1"));
        assert!(store.toggle("q2"));
        assert_eq!(store.len(), 2);
        assert!(parse_flagged(&std::fs::read_to_string(&path).unwrap()).is_ok());
    }
}
