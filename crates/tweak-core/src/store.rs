//! Bounded, ordered backing store.

use crate::Result;
use crate::persistence::{NoopHook, PersistenceHook};
use std::sync::Arc;
use tweak_types::CAPACITY;

/// Ordered list of strings, 1-indexed for reads.
///
/// The store itself does not refuse appends past [`CAPACITY`]; the state
/// machine checks [`BackingStore::is_full`] first.
pub struct BackingStore {
    entries: Vec<String>,
    hook: Arc<dyn PersistenceHook>,
}

impl BackingStore {
    pub fn new(hook: Arc<dyn PersistenceHook>) -> Self {
        Self {
            entries: Vec::with_capacity(CAPACITY),
            hook,
        }
    }

    /// Push `value` and notify the hook once.
    ///
    /// On hook failure the value stays in the store and the error is returned.
    pub fn append(&mut self, value: String) -> Result<()> {
        self.entries.push(value);
        let value = &self.entries[self.entries.len() - 1];
        self.hook.update(&self.entries, value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= CAPACITY
    }

    /// Value at a 1-based index, or `None` outside `1..=len`.
    pub fn read(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }

    /// Remove every value. The hook is not notified.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl Default for BackingStore {
    fn default() -> Self {
        Self::new(Arc::new(NoopHook))
    }
}

impl std::fmt::Debug for BackingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackingStore")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}
