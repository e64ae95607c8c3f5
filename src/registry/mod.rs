//! Registry of in-flight directives.
//!
//! Tracks every accepted directive by message id from pre-handle until the
//! owning agent removes it. The registry guards only the map structure; agent
//! processing of a record always happens after the lock has been released.

pub mod record;

pub use record::DirectiveRecord;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// Thread-safe map from message id to [`DirectiveRecord`].
///
/// Every operation is a single critical section. Entries are never
/// overwritten: inserting under a live key hands the new record back.
#[derive(Debug, Default)]
pub struct DirectiveRegistry {
    records: Mutex<HashMap<String, Arc<DirectiveRecord>>>,
}

impl DirectiveRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `record` under `message_id` if the id is free.
    ///
    /// # Returns
    ///
    /// The registered record, or `Err(record)` unchanged when the id is
    /// already taken. The existing entry is left as it was.
    pub fn insert(
        &self,
        message_id: &str,
        record: DirectiveRecord,
    ) -> Result<Arc<DirectiveRecord>, DirectiveRecord> {
        let mut records = self.records.lock();
        match records.entry(message_id.to_string()) {
            Entry::Occupied(_) => Err(record),
            Entry::Vacant(slot) => {
                let record = Arc::new(record);
                slot.insert(Arc::clone(&record));
                Ok(record)
            }
        }
    }

    /// Get the record registered under `message_id`, if any.
    pub fn lookup(&self, message_id: &str) -> Option<Arc<DirectiveRecord>> {
        self.records.lock().get(message_id).cloned()
    }

    /// Drop the entry for `message_id`. Returns `false` if there was none.
    pub fn remove(&self, message_id: &str) -> bool {
        self.records.lock().remove(message_id).is_some()
    }

    /// Whether a record is registered under `message_id`.
    pub fn contains(&self, message_id: &str) -> bool {
        self.records.lock().contains_key(message_id)
    }

    /// Number of registered records.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the registered ids, in no particular order.
    pub fn message_ids(&self) -> Vec<String> {
        self.records.lock().keys().cloned().collect()
    }
}
