use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::models::entry::{EntryRecord, Measurements, NewEntryRecord};
use super::errors::RepositoryError;

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    entries: BTreeMap<i64, EntryRecord>,
}

/// In-memory storage for entries, used when no database is available
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entry, assigning the next id
    pub fn store_entry(&self, entry: NewEntryRecord) -> Result<EntryRecord, RepositoryError> {
        let mut store = self.inner.lock()?;
        store.next_id += 1;
        let record = EntryRecord::from_new(store.next_id, entry);
        store.entries.insert(record.id, record.clone());
        Ok(record)
    }

    /// Get all entries, oldest first
    pub fn get_all(&self) -> Result<Vec<EntryRecord>, RepositoryError> {
        self.get_range(None, None)
    }

    /// Replace the measurements of an entry
    pub fn update_measurements(
        &self,
        id: i64,
        measurements: Measurements,
    ) -> Result<Option<EntryRecord>, RepositoryError> {
        let mut store = self.inner.lock()?;
        Ok(store.entries.get_mut(&id).map(|record| {
            record.apply(measurements);
            record.clone()
        }))
    }

    /// Delete an entry
    pub fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let mut store = self.inner.lock()?;
        Ok(store.entries.remove(&id).is_some())
    }

    /// Get entries within inclusive timestamp bounds, oldest first
    pub fn get_range(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<EntryRecord>, RepositoryError> {
        let store = self.inner.lock()?;

        let mut entries: Vec<EntryRecord> = store
            .entries
            .values()
            .filter(|entry| start.map_or(true, |start| entry.timestamp.as_str() >= start))
            .filter(|entry| end.map_or(true, |end| entry.timestamp.as_str() <= end))
            .cloned()
            .collect();

        // ids ascend with insertion, so this matches the SQL ORDER BY
        entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Ok(entries)
    }
}
