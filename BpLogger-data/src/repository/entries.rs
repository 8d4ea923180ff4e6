use async_trait::async_trait;
use tracing::debug;

use crate::database::DatabasePool;
use crate::models::entry::{EntryRecord, Measurements, NewEntryRecord};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;

/// Repository trait for logged entries
#[async_trait]
pub trait EntryRepositoryTrait {
    /// Insert a new entry
    async fn create(&self, entry: NewEntryRecord) -> Result<EntryRecord, RepositoryError>;

    /// Get all entries
    async fn get_all(&self) -> Result<Vec<EntryRecord>, RepositoryError>;

    /// Replace the measurements of an entry; `None` when the id is unknown
    async fn update_measurements(
        &self,
        id: i64,
        measurements: Measurements,
    ) -> Result<Option<EntryRecord>, RepositoryError>;

    /// Delete an entry; `false` when the id is unknown
    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;

    /// Entries within inclusive timestamp bounds, oldest first
    async fn get_range(
        &self,
        start: Option<String>,
        end: Option<String>,
    ) -> Result<Vec<EntryRecord>, RepositoryError>;

    /// Whether entries are kept in the in-memory fallback
    fn is_in_memory(&self) -> bool;

    /// Database pool backing this repository, if any
    fn pool(&self) -> Option<&DatabasePool>;
}

/// Repository for entries.
/// Uses the SQLite pool when one is configured and in-memory storage otherwise.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    pool: Option<DatabasePool>,
    storage: InMemoryStorage,
}

impl EntryRepository {
    /// Repository backed by a database pool
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            pool: Some(pool),
            storage: InMemoryStorage::new(),
        }
    }

    /// Repository that keeps everything in memory
    pub fn in_memory() -> Self {
        Self {
            pool: None,
            storage: InMemoryStorage::new(),
        }
    }
}

#[async_trait]
impl EntryRepositoryTrait for EntryRepository {
    async fn create(&self, entry: NewEntryRecord) -> Result<EntryRecord, RepositoryError> {
        match &self.pool {
            Some(pool) => DatabaseStorage::store_entry(pool, entry),
            None => {
                debug!("Database not available, using in-memory storage for create");
                self.storage.store_entry(entry)
            }
        }
    }

    async fn get_all(&self) -> Result<Vec<EntryRecord>, RepositoryError> {
        match &self.pool {
            Some(pool) => DatabaseStorage::get_all(pool),
            None => self.storage.get_all(),
        }
    }

    async fn update_measurements(
        &self,
        id: i64,
        measurements: Measurements,
    ) -> Result<Option<EntryRecord>, RepositoryError> {
        match &self.pool {
            Some(pool) => DatabaseStorage::update_measurements(pool, id, measurements),
            None => self.storage.update_measurements(id, measurements),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        match &self.pool {
            Some(pool) => DatabaseStorage::delete(pool, id),
            None => self.storage.delete(id),
        }
    }

    async fn get_range(
        &self,
        start: Option<String>,
        end: Option<String>,
    ) -> Result<Vec<EntryRecord>, RepositoryError> {
        debug!("Getting entries in range start={:?} end={:?}", start, end);
        match &self.pool {
            Some(pool) => DatabaseStorage::get_range(pool, start.as_deref(), end.as_deref()),
            None => self.storage.get_range(start.as_deref(), end.as_deref()),
        }
    }

    fn is_in_memory(&self) -> bool {
        self.pool.is_none()
    }

    fn pool(&self) -> Option<&DatabasePool> {
        self.pool.as_ref()
    }
}
