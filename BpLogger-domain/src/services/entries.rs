use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, error, info};
use validator::Validate;

use bp_logger_data::repository::{EntryRepository, EntryRepositoryTrait, RepositoryError};

use crate::entities::block::Block;
use crate::entities::conversions;
use crate::entities::reading::{Measurements, NewEntryRequest, Reading};
use crate::services::blocks::compute_blocks;
use crate::services::export::{write_csv, ExportError, ExportScope};
use crate::session::ResolvedIdentity;

/// Entry service errors
#[derive(Debug, Error)]
pub enum EntryServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found error
    #[error("Entry not found: {0}")]
    NotFound(i64),

    /// Repository error
    #[error("Repository error: {0}")]
    Repository(String),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Trait for entry service operations
#[async_trait]
pub trait EntryServiceTrait {
    /// Log a new entry for the given identity, stamped with the current local time
    async fn create_entry(
        &self,
        identity: ResolvedIdentity,
        measurements: Measurements,
    ) -> Result<Reading, EntryServiceError>;

    /// Replace the four measurements of an existing entry
    async fn update_entry(&self, id: i64, measurements: Measurements) -> Result<Reading, EntryServiceError>;

    /// Delete an entry
    async fn delete_entry(&self, id: i64) -> Result<(), EntryServiceError>;

    /// All readings, in no particular order
    async fn list_readings(&self) -> Result<Vec<Reading>, EntryServiceError>;

    /// All readings grouped into blocks, newest block first
    async fn list_blocks(&self) -> Result<Vec<Block>, EntryServiceError>;

    /// Readings in `scope` rendered as CSV bytes
    async fn export_csv(&self, scope: ExportScope) -> Result<Vec<u8>, EntryServiceError>;

    /// Whether entries live in the in-memory fallback store
    fn is_in_memory(&self) -> bool;

    /// Round-trip to the database; `Ok(false)` when running in memory
    fn ping_database(&self) -> Result<bool, String>;
}

/// Entry service for domain logic
#[derive(Debug, Clone)]
pub struct EntryService<R: EntryRepositoryTrait> {
    repository: R,
}

impl<R: EntryRepositoryTrait> EntryService<R> {
    /// Create a new entry service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> EntryServiceError {
        error!("Repository failure: {}", err);
        EntryServiceError::Repository(err.to_string())
    }

    fn validate_request(&self, request: &NewEntryRequest) -> Result<(), EntryServiceError> {
        if let Err(validation_errors) = request.validate() {
            let error_message = validation_errors
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let error_msgs: Vec<String> = errors
                        .iter()
                        .map(|err| match &err.message {
                            Some(msg) => msg.to_string(),
                            None => format!("Invalid {}", field),
                        })
                        .collect();
                    format!("{}: {}", field, error_msgs.join(", "))
                })
                .collect::<Vec<String>>()
                .join("; ");

            return Err(EntryServiceError::Validation(error_message));
        }
        Ok(())
    }

    async fn readings_in(&self, scope: ExportScope) -> Result<Vec<Reading>, EntryServiceError> {
        let records = match scope.bounds() {
            None => self.repository.get_all().await,
            Some((from, to)) => {
                self.repository
                    .get_range(
                        Some(conversions::format_timestamp(from)),
                        Some(conversions::format_timestamp(to)),
                    )
                    .await
            }
        }
        .map_err(|e| self.map_repo_error(e))?;

        conversions::convert_to_domain_readings(records).map_err(|e| self.map_repo_error(e))
    }

    /// Store an entry with an explicit timestamp
    pub async fn create_entry_at(
        &self,
        identity: ResolvedIdentity,
        measurements: Measurements,
        recorded_at: NaiveDateTime,
    ) -> Result<Reading, EntryServiceError> {
        let request = NewEntryRequest {
            user_name: identity.user_name,
            dob: identity.dob,
            comment: identity.comment,
            measurements,
        };
        self.validate_request(&request)?;

        let record = conversions::convert_to_data_new_entry(request, recorded_at);
        let created = self
            .repository
            .create(record)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!("Logged entry {} at {}", created.id, created.timestamp);
        conversions::convert_to_domain_reading(created).map_err(|e| self.map_repo_error(e))
    }
}

#[async_trait]
impl<R: EntryRepositoryTrait + Send + Sync> EntryServiceTrait for EntryService<R> {
    async fn create_entry(
        &self,
        identity: ResolvedIdentity,
        measurements: Measurements,
    ) -> Result<Reading, EntryServiceError> {
        self.create_entry_at(identity, measurements, Local::now().naive_local())
            .await
    }

    async fn update_entry(&self, id: i64, measurements: Measurements) -> Result<Reading, EntryServiceError> {
        let updated = self
            .repository
            .update_measurements(id, conversions::convert_to_data_measurements(measurements))
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or(EntryServiceError::NotFound(id))?;

        info!("Updated entry {}", id);
        conversions::convert_to_domain_reading(updated).map_err(|e| self.map_repo_error(e))
    }

    async fn delete_entry(&self, id: i64) -> Result<(), EntryServiceError> {
        let deleted = self
            .repository
            .delete(id)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        if !deleted {
            return Err(EntryServiceError::NotFound(id));
        }
        info!("Deleted entry {}", id);
        Ok(())
    }

    async fn list_readings(&self) -> Result<Vec<Reading>, EntryServiceError> {
        self.readings_in(ExportScope::All).await
    }

    async fn list_blocks(&self) -> Result<Vec<Block>, EntryServiceError> {
        let readings = self.list_readings().await?;
        let blocks = compute_blocks(&readings);
        debug!("Grouped {} readings into {} blocks", readings.len(), blocks.len());
        Ok(blocks)
    }

    async fn export_csv(&self, scope: ExportScope) -> Result<Vec<u8>, EntryServiceError> {
        let readings = self.readings_in(scope).await?;
        Ok(write_csv(&readings)?)
    }

    fn is_in_memory(&self) -> bool {
        self.repository.is_in_memory()
    }

    fn ping_database(&self) -> Result<bool, String> {
        match self.repository.pool() {
            Some(pool) => pool
                .ping()
                .map(|_| true)
                .map_err(|e| format!("Database connection error: {}", e)),
            None => Ok(false),
        }
    }
}

/// Create an entry service over the given repository
pub fn create_default_entry_service(repository: EntryRepository) -> EntryService<EntryRepository> {
    EntryService::new(repository)
}
