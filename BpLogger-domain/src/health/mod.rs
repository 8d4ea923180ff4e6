//! Domain layer health check functionality
//! This module derives the system status from the entry store

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::services::entries::EntryServiceTrait;

/// System health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Running on the in-memory fallback
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the status of the database
    ///
    /// - `Ok(true)`: a pooled connection answered
    /// - `Ok(false)`: entries are kept in memory
    /// - `Err`: the database is unreachable
    async fn check_database_status(&self) -> Result<bool, String>;
}

/// Health service backed by the entry service's store
#[derive(Clone)]
pub struct HealthService {
    entries: Arc<dyn EntryServiceTrait + Send + Sync>,
}

impl HealthService {
    pub fn new(entries: Arc<dyn EntryServiceTrait + Send + Sync>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let db_component = match self.check_database_status().await {
            Ok(true) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: None,
            },
            Ok(false) => HealthComponent {
                status: ComponentStatus::Degraded,
                details: Some("Using in-memory storage, entries are lost on restart".to_string()),
            },
            Err(e) => {
                warn!("Database health check failed: {}", e);
                HealthComponent {
                    status: ComponentStatus::Unhealthy,
                    details: Some(e),
                }
            }
        };

        let overall_status = match db_component.status {
            ComponentStatus::Unhealthy => SystemStatus::Unhealthy,
            ComponentStatus::Degraded => SystemStatus::Degraded,
            ComponentStatus::Healthy => SystemStatus::Healthy,
        };

        SystemHealth {
            status: overall_status,
            components: vec![("database".to_string(), db_component)].into_iter().collect(),
        }
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        self.entries.ping_database()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::entries::create_default_entry_service;
    use bp_logger_data::database::open_in_memory_pool;
    use bp_logger_data::repository::EntryRepository;

    #[tokio::test]
    async fn test_in_memory_store_is_degraded() {
        let service = create_default_entry_service(EntryRepository::in_memory());
        let health = HealthService::new(Arc::new(service)).get_system_health().await;

        assert_eq!(health.status, SystemStatus::Degraded);
        assert_eq!(health.components["database"].status, ComponentStatus::Degraded);
    }

    #[tokio::test]
    async fn test_sqlite_store_is_healthy() {
        let repository = EntryRepository::new(open_in_memory_pool().unwrap());
        let service = create_default_entry_service(repository);
        let health = HealthService::new(Arc::new(service)).get_system_health().await;

        assert_eq!(health.status, SystemStatus::Healthy);
        assert!(health.components["database"].details.is_none());
    }
}
