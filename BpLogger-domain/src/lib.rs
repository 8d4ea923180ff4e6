// BP Logger Domain
// This crate contains the business logic for the BP logger

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Per-visitor identity context
pub mod session;

// Health checks and system status
pub mod health;

// Re-export the database module from the data crate for convenience
pub use bp_logger_data::database;
