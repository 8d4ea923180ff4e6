pub mod blocks;
pub mod entries;
pub mod export;

// Domain services
// This module contains business logic implementations.

// Re-export service traits and factory functions
pub use blocks::{compute_blocks, BLOCK_DAYS};
pub use entries::{create_default_entry_service, EntryService, EntryServiceError, EntryServiceTrait};
pub use export::{write_csv, ExportError, ExportScope, EXPORT_FILE_NAME};
