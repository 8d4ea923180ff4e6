// Repository module structure
pub mod errors;
mod entries;
mod in_memory;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use entries::{EntryRepository, EntryRepositoryTrait};
pub use in_memory::InMemoryStorage;
