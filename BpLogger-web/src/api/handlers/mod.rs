pub mod entries;
pub mod health;
pub mod pages;

// Re-export handlers for easier imports
pub use entries::{list_blocks, list_readings};
pub use health::health_check;
pub use pages::{create_entry, delete_entry, download, edit_entry, index, reset_user};
