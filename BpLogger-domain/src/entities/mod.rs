// Domain entities and value objects
pub mod block;
pub mod reading;
pub mod conversions;

// Re-export common types for easier imports
pub use block::{Block, BlockTotals};
pub use reading::{Measurements, NewEntryRequest, Reading};
