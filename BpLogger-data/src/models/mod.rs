pub mod entry;

pub use entry::{EntryRecord, Measurements, NewEntryRecord, TIMESTAMP_FORMAT};
