//! Draw records and their persistence
//!
//! This module defines the stored outcome of a balancing run, the storage
//! interface, and in-memory and SQLite implementations.

pub mod record;
pub mod sqlite;
pub mod store;

// Re-export commonly used types
pub use record::{DrawKey, DrawRecord};
pub use sqlite::SqliteDrawRecordStore;
pub use store::{DrawRecordStore, InMemoryDrawRecordStore};
