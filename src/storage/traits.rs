//! Storage traits and error types
//!
//! This module defines the record store interface, the unit of work it hands
//! out, and associated error types.

use crate::quote::QuoteRecord;
use crate::storage::QuoteRow;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Insert of quote #{index} failed: {source}")]
    Insert {
        index: usize,
        #[source]
        source: Box<StorageError>,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A transactional scope: all of its inserts become visible together or not at all
///
/// `commit` and `rollback` consume the unit, so it is released on either path.
/// Dropping a unit without committing discards its writes.
pub trait UnitOfWork {
    /// Stages one quote row
    fn insert(&mut self, quote: &QuoteRecord) -> StorageResult<()>;

    /// Makes every staged row visible
    fn commit(self: Box<Self>) -> StorageResult<()>;

    /// Discards every staged row
    fn rollback(self: Box<Self>) -> StorageResult<()>;
}

/// Trait for record store implementations
pub trait RecordStore {
    /// Begins a unit of work; it borrows the store exclusively until released
    fn begin(&mut self) -> StorageResult<Box<dyn UnitOfWork + '_>>;

    /// Loads every persisted row in insertion order
    fn load_all(&self) -> StorageResult<Vec<QuoteRow>>;

    /// Counts persisted rows
    fn count(&self) -> StorageResult<u64>;
}
