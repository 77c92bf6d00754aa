//! Storage module for persisting harvested quotes
//!
//! This module handles all database operations, including:
//! - The `RecordStore` / `UnitOfWork` interface the pipeline writes through
//! - The SQLite implementation and its schema
//! - `persist_quotes`, which commits a whole batch or none of it

mod schema;
mod sqlite;
mod traits;

pub use sqlite::{SqliteStore, SqliteUnitOfWork};
pub use traits::{RecordStore, StorageError, StorageResult, UnitOfWork};

use crate::quote::QuoteRecord;

/// Represents a persisted quote row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRow {
    pub id: i64,
    pub text: String,
    pub author: String,
    /// Tags joined with ", "
    pub tags: String,
    pub author_info: Option<String>,
    /// RFC 3339 timestamp of the unit of work that wrote the row
    pub scraped_at: String,
}

impl QuoteRow {
    /// Splits the stored tag string back into labels
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .split(", ")
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn into_quote(self) -> QuoteRecord {
        let tags = self.tag_list();
        QuoteRecord {
            text: self.text,
            author: self.author,
            tags,
            author_info: self.author_info,
        }
    }
}

/// Persists `quotes` as a single unit of work
///
/// Every quote is inserted inside one transaction. If any insert fails the
/// transaction is rolled back and the insert error is returned; otherwise the
/// transaction is committed.
///
/// # Returns
///
/// * `Ok(usize)` - Number of rows committed
/// * `Err(StorageError)` - Nothing was committed
pub fn persist_quotes(store: &mut dyn RecordStore, quotes: &[QuoteRecord]) -> StorageResult<usize> {
    let mut unit = store.begin()?;

    for (index, quote) in quotes.iter().enumerate() {
        if let Err(e) = unit.insert(quote) {
            tracing::error!("Insert failed for \"{}\", rolling back: {}", quote, e);
            if let Err(rollback_err) = unit.rollback() {
                tracing::error!("Rollback failed: {}", rollback_err);
            }
            return Err(StorageError::Insert {
                index,
                source: Box::new(e),
            });
        }
    }

    unit.commit()?;
    tracing::info!("Committed {} quotes", quotes.len());

    Ok(quotes.len())
}
