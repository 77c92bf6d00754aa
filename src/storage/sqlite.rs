//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the `RecordStore` trait.
//! A unit of work is a rusqlite `Transaction`.

use crate::quote::QuoteRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{RecordStore, StorageResult, UnitOfWork};
use crate::storage::QuoteRow;
use chrono::Utc;
use rusqlite::{params, Connection, Transaction};
use std::path::Path;

/// SQLite record store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the database at `path` and ensures the schema exists
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;

        initialize_schema(&conn)?;
        tracing::debug!("Opened record store at {}", path.display());

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// A pending SQLite transaction; every row shares one `scraped_at` stamp
pub struct SqliteUnitOfWork<'conn> {
    tx: Transaction<'conn>,
    scraped_at: String,
}

impl UnitOfWork for SqliteUnitOfWork<'_> {
    fn insert(&mut self, quote: &QuoteRecord) -> StorageResult<()> {
        self.tx.execute(
            "INSERT INTO quotes (text, author, tags, author_info, scraped_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                quote.text,
                quote.author,
                quote.joined_tags(),
                quote.author_info,
                self.scraped_at,
            ],
        )?;
        Ok(())
    }

    fn commit(self: Box<Self>) -> StorageResult<()> {
        let unit = *self;
        unit.tx.commit()?;
        Ok(())
    }

    fn rollback(self: Box<Self>) -> StorageResult<()> {
        let unit = *self;
        unit.tx.rollback()?;
        Ok(())
    }
}

impl RecordStore for SqliteStore {
    fn begin(&mut self) -> StorageResult<Box<dyn UnitOfWork + '_>> {
        let tx = self.conn.transaction()?;
        Ok(Box::new(SqliteUnitOfWork {
            tx,
            scraped_at: Utc::now().to_rfc3339(),
        }))
    }

    fn load_all(&self) -> StorageResult<Vec<QuoteRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, text, author, tags, author_info, scraped_at FROM quotes ORDER BY id",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(QuoteRow {
                    id: row.get(0)?,
                    text: row.get(1)?,
                    author: row.get(2)?,
                    tags: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    author_info: row.get(4)?,
                    scraped_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM quotes", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
