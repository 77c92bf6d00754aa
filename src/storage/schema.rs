//! Database schema definitions
//!
//! The schema is created idempotently on open. There are no migrations.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per persisted quote
CREATE TABLE IF NOT EXISTS quotes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL CHECK (length(text) > 0),
    author TEXT NOT NULL CHECK (length(author) BETWEEN 1 AND 100),
    tags TEXT,
    author_info TEXT,
    scraped_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_quotes_author ON quotes(author);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
