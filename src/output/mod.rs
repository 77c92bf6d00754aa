//! Output module for harvest results
//!
//! This module provides:
//! - The per-quote console listing printed after a harvest
//! - Run and store statistics
//! - Markdown export of the persisted corpus

mod markdown;
mod stats;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{load_statistics, print_report, print_statistics, StoreStatistics};

use crate::quote::QuoteRecord;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors that can occur while producing output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Formats one quote as the console block printed after a harvest
pub fn format_quote(quote: &QuoteRecord) -> String {
    format!(
        "Quote: {}\nAuthor: {}\nTags: {}\nAuthor info: {}\n{}",
        quote.text,
        quote.author,
        quote.joined_tags(),
        quote.author_info.as_deref().unwrap_or("-"),
        "-".repeat(80)
    )
}

/// Prints every quote in order
pub fn print_quotes(quotes: &[QuoteRecord]) {
    for quote in quotes {
        println!("{}", format_quote(quote));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_quote() {
        let quote = QuoteRecord::new("Be yourself.", "Oscar Wilde", ["attributed", "honesty"])
            .with_author_info("Irish poet.");

        let block = format_quote(&quote);
        let lines: Vec<&str> = block.lines().collect();

        assert_eq!(lines[0], "Quote: Be yourself.");
        assert_eq!(lines[1], "Author: Oscar Wilde");
        assert_eq!(lines[2], "Tags: attributed, honesty");
        assert_eq!(lines[3], "Author info: Irish poet.");
        assert_eq!(lines[4].len(), 80);
    }

    #[test]
    fn test_format_quote_without_bio() {
        let quote = QuoteRecord::new("Q", "A", Vec::<&str>::new());
        assert!(format_quote(&quote).contains("Author info: -"));
    }
}
