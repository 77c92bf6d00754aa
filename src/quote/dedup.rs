use crate::quote::QuoteRecord;
use std::collections::HashSet;

/// Keeps the first occurrence of every `(text, author)` identity, in input order
pub fn remove_duplicates(quotes: Vec<QuoteRecord>) -> Vec<QuoteRecord> {
    let mut seen = HashSet::with_capacity(quotes.len());
    let total = quotes.len();

    let unique: Vec<QuoteRecord> = quotes
        .into_iter()
        .filter(|quote| seen.insert(quote.identity()))
        .collect();

    tracing::debug!(
        "Deduplicated {} quotes down to {} unique",
        total,
        unique.len()
    );
    unique
}
