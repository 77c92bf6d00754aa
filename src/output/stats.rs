//! Statistics for harvest runs and the record store

use crate::crawler::{HarvestReport, Termination};
use crate::storage::RecordStore;
use crate::output::OutputResult;
use std::collections::HashSet;

/// Summary of what the record store holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStatistics {
    /// Total persisted quotes
    pub total_quotes: u64,

    /// Quotes that carry an author biography
    pub with_author_info: u64,

    /// Number of distinct authors
    pub distinct_authors: u64,

    /// Number of distinct tags
    pub distinct_tags: u64,
}

/// Loads statistics from storage
pub fn load_statistics(store: &dyn RecordStore) -> OutputResult<StoreStatistics> {
    let rows = store.load_all()?;

    let with_author_info = rows.iter().filter(|r| r.author_info.is_some()).count();
    let authors: HashSet<&str> = rows.iter().map(|r| r.author.as_str()).collect();
    let tags: HashSet<String> = rows.iter().flat_map(|r| r.tag_list()).collect();

    Ok(StoreStatistics {
        total_quotes: store.count()?,
        with_author_info: with_author_info as u64,
        distinct_authors: authors.len() as u64,
        distinct_tags: tags.len() as u64,
    })
}

/// Prints store statistics to stdout
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Quote Store Statistics ===\n");

    println!("  Quotes: {}", stats.total_quotes);
    println!("  Distinct authors: {}", stats.distinct_authors);
    println!("  Distinct tags: {}", stats.distinct_tags);

    let coverage = if stats.total_quotes > 0 {
        (stats.with_author_info as f64 / stats.total_quotes as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "  Author info coverage: {:.1}% ({} / {})",
        coverage, stats.with_author_info, stats.total_quotes
    );
}

/// Prints the counters of a finished harvest
pub fn print_report(report: &HarvestReport) {
    println!("=== Harvest Report ===\n");
    println!("  Pages fetched: {}", report.pages_fetched);
    println!("  Quotes extracted: {}", report.extracted);
    println!("  Unique quotes: {}", report.unique);
    println!("  Enriched with author info: {}", report.enriched);
    println!("  Persisted: {}", report.persisted);
    println!("  Elapsed: {:.2}s", report.elapsed.as_secs_f64());

    match &report.termination {
        Termination::LastPage => println!("  Pagination: reached last page"),
        Termination::FetchFailed { url, error } => {
            println!("  Pagination: stopped early at {} ({})", url, error)
        }
        Termination::Cycle { url } => println!("  Pagination: stopped at revisited page {}", url),
        Termination::BadNextLink { href, error } => {
            println!("  Pagination: stopped at unusable next link '{}' ({})", href, error)
        }
    }
}
