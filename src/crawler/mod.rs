//! Crawler module for fetching and processing quote pages
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching behind the `Fetcher` seam
//! - Markup extraction for listing and author pages
//! - The sequential pagination walk
//! - Bounded-concurrency author enrichment
//! - Overall pipeline coordination

mod enricher;
mod extractor;
mod fetcher;
mod pipeline;
mod walker;

pub use enricher::AuthorEnricher;
pub use extractor::{
    extract_author_details, extract_first_quote, extract_page, ExtractError, ExtractedPage,
};
pub use fetcher::{build_http_client, FetchError, Fetcher, HttpFetcher};
pub use pipeline::{harvest, HarvestReport, Pipeline};
pub use walker::{Cursor, PaginationWalker, Termination, WalkOutcome};
