//! Harvest pipeline - end-to-end orchestration
//!
//! Runs the four stages in order, each handing its whole batch to the next:
//! - Pagination walk over the listing
//! - Deduplication by `(text, author)`
//! - Concurrent author enrichment
//! - Single-transaction persistence

use crate::config::Config;
use crate::crawler::enricher::AuthorEnricher;
use crate::crawler::extractor::extract_first_quote;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::walker::{PaginationWalker, Termination};
use crate::quote::{remove_duplicates, QuoteRecord};
use crate::storage::{persist_quotes, RecordStore, SqliteStore};
use crate::HarvestError;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What a completed harvest did
#[derive(Debug, Clone)]
pub struct HarvestReport {
    /// Listing pages successfully fetched
    pub pages_fetched: usize,

    /// Quotes extracted across all pages, before deduplication
    pub extracted: usize,

    /// Quotes left after deduplication
    pub unique: usize,

    /// Quotes whose author biography was found
    pub enriched: usize,

    /// Rows committed to the record store
    pub persisted: usize,

    /// Why pagination stopped
    pub termination: Termination,

    /// The persisted quotes, in persisted order
    pub quotes: Vec<QuoteRecord>,

    pub elapsed: Duration,
}

/// The harvest pipeline with its shared fetcher
pub struct Pipeline {
    config: Config,
    fetcher: Arc<dyn Fetcher>,
}

impl Pipeline {
    /// Creates a pipeline around an existing fetcher
    pub fn new(config: Config, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Creates a pipeline that fetches over HTTP
    pub fn with_http(config: Config) -> Result<Self, HarvestError> {
        let timeout = Duration::from_secs(config.crawler.request_timeout_secs);
        let fetcher = HttpFetcher::from_config(&config.user_agent, timeout)?;
        Ok(Self::new(config, Arc::new(fetcher)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the full harvest and commits the result to `store`
    ///
    /// Nothing is written unless every stage before persistence succeeds, and
    /// a failed insert rolls back the whole batch.
    pub async fn run(&self, store: &mut dyn RecordStore) -> Result<HarvestReport, HarvestError> {
        let start_time = Instant::now();
        let site = &self.config.site;
        let base_url = site.base_url()?;

        tracing::info!("Starting harvest at {}", site.start_url()?);

        let walker = PaginationWalker::new(
            self.fetcher.as_ref(),
            base_url.clone(),
            self.config.crawler.on_page_error,
        );
        let outcome = walker.walk(site.start_url()?).await?;
        let extracted = outcome.quotes.len();

        let unique_quotes = remove_duplicates(outcome.quotes);
        let unique = unique_quotes.len();
        tracing::info!("{} quotes extracted, {} unique", extracted, unique);

        let enricher = AuthorEnricher::new(
            Arc::clone(&self.fetcher),
            base_url,
            site.author_path_prefix.clone(),
            self.config.crawler.max_concurrent_lookups as usize,
        );
        let quotes = enricher.enrich(unique_quotes).await;
        let enriched = quotes.iter().filter(|q| q.author_info.is_some()).count();

        let persisted = persist_quotes(store, &quotes)?;

        Ok(HarvestReport {
            pages_fetched: outcome.pages_fetched,
            extracted,
            unique,
            enriched,
            persisted,
            termination: outcome.termination,
            quotes,
            elapsed: start_time.elapsed(),
        })
    }

    /// Fetches the random-quote page and returns its quote; nothing is stored
    pub async fn random_quote(&self) -> Result<QuoteRecord, HarvestError> {
        let url = self.config.site.random_url()?;
        let markup = self.fetcher.fetch(url.as_str()).await?;
        extract_first_quote(&markup).map_err(|source| HarvestError::Extract {
            url: url.to_string(),
            source,
        })
    }
}

/// Runs a complete harvest into the configured SQLite database
///
/// This is the main entry point. It will:
/// 1. Open (or create) the database
/// 2. Build the shared HTTP client
/// 3. Walk, deduplicate, enrich and persist
pub async fn harvest(config: Config) -> Result<HarvestReport, HarvestError> {
    let mut store = SqliteStore::open(Path::new(&config.output.database_path))?;
    let pipeline = Pipeline::with_http(config)?;
    pipeline.run(&mut store).await
}
