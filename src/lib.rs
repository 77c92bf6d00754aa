//! Quote-Harvest: a one-shot quote corpus builder
//!
//! This crate walks a paginated quote listing, extracts and deduplicates the
//! quotes it finds, enriches each one with its author's biography using a
//! bounded pool of concurrent lookups, and persists the enriched set to SQLite
//! as a single all-or-nothing unit of work.

pub mod config;
pub mod crawler;
pub mod output;
pub mod quote;
pub mod storage;

use thiserror::Error;

pub use crawler::{ExtractError, FetchError};

/// Main error type for Quote-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction error for {url}: {source}")]
    Extract { url: String, source: ExtractError },

    #[error("Crawl aborted at {url}: {source}")]
    Crawl { url: String, source: FetchError },

    #[error("Unusable next link '{href}' on {url}: {source}")]
    NextLink {
        url: String,
        href: String,
        source: ::url::ParseError,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Coarse classification of a [`HarvestError`], consumed by each stage's
/// recovery policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network failure or non-2xx response
    Transport,

    /// An expected node or value was absent from the markup
    MissingField,

    /// The record store rejected a write or a transaction step
    Persistence,

    /// Bad configuration or process bootstrap failure
    Config,
}

impl HarvestError {
    /// Returns the kind of failure this error represents
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Fetch(_) | Self::Crawl { .. } | Self::Reqwest(_) => ErrorKind::Transport,
            Self::Extract { .. } | Self::NextLink { .. } => ErrorKind::MissingField,
            Self::Storage(_) => ErrorKind::Persistence,
            Self::Config(_) | Self::UrlParse(_) => ErrorKind::Config,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{harvest, HarvestReport, Pipeline};
pub use quote::{author_slug, clean_text, remove_duplicates, QuoteRecord};
