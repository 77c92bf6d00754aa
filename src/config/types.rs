use serde::Deserialize;
use url::Url;

/// Main configuration structure for Quote-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Layout of the listing site being harvested
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Absolute base URL; relative next-page and author links resolve against it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the first listing page
    #[serde(rename = "start-path", default = "default_start_path")]
    pub start_path: String,

    /// Path prefix of author biography pages; the author slug is appended
    #[serde(rename = "author-path-prefix", default = "default_author_path_prefix")]
    pub author_path_prefix: String,

    /// Path of the single random-quote page
    #[serde(rename = "random-path", default = "default_random_path")]
    pub random_path: String,
}

impl SiteConfig {
    /// Parses the configured base URL
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.base_url)
    }

    /// Absolute URL of the first listing page
    pub fn start_url(&self) -> Result<Url, url::ParseError> {
        self.base_url()?.join(&self.start_path)
    }

    /// Absolute URL of the random-quote page
    pub fn random_url(&self) -> Result<Url, url::ParseError> {
        self.base_url()?.join(&self.random_path)
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of biography lookups in flight at once
    #[serde(rename = "max-concurrent-lookups", default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: u32,

    /// What a failed listing-page fetch does to the crawl
    #[serde(rename = "on-page-error", default)]
    pub on_page_error: PageErrorPolicy,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_lookups: default_max_concurrent_lookups(),
            on_page_error: PageErrorPolicy::default(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Policy applied when a listing page cannot be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageErrorPolicy {
    /// End the crawl quietly and keep every page gathered so far
    #[default]
    Stop,

    /// Fail the whole run; nothing is persisted
    Abort,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown export
    #[serde(rename = "summary-path", default = "default_summary_path")]
    pub summary_path: String,
}

fn default_start_path() -> String {
    "/page/1/".to_string()
}

fn default_author_path_prefix() -> String {
    "/author/".to_string()
}

fn default_random_path() -> String {
    "/random".to_string()
}

fn default_max_concurrent_lookups() -> u32 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_summary_path() -> String {
    "./quotes.md".to_string()
}
