//! Sequential pagination walk
//!
//! The walker owns the pagination cursor. Each page's next reference is only
//! known once that page has been fetched and extracted, so pages are visited
//! strictly one after another.

use crate::config::PageErrorPolicy;
use crate::crawler::extractor::extract_page;
use crate::crawler::fetcher::Fetcher;
use crate::quote::QuoteRecord;
use crate::HarvestError;
use std::collections::HashSet;
use url::Url;

/// Loop-carried crawl state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// The next page to fetch
    Active(Url),

    /// Nothing left to fetch
    Done,
}

/// Why a walk stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The last fetched page had no next reference
    LastPage,

    /// A page fetch failed and the `Stop` policy ended the crawl there
    FetchFailed { url: String, error: String },

    /// The next reference pointed back at an already-visited page
    Cycle { url: String },

    /// The next reference could not be resolved to a URL
    BadNextLink { href: String, error: String },
}

impl Termination {
    /// Returns true if the walk reached the natural end of the listing
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::LastPage)
    }
}

/// Result of a full pagination walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOutcome {
    /// Every quote across all fetched pages, in pagination order
    pub quotes: Vec<QuoteRecord>,

    /// Number of pages successfully fetched
    pub pages_fetched: usize,

    pub termination: Termination,
}

/// Drives the pagination cursor from the first page to the last
pub struct PaginationWalker<'a> {
    fetcher: &'a dyn Fetcher,
    base_url: Url,
    policy: PageErrorPolicy,
}

impl<'a> PaginationWalker<'a> {
    /// Creates a walker
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Shared page fetcher
    /// * `base_url` - Site base URL that next-page references resolve against
    /// * `policy` - What a failed page fetch does to the crawl
    pub fn new(fetcher: &'a dyn Fetcher, base_url: Url, policy: PageErrorPolicy) -> Self {
        Self {
            fetcher,
            base_url,
            policy,
        }
    }

    /// Walks every page starting at `start`
    ///
    /// Under `PageErrorPolicy::Stop` a failed fetch or an unresolvable next
    /// link ends the walk and the quotes gathered so far are returned. Under
    /// `Abort` either is an error.
    pub async fn walk(&self, start: Url) -> Result<WalkOutcome, HarvestError> {
        let mut cursor = Cursor::Active(start);
        let mut visited = HashSet::new();
        let mut quotes = Vec::new();
        let mut pages_fetched = 0;
        let mut termination = Termination::LastPage;

        while let Cursor::Active(url) = cursor {
            visited.insert(url.clone());
            tracing::debug!("Fetching listing page {}", url);

            let markup = match self.fetcher.fetch(url.as_str()).await {
                Ok(markup) => markup,
                Err(error) => match self.policy {
                    PageErrorPolicy::Abort => {
                        return Err(HarvestError::Crawl {
                            url: url.to_string(),
                            source: error,
                        });
                    }
                    PageErrorPolicy::Stop => {
                        tracing::warn!("Stopping crawl at {}: {}", url, error);
                        termination = Termination::FetchFailed {
                            url: url.to_string(),
                            error: error.to_string(),
                        };
                        break;
                    }
                },
            };
            pages_fetched += 1;

            let page = extract_page(&markup).map_err(|source| HarvestError::Extract {
                url: url.to_string(),
                source,
            })?;
            tracing::debug!("Page {} yielded {} quotes", pages_fetched, page.quotes.len());
            quotes.extend(page.quotes);

            cursor = match page.next_page {
                Some(href) => match self.base_url.join(&href) {
                    Ok(next) if visited.contains(&next) => {
                        tracing::warn!("Next page {} was already visited, stopping", next);
                        termination = Termination::Cycle {
                            url: next.to_string(),
                        };
                        Cursor::Done
                    }
                    Ok(next) => Cursor::Active(next),
                    Err(source) => match self.policy {
                        PageErrorPolicy::Abort => {
                            return Err(HarvestError::NextLink {
                                url: url.to_string(),
                                href,
                                source,
                            });
                        }
                        PageErrorPolicy::Stop => {
                            tracing::warn!(
                                "Stopping crawl at {}: next link '{}' is unusable: {}",
                                url,
                                href,
                                source
                            );
                            termination = Termination::BadNextLink {
                                href,
                                error: source.to_string(),
                            };
                            Cursor::Done
                        }
                    },
                },
                None => Cursor::Done,
            };
        }

        tracing::info!(
            "Pagination finished after {} pages with {} quotes",
            pages_fetched,
            quotes.len()
        );

        Ok(WalkOutcome {
            quotes,
            pages_fetched,
            termination,
        })
    }
}
