//! Concurrent author biography lookups
//!
//! Every quote gets exactly one lookup task. Tasks run on the tokio runtime,
//! gated by a semaphore sized to the configured lookup capacity, and each task
//! reports back with the slot index of the quote that spawned it. A failed
//! lookup leaves that quote's `author_info` empty and nothing else.

use crate::crawler::extractor::extract_author_details;
use crate::crawler::fetcher::Fetcher;
use crate::quote::{author_slug, QuoteRecord};
use crate::HarvestError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Adds author biographies to quotes with bounded concurrency
pub struct AuthorEnricher {
    fetcher: Arc<dyn Fetcher>,
    base_url: Url,
    author_path_prefix: String,
    max_concurrent: usize,
}

impl AuthorEnricher {
    /// Creates an enricher
    ///
    /// `max_concurrent` is clamped to at least one in-flight lookup.
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        base_url: Url,
        author_path_prefix: impl Into<String>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            fetcher,
            base_url,
            author_path_prefix: author_path_prefix.into(),
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Biography URL for an author: `<base><prefix><slug>/`
    pub fn author_url(&self, author: &str) -> Result<Url, url::ParseError> {
        let path = format!("{}{}/", self.author_path_prefix, author_slug(author));
        self.base_url.join(&path)
    }

    /// Looks up every quote's author and returns the quotes in their original order
    ///
    /// Returns only after every lookup task has finished.
    pub async fn enrich(&self, quotes: Vec<QuoteRecord>) -> Vec<QuoteRecord> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();

        tracing::info!(
            "Enriching {} quotes with at most {} lookups in flight",
            quotes.len(),
            self.max_concurrent
        );

        let mut task_slots = HashMap::with_capacity(quotes.len());

        for (slot, quote) in quotes.iter().enumerate() {
            let url = self.author_url(&quote.author);
            let fetcher = Arc::clone(&self.fetcher);
            let semaphore = Arc::clone(&semaphore);

            let handle = tasks.spawn(async move {
                // The semaphore is never closed, so acquire only fails if it is dropped
                let _permit = semaphore.acquire_owned().await.ok();
                let result = match url {
                    Ok(url) => lookup_biography(fetcher.as_ref(), &url).await,
                    Err(e) => Err(HarvestError::UrlParse(e)),
                };
                (slot, result)
            });
            task_slots.insert(handle.id(), slot);
        }

        let mut slots: Vec<Option<String>> = vec![None; quotes.len()];
        let mut failures = 0;

        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, (slot, Ok(biography)))) => slots[slot] = Some(biography),
                Ok((_, (slot, Err(e)))) => {
                    failures += 1;
                    let author = &quotes[slot].author;
                    tracing::warn!(
                        "Author lookup failed for {} ({}): {}",
                        author,
                        author_slug(author),
                        e
                    );
                }
                Err(e) => {
                    failures += 1;
                    match task_slots.get(&e.id()).map(|&slot| &quotes[slot].author) {
                        Some(author) => tracing::error!(
                            "Author lookup task for {} ({}) did not complete: {}",
                            author,
                            author_slug(author),
                            e
                        ),
                        None => tracing::error!("Author lookup task did not complete: {}", e),
                    }
                }
            }
        }

        tracing::info!(
            "Enrichment finished: {} succeeded, {} failed",
            quotes.len() - failures,
            failures
        );

        quotes
            .into_iter()
            .zip(slots)
            .map(|(mut quote, author_info)| {
                quote.author_info = author_info;
                quote
            })
            .collect()
    }
}

/// Fetches one author page and extracts its biography
async fn lookup_biography(fetcher: &dyn Fetcher, url: &Url) -> Result<String, HarvestError> {
    let markup = fetcher.fetch(url.as_str()).await?;
    extract_author_details(&markup).map_err(|source| HarvestError::Extract {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetcher::FetchError;
    use crate::crawler::walker::tests::MapFetcher;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn base() -> Url {
        Url::parse("https://quotes.example").unwrap()
    }

    fn bio_page(text: &str) -> String {
        format!(r#"<html><div class="author-details">{}</div></html>"#, text)
    }

    fn quote(text: &str, author: &str) -> QuoteRecord {
        QuoteRecord::new(text, author, Vec::<&str>::new())
    }

    #[test]
    fn test_author_url() {
        let enricher = AuthorEnricher::new(Arc::new(MapFetcher::default()), base(), "/author/", 10);
        assert_eq!(
            enricher.author_url("John Doe").unwrap().as_str(),
            "https://quotes.example/author/John-Doe/"
        );
    }

    #[tokio::test]
    async fn test_enriches_every_quote() {
        let fetcher = MapFetcher::default()
            .with_page("https://quotes.example/author/John-Doe/", bio_page("Born in 1900."))
            .with_page("https://quotes.example/author/Jane-Roe/", bio_page("Born in 1950."));
        let enricher = AuthorEnricher::new(Arc::new(fetcher), base(), "/author/", 2);

        let enriched = enricher
            .enrich(vec![quote("Q1", "John Doe"), quote("Q2", "Jane Roe")])
            .await;

        assert_eq!(enriched[0].author_info.as_deref(), Some("Born in 1900."));
        assert_eq!(enriched[1].author_info.as_deref(), Some("Born in 1950."));
    }

    #[tokio::test]
    async fn test_one_failing_author_is_isolated() {
        let fetcher = MapFetcher::default()
            .with_page("https://quotes.example/author/A-One/", bio_page("one"))
            .with_page("https://quotes.example/author/C-Three/", bio_page("three"))
            .with_page("https://quotes.example/author/D-Four/", bio_page("four"));
        let enricher = AuthorEnricher::new(Arc::new(fetcher), base(), "/author/", 10);

        let quotes = vec![
            quote("Q1", "A One"),
            quote("Q2", "B Two"),
            quote("Q3", "C Three"),
            quote("Q4", "D Four"),
        ];
        let enriched = enricher.enrich(quotes.clone()).await;

        assert_eq!(enriched.len(), 4);
        assert_eq!(enriched.iter().filter(|q| q.author_info.is_none()).count(), 1);
        assert_eq!(enriched[1].author_info, None);
        for (before, after) in quotes.iter().zip(&enriched) {
            assert_eq!(before.identity(), after.identity());
        }
    }

    #[tokio::test]
    async fn test_missing_details_node_leaves_bio_absent() {
        let fetcher = MapFetcher::default()
            .with_page("https://quotes.example/author/John-Doe/", "<html><p>moved</p></html>");
        let enricher = AuthorEnricher::new(Arc::new(fetcher), base(), "/author/", 1);

        let enriched = enricher.enrich(vec![quote("Q", "John Doe")]).await;
        assert_eq!(enriched[0].author_info, None);
    }

    /// Answers after a delay that shrinks with position, so completions arrive
    /// in reverse order of submission, and tracks peak concurrency
    struct SlowFetcher {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for SlowFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let n: u64 = url
                .trim_end_matches('/')
                .rsplit('-')
                .next()
                .and_then(|n| n.parse().ok())
                .unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(5 * (10 - n))).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(bio_page(&format!("bio {}", n)))
        }
    }

    #[tokio::test]
    async fn test_results_follow_submission_order_and_respect_capacity() {
        let fetcher = Arc::new(SlowFetcher {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let enricher = AuthorEnricher::new(fetcher.clone(), base(), "/author/", 3);

        let quotes: Vec<QuoteRecord> = (0..10)
            .map(|n| quote(&format!("Q{}", n), &format!("Author {}", n)))
            .collect();
        let enriched = enricher.enrich(quotes).await;

        for (n, quote) in enriched.iter().enumerate() {
            assert_eq!(quote.text, format!("Q{}", n));
            assert_eq!(quote.author_info, Some(format!("bio {}", n)));
        }
        assert_eq!(fetcher.peak.load(Ordering::SeqCst), 3);
    }

    /// Panics for one author's page and serves every other one
    struct PanickingFetcher;

    #[async_trait]
    impl Fetcher for PanickingFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            if url.ends_with("/B-Two/") {
                panic!("lookup blew up for {}", url);
            }
            Ok(bio_page("bio"))
        }
    }

    #[tokio::test]
    async fn test_panicking_lookup_is_isolated() {
        let enricher = AuthorEnricher::new(Arc::new(PanickingFetcher), base(), "/author/", 2);

        let enriched = enricher
            .enrich(vec![
                quote("Q1", "A One"),
                quote("Q2", "B Two"),
                quote("Q3", "C Three"),
            ])
            .await;

        assert_eq!(enriched.len(), 3);
        assert_eq!(enriched[0].author_info.as_deref(), Some("bio"));
        assert_eq!(enriched[1].author_info, None);
        assert_eq!(enriched[2].author_info.as_deref(), Some("bio"));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let enricher = AuthorEnricher::new(Arc::new(MapFetcher::default()), base(), "/author/", 10);
        assert!(enricher.enrich(Vec::new()).await.is_empty());
    }
}
