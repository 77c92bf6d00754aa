//! Integration tests for the harvest pipeline
//!
//! These tests use wiremock to serve a small quote site and run the full
//! walk, dedup, enrich and persist cycle against a temporary SQLite file.

use quote_harvest::config::{
    Config, CrawlerConfig, OutputConfig, PageErrorPolicy, SiteConfig, UserAgentConfig,
};
use quote_harvest::crawler::{harvest, Termination};
use quote_harvest::storage::{RecordStore, SqliteStore};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, db_path: &Path, policy: PageErrorPolicy) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            start_path: "/page/1/".to_string(),
            author_path_prefix: "/author/".to_string(),
            random_path: "/random".to_string(),
        },
        crawler: CrawlerConfig {
            max_concurrent_lookups: 3,
            on_page_error: policy,
            request_timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestHarvester".to_string(),
            crawler_version: "1.0.0".to_string(),
        },
        output: OutputConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            summary_path: "./unused.md".to_string(),
        },
    }
}

fn quote_div(text: &str, author: &str, tags: &[&str]) -> String {
    let tags: String = tags
        .iter()
        .map(|t| format!(r#"<a class="tag" href="/tag/{}/">{}</a>"#, t, t))
        .collect();
    format!(
        r#"<div class="quote">
            <span class="text">{}</span>
            <span>by <small class="author">{}</small></span>
            <div class="tags">Tags: {}</div>
        </div>"#,
        text, author, tags
    )
}

fn listing_page(quotes: &[String], next: Option<&str>) -> String {
    let nav = next
        .map(|href| format!(r#"<nav><ul class="pager"><li class="next"><a href="{}">Next</a></li></ul></nav>"#, href))
        .unwrap_or_default();
    format!(
        "<html><body><div class=\"col-md-8\">{}</div>{}</body></html>",
        quotes.join("\n"),
        nav
    )
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_author(server: &MockServer, slug: &str, bio: &str) {
    mount_html(
        server,
        &format!("/author/{}/", slug),
        format!(
            r#"<html><body><div class="author-details">
                <h3 class="author-title">{}</h3>
                <div class="author-description">{}</div>
            </div></body></html>"#,
            slug, bio
        ),
    )
    .await;
}

#[tokio::test]
async fn test_full_harvest() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/page/1/",
        listing_page(
            &[
                quote_div("First   quote", "Albert Einstein", &["change", "world"]),
                quote_div("Second quote", "Jane Austen", &["books"]),
            ],
            Some("/page/2/"),
        ),
    )
    .await;

    mount_html(
        &mock_server,
        "/page/2/",
        listing_page(
            &[
                quote_div("First quote", "Albert Einstein", &["duplicate"]),
                quote_div("Third quote", "Marilyn Monroe", &[]),
            ],
            None,
        ),
    )
    .await;

    mount_author(&mock_server, "Albert-Einstein", "Born 1879.").await;
    mount_author(&mock_server, "Jane-Austen", "Born 1775.").await;
    // Marilyn-Monroe has no author page: the lookup 404s

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("quotes.db");
    let config = create_test_config(&base_url, &db_path, PageErrorPolicy::Stop);

    let report = harvest(config).await.expect("Harvest failed");

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.extracted, 4);
    assert_eq!(report.unique, 3);
    assert_eq!(report.enriched, 2);
    assert_eq!(report.persisted, 3);
    assert_eq!(report.termination, Termination::LastPage);

    let store = SqliteStore::open(&db_path).expect("Failed to reopen database");
    let rows = store.load_all().unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0].text, "First quote");
    assert_eq!(rows[0].author, "Albert Einstein");
    assert_eq!(rows[0].tags, "change, world");
    assert_eq!(
        rows[0].author_info.as_deref(),
        Some("Albert-Einstein Born 1879.")
    );

    assert_eq!(rows[1].author, "Jane Austen");
    assert_eq!(rows[2].author, "Marilyn Monroe");
    assert_eq!(rows[2].tags, "");
    assert_eq!(rows[2].author_info, None);
}

#[tokio::test]
async fn test_page_failure_truncates_under_stop_policy() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/page/1/",
        listing_page(&[quote_div("Only quote", "Jane Austen", &[])], Some("/page/2/")),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    mount_author(&mock_server, "Jane-Austen", "Born 1775.").await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("quotes.db");
    let config = create_test_config(&base_url, &db_path, PageErrorPolicy::Stop);

    let report = harvest(config).await.unwrap();

    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.persisted, 1);
    assert!(matches!(report.termination, Termination::FetchFailed { .. }));
    assert!(!report.termination.is_complete());
}

#[tokio::test]
async fn test_page_failure_aborts_under_abort_policy() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/page/1/",
        listing_page(&[quote_div("Only quote", "Jane Austen", &[])], Some("/page/2/")),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("quotes.db");
    let config = create_test_config(&base_url, &db_path, PageErrorPolicy::Abort);

    let err = harvest(config).await.unwrap_err();
    assert_eq!(err.kind(), quote_harvest::ErrorKind::Transport);

    let store = SqliteStore::open(&db_path).unwrap();
    assert_eq!(store.count().unwrap(), 0);
}
