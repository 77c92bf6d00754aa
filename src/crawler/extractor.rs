//! HTML extraction for listing and biography pages
//!
//! This module turns raw markup into:
//! - The quotes on one listing page, in document order
//! - The page's next-page reference, if it has one
//! - The biography text of an author page
//!
//! A malformed quote container is logged and skipped; it never fails the page.

use crate::quote::{clean_text, is_valid, QuoteRecord};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Failure to pull an expected value out of markup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("missing {field} node")]
    MissingField { field: &'static str },

    #[error("empty {field}")]
    EmptyField { field: &'static str },

    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

/// Everything extracted from one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Quotes found on the page, in document order
    pub quotes: Vec<QuoteRecord>,

    /// Link target of the "next" navigation entry, possibly relative
    pub next_page: Option<String>,
}

/// Builds a `tag.class` selector
fn selector(tag: &str, class: &str) -> Result<Selector, ExtractError> {
    let css = format!("{}.{}", tag, class);
    Selector::parse(&css).map_err(|e| ExtractError::Selector {
        selector: css.clone(),
        message: e.to_string(),
    })
}

/// Selectors for the pieces of a quote container
struct QuoteSelectors {
    container: Selector,
    text: Selector,
    author: Selector,
    tag: Selector,
}

impl QuoteSelectors {
    fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            container: selector("div", "quote")?,
            text: selector("span", "text")?,
            author: selector("small", "author")?,
            tag: selector("a", "tag")?,
        })
    }
}

/// Raw text content of a node and its descendants
fn node_text(node: ElementRef<'_>) -> String {
    node.text().collect::<String>()
}

/// Parses one listing page
///
/// # Example
///
/// ```
/// use quote_harvest::crawler::extract_page;
///
/// let html = r#"
///     <div class="quote">
///         <span class="text">Sample quote</span>
///         <small class="author">John Doe</small>
///         <a class="tag">inspirational</a>
///     </div>
///     <li class="next"><a href="/page/2/">Next</a></li>
/// "#;
/// let page = extract_page(html).unwrap();
/// assert_eq!(page.quotes.len(), 1);
/// assert_eq!(page.next_page.as_deref(), Some("/page/2/"));
/// ```
pub fn extract_page(markup: &str) -> Result<ExtractedPage, ExtractError> {
    let document = Html::parse_document(markup);
    let selectors = QuoteSelectors::new()?;

    let mut quotes = Vec::new();
    for (position, container) in document.select(&selectors.container).enumerate() {
        match extract_quote(container, &selectors) {
            Ok(quote) => quotes.push(quote),
            Err(e) => tracing::warn!("Skipping quote #{} on page: {}", position + 1, e),
        }
    }

    let next_page = extract_next_page(&document)?;

    Ok(ExtractedPage { quotes, next_page })
}

/// Extracts a single quote container
fn extract_quote(
    container: ElementRef<'_>,
    selectors: &QuoteSelectors,
) -> Result<QuoteRecord, ExtractError> {
    let text = container
        .select(&selectors.text)
        .next()
        .ok_or(ExtractError::MissingField { field: "text" })?;
    let author = container
        .select(&selectors.author)
        .next()
        .ok_or(ExtractError::MissingField { field: "author" })?;
    let tags = container.select(&selectors.tag).map(node_text);

    let quote = QuoteRecord::new(&node_text(text), &node_text(author), tags);

    if !is_valid(&quote) {
        let field = if quote.text.is_empty() { "text" } else { "author" };
        return Err(ExtractError::EmptyField { field });
    }

    Ok(quote)
}

/// Finds the `li.next > a[href]` link target
fn extract_next_page(document: &Html) -> Result<Option<String>, ExtractError> {
    let next = selector("li", "next")?;
    let link = Selector::parse("a[href]").map_err(|e| ExtractError::Selector {
        selector: "a[href]".to_string(),
        message: e.to_string(),
    })?;

    let Some(container) = document.select(&next).next() else {
        return Ok(None);
    };

    let href = container
        .select(&link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty());

    if href.is_none() {
        tracing::warn!("Next navigation present but has no link target");
    }

    Ok(href.map(str::to_string))
}

/// Extracts the biography from an author page
pub fn extract_author_details(markup: &str) -> Result<String, ExtractError> {
    let document = Html::parse_document(markup);
    let details = selector("div", "author-details")?;

    let node = document
        .select(&details)
        .next()
        .ok_or(ExtractError::MissingField { field: "author-details" })?;

    Ok(clean_text(&node_text(node)))
}

/// Extracts the first quote on a page
pub fn extract_first_quote(markup: &str) -> Result<QuoteRecord, ExtractError> {
    extract_page(markup)?
        .quotes
        .into_iter()
        .next()
        .ok_or(ExtractError::MissingField { field: "quote" })
}
