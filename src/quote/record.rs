use std::fmt;

/// A single quote as extracted from a listing page
///
/// `text`, `author` and every tag are whitespace-normalized when built through
/// [`QuoteRecord::new`]. `author_info` stays `None` until enrichment succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRecord {
    pub text: String,
    pub author: String,
    pub tags: Vec<String>,
    pub author_info: Option<String>,
}

/// Identity of a quote; tags and biography do not participate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub text: String,
    pub author: String,
}

impl QuoteRecord {
    /// Builds a record, normalizing the text, the author and each tag
    pub fn new<I, S>(text: &str, author: &str, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            text: clean_text(text),
            author: clean_text(author),
            tags: tags.into_iter().map(|t| clean_text(t.as_ref())).collect(),
            author_info: None,
        }
    }

    pub fn identity(&self) -> IdentityKey {
        IdentityKey {
            text: self.text.clone(),
            author: self.author.clone(),
        }
    }

    /// Tags as stored: comma plus single space between labels
    pub fn joined_tags(&self) -> String {
        self.tags.join(", ")
    }

    pub fn with_author_info(mut self, author_info: impl Into<String>) -> Self {
        self.author_info = Some(author_info.into());
        self
    }
}

impl fmt::Display for QuoteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.text, self.author)
    }
}

/// Collapses every whitespace run (spaces, tabs, newlines) into a single space
/// and trims both ends
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A record is usable only if both its text and its author are non-empty
pub fn is_valid(quote: &QuoteRecord) -> bool {
    !quote.text.is_empty() && !quote.author.is_empty()
}
