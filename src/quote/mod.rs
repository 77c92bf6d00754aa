//! Quote data model
//!
//! # Components
//!
//! - `QuoteRecord`: one extracted quote, optionally carrying its author's biography
//! - `IdentityKey`: the `(text, author)` pair two records must share to be the same quote
//! - `remove_duplicates`: first-seen-order deduplication by identity
//! - `author_slug`: the hyphenated author name used to address biography pages

mod dedup;
mod record;
mod slug;

pub use dedup::remove_duplicates;
pub use record::{clean_text, is_valid, IdentityKey, QuoteRecord};
pub use slug::author_slug;
