/// Derives the author slug used in biography URLs
///
/// Each whitespace run becomes a single hyphen; case is preserved.
///
/// ```
/// use quote_harvest::author_slug;
///
/// assert_eq!(author_slug("John Doe"), "John-Doe");
/// ```
pub fn author_slug(author: &str) -> String {
    author.split_whitespace().collect::<Vec<_>>().join("-")
}
