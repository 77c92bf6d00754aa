//! Markdown export of the persisted corpus
//!
//! Quotes are grouped under their author, in the order each author first
//! appears in the store.

use crate::output::OutputResult;
use crate::storage::QuoteRow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown export of `rows` to `output_path`
///
/// # Arguments
///
/// * `rows` - Persisted quotes, in insertion order
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_summary(rows: &[QuoteRow], output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(rows);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats persisted quotes as markdown
pub fn format_markdown_summary(rows: &[QuoteRow]) -> String {
    let mut md = String::new();

    md.push_str("# Quote Harvest\n\n");
    md.push_str(&format!("- **Quotes**: {}\n", rows.len()));
    if let Some(first) = rows.first() {
        md.push_str(&format!("- **Scraped**: {}\n", first.scraped_at));
    }
    md.push('\n');

    let mut authors: Vec<&str> = Vec::new();
    for row in rows {
        if !authors.contains(&row.author.as_str()) {
            authors.push(&row.author);
        }
    }

    for author in authors {
        md.push_str(&format!("## {}\n\n", author));

        let mut bio_written = false;
        for row in rows.iter().filter(|r| r.author == author) {
            if !bio_written {
                if let Some(bio) = &row.author_info {
                    md.push_str(&format!("_{}_\n\n", bio));
                }
                bio_written = true;
            }

            md.push_str(&format!("> {}\n", row.text));
            if !row.tags.is_empty() {
                md.push_str(&format!("\nTags: {}\n", row.tags));
            }
            md.push('\n');
        }
    }

    md
}
