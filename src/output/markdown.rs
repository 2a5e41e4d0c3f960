//! Markdown document generation
//!
//! Formats extracted content blocks, the navigation header placed at the top
//! of each page, and the stub written for pages that failed.

use crate::render::ContentBlock;
use chrono::{DateTime, Utc};

/// Renders content blocks as markdown separated by blank lines
///
/// # Example
///
/// ```
/// use doc_harvest::render::ContentBlock;
/// use doc_harvest::output::blocks_to_markdown;
///
/// let blocks = vec![
///     ContentBlock::Heading { level: 2, text: "Setup".to_string() },
///     ContentBlock::Paragraph("Install it.".to_string()),
/// ];
/// assert_eq!(blocks_to_markdown(&blocks), "## Setup\n\nInstall it.\n");
/// ```
pub fn blocks_to_markdown(blocks: &[ContentBlock]) -> String {
    let mut md = blocks
        .iter()
        .map(block_to_markdown)
        .collect::<Vec<_>>()
        .join("\n\n");
    if !md.is_empty() {
        md.push('\n');
    }
    md
}

fn block_to_markdown(block: &ContentBlock) -> String {
    match block {
        ContentBlock::Heading { level, text } => {
            format!("{} {}", "#".repeat(usize::from(*level).clamp(1, 3)), text)
        }
        ContentBlock::Paragraph(text) => text.clone(),
        ContentBlock::Code(code) => {
            let fence = code_fence(code);
            format!("{fence}\n{code}\n{fence}")
        }
    }
}

/// Picks a backtick fence longer than any run of backticks inside the code
fn code_fence(code: &str) -> String {
    let longest_run = code
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest_run.max(2) + 1)
}

/// Formats the navigation header for a page
///
/// `pages` lists every page discovered so far in the session as
/// `(url, filename)` pairs, in discovery order.
pub fn format_navigation<'a, I>(current_url: &str, current_filename: &str, pages: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut md = String::new();

    md.push_str("## Navigation\n\n");
    md.push_str(&format!(
        "- Current page: [{}](./{})\n",
        current_url, current_filename
    ));
    md.push_str("- Related pages:\n");
    for (url, filename) in pages {
        md.push_str(&format!("  - [{}](./{})\n", url, filename));
    }
    md.push_str("\n---\n\n");

    md
}

/// Joins a navigation header and a page body into the final document
pub fn format_page(navigation: &str, body: &str) -> String {
    format!("{}{}", navigation, body)
}

/// Formats the minimal document persisted for a failed page
pub fn format_error_document(url: &str, timestamp: DateTime<Utc>, message: &str) -> String {
    format!(
        "# Error Processing Page\n\nURL: {}\n\nTime: {}\n\nError: {}\n",
        url,
        timestamp.to_rfc3339(),
        message
    )
}
