//! Output generation
//!
//! This module turns crawl data into text:
//! - Markdown documents persisted for each page (`markdown`)
//! - Statistics and console reports for the CLI (`stats`)

mod markdown;
mod stats;

pub use markdown::{blocks_to_markdown, format_error_document, format_navigation, format_page};
pub use stats::{
    collect_statistics, format_result_tree, print_crawl_report, print_store_status,
    CrawlStatistics,
};
