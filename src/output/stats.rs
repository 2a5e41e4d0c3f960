//! Crawl statistics and console reports
//!
//! Summarizes a crawl's result tree and prints human-readable reports for
//! crawl runs and store snapshots.

use crate::crawler::{CrawlReport, ResultNode, ResultStatus};
use crate::storage::StoreStatus;
use std::collections::BTreeMap;

/// Counts derived from a result tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Total number of visited URLs
    pub total_pages: usize,

    pub existing: usize,
    pub success: usize,
    pub errors: usize,

    /// Visited URLs per depth below the seed
    pub pages_by_depth: BTreeMap<usize, usize>,
}

impl CrawlStatistics {
    /// Percentage of visited pages that ended in error
    pub fn error_rate(&self) -> f64 {
        if self.total_pages == 0 {
            0.0
        } else {
            self.errors as f64 / self.total_pages as f64 * 100.0
        }
    }
}

/// Collects statistics from a result tree
pub fn collect_statistics(root: &ResultNode) -> CrawlStatistics {
    let mut stats = CrawlStatistics::default();

    root.walk(&mut |node, depth| {
        stats.total_pages += 1;
        match node.status {
            ResultStatus::Existing => stats.existing += 1,
            ResultStatus::Success => stats.success += 1,
            ResultStatus::Error => stats.errors += 1,
        }
        *stats.pages_by_depth.entry(depth).or_insert(0) += 1;
    });

    stats
}

/// Formats the result tree as an indented outline
pub fn format_result_tree(root: &ResultNode) -> String {
    let mut out = String::new();
    root.walk(&mut |node, depth| {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("[{}] {} -> {}", node.status, node.url, node.filename));
        if let Some(error) = &node.error {
            out.push_str(&format!(" ({})", error));
        }
        out.push('\n');
    });
    out
}

/// Prints a crawl report to stdout
pub fn print_crawl_report(report: &CrawlReport) {
    let stats = collect_statistics(&report.result);

    println!("=== Crawl Report ===\n");
    println!("Time elapsed:    {:.2} seconds", report.time_elapsed_secs);
    println!("Files in store:  {}", report.files_processed);
    println!("Pages visited:   {}", stats.total_pages);
    println!("  Rendered:      {}", stats.success);
    println!("  Existing:      {}", stats.existing);
    println!("  Errors:        {} ({:.1}%)", stats.errors, stats.error_rate());

    println!("\nPages by depth:");
    for (depth, count) in &stats.pages_by_depth {
        println!("  {}: {}", depth, count);
    }

    println!("\nResult tree:");
    print!("{}", format_result_tree(&report.result));
}

/// Prints a store snapshot to stdout
pub fn print_store_status(status: &StoreStatus) {
    println!("Total files: {}\n", status.total_files);

    if status.files.is_empty() {
        return;
    }

    println!("{:<50} {:>10}  Last modified", "Name", "Size");
    println!("{}", "-".repeat(86));
    for file in &status.files {
        println!(
            "{:<50} {:>10}  {}",
            file.name,
            file.size,
            file.last_modified.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
}
