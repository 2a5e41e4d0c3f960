//! Crawler module for documentation crawling
//!
//! This module contains the core crawling logic, including:
//! - The per-session crawl orchestrator
//! - Retry handling around renderer launch and page load
//! - Navigation linking between persisted pages
//! - The result tree returned to callers
//! - The request surface (`submit` and `status`)

mod navigation;
mod orchestrator;
mod result;
mod retry;

pub use navigation::{NavigationIndex, NavigationLinker};
pub use orchestrator::{CrawlOrchestrator, CrawlTask};
pub use result::{ResultNode, ResultStatus};
pub use retry::RetryPolicy;

use crate::config::Config;
use crate::render::Renderer;
use crate::storage::{store_status, StoreStatus};
use crate::url::parse_seed_url;
use crate::HarvestError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// A crawl request as accepted from callers
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRequest {
    /// Seed URL; must be an absolute HTTP(S) URL
    #[serde(default)]
    pub url: String,

    /// Maximum depth below the seed; the configured default applies when absent
    #[serde(default)]
    pub max_depth: Option<u32>,

    /// Delete every persisted document before crawling
    #[serde(default)]
    pub force: bool,
}

impl CrawlRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Outcome of a submitted crawl
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport {
    /// Wall-clock duration of the crawl in seconds
    #[serde(rename = "timeElapsed")]
    pub time_elapsed_secs: f64,

    /// Markdown documents in the output store after the crawl
    pub files_processed: usize,

    pub result: ResultNode,
}

/// Validates a request and runs one crawl session
///
/// # Errors
///
/// * `HarvestError::Validation` - the URL is missing or not an absolute HTTP(S) URL
/// * `HarvestError::Job` - the output store could not be prepared or read
///
/// Failures of individual pages, the seed included, are reported inside the
/// result tree instead.
pub async fn submit(
    config: &Config,
    renderer: Arc<dyn Renderer>,
    request: CrawlRequest,
) -> Result<CrawlReport, HarvestError> {
    let seed = parse_seed_url(&request.url).map_err(|e| HarvestError::Validation(e.to_string()))?;
    let max_depth = request.max_depth.unwrap_or(config.crawler.max_depth);

    let started = Instant::now();
    let orchestrator = CrawlOrchestrator::new(config, renderer);
    let result = orchestrator.run(&seed, max_depth, request.force).await?;

    let files_processed = orchestrator
        .store()
        .count()
        .map_err(|e| HarvestError::Job(format!("cannot count output files: {}", e)))?;

    Ok(CrawlReport {
        time_elapsed_secs: started.elapsed().as_secs_f64(),
        files_processed,
        result,
    })
}

/// Snapshot of the documents persisted in `directory`, newest first
pub fn status(directory: &Path) -> Result<StoreStatus, HarvestError> {
    Ok(store_status(directory)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserializes_with_defaults() {
        let request: CrawlRequest =
            serde_json::from_str(r#"{"url": "https://example.com/docs"}"#).unwrap();
        assert_eq!(request.url, "https://example.com/docs");
        assert_eq!(request.max_depth, None);
        assert!(!request.force);

        let request: CrawlRequest =
            serde_json::from_str(r#"{"url": "https://example.com/docs", "maxDepth": 1, "force": true}"#)
                .unwrap();
        assert_eq!(request.max_depth, Some(1));
        assert!(request.force);
    }

    #[test]
    fn test_report_serializes_wire_names() {
        let report = CrawlReport {
            time_elapsed_secs: 1.5,
            files_processed: 2,
            result: ResultNode {
                url: "https://example.com/docs".to_string(),
                filename: "docs_index.md".to_string(),
                status: ResultStatus::Success,
                error: None,
                children: Vec::new(),
            },
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["timeElapsed"], 1.5);
        assert_eq!(json["filesProcessed"], 2);
        assert_eq!(json["result"]["status"], "success");
    }
}
