//! Doc-Harvest: an incremental documentation mirror
//!
//! This crate crawls a documentation site from a seed URL, follows in-scope
//! links up to a bounded depth, converts each page into a normalized markdown
//! document and persists the results so repeated runs skip pages that are
//! already on disk.

pub mod config;
pub mod crawler;
pub mod output;
pub mod render;
pub mod state;
pub mod storage;
pub mod url;

use std::time::Duration;
use thiserror::Error;

/// Main error type for Doc-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Crawl job failed: {0}")]
    Job(String),

    #[error("Render error: {0}")]
    Render(#[from] render::RenderError),

    #[error("No content extracted from {url}")]
    ExtractionEmpty { url: String },

    #[error("Task for {url} exceeded its {timeout:?} deadline")]
    SessionTimeout { url: String, timeout: Duration },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::TaskState,
        to: state::TaskState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid selector in config: {0}")]
    InvalidSelector(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL is required")]
    Missing,

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Doc-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{status, submit, CrawlReport, CrawlRequest, ResultNode, ResultStatus};
pub use render::{ContentBlock, RenderSession, RenderedPage, Renderer};
pub use state::TaskState;
pub use url::{url_to_filename, LinkScopeFilter};
