//! Configuration module for Doc-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; missing values fall back to defaults.
//!
//! # Example
//!
//! ```no_run
//! use doc_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, RendererConfig, RetryConfig, ScopeConfig,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, load_or_default, parse_config,
};
pub use validation::validate;
