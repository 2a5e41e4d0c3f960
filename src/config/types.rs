use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for Doc-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub retry: RetryConfig,
    pub scope: ScopeConfig,
    pub renderer: RendererConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Depth used when a request does not specify one
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Overall deadline for one task: launch, load, extract and persist (milliseconds)
    #[serde(rename = "task-timeout-ms")]
    pub task_timeout_ms: u64,

    /// Pause before every rendered task after the first (milliseconds)
    #[serde(rename = "pacing-delay-ms")]
    pub pacing_delay_ms: u64,

    /// Upper bound on closing a renderer session (milliseconds)
    #[serde(rename = "release-timeout-ms")]
    pub release_timeout_ms: u64,
}

impl CrawlerConfig {
    pub fn task_timeout(&self) -> Duration {
        Duration::from_millis(self.task_timeout_ms)
    }

    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    pub fn release_timeout(&self) -> Duration {
        Duration::from_millis(self.release_timeout_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            task_timeout_ms: 60_000,
            pacing_delay_ms: 0,
            release_timeout_ms: 5_000,
        }
    }
}

/// Retry behavior for renderer launch and page load
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    #[serde(rename = "launch-attempts")]
    pub launch_attempts: u32,

    #[serde(rename = "launch-delay-ms")]
    pub launch_delay_ms: u64,

    #[serde(rename = "load-attempts")]
    pub load_attempts: u32,

    #[serde(rename = "load-delay-ms")]
    pub load_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            launch_attempts: 3,
            launch_delay_ms: 2_000,
            load_attempts: 3,
            load_delay_ms: 2_000,
        }
    }
}

/// Link scope configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Path prefix a link must start with to be followed
    pub prefix: String,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            prefix: "/docs".to_string(),
        }
    }
}

/// Settings for the built-in HTTP renderer
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// CSS selector for the content-bearing subtree; `<body>` is used when nothing matches
    #[serde(rename = "content-selector")]
    pub content_selector: String,

    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("doc-harvest/{}", env!("CARGO_PKG_VERSION")),
            content_selector: "main, article, [role=main]".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding one markdown file per crawled page
    pub directory: String,

    /// Failure log path; relative paths resolve inside `directory`
    #[serde(rename = "failure-log")]
    pub failure_log: String,
}

impl OutputConfig {
    pub fn directory_path(&self) -> PathBuf {
        PathBuf::from(&self.directory)
    }

    pub fn failure_log_path(&self) -> PathBuf {
        let log = Path::new(&self.failure_log);
        if log.is_absolute() {
            log.to_path_buf()
        } else {
            self.directory_path().join(log)
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "./uploads".to_string(),
            failure_log: "scrape_errors.log".to_string(),
        }
    }
}
