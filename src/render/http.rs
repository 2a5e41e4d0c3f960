//! HTTP-backed renderer
//!
//! Fetches pages with reqwest and extracts content from the served HTML.
//! It does not execute JavaScript, so it suits statically generated
//! documentation sites.

use crate::config::RendererConfig;
use crate::render::{ContentExtractor, RenderError, RenderSession, RenderedPage, Renderer};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Renderer that loads pages over plain HTTP
pub struct HttpRenderer {
    user_agent: String,
    request_timeout: Duration,
    extractor: Arc<ContentExtractor>,
}

impl HttpRenderer {
    pub fn new(config: &RendererConfig) -> Result<Self, RenderError> {
        Ok(Self {
            user_agent: config.user_agent.clone(),
            request_timeout: Duration::from_millis(config.request_timeout_ms),
            extractor: Arc::new(ContentExtractor::new(&config.content_selector)?),
        })
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn launch(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        let client = Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(self.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        Ok(Box::new(HttpSession {
            client,
            extractor: Arc::clone(&self.extractor),
        }))
    }
}

/// One HTTP client with its own connection pool
struct HttpSession {
    client: Client,
    extractor: Arc<ContentExtractor>,
}

#[async_trait]
impl RenderSession for HttpSession {
    async fn render(&self, url: &Url, deadline: Instant) -> Result<RenderedPage, RenderError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(RenderError::Timeout {
                url: url.to_string(),
            });
        }

        let response = self
            .client
            .get(url.clone())
            .timeout(remaining)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        if !content_type.contains("html") {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                message: format!("expected HTML, got {}", content_type),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|e| classify(url, e))?;

        Ok(self.extractor.extract(&body, &final_url))
    }

    async fn close(&self) -> Result<(), RenderError> {
        // Dropping the client releases its pooled connections
        Ok(())
    }
}

fn classify(url: &Url, error: reqwest::Error) -> RenderError {
    if error.is_timeout() {
        RenderError::Timeout {
            url: url.to_string(),
        }
    } else {
        RenderError::Navigation {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
