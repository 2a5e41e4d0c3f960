//! Page rendering capability
//!
//! The orchestrator never talks to a browser or HTTP client directly. It
//! acquires a [`RenderSession`] from a [`Renderer`], asks it to render one URL
//! under a deadline, and closes the session afterwards. This module defines
//! that capability, the content model it returns, and a default
//! implementation backed by plain HTTP fetching.

mod extract;
mod http;

pub use extract::ContentExtractor;
pub use http::HttpRenderer;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::Instant;
use url::Url;

/// Errors raised while acquiring a session or loading a page
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Failed to launch renderer: {0}")]
    Launch(String),

    #[error("Failed to load {url}: {message}")]
    Navigation { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Timed out loading {url}")]
    Timeout { url: String },

    #[error("Failed to close renderer session: {0}")]
    Close(String),
}

/// One semantic block of page content, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    /// Heading of level 1, 2 or 3
    Heading { level: u8, text: String },
    Paragraph(String),
    Code(String),
}

impl ContentBlock {
    /// The block's text without any markup
    pub fn text(&self) -> &str {
        match self {
            Self::Heading { text, .. } => text,
            Self::Paragraph(text) | Self::Code(text) => text,
        }
    }
}

/// What a renderer extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPage {
    /// Content blocks in document order
    pub blocks: Vec<ContentBlock>,

    /// Candidate outbound links, absolute and de-duplicated in discovery order
    pub links: Vec<Url>,
}

/// Source of renderer sessions
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Acquires a fresh session; the caller must close it on every exit path
    async fn launch(&self) -> Result<Box<dyn RenderSession>, RenderError>;
}

/// A live renderer session able to load pages
#[async_trait]
pub trait RenderSession: Send + Sync {
    /// Loads `url` and extracts its content and links, giving up at `deadline`
    async fn render(&self, url: &Url, deadline: Instant) -> Result<RenderedPage, RenderError>;

    /// Releases whatever the session holds
    async fn close(&self) -> Result<(), RenderError>;
}
