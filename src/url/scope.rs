use url::Url;

/// Decides which discovered links are eligible for recursive crawling
///
/// A link is in scope when it has the seed's host and port and its path
/// starts with the configured prefix.
#[derive(Debug, Clone)]
pub struct LinkScopeFilter {
    host: String,
    port: Option<u16>,
    prefix: String,
}

impl LinkScopeFilter {
    /// Creates a filter anchored at the seed URL's host
    pub fn new(seed: &Url, prefix: impl Into<String>) -> Self {
        Self {
            host: seed.host_str().unwrap_or_default().to_lowercase(),
            port: seed.port_or_known_default(),
            prefix: prefix.into(),
        }
    }

    /// Path prefix links must start with
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn accepts(&self, link: &Url) -> bool {
        let same_host = link
            .host_str()
            .is_some_and(|h| h.eq_ignore_ascii_case(&self.host));

        same_host
            && link.port_or_known_default() == self.port
            && link.path().starts_with(&self.prefix)
    }
}
