use std::collections::HashSet;
use url::Url;

/// URLs already scheduled in the current crawl session
///
/// Entries are only ever added. Membership test and insertion happen in one
/// call so a URL can never be claimed twice.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` as visited; returns false if it already was
    pub fn claim(&mut self, url: &Url) -> bool {
        self.urls.insert(url.as_str().to_string())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_once() {
        let mut visited = VisitedSet::new();
        let url = Url::parse("https://example.com/docs/a").unwrap();

        assert!(visited.claim(&url));
        assert!(!visited.claim(&url));
        assert_eq!(visited.len(), 1);
    }
}
