//! Cross-page navigation
//!
//! Pages are registered in the session's `NavigationIndex` as soon as they
//! are assigned a filename. When a page is finalized, the linker prepends a
//! navigation block listing every page registered so far and rewrites
//! absolute URLs of registered pages into relative file references.

use crate::output::{format_navigation, format_page};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;
use url::Url;

/// Session-scoped mapping from URL to filename, in discovery order
#[derive(Debug, Default)]
pub struct NavigationIndex {
    entries: Vec<(String, String)>,
    by_url: HashMap<String, usize>,
}

impl NavigationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `url` under `filename`; returns false if the URL was already present
    pub fn register(&mut self, url: &Url, filename: &str) -> bool {
        if self.by_url.contains_key(url.as_str()) {
            return false;
        }
        self.by_url
            .insert(url.as_str().to_string(), self.entries.len());
        self.entries
            .push((url.as_str().to_string(), filename.to_string()));
        true
    }

    pub fn filename_for(&self, url: &str) -> Option<&str> {
        self.by_url
            .get(url)
            .map(|&index| self.entries[index].1.as_str())
    }

    /// Registered `(url, filename)` pairs in discovery order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(url, filename)| (url.as_str(), filename.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Characters that may follow a URL in prose or close a markdown link
const TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', ')'];

/// Matches an absolute HTTP(S) URL candidate up to whitespace or brackets
///
/// Parentheses are allowed because page paths may contain them; trailing
/// punctuation is trimmed per match against the index.
fn absolute_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"https?://[^\s\[\]<>"'`]+"#).expect("absolute URL pattern is valid")
    })
}

/// Produces finalized page documents from a navigation index
pub struct NavigationLinker<'a> {
    index: &'a NavigationIndex,
}

impl<'a> NavigationLinker<'a> {
    pub fn new(index: &'a NavigationIndex) -> Self {
        Self { index }
    }

    /// Rewrites URLs that exactly match a registered page into `./<filename>`
    ///
    /// Partial matches are left alone: `https://example.com/docs/a` is not
    /// rewritten inside `https://example.com/docs/ab`.
    pub fn rewrite_links(&self, content: &str) -> String {
        absolute_url_pattern()
            .replace_all(content, |caps: &Captures<'_>| {
                let found = &caps[0];
                match self.registered_prefix(found) {
                    Some((filename, end)) => format!("./{}{}", filename, &found[end..]),
                    None => found.to_string(),
                }
            })
            .into_owned()
    }

    /// Longest registered URL at the start of `candidate`, dropping only trailing punctuation
    fn registered_prefix(&self, candidate: &str) -> Option<(&'a str, usize)> {
        let mut end = candidate.len();
        loop {
            if let Some(filename) = self.index.filename_for(&candidate[..end]) {
                return Some((filename, end));
            }
            let last = candidate[..end].chars().next_back()?;
            if !TRAILING.contains(&last) {
                return None;
            }
            end -= last.len_utf8();
        }
    }

    /// Builds the final document for a page: navigation block then rewritten body
    pub fn finalize(&self, current_url: &Url, current_filename: &str, body: &str) -> String {
        let navigation =
            format_navigation(current_url.as_str(), current_filename, self.index.entries());
        format_page(&navigation, &self.rewrite_links(body))
    }
}
