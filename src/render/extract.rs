//! Content extraction from rendered HTML
//!
//! Turns a page's content-bearing subtree into ordered semantic blocks and
//! scans the page for candidate links.

use crate::render::{ContentBlock, RenderError, RenderedPage};
use crate::url::normalize_url;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use url::Url;

const BLOCK_SELECTOR: &str = "h1, h2, h3, p, pre";
const LINK_SELECTOR: &str = "a[href]";
const BODY_SELECTOR: &str = "body";

/// Extracts content blocks and candidate links from HTML
#[derive(Debug)]
pub struct ContentExtractor {
    content: Selector,
    body: Selector,
    blocks: Selector,
    links: Selector,
}

impl ContentExtractor {
    /// Creates an extractor whose content root is the first match of `content_selector`
    pub fn new(content_selector: &str) -> Result<Self, RenderError> {
        Ok(Self {
            content: parse_selector(content_selector)?,
            body: parse_selector(BODY_SELECTOR)?,
            blocks: parse_selector(BLOCK_SELECTOR)?,
            links: parse_selector(LINK_SELECTOR)?,
        })
    }

    /// Extracts blocks from the content root and links from the whole page
    ///
    /// # Block Rules
    ///
    /// - `h1`-`h3` become headings, `p` paragraphs, `pre` code blocks
    /// - Blocks with only whitespace are dropped
    /// - Blocks nested in `pre` are part of the code block, not separate blocks
    /// - Inline anchors become `[text](absolute-url)`
    ///
    /// # Example
    ///
    /// ```
    /// use doc_harvest::render::ContentExtractor;
    /// use url::Url;
    ///
    /// let extractor = ContentExtractor::new("main").unwrap();
    /// let url = Url::parse("https://example.com/docs/").unwrap();
    /// let page = extractor.extract("<main><h1>Intro</h1><p><a href=\"a\">A</a></p></main>", &url);
    /// assert_eq!(page.blocks.len(), 2);
    /// assert_eq!(page.links[0].as_str(), "https://example.com/docs/a");
    /// ```
    pub fn extract(&self, html: &str, page_url: &Url) -> RenderedPage {
        let document = Html::parse_document(html);
        let root = self.content_root(&document);

        let blocks = root
            .select(&self.blocks)
            .filter(|element| !inside_pre(element))
            .filter_map(|element| self.block_for(element, page_url))
            .collect();

        let links = self.extract_links(&document, page_url);

        RenderedPage { blocks, links }
    }

    fn content_root<'a>(&self, document: &'a Html) -> ElementRef<'a> {
        document
            .select(&self.content)
            .next()
            .or_else(|| document.select(&self.body).next())
            .unwrap_or_else(|| document.root_element())
    }

    fn block_for(&self, element: ElementRef<'_>, page_url: &Url) -> Option<ContentBlock> {
        let block = match element.value().name() {
            "pre" => {
                let raw: String = element.text().collect();
                ContentBlock::Code(raw.trim_end().trim_start_matches('\n').to_string())
            }
            name => {
                let mut raw = String::new();
                inline_text(element, page_url, &mut raw);
                let text = collapse_whitespace(&raw);
                match name {
                    "h1" => ContentBlock::Heading { level: 1, text },
                    "h2" => ContentBlock::Heading { level: 2, text },
                    "h3" => ContentBlock::Heading { level: 3, text },
                    _ => ContentBlock::Paragraph(text),
                }
            }
        };

        if block.text().trim().is_empty() {
            None
        } else {
            Some(block)
        }
    }

    fn extract_links(&self, document: &Html, page_url: &Url) -> Vec<Url> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for element in document.select(&self.links) {
            if element.value().attr("download").is_some() {
                continue;
            }

            let Some(link) = element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, page_url))
            else {
                continue;
            };

            if seen.insert(link.as_str().to_string()) {
                links.push(link);
            }
        }

        tracing::trace!("Extracted {} links from {}", links.len(), page_url);
        links
    }
}

fn parse_selector(selector: &str) -> Result<Selector, RenderError> {
    Selector::parse(selector)
        .map_err(|e| RenderError::Launch(format!("invalid selector '{}': {:?}", selector, e)))
}

fn inside_pre(element: &ElementRef<'_>) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|ancestor| ancestor.name() == "pre")
    })
}

/// Appends an element's text, rendering anchors as markdown links
fn inline_text(element: ElementRef<'_>, page_url: &Url, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                match child.value().name() {
                    "a" => {
                        let mut inner = String::new();
                        inline_text(child, page_url, &mut inner);
                        let inner = collapse_whitespace(&inner);
                        let target = child
                            .value()
                            .attr("href")
                            .and_then(|href| resolve_link(href, page_url));
                        match target {
                            Some(target) if !inner.is_empty() => {
                                out.push_str(&format!("[{}]({})", inner, target));
                            }
                            _ => out.push_str(&inner),
                        }
                    }
                    "br" => out.push(' '),
                    "script" | "style" => {}
                    _ => inline_text(child, page_url, out),
                }
            }
            _ => {}
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolves an href against the page URL
///
/// Returns None for empty and fragment-only hrefs, `javascript:`, `mailto:`,
/// `tel:` and `data:` links, unparseable hrefs, and non-HTTP(S) results.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(normalize_url(&absolute)),
        _ => None,
    }
}
