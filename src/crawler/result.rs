//! Result tree returned by a crawl session

use serde::Serialize;
use std::fmt;

/// Final outcome of a visited URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    /// Document already present in the store; not rendered this session
    Existing,
    Success,
    Error,
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Existing => "existing",
            Self::Success => "success",
            Self::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of one visited URL and of everything crawled from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultNode {
    pub url: String,
    pub filename: String,
    pub status: ResultStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub children: Vec<ResultNode>,
}

impl ResultNode {
    /// Number of nodes in this subtree, including itself
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(ResultNode::len).sum::<usize>()
    }

    /// A node always counts itself, so a tree is never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Visits every node depth-first, parents before children
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ResultNode, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a ResultNode, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }

    /// All URLs in the subtree in visiting order
    pub fn urls(&self) -> Vec<&str> {
        let mut urls = Vec::new();
        self.walk(&mut |node, _| urls.push(node.url.as_str()));
        urls
    }

    /// Finds the node for `url` anywhere in the subtree
    pub fn find(&self, url: &str) -> Option<&ResultNode> {
        if self.url == url {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(url))
    }

    /// Number of nodes in the subtree with the given status
    pub fn count_status(&self, status: ResultStatus) -> usize {
        let mut count = 0;
        self.walk(&mut |node, _| {
            if node.status == status {
                count += 1;
            }
        });
        count
    }
}

/// Session-scoped storage for result nodes while the tree is being built
///
/// Nodes are appended in visiting order and linked to their parent by index;
/// the tree is assembled once the traversal finishes.
#[derive(Debug, Default)]
pub(crate) struct ResultArena {
    slots: Vec<Option<ArenaNode>>,
}

#[derive(Debug)]
struct ArenaNode {
    node: ResultNode,
    children: Vec<usize>,
}

impl ResultArena {
    /// Stores a childless node and links it under `parent`; returns its index
    pub(crate) fn push(&mut self, node: ResultNode, parent: Option<usize>) -> usize {
        let index = self.slots.len();
        self.slots.push(Some(ArenaNode {
            node,
            children: Vec::new(),
        }));
        if let Some(slot) = parent.and_then(|p| self.slots.get_mut(p)).and_then(Option::as_mut) {
            slot.children.push(index);
        }
        index
    }

    /// Assembles the tree rooted at the first node pushed
    pub(crate) fn into_tree(mut self) -> Option<ResultNode> {
        if self.slots.is_empty() {
            return None;
        }
        self.assemble(0)
    }

    fn assemble(&mut self, index: usize) -> Option<ResultNode> {
        let ArenaNode { mut node, children } = self.slots.get_mut(index)?.take()?;
        node.children = children
            .into_iter()
            .filter_map(|child| self.assemble(child))
            .collect();
        Some(node)
    }
}
