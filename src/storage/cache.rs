use crate::storage::{MarkdownStore, StorageResult};
use std::collections::HashSet;

/// Snapshot of which documents already exist in the output store
///
/// Membership is by filename only: a present file suppresses re-rendering
/// however old it is. The snapshot is taken once per session and never
/// refreshed while the session runs.
#[derive(Debug, Clone, Default)]
pub struct IncrementalCache {
    files: HashSet<String>,
}

impl IncrementalCache {
    /// An empty snapshot, used after a forced clear
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reads the current contents of the store
    pub fn load(store: &MarkdownStore) -> StorageResult<Self> {
        let files = store
            .list()?
            .into_iter()
            .map(|record| record.filename)
            .collect();
        Ok(Self { files })
    }

    /// Deletes every persisted document and returns an empty snapshot
    pub fn clear(store: &MarkdownStore) -> StorageResult<Self> {
        let removed = store.clear()?;
        tracing::info!(
            "Cleared {} existing files from {} for forced crawl",
            removed,
            store.root().display()
        );
        Ok(Self::empty())
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.files.contains(filename)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
