//! Storage module for persisting crawl output
//!
//! This module handles everything that touches the output directory:
//! - Writing page and error documents (`MarkdownStore`)
//! - Snapshotting existing documents for incremental runs (`IncrementalCache`)
//! - Appending non-fatal failures to a log file (`FailureLog`)
//! - Reporting what the store currently holds (`store_status`)

mod cache;
mod failure_log;
mod markdown_store;

pub use cache::IncrementalCache;
pub use failure_log::{ErrorLogEntry, FailureLog};
pub use markdown_store::MarkdownStore;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A persisted document as seen on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub filename: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// Read-only snapshot of the output store
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatus {
    pub total_files: usize,
    pub files: Vec<FileEntry>,
}

/// One file in a [`StoreStatus`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// Lists the documents in `directory`, most recently modified first
pub fn store_status(directory: &Path) -> StorageResult<StoreStatus> {
    let mut files: Vec<FileEntry> = MarkdownStore::new(directory)
        .list()?
        .into_iter()
        .map(|record| FileEntry {
            name: record.filename,
            size: record.size,
            last_modified: record.last_modified,
        })
        .collect();

    files.sort_by(|a, b| {
        b.last_modified
            .cmp(&a.last_modified)
            .then_with(|| a.name.cmp(&b.name))
    });

    Ok(StoreStatus {
        total_files: files.len(),
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str, content: &str, age_secs: u64) {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        let file = File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .unwrap();
    }

    #[test]
    fn test_status_sorted_newest_first() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "old.md", "old", 300);
        touch(dir.path(), "new.md", "newer content", 10);
        touch(dir.path(), "mid.md", "mid", 100);

        let status = store_status(dir.path()).unwrap();
        assert_eq!(status.total_files, 3);
        let names: Vec<&str> = status.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["new.md", "mid.md", "old.md"]);
        assert_eq!(status.files[0].size, 13);
    }

    #[test]
    fn test_status_of_missing_directory() {
        let dir = TempDir::new().unwrap();
        let status = store_status(&dir.path().join("nothing")).unwrap();
        assert_eq!(status.total_files, 0);
    }

    #[test]
    fn test_status_serializes_camel_case() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "index.md", "x", 0);

        let json = serde_json::to_value(store_status(dir.path()).unwrap()).unwrap();
        assert_eq!(json["totalFiles"], 1);
        assert!(json["files"][0]["lastModified"].is_string());
    }
}
