use crate::storage::{FileRecord, StorageError, StorageResult};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

const MARKDOWN_EXT: &str = "md";

/// Flat directory of markdown documents, one per crawled URL
#[derive(Debug, Clone)]
pub struct MarkdownStore {
    root: PathBuf,
}

impl MarkdownStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the output directory if it does not exist yet
    pub fn ensure_dir(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.root).map_err(|source| StorageError::Write {
            path: self.root.clone(),
            source,
        })
    }

    /// Writes a document, replacing any previous file of the same name
    pub fn write(&self, filename: &str, content: &str) -> StorageResult<PathBuf> {
        let path = self.root.join(filename);
        fs::write(&path, content).map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("Saved {} ({} bytes)", path.display(), content.len());
        Ok(path)
    }

    pub fn read(&self, filename: &str) -> StorageResult<String> {
        let path = self.root.join(filename);
        fs::read_to_string(&path).map_err(|source| StorageError::Read { path, source })
    }

    /// Lists markdown documents; a missing directory holds no documents
    pub fn list(&self) -> StorageResult<Vec<FileRecord>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.root.clone(),
                    source,
                })
            }
        };

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !is_markdown(&path) {
                continue;
            }

            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }

            records.push(FileRecord {
                filename: entry.file_name().to_string_lossy().into_owned(),
                size: metadata.len(),
                last_modified: DateTime::<Utc>::from(metadata.modified()?),
            });
        }

        Ok(records)
    }

    /// Deletes every markdown document and returns how many were removed
    pub fn clear(&self) -> StorageResult<usize> {
        let mut removed = 0;
        for record in self.list()? {
            let path = self.root.join(&record.filename);
            fs::remove_file(&path).map_err(|source| StorageError::Write { path, source })?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Number of markdown documents currently stored
    pub fn count(&self) -> StorageResult<usize> {
        Ok(self.list()?.len())
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == MARKDOWN_EXT)
}
