use crate::storage::{StorageError, StorageResult};
use chrono::{DateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// One recorded failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// Append-only file of non-fatal crawl failures
///
/// Each line reads `[<RFC 3339 timestamp>] <message>`.
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a timestamped record
    pub fn append(&self, message: &str) -> StorageResult<ErrorLogEntry> {
        let entry = ErrorLogEntry {
            timestamp: Utc::now(),
            message: message.replace('\n', " "),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| StorageError::Write {
                path: self.path.clone(),
                source,
            })?;
        writeln!(file, "[{}] {}", entry.timestamp.to_rfc3339(), entry.message)?;

        Ok(entry)
    }

    /// Reads back all records; lines that do not parse are skipped
    pub fn entries(&self) -> StorageResult<Vec<ErrorLogEntry>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        Ok(content.lines().filter_map(parse_line).collect())
    }
}

fn parse_line(line: &str) -> Option<ErrorLogEntry> {
    let rest = line.strip_prefix('[')?;
    let (timestamp, message) = rest.split_once("] ")?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp).ok()?.with_timezone(&Utc);
    Some(ErrorLogEntry {
        timestamp,
        message: message.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_append_and_read_back() {
        let dir = TempDir::new().unwrap();
        let log = FailureLog::new(dir.path().join("errors.log"));

        log.append("first failure").unwrap();
        log.append("second\nfailure").unwrap();

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first failure");
        assert_eq!(entries[1].message, "second failure");
        assert!(entries[0].timestamp <= entries[1].timestamp);
    }

    #[test]
    fn test_missing_log_has_no_entries() {
        let dir = TempDir::new().unwrap();
        let log = FailureLog::new(dir.path().join("none.log"));
        assert!(log.entries().unwrap().is_empty());
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let log = FailureLog::new(dir.path().join("logs").join("errors.log"));
        log.append("boom").unwrap();
        assert!(log.path().exists());
    }

    #[test]
    fn test_unparseable_lines_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("errors.log");
        fs::write(&path, "garbage\n[2024-01-01T00:00:00+00:00] kept\n").unwrap();

        let entries = FailureLog::new(path).entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "kept");
    }
}
