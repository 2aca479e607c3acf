//! File-based data source.
//!
//! Polls a JSON file holding a stats snapshot, for offline use or for
//! dashboards fed by a cron job that dumps the endpoint to disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use super::{DataSource, PolledSnapshot, StatsSnapshot};

/// A data source that reads stats snapshots from a JSON file.
///
/// The source tracks the file's modification time and only returns
/// new data when the file has been updated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
    next_request_id: u64,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
            next_request_id: 0,
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file's modification time.
    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    /// Read and parse the file.
    fn read_file(&mut self) -> Option<StatsSnapshot> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(snapshot) => {
                    self.last_error = None;
                    Some(snapshot)
                }
                Err(e) => {
                    self.last_error = Some(format!("Parse error: {}", e));
                    None
                }
            },
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<PolledSnapshot> {
        let current_modified = self.get_modified_time();

        // Check if file has been modified since last read
        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, don't update
            (Some(last), Some(current)) => current > last,
        };

        if !file_changed {
            return None;
        }

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        debug!(request_id, path = %self.path.display(), "at=request");

        let stats = self.read_file()?;
        self.last_modified = current_modified;
        Some(PolledSnapshot { request_id, stats })
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }

    fn refresh(&mut self) {
        self.last_modified = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{ "cpu": [10, 20, 95], "mem": [1.2, 1.8] }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/stats.json");
        assert_eq!(source.path(), Path::new("/tmp/stats.json"));
        assert_eq!(source.description(), "file: /tmp/stats.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        // First poll should return data
        let polled = source.poll().expect("first poll reads the file");
        assert_eq!(polled.request_id, 0);
        assert!(polled.stats.contains_key("cpu"));

        // Second poll without file change should return None
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_refresh_forces_read() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        let _ = source.poll();
        assert!(source.poll().is_none());

        source.refresh();
        let polled = source.poll().expect("refresh rereads the file");
        assert!(polled.request_id > 0);
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/stats.json");

        assert!(source.poll().is_none());
        let err = source.error().expect("missing file is reported");
        assert!(err.contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        let err = source.error().expect("parse failure is reported");
        assert!(err.contains("Parse error"));
    }
}
