//! Append-only log file writer.
//!
//! Every append is a self-contained open-write-close: no file handle is held
//! between calls, so a failed write cannot corrupt earlier writes or poison
//! later ones, and the UI thread (markers, clear) and the global hook thread
//! (tokens) can both write without sharing state. Interleaving relies on the
//! OS's append-mode semantics for small writes.
//!
//! The log directory is created once, at construction. This is the only
//! module that touches the filesystem.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::capture::Token;

// ---------------------------------------------------------------------------
// SinkError
// ---------------------------------------------------------------------------

/// Failures from the log sink. All are local to one call and non-fatal to an
/// active session.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The log directory could not be created at construction.
    #[error("cannot create log directory {}: {}", .0.display(), .1)]
    CreateDir(PathBuf, std::io::Error),

    /// An append (token or marker) failed.
    #[error("cannot write to log file {}: {}", .0.display(), .1)]
    Write(PathBuf, std::io::Error),

    /// The explicit clear operation failed.
    #[error("cannot clear log file {}: {}", .0.display(), .1)]
    Clear(PathBuf, std::io::Error),
}

// ---------------------------------------------------------------------------
// LogSink
// ---------------------------------------------------------------------------

/// Append-only writer of tokens and session markers to one log file.
#[derive(Debug)]
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    /// Create a sink for `path`, creating its parent directory if absent.
    ///
    /// The file itself is created lazily by the first append.
    pub fn new(path: PathBuf) -> Result<Self, SinkError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SinkError::CreateDir(parent.to_path_buf(), e))?;
        }
        Ok(Self { path })
    }

    /// The log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one token. The suppression (empty) token performs no I/O.
    pub fn append_token(&self, token: &Token) -> Result<(), SinkError> {
        if token.is_empty() {
            return Ok(());
        }
        self.append(token.as_str())
    }

    /// Append a session-boundary marker line verbatim.
    pub fn append_marker(&self, text: &str) -> Result<(), SinkError> {
        self.append(text)
    }

    /// Truncate the log file to empty.
    pub fn clear(&self) -> Result<(), SinkError> {
        fs::write(&self.path, "").map_err(|e| SinkError::Clear(self.path.clone(), e))
    }

    fn append(&self, text: &str) -> Result<(), SinkError> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| SinkError::Write(self.path.clone(), e))?;
        file.write_all(text.as_bytes())
            .map_err(|e| SinkError::Write(self.path.clone(), e))
        // file closes on drop; write_all already reached the OS.
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{normalize, KeySource, RawKeyEvent};
    use tempfile::tempdir;

    fn sink_in(dir: &Path) -> LogSink {
        LogSink::new(dir.join("logs").join("keystrokes.txt")).expect("sink init")
    }

    #[test]
    fn new_creates_the_log_directory_idempotently() {
        let dir = tempdir().expect("temp dir");
        let sink = sink_in(dir.path());
        assert!(dir.path().join("logs").is_dir());

        // Constructing a second sink over the same directory is fine.
        let _again = sink_in(dir.path());
        assert!(sink.path().ends_with("logs/keystrokes.txt"));
    }

    #[test]
    fn tokens_are_appended_without_separators() {
        let dir = tempdir().expect("temp dir");
        let sink = sink_in(dir.path());

        for ch in ['h', 'i'] {
            let token = normalize(&RawKeyEvent::printable(ch, KeySource::WindowScoped));
            sink.append_token(&token).expect("append");
        }
        let token = normalize(&RawKeyEvent::named("return", KeySource::WindowScoped));
        sink.append_token(&token).expect("append");

        assert_eq!(fs::read_to_string(sink.path()).unwrap(), "hi\n");
    }

    #[test]
    fn empty_token_performs_no_write() {
        let dir = tempdir().expect("temp dir");
        let sink = sink_in(dir.path());

        sink.append_token(&Token::empty()).expect("no-op append");

        // Not even the file is created.
        assert!(!sink.path().exists());
    }

    #[test]
    fn markers_are_written_verbatim() {
        let dir = tempdir().expect("temp dir");
        let sink = sink_in(dir.path());

        sink.append_marker("\n--- Session started 2026-01-01 00:00:00 ---\n")
            .expect("marker");

        let content = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(content, "\n--- Session started 2026-01-01 00:00:00 ---\n");
    }

    #[test]
    fn clear_truncates_regardless_of_prior_content() {
        let dir = tempdir().expect("temp dir");
        let sink = sink_in(dir.path());

        sink.append_marker("some content").expect("append");
        sink.clear().expect("clear");

        assert_eq!(fs::read_to_string(sink.path()).unwrap(), "");
    }

    #[test]
    fn a_failed_append_does_not_poison_later_appends() {
        let dir = tempdir().expect("temp dir");
        let sink = sink_in(dir.path());
        let logs_dir = dir.path().join("logs");

        // Remove the directory out from under the sink: the append fails.
        fs::remove_dir_all(&logs_dir).expect("remove logs dir");
        let token = normalize(&RawKeyEvent::printable('x', KeySource::Global));
        assert!(sink.append_token(&token).is_err());

        // Each call opens the file anew, so once the directory is back the
        // next append succeeds.
        fs::create_dir_all(&logs_dir).expect("recreate logs dir");
        let token = normalize(&RawKeyEvent::printable('y', KeySource::Global));
        sink.append_token(&token).expect("append after recovery");

        assert_eq!(fs::read_to_string(sink.path()).unwrap(), "y");
    }
}
