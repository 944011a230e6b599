// Copyright (c) The gotest-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sinks for the persisted summary document.

use crate::errors::SummaryWriteError;
use camino::{Utf8Path, Utf8PathBuf};
use std::{fs::OpenOptions, io::Write};

/// Destination for the rendered summary document.
///
/// The append is a single scoped operation: it either fully succeeds or
/// reports a [`SummaryWriteError`], never a partial write that goes
/// unnoticed.
pub trait SummarySink {
    /// Appends the full document.
    fn append_summary(&mut self, document: &str) -> Result<(), SummaryWriteError>;
}

/// Appends the summary document to a file.
///
/// The usual target is the file named by `$GITHUB_STEP_SUMMARY`, which other
/// steps append to as well, so the sink appends rather than truncates.
#[derive(Clone, Debug)]
pub struct FileSink {
    path: Utf8PathBuf,
}

impl FileSink {
    /// Creates a sink appending to the given path. The file is created if it
    /// does not exist.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this sink appends to.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn wrap_err(&self, error: std::io::Error) -> SummaryWriteError {
        SummaryWriteError {
            file: self.path.clone(),
            error,
        }
    }
}

impl SummarySink for FileSink {
    fn append_summary(&mut self, document: &str) -> Result<(), SummaryWriteError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|error| self.wrap_err(error))?;
        file.write_all(document.as_bytes())
            .map_err(|error| self.wrap_err(error))?;
        file.flush().map_err(|error| self.wrap_err(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;

    #[test]
    fn test_file_sink_appends() {
        let dir = Utf8TempDir::new().expect("tempdir created");
        let path = dir.path().join("summary.md");

        let mut sink = FileSink::new(path.clone());
        sink.append_summary("first\n").expect("write succeeds");
        sink.append_summary("second\n").expect("write succeeds");

        let contents = std::fs::read_to_string(&path).expect("file readable");
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn test_file_sink_error_names_file() {
        let mut sink = FileSink::new("/definitely/not/a/real/dir/summary.md");
        let err = sink
            .append_summary("doc")
            .expect_err("write to missing directory fails");
        assert!(err.to_string().contains("summary.md"), "err: {err}");
    }
}
