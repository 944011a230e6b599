// Copyright (c) The gotest-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by gotest-report.

use crate::report::ReportFilter;
use camino::Utf8PathBuf;
use thiserror::Error;

/// An error that occurred while writing the persisted summary document.
///
/// This is fatal to the overall operation: the summary is the system's
/// primary deliverable.
#[derive(Debug, Error)]
#[error("failed to write summary to `{file}`")]
pub struct SummaryWriteError {
    /// The file that could not be written.
    pub file: Utf8PathBuf,
    /// The underlying error.
    #[source]
    pub error: std::io::Error,
}

/// Error returned while parsing a [`ReportFilter`] value from a string.
#[derive(Clone, Debug, Error)]
#[error(
    "unrecognized value for omit filter: {input}\n(known values: {})",
    ReportFilter::variants().join(", "),
)]
pub struct ReportFilterParseError {
    input: String,
}

impl ReportFilterParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// An error that occurred while executing `go test` or draining its streams.
///
/// A nonzero exit from `go test` itself is not an error: it is recorded in
/// [`GoTestRun`](crate::runner::GoTestRun) and propagated by the caller.
#[derive(Debug, Error)]
pub enum RunGoTestError {
    /// The `go` binary could not be spawned.
    #[error("failed to spawn `go {args}`")]
    Spawn {
        /// The arguments the spawn was attempted with.
        args: String,
        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// An error occurred while reading standard output.
    #[error("failed to read `go test` standard output")]
    ReadStdout(#[source] std::io::Error),

    /// An error occurred while reading standard error.
    #[error("failed to read `go test` standard error")]
    ReadStderr(#[source] std::io::Error),

    /// An error occurred while writing the live passthrough.
    #[error("failed to write live output")]
    Passthrough(#[source] std::io::Error),

    /// An error occurred while waiting for the process to exit.
    #[error("failed to wait for `go test` to exit")]
    Wait(#[source] std::io::Error),
}
