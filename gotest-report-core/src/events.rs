// Copyright (c) The gotest-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `go test -json` event record and line classification.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::time::Duration;

/// A test lifecycle action, as reported by `go test -json`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// A test or package has started running.
    Run,
    /// A test has been paused.
    Pause,
    /// A paused test has continued running.
    Cont,
    /// A benchmark has started running.
    Bench,
    /// A fragment of captured output was emitted.
    Output,
    /// A test or package passed.
    Pass,
    /// A test or package failed.
    Fail,
    /// A test or package was skipped.
    Skip,
}

impl Action {
    /// Returns true for the actions that settle a node's status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Action::Pass | Action::Fail | Action::Skip)
    }
}

/// One decoded `go test -json` record.
///
/// `go test` emits one of these per line on stdout when run with `-json`.
/// Every field other than `Action` is optional in practice: package-level
/// records carry no `Test`, and only `output` records carry `Output`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TestEvent {
    /// The time at which the event was generated. Only used for ordering
    /// context; the stream itself is already ordered.
    pub time: Option<DateTime<FixedOffset>>,

    /// The lifecycle action this record describes.
    pub action: Action,

    /// The import path of the package under test.
    pub package: Option<String>,

    /// The `/`-delimited hierarchical test name, if the record concerns a
    /// specific test or subtest rather than the whole package.
    pub test: Option<String>,

    /// Elapsed time in fractional seconds, set on terminal actions.
    pub elapsed: Option<f64>,

    /// The captured output fragment for `output` records. May contain
    /// embedded newlines.
    pub output: Option<String>,
}

impl TestEvent {
    /// The elapsed time as a [`Duration`], if present and representable.
    pub fn elapsed_duration(&self) -> Option<Duration> {
        self.elapsed
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(Duration::from_secs_f64)
    }
}

/// The result of classifying one line of the structured stream.
///
/// Classification is total: a line that is not a well-formed event record is
/// carried verbatim as [`ParsedLine::Raw`] instead of aborting the stream.
/// Build errors and other free-form diagnostics routinely show up interleaved
/// with event records, so the raw path is the common case, not an error.
#[derive(Clone, Debug)]
pub enum ParsedLine {
    /// A structured test event.
    Event(TestEvent),
    /// Opaque diagnostic text, not attributed to any test.
    Raw(String),
}

impl ParsedLine {
    /// Classifies one line as an event record or raw diagnostic text.
    pub fn classify(line: &str) -> Self {
        match serde_json::from_str::<TestEvent>(line) {
            Ok(event) => ParsedLine::Event(event),
            Err(_) => ParsedLine::Raw(line.to_owned()),
        }
    }
}
