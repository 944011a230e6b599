// Copyright (c) The gotest-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The chunk-to-tree pipeline for one structured stream.

use crate::{
    events::ParsedLine,
    splitter::LineSplitter,
    tree::ResultTree,
};
use std::io::{self, Write};

/// Everything a drained pipeline produced.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    /// The finished result hierarchy.
    pub tree: ResultTree,
    /// Non-empty lines that could not be decoded as events, in order. These
    /// are diagnostic text not attributable to any test (build errors,
    /// panics before test registration).
    pub raw_lines: Vec<String>,
    /// The full transcript: every raw line and every captured output
    /// fragment, verbatim, independent of tree attribution.
    pub transcript: String,
}

/// Consumes one structured stream chunk-by-chunk: splits chunks into lines,
/// classifies each line, folds events into the result tree, and emits the
/// live passthrough as lines complete.
///
/// One pipeline per stream; chunks must be fed in arrival order from a single
/// logical sequence. The passthrough is written incrementally, not batched
/// until end-of-stream.
#[derive(Debug, Default)]
pub struct EventPipeline {
    splitter: LineSplitter,
    tree: ResultTree,
    raw_lines: Vec<String>,
    transcript: String,
}

impl EventPipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk, processing any lines it completes.
    ///
    /// `output` event fragments are passed through as their text content; raw
    /// lines are passed through as-is. Non-output events produce no
    /// passthrough.
    pub fn accept(&mut self, chunk: &[u8], passthrough: &mut dyn Write) -> io::Result<()> {
        for line in self.splitter.accept(chunk) {
            self.handle_line(line, passthrough)?;
        }
        Ok(())
    }

    /// Signals end-of-stream, flushing a trailing unterminated line, and
    /// returns everything the stream produced.
    ///
    /// Must be called exactly once, after the last chunk; a node still
    /// running at this point is surfaced by the renderer as an interrupted
    /// test rather than dropped.
    pub fn finish(mut self, passthrough: &mut dyn Write) -> io::Result<PipelineOutput> {
        if let Some(line) = std::mem::take(&mut self.splitter).finish() {
            self.handle_line(line, passthrough)?;
        }
        Ok(PipelineOutput {
            tree: self.tree,
            raw_lines: self.raw_lines,
            transcript: self.transcript,
        })
    }

    fn handle_line(&mut self, line: String, passthrough: &mut dyn Write) -> io::Result<()> {
        match ParsedLine::classify(&line) {
            ParsedLine::Event(event) => {
                if let Some(text) = &event.output {
                    passthrough.write_all(text.as_bytes())?;
                    self.transcript.push_str(text);
                }
                self.tree.apply(&event);
            }
            ParsedLine::Raw(text) => {
                self.transcript.push_str(&text);
                self.transcript.push('\n');
                // Blank lines stay in the transcript but are not forwarded
                // or reported as diagnostics.
                if !text.trim().is_empty() {
                    passthrough.write_all(text.as_bytes())?;
                    passthrough.write_all(b"\n")?;
                    self.raw_lines.push(text);
                }
            }
        }
        Ok(())
    }
}
