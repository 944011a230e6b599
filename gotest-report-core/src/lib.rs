// Copyright (c) The gotest-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for gotest-report: decoding the `go test -json` event
//! stream into a hierarchical result tree, passing captured output through as
//! it arrives, and rendering a persisted pass/fail summary.
//!
//! The pipeline is push-based and strictly ordered: raw byte chunks are split
//! into lines ([`splitter`]), each line is classified as a structured test
//! event or opaque diagnostic text ([`events`]), events are folded into a
//! result tree ([`tree`]), and once the stream is drained the tree is rendered
//! into a summary document ([`report`]) and written through a sink
//! ([`summary`]).

pub mod errors;
pub mod events;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod splitter;
pub mod summary;
pub mod tree;
