// Copyright (c) The gotest-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI for gotest-report: runs `go test -json` (or replays a capture),
//! passes output through live, and appends a Markdown summary to a file such
//! as `$GITHUB_STEP_SUMMARY`.

#![warn(missing_docs)]

mod dispatch;

#[doc(hidden)]
pub use dispatch::*;
