// Copyright (c) The gotest-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Execution of `go test -json` and draining of its output streams.

use crate::{
    errors::RunGoTestError,
    pipeline::{EventPipeline, PipelineOutput},
};
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::{io::Write, process::Stdio};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

/// The size of each buffered reader's buffer: the (normal) page size on most
/// linux, windows, and macos systems.
const CHUNK_SIZE: usize = 4 * 1024;

/// Everything captured from one `go test -json` run.
#[derive(Debug)]
pub struct GoTestRun {
    /// What the structured stdout stream produced.
    pub output: PipelineOutput,
    /// The full standard-error transcript.
    pub stderr_transcript: String,
    /// The exit code, or `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

/// Runs `go test -json` in a module directory and feeds its streams through
/// the pipeline.
#[derive(Clone, Debug)]
pub struct GoTestRunner {
    dir: Utf8PathBuf,
    test_args: Vec<String>,
}

impl GoTestRunner {
    /// Creates a runner for the given module directory with extra `go test`
    /// arguments.
    pub fn new(dir: impl Into<Utf8PathBuf>, test_args: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            test_args,
        }
    }

    /// Spawns `go test -json` and drains both streams to completion.
    ///
    /// Structured stdout chunks are fed to an [`EventPipeline`] with the live
    /// passthrough going to `passthrough`; stderr chunks are collected into a
    /// transcript and mirrored to `diag_passthrough`. The two streams write
    /// to disjoint state, so draining them concurrently is safe. A nonzero
    /// exit is recorded in the result, not treated as an error.
    pub async fn run(
        &self,
        passthrough: &mut dyn Write,
        diag_passthrough: &mut dyn Write,
    ) -> Result<GoTestRun, RunGoTestError> {
        let mut args = vec!["test".to_owned(), "-json".to_owned()];
        args.extend(self.test_args.iter().cloned());

        let mut child = Command::new("go")
            .args(&args)
            .current_dir(&self.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|error| RunGoTestError::Spawn {
                args: args.join(" "),
                error,
            })?;

        let stdout = child.stdout.take().expect("stdout is piped");
        let stderr = child.stderr.take().expect("stderr is piped");
        let mut stdout = BufReader::with_capacity(CHUNK_SIZE, stdout);
        let mut stderr = BufReader::with_capacity(CHUNK_SIZE, stderr);

        let mut pipeline = EventPipeline::new();
        let mut stderr_transcript = String::new();

        let mut out_done = false;
        let mut err_done = false;

        // Chunks for each stream are processed strictly in arrival order; the
        // select only interleaves the two independent streams.
        while !out_done || !err_done {
            tokio::select! {
                res = stdout.fill_buf(), if !out_done => {
                    let read = {
                        let buf = res.map_err(RunGoTestError::ReadStdout)?;
                        pipeline
                            .accept(buf, passthrough)
                            .map_err(RunGoTestError::Passthrough)?;
                        buf.len()
                    };
                    stdout.consume(read);
                    out_done = read == 0;
                }
                res = stderr.fill_buf(), if !err_done => {
                    let read = {
                        let buf = res.map_err(RunGoTestError::ReadStderr)?;
                        stderr_transcript.push_str(&String::from_utf8_lossy(buf));
                        diag_passthrough
                            .write_all(buf)
                            .map_err(RunGoTestError::Passthrough)?;
                        buf.len()
                    };
                    stderr.consume(read);
                    err_done = read == 0;
                }
            };
        }

        let status = child.wait().await.map_err(RunGoTestError::Wait)?;
        let output = pipeline
            .finish(passthrough)
            .map_err(RunGoTestError::Passthrough)?;

        if !status.success() {
            debug!("`go test` exited with {status}");
        }

        Ok(GoTestRun {
            output,
            stderr_transcript,
            exit_code: status.code(),
        })
    }
}

/// Deduces the Go module name from `go.mod` in the given directory.
///
/// Returns `None` if the file is missing or has no `module` line; the caller
/// renders the unknown-module marker in that case.
pub fn resolve_module_name(dir: &Utf8Path) -> Option<String> {
    let path = dir.join("go.mod");
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(error) => {
            debug!("unable to read `{path}`: {error}");
            return None;
        }
    };

    let module_line = Regex::new(r"(?m)^module\s+(\S+)").expect("module regex is valid");
    match module_line.captures(&contents) {
        Some(captures) => Some(captures[1].to_owned()),
        None => {
            debug!("no matching module line found in `{path}`");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;
    use indoc::indoc;

    #[test]
    fn test_resolve_module_name() {
        let dir = Utf8TempDir::new().expect("tempdir created");
        std::fs::write(
            dir.path().join("go.mod"),
            indoc! {r#"
                module example.com/widgets

                go 1.22

                require example.com/dep v1.2.3
            "#},
        )
        .expect("go.mod written");

        assert_eq!(
            resolve_module_name(dir.path()).as_deref(),
            Some("example.com/widgets")
        );
    }

    #[test]
    fn test_resolve_module_name_missing_file() {
        let dir = Utf8TempDir::new().expect("tempdir created");
        assert_eq!(resolve_module_name(dir.path()), None);
    }

    #[test]
    fn test_resolve_module_name_no_module_line() {
        let dir = Utf8TempDir::new().expect("tempdir created");
        std::fs::write(dir.path().join("go.mod"), "go 1.22\n").expect("go.mod written");
        assert_eq!(resolve_module_name(dir.path()), None);
    }
}
