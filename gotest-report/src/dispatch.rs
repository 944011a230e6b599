// Copyright (c) The gotest-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use gotest_report_core::{
    pipeline::EventPipeline,
    report::{ReportFilter, ReportInputs, render_summary},
    runner::{GoTestRun, GoTestRunner, resolve_module_name},
    summary::{FileSink, SummarySink},
    tree::RunCounts,
};
use owo_colors::{OwoColorize, Style};
use supports_color::Stream;
use swrite::{SWrite, swrite};

/// Runs `go test -json` and renders a hierarchical pass/fail summary.
///
/// Captured test output is passed through live; once the run completes, a
/// Markdown summary document is appended to the summary file (by default the
/// one named by `$GITHUB_STEP_SUMMARY`).
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct GoTestReportApp {
    /// Directory containing the Go module to test
    #[arg(long, default_value = ".", value_name = "DIR")]
    dir: Utf8PathBuf,

    /// Entries to omit from the summary's detail listing
    #[arg(long, value_enum, default_value = "show-all", value_name = "WHICH")]
    omit: OmitOpt,

    /// File to append the summary document to [default: $GITHUB_STEP_SUMMARY]
    #[arg(long, value_name = "PATH")]
    summary_path: Option<Utf8PathBuf>,

    /// Render from a saved `go test -json` capture instead of running tests
    #[arg(long, value_name = "PATH")]
    from_file: Option<Utf8PathBuf>,

    /// Additional arguments passed to `go test`
    #[arg(
        value_name = "GO_TEST_ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    test_args: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OmitOpt {
    /// Show every entry
    #[default]
    ShowAll,
    /// Hide passed entries
    OmitPassed,
    /// Hide skipped entries
    OmitSkipped,
    /// Hide passed and skipped entries
    OmitBoth,
}

impl OmitOpt {
    fn to_filter(self) -> ReportFilter {
        match self {
            Self::ShowAll => ReportFilter::ShowAll,
            Self::OmitPassed => ReportFilter::OmitPassed,
            Self::OmitSkipped => ReportFilter::OmitSkipped,
            Self::OmitBoth => ReportFilter::OmitBoth,
        }
    }
}

impl GoTestReportApp {
    /// Executes the app, returning the process exit code.
    pub fn exec(self) -> Result<i32> {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .init();

        let module_name = resolve_module_name(&self.dir);

        let (run, replayed) = match &self.from_file {
            Some(path) => (self.replay(path)?, true),
            None => (self.run_go_test()?, false),
        };

        let counts = run.output.tree.counts();
        let document = render_summary(&ReportInputs {
            tree: &run.output.tree,
            module_name: module_name.as_deref(),
            raw_lines: &run.output.raw_lines,
            stderr_transcript: &run.stderr_transcript,
            filter: self.omit.to_filter(),
            exit_code: run.exit_code,
        });

        let sink_path = self.summary_destination();
        let mut sink = FileSink::new(sink_path.clone());
        sink.append_summary(&document)?;

        let mut styles = Styles::default();
        if supports_color::on(Stream::Stderr).is_some() {
            styles.colorize();
        }
        eprintln!("{}", summary_line(&counts, &styles));
        eprintln!("summary written to {sink_path}");

        if replayed {
            return Ok(0);
        }
        match run.exit_code {
            Some(0) => Ok(0),
            Some(code) => {
                tracing::error!("`go test` returned nonzero exit code: {code}");
                Ok(code)
            }
            None => {
                tracing::error!("`go test` was terminated by a signal");
                Ok(1)
            }
        }
    }

    fn run_go_test(&self) -> Result<GoTestRun> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .wrap_err("failed to build tokio runtime")?;

        let runner = GoTestRunner::new(self.dir.clone(), self.test_args.clone());
        let mut stdout = std::io::stdout();
        let mut stderr = std::io::stderr();
        let run = runtime.block_on(runner.run(&mut stdout, &mut stderr))?;
        Ok(run)
    }

    fn replay(&self, path: &Utf8PathBuf) -> Result<GoTestRun> {
        let bytes = std::fs::read(path).wrap_err_with(|| format!("failed to read `{path}`"))?;

        let mut pipeline = EventPipeline::new();
        let mut passthrough = std::io::sink();
        pipeline
            .accept(&bytes, &mut passthrough)
            .wrap_err("failed to process capture")?;
        let output = pipeline
            .finish(&mut passthrough)
            .wrap_err("failed to process capture")?;

        Ok(GoTestRun {
            output,
            stderr_transcript: String::new(),
            exit_code: None,
        })
    }

    fn summary_destination(&self) -> Utf8PathBuf {
        if let Some(path) = &self.summary_path {
            return path.clone();
        }
        std::env::var("GITHUB_STEP_SUMMARY")
            .ok()
            .map(Utf8PathBuf::from)
            .unwrap_or_else(|| Utf8PathBuf::from("gotest-report.md"))
    }
}

#[derive(Debug, Default)]
struct Styles {
    count: Style,
    pass: Style,
    fail: Style,
    skip: Style,
}

impl Styles {
    fn colorize(&mut self) {
        self.count = Style::new().bold();
        self.pass = Style::new().green().bold();
        self.fail = Style::new().red().bold();
        self.skip = Style::new().yellow().bold();
    }
}

fn summary_line(counts: &RunCounts, styles: &Styles) -> String {
    let mut s = String::new();
    swrite!(
        s,
        "{} {}",
        counts.passed.style(styles.count),
        "passed".style(styles.pass)
    );
    if counts.failed > 0 {
        swrite!(
            s,
            ", {} {}",
            counts.failed.style(styles.count),
            "failed".style(styles.fail)
        );
    }
    if counts.skipped > 0 {
        swrite!(
            s,
            ", {} {}",
            counts.skipped.style(styles.count),
            "skipped".style(styles.skip)
        );
    }
    if counts.running > 0 {
        swrite!(
            s,
            ", {} {}",
            counts.running.style(styles.count),
            "did not finish".style(styles.fail)
        );
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_app_asserts() {
        GoTestReportApp::command().debug_assert();
    }

    #[test]
    fn test_summary_line_uncolored() {
        let counts = RunCounts {
            total: 4,
            passed: 2,
            failed: 1,
            skipped: 1,
            running: 0,
        };
        assert_eq!(
            summary_line(&counts, &Styles::default()),
            "2 passed, 1 failed, 1 skipped"
        );
    }
}
