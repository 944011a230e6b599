// Copyright (c) The gotest-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering the finished result tree into a summary document.

use crate::{
    errors::ReportFilterParseError,
    tree::{ResultNode, ResultTree, RunCounts, TestStatus},
};
use std::{fmt, str::FromStr};
use swrite::{SWrite, swrite, swriteln};

/// The marker rendered when module resolution failed upstream.
pub const UNKNOWN_MODULE: &str = "(unknown module)";

/// Which non-failing entries appear in the detail listing.
///
/// Filtering affects only the detail listing: aggregate counts always cover
/// every test, and a failed test's captured output is always rendered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ReportFilter {
    /// Show every entry.
    #[default]
    ShowAll,
    /// Hide passed entries from the detail listing.
    OmitPassed,
    /// Hide skipped entries from the detail listing.
    OmitSkipped,
    /// Hide both passed and skipped entries.
    OmitBoth,
}

impl ReportFilter {
    /// String representations of all known variants.
    pub fn variants() -> [&'static str; 4] {
        ["show-all", "omit-passed", "omit-skipped", "omit-both"]
    }

    /// Whether an entry with this effective status appears in the detail
    /// listing. Failed and still-running entries are always shown.
    pub fn shows(self, status: TestStatus) -> bool {
        match status {
            TestStatus::Failed | TestStatus::Running => true,
            TestStatus::Passed => !matches!(self, Self::OmitPassed | Self::OmitBoth),
            TestStatus::Skipped => !matches!(self, Self::OmitSkipped | Self::OmitBoth),
        }
    }
}

impl FromStr for ReportFilter {
    type Err = ReportFilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "show-all" => Ok(Self::ShowAll),
            "omit-passed" => Ok(Self::OmitPassed),
            "omit-skipped" => Ok(Self::OmitSkipped),
            "omit-both" => Ok(Self::OmitBoth),
            other => Err(ReportFilterParseError::new(other)),
        }
    }
}

impl fmt::Display for ReportFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ShowAll => "show-all",
            Self::OmitPassed => "omit-passed",
            Self::OmitSkipped => "omit-skipped",
            Self::OmitBoth => "omit-both",
        };
        write!(f, "{s}")
    }
}

/// Inputs for one rendered summary document.
#[derive(Clone, Debug)]
pub struct ReportInputs<'a> {
    /// The finished result tree.
    pub tree: &'a ResultTree,
    /// The resolved module name, or `None` if resolution failed upstream.
    pub module_name: Option<&'a str>,
    /// Diagnostic lines from the structured stream that were not attributable
    /// to any test.
    pub raw_lines: &'a [String],
    /// The full standard-error transcript of the test process.
    pub stderr_transcript: &'a str,
    /// The detail filter.
    pub filter: ReportFilter,
    /// The exit code of the test process, if it ran and exited.
    pub exit_code: Option<i32>,
}

/// Renders the summary document as Markdown.
///
/// The document always contains the aggregate counts; the detail listing is
/// subject to the filter, except that failed and still-running entries (and
/// failed entries' captured output) are unconditionally included.
pub fn render_summary(inputs: &ReportInputs<'_>) -> String {
    let module = inputs.module_name.unwrap_or(UNKNOWN_MODULE);
    let counts = inputs.tree.counts();

    let mut out = String::new();
    swriteln!(out, "# Go test report: `{module}`");
    out.push('\n');

    write_counts_line(&mut out, &counts);

    if let Some(code) = inputs.exit_code
        && code != 0
    {
        out.push('\n');
        swriteln!(out, "> ⚠️ `go test` exited with code {code}");
    }

    let mut details = String::new();
    for (package, node) in inputs.tree.packages() {
        write_package(&mut details, package, node, module, inputs.filter);
    }
    if !details.is_empty() {
        out.push('\n');
        swriteln!(out, "## Results");
        out.push_str(&details);
    }

    write_diagnostics(&mut out, inputs);

    out
}

fn write_counts_line(out: &mut String, counts: &RunCounts) {
    if counts.total == 0 {
        swriteln!(out, "**No tests were run.**");
        return;
    }

    let tests = if counts.total == 1 { "test" } else { "tests" };
    swrite!(out, "**{} {tests}**: {} passed", counts.total, counts.passed);
    if counts.failed > 0 {
        swrite!(out, ", {} failed", counts.failed);
    }
    if counts.skipped > 0 {
        swrite!(out, ", {} skipped", counts.skipped);
    }
    if counts.running > 0 {
        swrite!(out, ", {} did not finish", counts.running);
    }
    out.push('\n');
}

fn write_package(
    out: &mut String,
    package: &str,
    node: &ResultNode,
    module: &str,
    filter: ReportFilter,
) {
    let has_visible_children = node.children().any(|(_, child)| subtree_visible(child, filter));
    let status = node.effective_status();
    let show_own_output = status == TestStatus::Failed && !node.output().is_empty();
    if !has_visible_children && !show_own_output && !filter.shows(status) {
        return;
    }

    // Events with no Package field land in an unnamed bucket; render it under
    // the module heading.
    let heading = if package.is_empty() { module } else { package };
    out.push('\n');
    swriteln!(out, "### {} `{heading}`", status_emoji(status));

    if show_own_output {
        out.push('\n');
        write_output_block(out, node.output(), 0);
    }

    if has_visible_children {
        out.push('\n');
        for (name, child) in node.children() {
            write_node(out, name, child, 0, filter);
        }
    }
}

fn write_node(out: &mut String, name: &str, node: &ResultNode, depth: usize, filter: ReportFilter) {
    if !subtree_visible(node, filter) {
        return;
    }

    let status = node.effective_status();
    let indent = "  ".repeat(depth);
    swrite!(out, "{indent}- {} `{name}`", status_emoji(status));
    if let Some(elapsed) = node.elapsed() {
        swrite!(out, " ({:.2}s)", elapsed.as_secs_f64());
    }
    if status == TestStatus::Running {
        swrite!(out, " (did not finish)");
    }
    out.push('\n');

    // Failure diagnostics are never hidden, whatever the filter says.
    if matches!(status, TestStatus::Failed | TestStatus::Running) && !node.output().is_empty() {
        out.push('\n');
        write_output_block(out, node.output(), depth + 1);
        out.push('\n');
    }

    for (child_name, child) in node.children() {
        write_node(out, child_name, child, depth + 1, filter);
    }
}

fn subtree_visible(node: &ResultNode, filter: ReportFilter) -> bool {
    filter.shows(node.effective_status())
        || node
            .children()
            .any(|(_, child)| subtree_visible(child, filter))
}

fn write_output_block(out: &mut String, fragments: &[String], depth: usize) {
    let indent = "  ".repeat(depth);
    let text: String = fragments.concat();
    swriteln!(out, "{indent}```text");
    for line in text.trim_end_matches('\n').lines() {
        swriteln!(out, "{indent}{line}");
    }
    swriteln!(out, "{indent}```");
}

fn write_diagnostics(out: &mut String, inputs: &ReportInputs<'_>) {
    let stderr = inputs.stderr_transcript.trim_end_matches('\n');
    if inputs.raw_lines.is_empty() && stderr.is_empty() {
        return;
    }

    out.push('\n');
    swriteln!(out, "## Diagnostics");

    if !inputs.raw_lines.is_empty() {
        out.push('\n');
        swriteln!(out, "Output not attributed to any test:");
        out.push('\n');
        swriteln!(out, "```text");
        for line in inputs.raw_lines {
            swriteln!(out, "{line}");
        }
        swriteln!(out, "```");
    }

    if !stderr.is_empty() {
        out.push('\n');
        swriteln!(out, "### Standard error");
        out.push('\n');
        swriteln!(out, "```text");
        for line in stderr.lines() {
            swriteln!(out, "{line}");
        }
        swriteln!(out, "```");
    }
}

fn status_emoji(status: TestStatus) -> &'static str {
    match status {
        TestStatus::Running => "⏳",
        TestStatus::Passed => "✅",
        TestStatus::Failed => "❌",
        TestStatus::Skipped => "⏭️",
    }
}
