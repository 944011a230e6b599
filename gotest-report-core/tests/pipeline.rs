// Copyright (c) The gotest-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end pipeline tests over a realistic `go test -json` capture.

use gotest_report_core::{
    pipeline::{EventPipeline, PipelineOutput},
    report::{ReportFilter, ReportInputs, render_summary},
    tree::{RunCounts, TestStatus},
};
use indoc::indoc;
use pretty_assertions::assert_eq;

// A capture of `go test -json ./...` for a module with two packages: one
// with a passing test, a failing subtest and a skipped test, and one that
// failed to build. The trailing line deliberately has no terminator.
const CAPTURE: &str = indoc! {r#"
    {"Time":"2024-05-01T12:00:00Z","Action":"run","Package":"example.com/mod/a","Test":"TestOk"}
    {"Time":"2024-05-01T12:00:00Z","Action":"output","Package":"example.com/mod/a","Test":"TestOk","Output":"=== RUN   TestOk\n"}
    {"Time":"2024-05-01T12:00:01Z","Action":"pass","Package":"example.com/mod/a","Test":"TestOk","Elapsed":0.5}
    {"Time":"2024-05-01T12:00:01Z","Action":"run","Package":"example.com/mod/a","Test":"TestTable"}
    {"Time":"2024-05-01T12:00:01Z","Action":"run","Package":"example.com/mod/a","Test":"TestTable/case_1"}
    {"Time":"2024-05-01T12:00:01Z","Action":"output","Package":"example.com/mod/a","Test":"TestTable/case_1","Output":"    widget_test.go:17: want 1 got 2\n"}
    {"Time":"2024-05-01T12:00:01Z","Action":"fail","Package":"example.com/mod/a","Test":"TestTable/case_1","Elapsed":0.01}
    {"Time":"2024-05-01T12:00:01Z","Action":"run","Package":"example.com/mod/a","Test":"TestTable/case_2"}
    {"Time":"2024-05-01T12:00:01Z","Action":"pass","Package":"example.com/mod/a","Test":"TestTable/case_2","Elapsed":0.01}
    {"Time":"2024-05-01T12:00:01Z","Action":"fail","Package":"example.com/mod/a","Test":"TestTable","Elapsed":0.02}
    {"Time":"2024-05-01T12:00:02Z","Action":"run","Package":"example.com/mod/a","Test":"TestSkipped"}
    {"Time":"2024-05-01T12:00:02Z","Action":"skip","Package":"example.com/mod/a","Test":"TestSkipped","Elapsed":0}
    {"Time":"2024-05-01T12:00:02Z","Action":"fail","Package":"example.com/mod/a","Elapsed":1.2}
    # example.com/mod/b
    ./broken.go:3:1: syntax error: non-declaration statement outside function body
    {"Time":"2024-05-01T12:00:02Z","Action":"output","Package":"example.com/mod/b","Output":"FAIL\texample.com/mod/b [build failed]\n"}
    {"Time":"2024-05-01T12:00:02Z","Action":"fail","Package":"example.com/mod/b"}"#};

fn drain(chunk_size: usize) -> (PipelineOutput, String) {
    let mut pipeline = EventPipeline::new();
    let mut passthrough = Vec::new();
    for chunk in CAPTURE.as_bytes().chunks(chunk_size) {
        pipeline
            .accept(chunk, &mut passthrough)
            .expect("vec write cannot fail");
    }
    let output = pipeline
        .finish(&mut passthrough)
        .expect("vec write cannot fail");
    (output, String::from_utf8(passthrough).expect("utf-8"))
}

#[test]
fn counts_are_chunk_invariant() {
    let expected = RunCounts {
        total: 4,
        passed: 2,
        failed: 1,
        skipped: 1,
        running: 0,
    };

    let (whole, whole_passthrough) = drain(CAPTURE.len());
    assert_eq!(whole.tree.counts(), expected);

    for chunk_size in [1, 2, 3, 5, 17, 64, 1024] {
        let (chunked, passthrough) = drain(chunk_size);
        assert_eq!(chunked.tree.counts(), expected, "chunk size {chunk_size}");
        assert_eq!(passthrough, whole_passthrough, "chunk size {chunk_size}");
        assert_eq!(chunked.transcript, whole.transcript, "chunk size {chunk_size}");
    }
}

#[test]
fn passthrough_is_incremental_content() {
    let (_, passthrough) = drain(7);
    // Output fragments appear as their content; raw diagnostic lines as-is.
    assert!(passthrough.contains("=== RUN   TestOk\n"));
    assert!(passthrough.contains("# example.com/mod/b\n"));
    assert!(passthrough.contains("syntax error"));
    // Structured non-output records produce no passthrough.
    assert!(!passthrough.contains("\"Action\""));
}

#[test]
fn tree_shape_and_statuses() {
    let (output, _) = drain(11);

    let packages: Vec<_> = output.tree.packages().collect();
    assert_eq!(packages.len(), 2);

    let (name_a, pkg_a) = packages[0];
    assert_eq!(name_a, "example.com/mod/a");
    assert_eq!(pkg_a.effective_status(), TestStatus::Failed);

    let children: Vec<_> = pkg_a.children().collect();
    let names: Vec<_> = children.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, ["TestOk", "TestTable", "TestSkipped"]);

    let (_, table) = children[1];
    assert_eq!(table.effective_status(), TestStatus::Failed);
    let subtests: Vec<_> = table.children().collect();
    assert_eq!(subtests[0].0, "case_1");
    assert_eq!(subtests[0].1.status(), TestStatus::Failed);
    assert_eq!(subtests[1].0, "case_2");
    assert_eq!(subtests[1].1.status(), TestStatus::Passed);

    let (name_b, pkg_b) = packages[1];
    assert_eq!(name_b, "example.com/mod/b");
    assert_eq!(pkg_b.effective_status(), TestStatus::Failed);
    assert_eq!(pkg_b.output(), ["FAIL\texample.com/mod/b [build failed]\n"]);
}

#[test]
fn rendered_summary_end_to_end() {
    let (output, _) = drain(13);

    let doc = render_summary(&ReportInputs {
        tree: &output.tree,
        module_name: Some("example.com/mod"),
        raw_lines: &output.raw_lines,
        stderr_transcript: "go: downloading example.com/dep v1.2.3\n",
        filter: ReportFilter::OmitPassed,
        exit_code: Some(1),
    });

    // Counts cover everything, including omitted passed tests.
    assert!(doc.contains("**4 tests**: 2 passed, 1 failed, 1 skipped"), "doc:\n{doc}");
    assert!(doc.contains("exited with code 1"), "doc:\n{doc}");

    // Passed entries are filtered out of the listing, failures are not.
    assert!(!doc.contains("`TestOk`"), "doc:\n{doc}");
    assert!(doc.contains("`TestTable`"), "doc:\n{doc}");
    assert!(doc.contains("want 1 got 2"), "doc:\n{doc}");
    assert!(doc.contains("`TestSkipped`"), "doc:\n{doc}");

    // The build failure and unattributed compiler output are surfaced.
    assert!(doc.contains("[build failed]"), "doc:\n{doc}");
    assert!(doc.contains("# example.com/mod/b"), "doc:\n{doc}");
    assert!(doc.contains("syntax error"), "doc:\n{doc}");
    assert!(doc.contains("go: downloading"), "doc:\n{doc}");
}
