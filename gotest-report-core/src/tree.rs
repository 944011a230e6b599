// Copyright (c) The gotest-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Incremental aggregation of test events into a result hierarchy.

use crate::events::{Action, TestEvent};
use indexmap::IndexMap;
use std::time::Duration;

/// The state of a single package, test or subtest.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TestStatus {
    /// No terminal action observed yet. If a node is still running at
    /// end-of-stream, the run was interrupted.
    #[default]
    Running,
    /// The node passed.
    Passed,
    /// The node failed.
    Failed,
    /// The node was skipped.
    Skipped,
}

impl TestStatus {
    /// Returns true once a `pass`/`fail`/`skip` action has settled the node.
    pub fn is_terminal(self) -> bool {
        !matches!(self, TestStatus::Running)
    }
}

/// One node in the result hierarchy: a package, test or subtest.
///
/// Nodes are created lazily the first time a name is observed and never
/// destroyed. Children iterate in first-seen order, matching the order the
/// underlying process reported them, so reports are stable and diffable.
#[derive(Clone, Debug, Default)]
pub struct ResultNode {
    status: TestStatus,
    output: Vec<String>,
    elapsed: Option<Duration>,
    children: IndexMap<String, ResultNode>,
}

impl ResultNode {
    /// The node's own status, without roll-up.
    pub fn status(&self) -> TestStatus {
        self.status
    }

    /// Captured output fragments in arrival order.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Elapsed time reported by the node's terminal action.
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    /// Child nodes in first-seen order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &ResultNode)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// True if the node has no subtests.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The status displayed for this node: `Failed` if any descendant failed,
    /// else the node's own terminal status, else `Running`.
    ///
    /// Computed at render time rather than stored, so children finishing out
    /// of order can never leave a stale roll-up behind.
    pub fn effective_status(&self) -> TestStatus {
        if self.status == TestStatus::Failed
            || self
                .children
                .values()
                .any(|child| child.effective_status() == TestStatus::Failed)
        {
            return TestStatus::Failed;
        }
        if self.status.is_terminal() {
            self.status
        } else {
            TestStatus::Running
        }
    }

    fn child_mut(&mut self, name: &str) -> &mut ResultNode {
        self.children.entry(name.to_owned()).or_default()
    }

    fn add_counts(&self, counts: &mut RunCounts) {
        for child in self.children.values() {
            if child.is_leaf() {
                counts.total += 1;
                match child.effective_status() {
                    TestStatus::Running => counts.running += 1,
                    TestStatus::Passed => counts.passed += 1,
                    TestStatus::Failed => counts.failed += 1,
                    TestStatus::Skipped => counts.skipped += 1,
                }
            } else {
                child.add_counts(counts);
            }
        }
    }
}

/// Aggregate counts over leaf test nodes.
///
/// Package-level structural nodes and parents of subtests are not counted as
/// tests; only leaves are.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunCounts {
    /// The total number of leaf tests observed.
    pub total: usize,
    /// The number of leaf tests that passed.
    pub passed: usize,
    /// The number of leaf tests that failed.
    pub failed: usize,
    /// The number of leaf tests that were skipped.
    pub skipped: usize,
    /// The number of leaf tests with no terminal action before end-of-stream.
    pub running: usize,
}

impl RunCounts {
    /// True if no leaf test failed and none was left running.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.running == 0
    }
}

/// The result hierarchy for one run: package nodes at the root, tests and
/// subtests below them.
///
/// The tree is the sole aggregation state for a structured stream and is
/// mutated from exactly one logical sequence of events.
#[derive(Clone, Debug, Default)]
pub struct ResultTree {
    packages: IndexMap<String, ResultNode>,
}

impl ResultTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one event into the tree.
    pub fn apply(&mut self, event: &TestEvent) {
        let package = event.package.as_deref().unwrap_or_default();
        match event.action {
            Action::Run => {
                // Creation marks the node (and any intermediate subtest
                // ancestors) as running.
                self.node_mut(package, event.test.as_deref());
            }
            Action::Output => {
                if let Some(text) = &event.output {
                    self.node_mut(package, event.test.as_deref())
                        .output
                        .push(text.clone());
                }
            }
            Action::Pass | Action::Fail | Action::Skip => {
                let node = self.node_mut(package, event.test.as_deref());
                // Terminal status is set exactly once; a duplicate terminal
                // record for the same name does not overwrite it.
                if !node.status.is_terminal() {
                    node.status = match event.action {
                        Action::Pass => TestStatus::Passed,
                        Action::Fail => TestStatus::Failed,
                        _ => TestStatus::Skipped,
                    };
                    node.elapsed = event.elapsed_duration();
                }
            }
            Action::Pause | Action::Cont | Action::Bench => {}
        }
    }

    /// Package nodes in first-seen order.
    pub fn packages(&self) -> impl Iterator<Item = (&str, &ResultNode)> {
        self.packages.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// True if no event ever touched the tree.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Aggregate counts over leaf test nodes across all packages.
    pub fn counts(&self) -> RunCounts {
        let mut counts = RunCounts::default();
        for package in self.packages.values() {
            package.add_counts(&mut counts);
        }
        counts
    }

    fn node_mut(&mut self, package: &str, test: Option<&str>) -> &mut ResultNode {
        let mut node = self.packages.entry(package.to_owned()).or_default();
        if let Some(test) = test {
            for segment in test.split('/') {
                node = node.child_mut(segment);
            }
        }
        node
    }
}
