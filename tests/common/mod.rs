//! Shared test support: a reporter that records the ordered event stream and
//! a log for observing hook/test execution order.

use spec_runner::core::models::{Block, Hook, RunSummary, Test, TestFailure};
use spec_runner::reporting::Reporter;
use std::sync::{Arc, Mutex};

/// Records every reporter callback as a formatted string, in order.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: Vec<String>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        RecordingReporter::default()
    }

    /// Only the events whose name matches the given prefix.
    #[allow(dead_code)]
    pub fn events_with_prefix(&self, prefix: &str) -> Vec<&String> {
        self.events.iter().filter(|e| e.starts_with(prefix)).collect()
    }
}

impl Reporter for RecordingReporter {
    fn run_started(&mut self, _root: &Block) {
        self.events.push("run_started".to_string());
    }

    fn run_finished(&mut self, _summary: &RunSummary) {
        self.events.push("run_finished".to_string());
    }

    fn block_started(&mut self, block: &Block) {
        self.events.push(format!("block_started:{}", block.description));
    }

    fn block_finished(&mut self, block: &Block) {
        self.events.push(format!("block_finished:{}", block.description));
    }

    fn test_started(&mut self, test: &Test) {
        self.events.push(format!("test_started:{}", test.description));
    }

    fn test_passed(&mut self, test: &Test) {
        self.events.push(format!("test_passed:{}", test.description));
    }

    fn test_failed(&mut self, test: &Test, failure: &TestFailure) {
        self.events
            .push(format!("test_failed:{}:{:?}", test.description, failure.reason));
    }

    fn test_skipped(&mut self, test: &Test) {
        self.events.push(format!("test_skipped:{}", test.description));
    }

    fn test_pending(&mut self, test: &Test) {
        self.events.push(format!("test_pending:{}", test.description));
    }

    fn hook_failed(&mut self, hook: &Hook, block: &Block, _failure: &TestFailure) {
        self.events
            .push(format!("hook_failed:{}:{}", hook.display_name(), block.description));
    }
}

/// A cloneable, thread-safe log that hook and test closures append to, so
/// tests can assert on the exact execution order.
#[derive(Clone, Default)]
pub struct ExecLog(Arc<Mutex<Vec<String>>>);

#[allow(dead_code)]
impl ExecLog {
    pub fn new() -> Self {
        ExecLog::default()
    }

    pub fn push(&self, entry: &str) {
        self.0.lock().unwrap().push(entry.to_string());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// A closure that appends `label` when invoked, for use as a hook or
    /// test body.
    pub fn recorder(&self, label: &str) -> impl Fn() + Send + Sync + 'static {
        let log = self.clone();
        let label = label.to_string();
        move || log.push(&label)
    }
}
