//! # Reporting Module / 报告模块
//!
//! This module defines the [`Reporter`] collaborator consumed by the runner
//! and the concrete reporters shipped with the crate: a colored console
//! reporter and a machine-readable JSON report writer.
//!
//! 此模块定义了运行器所使用的 [`Reporter`] 协作者，
//! 以及随 crate 提供的具体报告器：彩色控制台报告器和机器可读的 JSON 报告写入器。

pub mod console;
pub mod json;

use crate::core::models::{Block, Hook, RunSummary, Test, TestFailure};

/// Receives ordered lifecycle callbacks from the runner.
///
/// The runner's observable behaviour is defined by the exact sequence and
/// content of these callbacks. All methods have empty default bodies so a
/// reporter only implements the events it cares about.
///
/// 从运行器接收有序的生命周期回调。
/// 运行器的可观察行为由这些回调的确切顺序和内容定义。
#[allow(unused_variables)]
pub trait Reporter: Send {
    /// The run is about to start, with the resolved tree it will traverse.
    fn run_started(&mut self, root: &Block) {}
    /// The run finished; always called, even when tests or hooks failed.
    fn run_finished(&mut self, summary: &RunSummary) {}
    /// A block was entered, before any of its tests or children.
    fn block_started(&mut self, block: &Block) {}
    /// A block was left for good, after its after-all hooks.
    fn block_finished(&mut self, block: &Block) {}
    /// A runnable test is about to start its bracket.
    fn test_started(&mut self, test: &Test) {}
    fn test_passed(&mut self, test: &Test) {}
    fn test_failed(&mut self, test: &Test, failure: &TestFailure) {}
    fn test_skipped(&mut self, test: &Test) {}
    fn test_pending(&mut self, test: &Test) {}
    /// A lifecycle hook failed, attributed to its owning block.
    fn hook_failed(&mut self, hook: &Hook, block: &Block, failure: &TestFailure) {}
}

// Re-export common reporting entry points
pub use console::{ConsoleReporter, print_summary};
pub use json::write_json_report;
