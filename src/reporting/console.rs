//! # Console Reporting Module / 控制台报告模块
//!
//! A colored, indented tree reporter plus a formatted summary table,
//! with internationalization support.
//!
//! ```text
//! Calculator
//!   ✓ adds two numbers
//!   when negative
//!     ✗ fails on overflow
//! ```
//!
//! 彩色缩进树形报告器以及格式化的摘要表格，支持国际化。

use colored::*;
use rust_i18n::t;

use crate::core::models::{
    Block, BlockKind, Hook, RunSummary, Test, TestFailure, TestStatus,
};
use crate::reporting::Reporter;

/// Prints the test tree as it executes and a summary when the run finishes.
/// 在执行时打印测试树，并在运行结束时打印摘要。
pub struct ConsoleReporter {
    depth: usize,
    locale: String,
}

impl ConsoleReporter {
    pub fn new(locale: impl Into<String>) -> Self {
        ConsoleReporter {
            depth: 0,
            locale: locale.into(),
        }
    }

    fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        ConsoleReporter::new("en")
    }
}

impl Reporter for ConsoleReporter {
    fn run_started(&mut self, _root: &Block) {
        println!();
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        print_summary(summary, &self.locale);
    }

    fn block_started(&mut self, block: &Block) {
        // The root carries no description of its own.
        if block.kind == BlockKind::Root {
            return;
        }
        println!("{}{}", self.indent(), block.description.bold());
        self.depth += 1;
    }

    fn block_finished(&mut self, block: &Block) {
        if block.kind != BlockKind::Root {
            self.depth -= 1;
        }
    }

    fn test_passed(&mut self, test: &Test) {
        println!("{}{} {}", self.indent(), "✓".green(), test.description);
    }

    fn test_failed(&mut self, test: &Test, failure: &TestFailure) {
        println!(
            "{}{} {}",
            self.indent(),
            "✗".red(),
            test.description.red()
        );
        println!("{}  {}", self.indent(), failure.message.red());
    }

    fn test_skipped(&mut self, test: &Test) {
        println!(
            "{}{} {}",
            self.indent(),
            "-".dimmed(),
            test.description.dimmed()
        );
    }

    fn test_pending(&mut self, test: &Test) {
        println!(
            "{}{} {}",
            self.indent(),
            "-".yellow(),
            test.description.dimmed()
        );
    }

    fn hook_failed(&mut self, hook: &Hook, block: &Block, failure: &TestFailure) {
        println!(
            "{}{}",
            self.indent(),
            t!(
                "run.hook_failed",
                locale = &self.locale,
                name = hook.display_name(),
                block = &block.description,
                message = &failure.message
            )
            .red()
        );
    }
}

/// Prints a formatted summary of a finished run to the console.
///
/// 在控制台打印已完成运行的格式化摘要。
///
/// # Output Format / 输出格式
/// ```text
/// --- Test Summary ---
///   - Passed   | Calculator > adds two numbers      |      0.01s
///   - Failed   | Calculator > fails on overflow     |      0.02s
///
/// FAIL
/// 1 passed, 1 failed, 0 skipped, 0 pending (0.03s)
/// ```
pub fn print_summary(summary: &RunSummary, locale: &str) {
    println!("\n{}", t!("report.summary_banner", locale = locale).bold());

    for result in &summary.results {
        let status_str = status_str(&result.status, locale);
        let status_colored = match &result.status {
            TestStatus::Passed => status_str.green(),
            TestStatus::Failed(_) => status_str.red(),
            TestStatus::Skipped => status_str.dimmed(),
            TestStatus::Pending => status_str.yellow(),
        };
        let duration_str = result
            .duration
            .map(|d| format!("{:.2?}", d))
            .unwrap_or_else(|| "N/A".to_string());

        println!(
            "  - {:<10} | {:<50} | {:>10}",
            status_colored, result.description, duration_str
        );
    }

    println!();
    if summary.is_success() {
        println!("{}", t!("report.result_pass", locale = locale).green().bold());
    } else {
        println!("{}", t!("report.result_fail", locale = locale).red().bold());
    }
    println!(
        "{}",
        t!(
            "report.totals",
            locale = locale,
            passed = summary.passed(),
            failed = summary.failed(),
            skipped = summary.skipped(),
            pending = summary.pending(),
            duration = format!("{:.2?}", summary.duration)
        )
    );
    if summary.hook_failures > 0 {
        println!(
            "{}",
            t!(
                "report.hook_failures",
                locale = locale,
                count = summary.hook_failures
            )
            .red()
        );
    }

    let failures: Vec<_> = summary.results.iter().filter(|r| r.is_failure()).collect();
    if !failures.is_empty() {
        println!("\n{}", t!("report.failure_banner", locale = locale).red());
        for (i, result) in failures.iter().enumerate() {
            let message = result
                .failure()
                .map(|f| f.message.as_str())
                .unwrap_or_default();
            println!("  {}. {}: {}", i + 1, result.description, message);
        }
    }
}

fn status_str(status: &TestStatus, locale: &str) -> String {
    match status {
        TestStatus::Passed => t!("report.status_passed", locale = locale).to_string(),
        TestStatus::Failed(_) => t!("report.status_failed", locale = locale).to_string(),
        TestStatus::Skipped => t!("report.status_skipped", locale = locale).to_string(),
        TestStatus::Pending => t!("report.status_pending", locale = locale).to_string(),
    }
}
