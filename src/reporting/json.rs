//! # JSON Reporting Module / JSON 报告模块
//!
//! Writes the summary of a finished run to a machine-readable JSON file,
//! for consumption by CI pipelines or external dashboards.
//!
//! 将已完成运行的摘要写入机器可读的 JSON 文件，
//! 供 CI 流水线或外部仪表板使用。

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::core::models::RunSummary;

/// The document written to disk: headline counters, a generation timestamp
/// and the full per-test results.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    passed: usize,
    failed: usize,
    skipped: usize,
    pending: usize,
    success: bool,
    summary: &'a RunSummary,
}

/// Serializes a [`RunSummary`] as pretty-printed JSON at the given path.
///
/// 将 [`RunSummary`] 以格式化 JSON 的形式序列化到给定路径。
pub fn write_json_report(summary: &RunSummary, path: &Path) -> Result<()> {
    let report = JsonReport {
        generated_at: chrono::Local::now().to_rfc3339(),
        passed: summary.passed(),
        failed: summary.failed(),
        skipped: summary.skipped(),
        pending: summary.pending(),
        success: summary.is_success(),
        summary,
    };
    let content =
        serde_json::to_string_pretty(&report).context("Failed to serialize run summary")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write JSON report: {}", path.display()))?;
    Ok(())
}
