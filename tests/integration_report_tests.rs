//! # Report Output Integration Tests / 报告输出集成测试
//!
//! Runs a small tree through the shipped reporters and checks the JSON
//! artifact written for CI consumption.

mod common;

use common::RecordingReporter;
use spec_runner::core::config::RunConfig;
use spec_runner::core::execution::Runner;
use spec_runner::core::models::RunSummary;
use spec_runner::dsl::define_tests;
use spec_runner::reporting::json::write_json_report;
use spec_runner::reporting::{ConsoleReporter, print_summary};

async fn sample_summary() -> RunSummary {
    let tree = define_tests("reports", |ctx| {
        ctx.describe("suite", |ctx| {
            ctx.it("passes", || {});
            ctx.it("fails", || panic!("broken"));
            ctx.xit("skipped", || {});
            ctx.pending("pending");
        });
    })
    .unwrap();

    let mut reporter = RecordingReporter::new();
    Runner::new(RunConfig::default())
        .unwrap()
        .run(&tree, &mut reporter)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_json_report_round_trips_counts_and_results() {
    let summary = sample_summary().await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    write_json_report(&summary, &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();

    assert_eq!(value["passed"], 1);
    assert_eq!(value["failed"], 1);
    assert_eq!(value["skipped"], 1);
    assert_eq!(value["pending"], 1);
    assert_eq!(value["success"], false);
    assert!(value["generated_at"].is_string());

    let results = value["summary"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert_eq!(results[0]["description"], "suite > passes");
    assert_eq!(results[1]["status"]["Failed"]["reason"], "Panic");
}

#[tokio::test]
async fn test_json_report_write_failure_names_the_path() {
    let summary = sample_summary().await;

    let err = write_json_report(&summary, std::path::Path::new("/nonexistent/report.json"))
        .unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/report.json"));
}

#[tokio::test]
async fn test_console_reporter_tracks_depth_across_a_run() {
    let tree = define_tests("reports", |ctx| {
        ctx.describe("outer", |ctx| {
            ctx.it("passes", || {});
            ctx.when("nested", |ctx| {
                ctx.it("also passes", || {});
                ctx.pending("todo");
            });
        });
    })
    .unwrap();

    // Smoke test: a full run through the console reporter must complete
    // without underflowing its indentation depth.
    let mut reporter = ConsoleReporter::new("en");
    let summary = Runner::new(RunConfig::default())
        .unwrap()
        .run(&tree, &mut reporter)
        .await
        .unwrap();

    assert_eq!(summary.passed(), 2);
    assert_eq!(summary.pending(), 1);
}

#[tokio::test]
async fn test_print_summary_handles_both_locales() {
    let summary = sample_summary().await;

    // Localized formatting must not panic on either bundled locale.
    print_summary(&summary, "en");
    print_summary(&summary, "zh-CN");
}
