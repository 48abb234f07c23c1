//! Report Sink Tests
//!
//! File output of run reports in text and JSON-lines form.

use std::fs;
use tempfile::TempDir;

use prodcon::output::{FileSink, MultiSink, ReportFormat};
use prodcon::{Pipeline, QueueStrategy};

#[test]
fn test_text_file_sink_appends_reports() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("producer_consumer_results.txt");

    let mut pipeline = Pipeline::with_strategy(5, QueueStrategy::ConditionGated)
        .unwrap()
        .with_sink(Box::new(FileSink::new(&path, ReportFormat::Text)));
    pipeline.run(20).unwrap();
    pipeline.run(1).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written.matches("PERFORMANCE ANALYSIS RESULTS").count(), 2);
    assert!(written.contains("condition-gated"));
    assert!(written.contains("Data Match:"));
    assert!(written.contains("✓ PASS"));
    assert!(!written.contains('\u{1b}'), "file output must not contain colour codes");
}

#[test]
fn test_json_file_sink_writes_one_line_per_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.jsonl");

    let mut pipeline = Pipeline::new(3)
        .unwrap()
        .with_sink(Box::new(FileSink::new(&path, ReportFormat::Json)));
    let first = pipeline.run(4).unwrap();
    let second = pipeline.run(0).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> = written
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);

    assert_eq!(lines[0]["run_id"], first.run_id.to_string());
    assert_eq!(lines[0]["strategy"], "native-blocking");
    assert_eq!(lines[0]["counts"]["items_consumed"], 4);
    assert_eq!(lines[0]["integrity"]["data_match"], true);

    assert_eq!(lines[1]["run_id"], second.run_id.to_string());
    assert!(lines[1]["timing"]["average_time_per_item_ms"].is_null());
    assert_eq!(lines[1]["schema_version"], prodcon::version::report_schema_version());
}

#[test]
fn test_file_sink_creates_results_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results").join("nested").join("out.txt");

    let mut pipeline = Pipeline::new(2)
        .unwrap()
        .with_sink(Box::new(FileSink::new(&path, ReportFormat::Text)));
    pipeline.run(2).unwrap();

    assert!(path.exists());
}

#[test]
fn test_sink_failure_does_not_fail_run() {
    let dir = TempDir::new().unwrap();
    // A directory where the results file should be makes every write fail.
    let blocked = dir.path().join("blocked");
    fs::create_dir(&blocked).unwrap();

    let sink = FileSink::new(&blocked, ReportFormat::Text);
    let mut pipeline = Pipeline::new(2).unwrap().with_sink(Box::new(sink));

    let report = pipeline.run(3).unwrap();
    assert!(report.integrity_passed());
}

#[test]
fn test_multi_sink_reaches_every_file() {
    let dir = TempDir::new().unwrap();
    let text = dir.path().join("out.txt");
    let json = dir.path().join("out.jsonl");

    let sink = MultiSink::new()
        .push(Box::new(FileSink::new(&text, ReportFormat::Text)))
        .push(Box::new(FileSink::new(&json, ReportFormat::Json)));
    assert_eq!(sink.len(), 2);

    let mut pipeline = Pipeline::new(2).unwrap().with_sink(Box::new(sink));
    pipeline.run(3).unwrap();

    assert!(fs::read_to_string(&text).unwrap().contains("PERFORMANCE ANALYSIS RESULTS"));
    assert_eq!(fs::read_to_string(&json).unwrap().lines().count(), 1);
}
