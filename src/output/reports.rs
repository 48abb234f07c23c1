//! Report rendering
//!
//! Text layout of an [`AnalysisReport`] for console and file sinks. Timing and
//! percentage fields use two decimals; this is presentation, not a wire
//! format (use the JSON form for machine consumption).

use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

use crate::stats::AnalysisReport;
use crate::version::version_to_date_string;

const SEPARATOR_WIDTH: usize = 60;

/// Format a compact two-column table using prettytable-rs clean format
pub fn format_compact_table(rows: &[(String, String)]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    for (label, value) in rows {
        table.add_row(Row::new(vec![Cell::new(label), Cell::new(value)]));
    }

    // 2-space indent under each section heading
    let mut result = String::new();
    for line in table.to_string().lines() {
        result.push_str("  ");
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

fn ms(value: f64) -> String {
    format!("{:.2} ms", value)
}

fn check(passed: bool, colours: bool) -> String {
    let text = if passed { "✓ PASS" } else { "✗ FAIL" };
    match (colours, passed) {
        (false, _) => text.to_string(),
        (true, true) => text.green().to_string(),
        (true, false) => text.red().bold().to_string(),
    }
}

fn row(label: &str, value: impl Into<String>) -> (String, String) {
    (label.to_string(), value.into())
}

/// Render the report as sectioned text
pub fn render_text(report: &AnalysisReport, colours: bool) -> String {
    let separator = "=".repeat(SEPARATOR_WIDTH);
    let mut out = String::new();

    out.push_str(&separator);
    out.push('\n');
    out.push_str("PERFORMANCE ANALYSIS RESULTS\n");
    out.push_str(&format!("Implementation: {} ({})\n", report.strategy, report.mechanism));
    out.push_str(&format!("Run: {}\n", report.run_id));
    out.push_str(&format!("Timestamp: {}\n", report.generated_at.format("%Y-%m-%d %H:%M:%S")));
    let schema = version_to_date_string(report.schema_version).unwrap_or_else(|| report.schema_version.to_string());
    out.push_str(&format!("Report Schema: {}\n", schema));
    out.push_str(&separator);
    out.push('\n');

    let counts = &report.counts;
    out.push_str("\n--- Basic Statistics ---\n");
    out.push_str(&format_compact_table(&[
        row("Queue Capacity:", counts.capacity.to_string()),
        row("Items Produced:", counts.items_produced.to_string()),
        row("Items Consumed:", counts.items_consumed.to_string()),
        row("Items Skipped:", counts.items_skipped.to_string()),
        row("Source Container Size:", counts.source_size.to_string()),
        row("Destination Container Size:", counts.destination_size.to_string()),
        row("Max Queue Size Reached:", counts.max_queue_depth.to_string()),
    ]));

    let timing = &report.timing;
    let mut timing_rows = Vec::new();
    if let Some(total) = timing.total_time_ms {
        timing_rows.push(row("Total Execution Time:", ms(total)));
    }
    if let Some(average) = timing.average_time_per_item_ms {
        timing_rows.push(row("Average Time per Item:", ms(average)));
    }
    timing_rows.push(row("Total Producer Wait Time:", ms(timing.producer_wait_ms)));
    timing_rows.push(row("Total Consumer Wait Time:", ms(timing.consumer_wait_ms)));
    if let Some(average) = timing.average_producer_wait_ms {
        timing_rows.push(row("Average Producer Wait per Item:", ms(average)));
    }
    if let Some(average) = timing.average_consumer_wait_ms {
        timing_rows.push(row("Average Consumer Wait per Item:", ms(average)));
    }
    out.push_str("\n--- Timing Analysis ---\n");
    out.push_str(&format_compact_table(&timing_rows));

    out.push_str("\n--- Queue Utilization ---\n");
    out.push_str(&format_compact_table(&[
        row("Queue Utilization Rate:", format!("{:.2}%", report.utilization.utilization_rate)),
        row("Queue Efficiency:", report.utilization.efficiency.to_string()),
    ]));

    let integrity = &report.integrity;
    out.push_str("\n--- Data Integrity Analysis ---\n");
    out.push_str(&format_compact_table(&[
        row("Data Match:", check(integrity.data_match, colours)),
        row("Count Match:", check(integrity.count_match, colours)),
        row("No Data Loss:", check(integrity.no_loss, colours)),
    ]));

    let sync = &report.synchronization;
    let balance = if sync.balanced { "✓ Balanced" } else { "⚠ Imbalanced" };
    let blocking = if sync.blocking_observed {
        "✓ Working (threads blocked when needed)"
    } else {
        "⚠ No blocking detected"
    };
    out.push_str("\n--- Thread Synchronization Analysis ---\n");
    out.push_str(&format_compact_table(&[
        row("Producer-Consumer Balance:", balance),
        row("Mechanism:", report.mechanism.clone()),
        row("Blocking Behavior:", blocking),
    ]));

    out.push('\n');
    out.push_str(&separator);
    out.push('\n');
    out
}
