//! Result store reporting

use colored::Colorize;
use tabled::{Table, Tabled};

use rebound_core::application::{ResultSummary, StatusCounts};
use rebound_core::domain::{IterationRecord, Status};

/// Longest log excerpt shown in a table cell
const EXCERPT_WIDTH: usize = 48;

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "#")]
    iteration: i64,
    scenario: String,
    status: String,
    local: String,
    remote: String,
    #[tabled(rename = "local up")]
    local_up: bool,
    #[tabled(rename = "remote up")]
    remote_up: bool,
    log: String,
}

impl From<&IterationRecord> for RecordRow {
    fn from(record: &IterationRecord) -> Self {
        Self {
            iteration: record.iteration,
            scenario: record.scenario.to_string(),
            status: record.status.to_string(),
            local: record.local_address.clone(),
            remote: record.remote_address.clone(),
            local_up: record.reachability.local_up,
            remote_up: record.reachability.remote_up,
            log: excerpt_cell(record),
        }
    }
}

/// Log column text; sentinels are bracketed so they read as notes, not device output
fn excerpt_cell(record: &IterationRecord) -> String {
    let line = record
        .log_excerpt
        .as_deref()
        .map(first_line)
        .unwrap_or_default();
    if record.has_sentinel_excerpt() {
        format!("[{}]", line)
    } else {
        line
    }
}

/// First excerpt line, shortened to fit the table
fn first_line(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > EXCERPT_WIDTH {
        let cut: String = line.chars().take(EXCERPT_WIDTH - 1).collect();
        format!("{}…", cut)
    } else {
        line.to_string()
    }
}

fn colored_status(status: Status) -> colored::ColoredString {
    match status {
        Status::Pass => status.to_string().green().bold(),
        Status::Partial => status.to_string().yellow().bold(),
        Status::Fail => status.to_string().red().bold(),
    }
}

fn counts_line(label: &str, counts: &StatusCounts) -> String {
    format!(
        "  {:<12} {} total, {} {}, {} {}, {} {} ({:.1}% pass)",
        label.bold(),
        counts.total(),
        counts.pass,
        colored_status(Status::Pass),
        counts.partial,
        colored_status(Status::Partial),
        counts.fail,
        colored_status(Status::Fail),
        counts.pass_rate() * 100.0
    )
}

/// Print the record table followed by the summary
pub fn print_report(location: &str, records: &[IterationRecord]) {
    println!("{} {}", "Results:".cyan().bold(), location);
    println!();

    if records.is_empty() {
        println!("{}", "No iterations recorded".yellow());
        return;
    }

    let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();
    println!("{}", Table::new(rows));
    println!();

    let summary = ResultSummary::from_records(records);
    println!("{}", counts_line("overall", &summary.overall));
    for (scenario, counts) in &summary.by_scenario {
        println!("{}", counts_line(&scenario.to_string(), counts));
    }
}

/// One-line outcome printed after each iteration
pub fn print_iteration(record: &IterationRecord) {
    println!(
        "  {} iteration {} ({}) local={} remote={}",
        colored_status(record.status),
        record.iteration,
        record.scenario,
        record.reachability.local_up,
        record.reachability.remote_up
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rebound_core::domain::{Reachability, Scenario, SKIPPED_SENTINEL};

    #[test]
    fn test_first_line_truncates() {
        assert_eq!(first_line("short\nsecond"), "short");

        let long = "x".repeat(100);
        let shown = first_line(&long);
        assert_eq!(shown.chars().count(), EXCERPT_WIDTH);
        assert!(shown.ends_with('…'));
    }

    fn record(local_up: bool, excerpt: Option<&str>) -> IterationRecord {
        IterationRecord {
            iteration: 1,
            scenario: Scenario::Reboot,
            status: if local_up { Status::Pass } else { Status::Fail },
            local_address: "192.168.1.56".to_string(),
            remote_address: "192.168.1.15".to_string(),
            reachability: Reachability {
                local_up,
                remote_up: local_up,
            },
            log_excerpt: excerpt.map(str::to_string),
            recorded_at_ms: 0,
        }
    }

    #[test]
    fn test_sentinel_excerpts_are_bracketed() {
        assert_eq!(
            excerpt_cell(&record(false, Some(SKIPPED_SENTINEL))),
            format!("[{}]", SKIPPED_SENTINEL)
        );
        assert_eq!(
            excerpt_cell(&record(true, Some("09:59:57 Device Init, Success\nmore"))),
            "09:59:57 Device Init, Success"
        );
        assert_eq!(excerpt_cell(&record(true, None)), "");
    }
}
