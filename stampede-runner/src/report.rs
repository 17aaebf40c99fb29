//! Run reports: JSON, a text table for the terminal and CSV

use crate::error::RunnerResult;
use crate::runner::StopReason;
use crate::stats::{EndpointStats, FailureStats, PERCENTILES};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

const NAME_WIDTH: usize = 40;

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub scenario: String,
    pub host: String,
    /// Users actually started
    pub users: u32,
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub stop_reason: StopReason,
    /// Weighted tasks executed across all users, setup requests excluded
    pub tasks_completed: u64,
    pub entries: Vec<EndpointStats>,
    pub aggregated: EndpointStats,
    pub failures: Vec<FailureStats>,
}

fn method_label(entry: &EndpointStats) -> String {
    entry
        .method
        .map(|m| m.to_string())
        .unwrap_or_default()
}

fn percentile_label(percentile: f64) -> String {
    format!("{}%", (percentile * 10_000.0).round() / 100.0)
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() <= NAME_WIDTH {
        name.to_string()
    } else {
        let head: String = name.chars().take(NAME_WIDTH - 3).collect();
        format!("{}...", head)
    }
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.aggregated.num_failures > 0
    }

    /// All entries followed by the aggregated one
    fn rows(&self) -> impl Iterator<Item = &EndpointStats> {
        self.entries.iter().chain(std::iter::once(&self.aggregated))
    }

    pub fn to_json(&self) -> RunnerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> RunnerResult<()> {
        std::fs::write(path, self.to_json()?)?;
        info!("JSON report written to {}", path.display());
        Ok(())
    }

    /// One row per entry plus the aggregated row, percentiles as columns
    pub fn write_csv(&self, path: &Path) -> RunnerResult<()> {
        let mut writer = csv::Writer::from_writer(File::create(path)?);

        let mut header: Vec<String> = [
            "Type",
            "Name",
            "Request Count",
            "Failure Count",
            "Median Response Time",
            "Average Response Time",
            "Min Response Time",
            "Max Response Time",
            "Average Content Size",
            "Requests/s",
            "Failures/s",
        ]
        .iter()
        .map(|h| h.to_string())
        .collect();
        header.extend(PERCENTILES.iter().map(|p| percentile_label(*p)));
        writer.write_record(&header)?;

        for entry in self.rows() {
            let mut record = vec![
                method_label(entry),
                entry.name.clone(),
                entry.num_requests.to_string(),
                entry.num_failures.to_string(),
                entry.median_response_time_ms.to_string(),
                format!("{:.2}", entry.avg_response_time_ms),
                format!("{:.2}", entry.min_response_time_ms),
                format!("{:.2}", entry.max_response_time_ms),
                format!("{:.2}", entry.avg_content_length),
                format!("{:.4}", entry.requests_per_sec),
                format!("{:.4}", entry.failures_per_sec),
            ];
            record.extend(
                entry
                    .percentiles
                    .iter()
                    .map(|p| p.response_time_ms.to_string()),
            );
            writer.write_record(&record)?;
        }

        writer.flush()?;
        info!("CSV report written to {}", path.display());
        Ok(())
    }

    /// Plain-text tables: request stats, response time percentiles and failures
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let rule = "-".repeat(NAME_WIDTH + 100);

        let _ = writeln!(
            out,
            "{:<8} {:<width$} {:>8} {:>14} | {:>8} {:>8} {:>8} {:>8} | {:>8} {:>11}",
            "Type",
            "Name",
            "# reqs",
            "# fails",
            "Avg",
            "Min",
            "Max",
            "Med",
            "req/s",
            "failures/s",
            width = NAME_WIDTH
        );
        let _ = writeln!(out, "{}", rule);
        for entry in self.rows() {
            if entry.method.is_none() {
                let _ = writeln!(out, "{}", rule);
            }
            let fails = format!(
                "{}({:.2}%)",
                entry.num_failures,
                entry.failure_ratio() * 100.0
            );
            let _ = writeln!(
                out,
                "{:<8} {:<width$} {:>8} {:>14} | {:>8.0} {:>8.0} {:>8.0} {:>8} | {:>8.2} {:>11.2}",
                method_label(entry),
                truncate_name(&entry.name),
                entry.num_requests,
                fails,
                entry.avg_response_time_ms,
                entry.min_response_time_ms,
                entry.max_response_time_ms,
                entry.median_response_time_ms,
                entry.requests_per_sec,
                entry.failures_per_sec,
                width = NAME_WIDTH
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Response time percentiles (ms)");
        let _ = write!(out, "{:<8} {:<width$}", "Type", "Name", width = NAME_WIDTH);
        for p in PERCENTILES {
            let _ = write!(out, " {:>7}", percentile_label(p));
        }
        let _ = writeln!(out, " {:>8}", "# reqs");
        let _ = writeln!(out, "{}", rule);
        for entry in self.rows() {
            if entry.method.is_none() {
                let _ = writeln!(out, "{}", rule);
            }
            let _ = write!(
                out,
                "{:<8} {:<width$}",
                method_label(entry),
                truncate_name(&entry.name),
                width = NAME_WIDTH
            );
            for p in &entry.percentiles {
                let _ = write!(out, " {:>7}", p.response_time_ms);
            }
            let _ = writeln!(out, " {:>8}", entry.num_requests);
        }

        if !self.failures.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Error report");
            let _ = writeln!(out, "{:>13}  {}", "# occurrences", "Error");
            let _ = writeln!(out, "{}", rule);
            for failure in &self.failures {
                let _ = writeln!(
                    out,
                    "{:>13}  {} {}: {}",
                    failure.occurrences, failure.method, failure.name, failure.error
                );
            }
        }

        out
    }
}
