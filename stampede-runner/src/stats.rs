//! Request statistics
//!
//! Every finished request is recorded under its (method, name) entry. Response
//! times are kept as a histogram of rounded milliseconds so memory stays flat
//! no matter how long a run lasts; percentiles are read off that histogram.

use serde::Serialize;
use stampede_http::HttpMethod;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::Duration;

/// Percentiles reported for every entry
pub const PERCENTILES: [f64; 11] = [
    0.50, 0.66, 0.75, 0.80, 0.90, 0.95, 0.98, 0.99, 0.999, 0.9999, 1.0,
];

/// Name of the entry that sums up every request
pub const AGGREGATED_NAME: &str = "Aggregated";

/// The result of sending one request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    pub method: HttpMethod,
    pub name: String,
    pub response_time: Duration,
    /// 0 when no response arrived
    pub status: u16,
    pub content_length: usize,
    /// Failure message, `None` on success
    pub failure: Option<String>,
}

impl RequestOutcome {
    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

/// Round a response time the way it is bucketed in the histogram
///
/// Exact below 100 ms, then to the nearest 10 ms below 1 s, 100 ms below
/// 10 s and 1 s above that.
pub fn bucket_response_time(ms: u64) -> u64 {
    let step = match ms {
        0..=99 => return ms,
        100..=999 => 10,
        1_000..=9_999 => 100,
        _ => 1_000,
    };
    ((ms + step / 2) / step) * step
}

/// Accumulated counters for one entry
#[derive(Debug, Clone, Default)]
struct StatsEntry {
    num_requests: u64,
    num_failures: u64,
    total_response_time_ms: f64,
    min_response_time_ms: Option<f64>,
    max_response_time_ms: f64,
    total_content_length: u64,
    response_times: BTreeMap<u64, u64>,
}

impl StatsEntry {
    fn record(&mut self, response_time_ms: f64, content_length: usize, failed: bool) {
        self.num_requests += 1;
        if failed {
            self.num_failures += 1;
        }

        self.total_response_time_ms += response_time_ms;
        self.min_response_time_ms = Some(match self.min_response_time_ms {
            Some(min) => min.min(response_time_ms),
            None => response_time_ms,
        });
        self.max_response_time_ms = self.max_response_time_ms.max(response_time_ms);
        self.total_content_length += content_length as u64;

        let bucket = bucket_response_time(response_time_ms.round() as u64);
        *self.response_times.entry(bucket).or_insert(0) += 1;
    }

    fn merge(&mut self, other: &StatsEntry) {
        self.num_requests += other.num_requests;
        self.num_failures += other.num_failures;
        self.total_response_time_ms += other.total_response_time_ms;
        self.min_response_time_ms = match (self.min_response_time_ms, other.min_response_time_ms) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max_response_time_ms = self.max_response_time_ms.max(other.max_response_time_ms);
        self.total_content_length += other.total_content_length;
        for (bucket, count) in &other.response_times {
            *self.response_times.entry(*bucket).or_insert(0) += count;
        }
    }

    /// Smallest bucket at or below which `percent` of the requests fall
    fn percentile(&self, percent: f64) -> u64 {
        if self.num_requests == 0 {
            return 0;
        }

        let target = ((self.num_requests as f64) * percent).ceil().max(1.0) as u64;
        let mut seen = 0;
        for (bucket, count) in &self.response_times {
            seen += count;
            if seen >= target {
                return *bucket;
            }
        }
        self.response_times.keys().next_back().copied().unwrap_or(0)
    }

    fn snapshot(&self, method: Option<HttpMethod>, name: &str, elapsed: Duration) -> EndpointStats {
        let secs = elapsed.as_secs_f64();
        let per_sec = |count: u64| if secs > 0.0 { count as f64 / secs } else { 0.0 };
        let average = |total: f64| {
            if self.num_requests > 0 {
                total / self.num_requests as f64
            } else {
                0.0
            }
        };

        EndpointStats {
            method,
            name: name.to_string(),
            num_requests: self.num_requests,
            num_failures: self.num_failures,
            avg_response_time_ms: average(self.total_response_time_ms),
            min_response_time_ms: self.min_response_time_ms.unwrap_or(0.0),
            max_response_time_ms: self.max_response_time_ms,
            median_response_time_ms: self.percentile(0.5),
            avg_content_length: average(self.total_content_length as f64),
            requests_per_sec: per_sec(self.num_requests),
            failures_per_sec: per_sec(self.num_failures),
            percentiles: PERCENTILES
                .iter()
                .map(|p| Percentile {
                    percentile: *p,
                    response_time_ms: self.percentile(*p),
                })
                .collect(),
        }
    }
}

/// One percentile of an entry's response time distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Percentile {
    pub percentile: f64,
    pub response_time_ms: u64,
}

/// Point-in-time statistics for one entry (or the aggregate)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointStats {
    /// `None` for the aggregated entry
    pub method: Option<HttpMethod>,
    pub name: String,
    pub num_requests: u64,
    pub num_failures: u64,
    pub avg_response_time_ms: f64,
    pub min_response_time_ms: f64,
    pub max_response_time_ms: f64,
    pub median_response_time_ms: u64,
    pub avg_content_length: f64,
    pub requests_per_sec: f64,
    pub failures_per_sec: f64,
    pub percentiles: Vec<Percentile>,
}

impl EndpointStats {
    pub fn failure_ratio(&self) -> f64 {
        if self.num_requests == 0 {
            0.0
        } else {
            self.num_failures as f64 / self.num_requests as f64
        }
    }

    pub fn percentile(&self, percent: f64) -> Option<u64> {
        self.percentiles
            .iter()
            .find(|p| (p.percentile - percent).abs() < f64::EPSILON)
            .map(|p| p.response_time_ms)
    }
}

/// How often one failure message occurred for one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureStats {
    pub method: HttpMethod,
    pub name: String,
    pub error: String,
    pub occurrences: u64,
}

/// Everything recorded so far
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub entries: Vec<EndpointStats>,
    pub aggregated: EndpointStats,
    pub failures: Vec<FailureStats>,
}

impl StatsSnapshot {
    pub fn entry(&self, method: HttpMethod, name: &str) -> Option<&EndpointStats> {
        self.entries
            .iter()
            .find(|e| e.method == Some(method) && e.name == name)
    }
}

#[derive(Debug, Default)]
struct StatsInner {
    entries: BTreeMap<(String, HttpMethod), StatsEntry>,
    failures: HashMap<(HttpMethod, String, String), u64>,
}

/// Thread-safe collector shared by every simulated user
#[derive(Debug, Default)]
pub struct StatsCollector {
    inner: Mutex<StatsInner>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, outcome: &RequestOutcome) {
        let response_time_ms = outcome.response_time.as_nanos() as f64 / 1_000_000.0;
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        inner
            .entries
            .entry((outcome.name.clone(), outcome.method))
            .or_default()
            .record(response_time_ms, outcome.content_length, outcome.is_failure());

        if let Some(error) = &outcome.failure {
            *inner
                .failures
                .entry((outcome.method, outcome.name.clone(), error.clone()))
                .or_insert(0) += 1;
        }
    }

    pub fn total_requests(&self) -> u64 {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.values().map(|e| e.num_requests).sum()
    }

    /// Statistics so far, with rates computed over `elapsed`
    pub fn snapshot(&self, elapsed: Duration) -> StatsSnapshot {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        let mut total = StatsEntry::default();
        let entries = inner
            .entries
            .iter()
            .map(|((name, method), entry)| {
                total.merge(entry);
                entry.snapshot(Some(*method), name, elapsed)
            })
            .collect();

        let mut failures: Vec<FailureStats> = inner
            .failures
            .iter()
            .map(|((method, name, error), occurrences)| FailureStats {
                method: *method,
                name: name.clone(),
                error: error.clone(),
                occurrences: *occurrences,
            })
            .collect();
        failures.sort_by(|a, b| {
            b.occurrences
                .cmp(&a.occurrences)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.error.cmp(&b.error))
        });

        StatsSnapshot {
            entries,
            aggregated: total.snapshot(None, AGGREGATED_NAME, elapsed),
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(method: HttpMethod, name: &str, ms: u64, failure: Option<&str>) -> RequestOutcome {
        RequestOutcome {
            method,
            name: name.to_string(),
            response_time: Duration::from_millis(ms),
            status: if failure.is_some() { 500 } else { 200 },
            content_length: 100,
            failure: failure.map(str::to_string),
        }
    }

    #[test]
    fn test_bucket_response_time() {
        assert_eq!(bucket_response_time(0), 0);
        assert_eq!(bucket_response_time(99), 99);
        assert_eq!(bucket_response_time(147), 150);
        assert_eq!(bucket_response_time(144), 140);
        assert_eq!(bucket_response_time(3_432), 3_400);
        assert_eq!(bucket_response_time(3_456), 3_500);
        assert_eq!(bucket_response_time(58_760), 59_000);
    }

    #[test]
    fn test_entries_are_keyed_by_method_and_name() {
        let stats = StatsCollector::new();
        stats.record(&outcome(HttpMethod::Get, "/albums", 10, None));
        stats.record(&outcome(HttpMethod::Get, "/albums", 30, None));
        stats.record(&outcome(HttpMethod::Post, "/albums", 50, Some("Unexpected status: 500")));

        let snapshot = stats.snapshot(Duration::from_secs(2));
        assert_eq!(snapshot.entries.len(), 2);

        let get = snapshot.entry(HttpMethod::Get, "/albums").unwrap();
        assert_eq!(get.num_requests, 2);
        assert_eq!(get.num_failures, 0);
        assert_eq!(get.avg_response_time_ms, 20.0);
        assert_eq!(get.min_response_time_ms, 10.0);
        assert_eq!(get.max_response_time_ms, 30.0);
        assert_eq!(get.requests_per_sec, 1.0);
        assert_eq!(get.avg_content_length, 100.0);

        let post = snapshot.entry(HttpMethod::Post, "/albums").unwrap();
        assert_eq!(post.num_failures, 1);
        assert_eq!(post.failure_ratio(), 1.0);
        assert_eq!(post.failures_per_sec, 0.5);
    }

    #[test]
    fn test_aggregated_entry_sums_everything() {
        let stats = StatsCollector::new();
        stats.record(&outcome(HttpMethod::Get, "/a", 5, None));
        stats.record(&outcome(HttpMethod::Get, "/b", 15, Some("boom")));
        stats.record(&outcome(HttpMethod::Post, "/c", 40, None));

        let aggregated = stats.snapshot(Duration::from_secs(1)).aggregated;
        assert_eq!(aggregated.method, None);
        assert_eq!(aggregated.name, AGGREGATED_NAME);
        assert_eq!(aggregated.num_requests, 3);
        assert_eq!(aggregated.num_failures, 1);
        assert_eq!(aggregated.min_response_time_ms, 5.0);
        assert_eq!(aggregated.max_response_time_ms, 40.0);
        assert_eq!(aggregated.median_response_time_ms, 15);
        assert_eq!(stats.total_requests(), 3);
    }

    #[test]
    fn test_percentiles() {
        let stats = StatsCollector::new();
        for ms in 1..=100 {
            stats.record(&outcome(HttpMethod::Get, "/health", ms, None));
        }

        let snapshot = stats.snapshot(Duration::from_secs(10));
        let health = snapshot.entry(HttpMethod::Get, "/health").unwrap();
        assert_eq!(health.median_response_time_ms, 50);
        assert_eq!(health.percentile(0.95), Some(95));
        assert_eq!(health.percentile(0.99), Some(99));
        // 100 ms lands in the rounded-to-10 range
        assert_eq!(health.percentile(1.0), Some(100));
        assert_eq!(health.percentile(0.42), None);
    }

    #[test]
    fn test_failures_are_counted_per_message() {
        let stats = StatsCollector::new();
        for _ in 0..3 {
            stats.record(&outcome(
                HttpMethod::Get,
                "GET /products/search",
                5,
                Some("Missing expected response fields"),
            ));
        }
        stats.record(&outcome(
            HttpMethod::Get,
            "GET /products/search",
            5,
            Some("Unexpected status: 503"),
        ));

        let failures = stats.snapshot(Duration::from_secs(1)).failures;
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].error, "Missing expected response fields");
        assert_eq!(failures[0].occurrences, 3);
        assert_eq!(failures[1].occurrences, 1);
    }

    #[test]
    fn test_empty_snapshot() {
        let stats = StatsCollector::new();
        let empty = stats.snapshot(Duration::ZERO);
        assert!(empty.entries.is_empty());
        assert_eq!(empty.aggregated.num_requests, 0);
        assert_eq!(empty.aggregated.requests_per_sec, 0.0);
        assert_eq!(empty.aggregated.median_response_time_ms, 0);
    }
}
