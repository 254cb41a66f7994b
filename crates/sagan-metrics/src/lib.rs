//! # Sagan Metrics
//!
//! Observability for the sagan tools:
//!
//! - **Counters**: buffers decoded, buffers malformed, decode issues per
//!   stage, and results parsed, reported through the [`metrics`] facade.
//! - **Structured logging**: text or JSON logs via [`tracing_setup`].
//!
//! No exporter is installed here. Without a recorder the `metrics` macros
//! are no-ops, while the totals kept in [`DecodeMetrics`] are always
//! available through [`DecodeMetrics::snapshot`].

use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use sagan_proto::{Message, Stage};
use sagan_result::DnsResult;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

pub mod tracing_setup;

/// Global metrics instance.
static METRICS: OnceCell<DecodeMetrics> = OnceCell::new();

/// Gets or initializes the global metrics instance.
pub fn metrics() -> &'static DecodeMetrics {
    METRICS.get_or_init(DecodeMetrics::new)
}

/// Decode metrics.
pub struct DecodeMetrics {
    start_time: Instant,
    buffers_total: AtomicU64,
    malformed_total: AtomicU64,
    issues_total: AtomicU64,
    results_total: AtomicU64,
    result_errors_total: AtomicU64,
}

/// Totals at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Buffers decoded.
    pub buffers: u64,
    /// Buffers with at least one decode issue.
    pub malformed: u64,
    /// Decode issues over all buffers.
    pub issues: u64,
    /// Measurement results parsed.
    pub results: u64,
    /// Measurement results that reported an error.
    pub result_errors: u64,
}

impl DecodeMetrics {
    /// Creates a new metrics instance.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            buffers_total: AtomicU64::new(0),
            malformed_total: AtomicU64::new(0),
            issues_total: AtomicU64::new(0),
            results_total: AtomicU64::new(0),
            result_errors_total: AtomicU64::new(0),
        }
    }

    /// Returns the time since the metrics were created.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    // =========================================================================
    // Buffer metrics
    // =========================================================================

    /// Records a decoded buffer and the issues found in it.
    pub fn record_message(&self, message: &Message) {
        self.buffers_total.fetch_add(1, Ordering::Relaxed);
        counter!("sagan_buffers_total").increment(1);

        if message.is_malformed() {
            self.malformed_total.fetch_add(1, Ordering::Relaxed);
            counter!("sagan_buffers_malformed_total").increment(1);
        }

        for issue in &message.errors {
            self.record_issue(issue.stage);
        }

        if let Some(rcode) = message.rcode() {
            counter!("sagan_rcodes_total", "rcode" => rcode.to_string()).increment(1);
        }
    }

    /// Records one decode issue.
    pub fn record_issue(&self, stage: Stage) {
        self.issues_total.fetch_add(1, Ordering::Relaxed);
        counter!("sagan_decode_issues_total", "stage" => stage.as_str()).increment(1);
    }

    /// Records decode latency.
    pub fn record_latency(&self, duration: Duration) {
        histogram!("sagan_decode_duration_seconds").record(duration.as_secs_f64());
    }

    // =========================================================================
    // Result metrics
    // =========================================================================

    /// Records a parsed measurement result.
    pub fn record_result(&self, result: &DnsResult) {
        self.results_total.fetch_add(1, Ordering::Relaxed);
        counter!("sagan_results_total").increment(1);

        if result.is_error() {
            self.result_errors_total.fetch_add(1, Ordering::Relaxed);
            counter!("sagan_result_errors_total").increment(1);
        }
        if result.is_malformed() {
            counter!("sagan_results_malformed_total").increment(1);
        }
    }

    /// Records a line that could not be parsed as a result at all.
    pub fn record_rejected(&self, reason: &str) {
        counter!("sagan_results_rejected_total", "reason" => reason.to_string()).increment(1);
    }

    /// Returns the current totals.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            buffers: self.buffers_total.load(Ordering::Relaxed),
            malformed: self.malformed_total.load(Ordering::Relaxed),
            issues: self.issues_total.load(Ordering::Relaxed),
            results: self.results_total.load(Ordering::Relaxed),
            result_errors: self.result_errors_total.load(Ordering::Relaxed),
        }
    }
}

impl Default for DecodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode timing helper.
pub struct DecodeTimer {
    start: Instant,
}

impl DecodeTimer {
    /// Starts a new timer.
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    /// Returns the elapsed duration.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Finishes timing and records the latency.
    pub fn finish(self) {
        metrics().record_latency(self.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sagan_result::ParseOptions;

    #[test]
    fn test_record_clean_message() {
        let metrics = DecodeMetrics::new();
        let message = Message::parse("PdCEAAABAAEAAAAABWFzMjUwA25ldAAAAQABwAwAAQABAAAOEAAEwpaooA==").unwrap();
        metrics.record_message(&message);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.buffers, 1);
        assert_eq!(snapshot.malformed, 0);
        assert_eq!(snapshot.issues, 0);
    }

    #[test]
    fn test_record_truncated_message() {
        let metrics = DecodeMetrics::new();
        let message = Message::parse("PdCEAAABAAEAAAAABWFzMjUwA25ldAAAAQABwAwAAQAB").unwrap();
        metrics.record_message(&message);
        metrics.record_message(&message);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.buffers, 2);
        assert_eq!(snapshot.malformed, 2);
        assert_eq!(snapshot.issues, 2);
    }

    #[test]
    fn test_record_result() {
        let metrics = DecodeMetrics::new();
        let json = r#"{"fw": 4700, "msm_id": 1, "prb_id": 2, "timestamp": 1443691516, "type": "dns",
            "error": {"timeout": 5000}}"#;
        let result = DnsResult::from_json(json, ParseOptions::default()).unwrap();
        metrics.record_result(&result);

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                results: 1,
                result_errors: 1,
                ..MetricsSnapshot::default()
            }
        );
    }

    #[test]
    fn test_global_instance() {
        assert!(std::ptr::eq(metrics(), metrics()));
        let timer = DecodeTimer::start();
        timer.finish();
    }
}
