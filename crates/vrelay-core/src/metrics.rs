//! Orchestrator metrics.
//!
//! Recorded through the `metrics` facade; the API binary installs the
//! Prometheus recorder. Without a recorder these calls are no-ops.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const SPECIALIST_RUNS_TOTAL: &str = "vrelay_specialist_runs_total";
    pub const SPECIALIST_SKIPPED_TOTAL: &str = "vrelay_specialist_skipped_total";
    pub const SPECIALIST_FAILURES_TOTAL: &str = "vrelay_specialist_failures_total";
    pub const SPECIALIST_DURATION_SECONDS: &str = "vrelay_specialist_duration_seconds";
    pub const GATE_WAIT_SECONDS: &str = "vrelay_gate_wait_seconds";
    pub const PRIMARY_FAILURES_TOTAL: &str = "vrelay_primary_failures_total";
    pub const PREDICTIONS_FILTERED_TOTAL: &str = "vrelay_predictions_filtered_total";
}

/// Record a specialist run and why it was triggered.
pub fn record_specialist_run(reason: &'static str, duration_secs: f64) {
    counter!(names::SPECIALIST_RUNS_TOTAL, "reason" => reason).increment(1);
    histogram!(names::SPECIALIST_DURATION_SECONDS).record(duration_secs);
}

/// Record a request that did not need the specialist.
pub fn record_specialist_skipped() {
    counter!(names::SPECIALIST_SKIPPED_TOTAL).increment(1);
}

/// Record a failed specialist invocation.
pub fn record_specialist_failure(kind: &'static str) {
    counter!(names::SPECIALIST_FAILURES_TOTAL, "kind" => kind).increment(1);
}

/// Record time spent waiting for gate admission.
pub fn record_gate_wait(wait_secs: f64) {
    histogram!(names::GATE_WAIT_SECONDS).record(wait_secs);
}

/// Record a primary detector call that reported failure.
pub fn record_primary_failure() {
    counter!(names::PRIMARY_FAILURES_TOTAL).increment(1);
}

/// Record specialist predictions removed by the filter.
pub fn record_filtered(count: usize) {
    if count > 0 {
        counter!(names::PREDICTIONS_FILTERED_TOTAL).increment(count as u64);
    }
}
