//! Prometheus metrics for monitoring
//!
//! Exposes metrics for:
//! - Gas simulations and the adjusted gas they produce
//! - Broadcasts and early exits (dry run, generate only)
//! - Failures by pipeline stage and error kind

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

lazy_static! {
    pub static ref SIMULATIONS: CounterVec = register_counter_vec!(
        "txprep_simulations_total",
        "Total gas simulations run",
        &[]
    ).unwrap();

    pub static ref ADJUSTED_GAS: HistogramVec = register_histogram_vec!(
        "txprep_adjusted_gas",
        "Gas limit after applying the adjustment factor",
        &[],
        vec![50_000.0, 100_000.0, 200_000.0, 400_000.0, 800_000.0, 1_600_000.0, 3_200_000.0]
    ).unwrap();

    pub static ref TX_BROADCAST: CounterVec = register_counter_vec!(
        "txprep_transactions_broadcast_total",
        "Total signed transactions accepted by the node",
        &[]
    ).unwrap();

    pub static ref EARLY_EXITS: CounterVec = register_counter_vec!(
        "txprep_early_exits_total",
        "Preparations that stopped before signing",
        &["mode"]
    ).unwrap();

    pub static ref FAILURES: CounterVec = register_counter_vec!(
        "txprep_failures_total",
        "Failed preparations by stage and error kind",
        &["stage", "kind"]
    ).unwrap();
}

/// Render all registered metrics in the Prometheus text format
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

// Helper functions to record metrics

pub fn record_simulation(adjusted_gas: u64) {
    SIMULATIONS.with_label_values(&[]).inc();
    ADJUSTED_GAS
        .with_label_values(&[])
        .observe(adjusted_gas as f64);
}

pub fn record_broadcast() {
    TX_BROADCAST.with_label_values(&[]).inc();
}

pub fn record_dry_run() {
    EARLY_EXITS.with_label_values(&["dry_run"]).inc();
}

pub fn record_generate_only() {
    EARLY_EXITS.with_label_values(&["generate_only"]).inc();
}

pub fn record_failure(stage: &str, kind: &str) {
    FAILURES.with_label_values(&[stage, kind]).inc();
}
