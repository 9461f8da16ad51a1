//! Pipeline metrics
//!
//! Emitted through the `metrics` facade. This crate installs no recorder, so the
//! calls are no-ops unless the embedding process installs one.

use crate::pipeline::processing::MessageKind;

/// Builds metric names following the convention momo_{phase}_{metric_name}[_total]
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("momo_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("momo_", $phase, "_", $name)
    };
}

/// Metrics for the transform phase
pub struct TransformMetrics;

impl TransformMetrics {
    pub fn record_message_seen() {
        ::metrics::counter!(phase_metric!(counter, "transform", "messages_seen")).increment(1);
    }

    pub fn record_classified(kind: MessageKind) {
        ::metrics::counter!(
            phase_metric!(counter, "transform", "messages_classified"),
            "kind" => kind.as_str()
        )
        .increment(1);
    }

    pub fn record_skipped() {
        ::metrics::counter!(phase_metric!(counter, "transform", "messages_skipped")).increment(1);
    }

    pub fn record_run(entities: usize, duration_secs: f64) {
        ::metrics::counter!(phase_metric!(counter, "transform", "runs")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "transform", "entities_per_run"))
            .record(entities as f64);
        ::metrics::histogram!(phase_metric!(histogram, "transform", "duration_seconds"))
            .record(duration_secs);
    }
}

/// Metrics for reading the message source
pub struct IngestMetrics;

impl IngestMetrics {
    pub fn record_read(messages: usize) {
        ::metrics::counter!(phase_metric!(counter, "ingest", "reads")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "ingest", "messages_per_read"))
            .record(messages as f64);
    }

    pub fn record_read_error() {
        ::metrics::counter!(phase_metric!(counter, "ingest", "read_errors")).increment(1);
    }
}
