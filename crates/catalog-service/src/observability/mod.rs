//! Observability support: Prometheus metrics.

pub mod metrics;

pub use metrics::{init_metrics_recorder, record_http_request};
