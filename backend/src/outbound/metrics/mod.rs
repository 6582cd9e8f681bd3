//! Prometheus-backed implementations of domain metrics ports.
//!
//! Only compiled with the `metrics` feature.

mod prometheus_cache;

pub use prometheus_cache::PrometheusIsochroneCacheMetrics;
