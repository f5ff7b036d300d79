//! Prometheus metrics & middleware helper.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use once_cell::sync::Lazy;

/// Global Prometheus handle; every `App` built by `main` wraps this one.
pub static METRICS: Lazy<PrometheusMetrics> = Lazy::new(|| {
    PrometheusMetricsBuilder::new("sungbok")
        .endpoint("/metrics")
        .build()
        .expect("metrics builder")
});
