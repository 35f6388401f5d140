//! Prometheus metrics.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use lazy_static::lazy_static;
use prometheus::{IntCounterVec, Opts};

lazy_static! {
    /// Code host calls, by API operation.
    pub static ref GITHUB_API_CALLS: IntCounterVec = IntCounterVec::new(
        Opts::new("github_api_calls", "GitHub API calls"),
        &["call"]
    )
    .unwrap();

    /// Webhook deliveries handed to a handler, by event type.
    pub static ref WEBHOOK_EVENTS: IntCounterVec = IntCounterVec::new(
        Opts::new("webhook_events", "Handled webhook events"),
        &["event"]
    )
    .unwrap();
}

pub(crate) fn build_metrics_handler() -> PrometheusMetrics {
    let metrics = PrometheusMetricsBuilder::new("launchpad")
        .endpoint("/metrics")
        .build()
        .unwrap();

    let registry = &metrics.registry;
    registry
        .register(Box::new(GITHUB_API_CALLS.clone()))
        .unwrap();
    registry.register(Box::new(WEBHOOK_EVENTS.clone())).unwrap();

    #[cfg(unix)]
    registry
        .register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))
        .unwrap();

    metrics
}
