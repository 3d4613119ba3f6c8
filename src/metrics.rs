//! Prometheus metrics

use std::sync::LazyLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// HTTP request duration histogram
pub static HTTP_REQUEST_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
    )
    .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]);

    HistogramVec::new(opts, &["method", "route", "status"]).expect("Failed to create histogram")
});

/// HTTP request counter
pub static HTTP_REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    let opts = Opts::new("http_requests_total", "Total number of HTTP requests");
    IntCounterVec::new(opts, &["method", "route", "status"]).expect("Failed to create counter")
});

/// Contests currently running
pub static ACTIVE_CONTESTS: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new("contests_active", "Contests currently running").expect("Failed to create gauge")
});

/// Contests finished, by final status
pub static CONTESTS_FINISHED: LazyLock<IntCounterVec> = LazyLock::new(|| {
    let opts = Opts::new("contests_finished_total", "Contests finished by final status");
    IntCounterVec::new(opts, &["status"]).expect("Failed to create counter")
});

/// New solve records
pub static PROBLEMS_SOLVED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new("problems_solved_total", "Total problems newly solved")
        .expect("Failed to create counter")
});

/// Register all metrics with [`REGISTRY`]
pub fn init_metrics() -> Result<(), prometheus::Error> {
    REGISTRY.register(Box::new(HTTP_REQUEST_DURATION.clone()))?;
    REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(ACTIVE_CONTESTS.clone()))?;
    REGISTRY.register(Box::new(CONTESTS_FINISHED.clone()))?;
    REGISTRY.register(Box::new(PROBLEMS_SOLVED.clone()))?;
    Ok(())
}

/// Record a served request
pub fn record_request(method: &str, route: &str, status: u16, duration_secs: f64) {
    let status = status.to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, route, status.as_str()])
        .inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[method, route, status.as_str()])
        .observe(duration_secs);
}

pub fn contest_started() {
    ACTIVE_CONTESTS.inc();
}

pub fn contest_finished(status: &str) {
    ACTIVE_CONTESTS.dec();
    CONTESTS_FINISHED.with_label_values(&[status]).inc();
}

pub fn problem_solved() {
    PROBLEMS_SOLVED.inc();
}

/// Text exposition of everything in `registry`
pub fn render(registry: &Registry) -> Result<String, anyhow::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
