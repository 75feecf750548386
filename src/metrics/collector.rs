//! Metrics collection using Prometheus
//!
//! Counts balancing runs and saves, and tracks how close the squads come
//! out in average rating.

use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics for the draw workflow
#[derive(Clone)]
pub struct DrawMetrics {
    registry: Arc<Registry>,

    /// Successful balancing runs
    pub balances_total: IntCounter,

    /// Runs rejected for too few players
    pub insufficient_pool_total: IntCounter,

    /// Save attempts by outcome
    pub saves_total: IntCounterVec,

    /// Absolute difference between squad averages
    pub rating_gap: Histogram,

    /// Time spent in the store per save
    pub save_duration_seconds: Histogram,
}

impl DrawMetrics {
    /// Create a new metrics collector with its own registry
    pub fn new() -> Result<Self> {
        Self::with_registry(Arc::new(Registry::new()))
    }

    /// Create a new metrics collector registering into `registry`
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let balances_total =
            IntCounter::new("squad_draw_balances_total", "Successful balancing runs")?;
        registry.register(Box::new(balances_total.clone()))?;

        let insufficient_pool_total = IntCounter::new(
            "squad_draw_insufficient_pool_total",
            "Balancing runs rejected for too few players",
        )?;
        registry.register(Box::new(insufficient_pool_total.clone()))?;

        let saves_total = IntCounterVec::new(
            Opts::new("squad_draw_saves_total", "Draw save attempts"),
            &["outcome"],
        )?;
        registry.register(Box::new(saves_total.clone()))?;

        let rating_gap = Histogram::with_opts(
            HistogramOpts::new(
                "squad_draw_rating_gap",
                "Difference between squad average ratings",
            )
            .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 40.0]),
        )?;
        registry.register(Box::new(rating_gap.clone()))?;

        let save_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("squad_draw_save_duration_seconds", "Draw save duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;
        registry.register(Box::new(save_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            balances_total,
            insufficient_pool_total,
            saves_total,
            rating_gap,
            save_duration_seconds,
        })
    }

    pub fn record_balance(&self, rating_gap: f64) {
        self.balances_total.inc();
        self.rating_gap.observe(rating_gap);
    }

    pub fn record_insufficient_pool(&self) {
        self.insufficient_pool_total.inc();
    }

    pub fn record_save(&self, success: bool, duration: Duration) {
        let outcome = if success { "success" } else { "failed" };
        self.saves_total.with_label_values(&[outcome]).inc();
        self.save_duration_seconds.observe(duration.as_secs_f64());
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }

    /// Render all metrics in the Prometheus text format
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to encode metrics: {}", e))?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}
