//! Metrics for the squad draw workflow

pub mod collector;

pub use collector::{DrawMetrics, MetricsTimer};
