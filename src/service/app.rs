//! Application state and component wiring
//!
//! Builds the store, balancer and metrics from [`AppConfig`] and hands out
//! a ready [`DrawService`].

use crate::balancer::RosterBalancer;
use crate::config::{AppConfig, StorageSettings};
use crate::directory::PlayerDirectory;
use crate::draw::{DrawRecordStore, SqliteDrawRecordStore};
use crate::metrics::DrawMetrics;
use crate::rating::WeightedRatingCalculator;
use crate::service::draw::DrawService;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Database path that selects a private in-memory database
pub const IN_MEMORY_DATABASE: &str = ":memory:";

/// Open the configured draw store
pub fn open_store(settings: &StorageSettings) -> Result<Arc<dyn DrawRecordStore>> {
    let store = if settings.database_path == IN_MEMORY_DATABASE {
        warn!("Using an in-memory database; draws are lost on exit");
        SqliteDrawRecordStore::in_memory()?
    } else {
        SqliteDrawRecordStore::open(&settings.database_path, settings.pool_size)
            .with_context(|| format!("Failed to open database {}", settings.database_path))?
    };

    Ok(Arc::new(store))
}

/// Fully wired application
pub struct AppState {
    pub config: AppConfig,
    pub service: DrawService,
    pub metrics: Arc<DrawMetrics>,
}

impl AppState {
    /// Wire the service against the configured SQLite store
    pub fn new(config: AppConfig, directory: Arc<dyn PlayerDirectory>) -> Result<Self> {
        let store = open_store(&config.storage)?;
        Self::with_store(config, directory, store)
    }

    /// Wire the service against an already opened store
    pub fn with_store(
        config: AppConfig,
        directory: Arc<dyn PlayerDirectory>,
        store: Arc<dyn DrawRecordStore>,
    ) -> Result<Self> {
        let metrics = Arc::new(DrawMetrics::new().context("Failed to create metrics")?);
        let balancer = RosterBalancer::new(
            Arc::new(WeightedRatingCalculator::default()),
            config.balancer_config(),
        );

        let service = DrawService::new(directory, balancer, store).with_metrics(metrics.clone());

        info!(
            "{} ready (database: {})",
            config.service.name, config.storage.database_path
        );

        Ok(Self {
            config,
            service,
            metrics,
        })
    }
}
