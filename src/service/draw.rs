//! Draw orchestration
//!
//! Ties the directory, the balancer and the store together. A draw is
//! prepared from the caller's current selection, shown, and only then
//! committed; the commit is refused if the selection moved in between.

use crate::balancer::{RosterBalancer, SquadSplit};
use crate::directory::PlayerDirectory;
use crate::draw::{DrawKey, DrawRecord, DrawRecordStore};
use crate::error::{DrawError, Result};
use crate::metrics::DrawMetrics;
use crate::selection::PoolSelection;
use crate::types::{Player, VenueType};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// A computed split that has not been saved yet
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDraw {
    pub key: DrawKey,
    pub split: SquadSplit,
    /// Selection revision the split was computed from
    pub selection_revision: u64,
    pub venue_type: Option<VenueType>,
}

impl PendingDraw {
    /// Whether the pool is at least the venue's advisory minimum
    pub fn meets_venue_minimum(&self) -> bool {
        self.venue_type
            .map(|venue| venue.pool_meets_minimum(self.split.player_count()))
            .unwrap_or(true)
    }
}

/// Prepares and commits draws for groups
pub struct DrawService {
    directory: Arc<dyn PlayerDirectory>,
    balancer: RosterBalancer,
    store: Arc<dyn DrawRecordStore>,
    metrics: Option<Arc<DrawMetrics>>,
}

impl DrawService {
    pub fn new(
        directory: Arc<dyn PlayerDirectory>,
        balancer: RosterBalancer,
        store: Arc<dyn DrawRecordStore>,
    ) -> Self {
        Self {
            directory,
            balancer,
            store,
            metrics: None,
        }
    }

    /// Attach a metrics collector
    pub fn with_metrics(mut self, metrics: Arc<DrawMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn balancer(&self) -> &RosterBalancer {
        &self.balancer
    }

    pub fn store(&self) -> &Arc<dyn DrawRecordStore> {
        &self.store
    }

    /// Look up the selected players in selection order
    pub async fn resolve_pool(
        &self,
        group_id: &str,
        selection: &PoolSelection,
    ) -> Result<Vec<Player>> {
        let mut roster: HashMap<String, Player> = self
            .directory
            .active_players(group_id)
            .await?
            .into_iter()
            .map(|player| (player.id.clone(), player))
            .collect();

        selection
            .ids()
            .iter()
            .map(|id| {
                roster.remove(id).ok_or_else(|| DrawError::UnknownPlayer {
                    player_id: id.clone(),
                })
            })
            .collect()
    }

    /// Compute a split for the current selection without saving it
    pub async fn prepare_draw(
        &self,
        group_id: &str,
        date: NaiveDate,
        selection: &PoolSelection,
    ) -> Result<PendingDraw> {
        let pool = self.resolve_pool(group_id, selection).await?;

        let split = match self.balancer.balance(&pool) {
            Ok(split) => split,
            Err(e) => {
                if let Some(metrics) = &self.metrics {
                    if matches!(e, DrawError::InsufficientPlayers { .. }) {
                        metrics.record_insufficient_pool();
                    }
                }
                return Err(e);
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_balance(split.rating_gap());
        }

        let pending = PendingDraw {
            key: DrawKey::new(group_id, date),
            split,
            selection_revision: selection.revision(),
            venue_type: self.directory.venue_type(group_id).await?,
        };

        if !pending.meets_venue_minimum() {
            if let Some(venue) = pending.venue_type {
                warn!(
                    "Pool of {} players is below the usual minimum of {} for {} venues",
                    pool.len(),
                    venue.min_pool_size(),
                    venue
                );
            }
        }

        debug!(
            "Prepared draw {} from selection revision {} (gap {:.2})",
            pending.key,
            pending.selection_revision,
            pending.split.rating_gap()
        );

        Ok(pending)
    }

    /// Draw already stored for the same group and date, if any
    pub async fn existing_draw(&self, group_id: &str, date: NaiveDate) -> Result<Option<DrawRecord>> {
        self.store.find(&DrawKey::new(group_id, date)).await
    }

    /// Persist a prepared draw, replacing any draw with the same key
    ///
    /// Fails with [`DrawError::StaleSelection`] when `selection` changed
    /// after the draw was prepared.
    pub async fn commit_draw(
        &self,
        pending: &PendingDraw,
        selection: &PoolSelection,
        actor_id: &str,
    ) -> Result<DrawRecord> {
        if selection.revision() != pending.selection_revision {
            return Err(DrawError::StaleSelection {
                expected: pending.selection_revision,
                actual: selection.revision(),
            });
        }

        let timer = self.metrics.as_ref().map(|metrics| metrics.start_timer());
        let result = self.store.save(&pending.key, &pending.split, actor_id).await;

        if let (Some(metrics), Some(timer)) = (&self.metrics, timer) {
            metrics.record_save(result.is_ok(), timer.stop());
        }

        match result {
            Ok(record) => {
                info!(
                    "Draw {} saved by {} with {} participants",
                    record.key,
                    record.created_by,
                    record.participants().len()
                );
                Ok(record)
            }
            Err(e) => {
                error!("Failed to save draw {}: {}", pending.key, e);
                Err(e)
            }
        }
    }
}
