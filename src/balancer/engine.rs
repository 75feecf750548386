//! Roster balancing
//!
//! Splits a pool of players into two squads:
//! - goalkeepers are dealt out first, alternating squads in input order
//! - outfield players are ordered by role priority, then by rating
//!   (highest first, ties keep input order), and drafted with a
//!   [`DraftCursor`] that picks up at the squad after the last goalkeeper,
//!   so squad sizes never differ by more than one
//!
//! The result is fully determined by the input order and the ratings, so a
//! stored split can always be reproduced from the same pool.

use crate::balancer::draft::DraftCursor;
use crate::balancer::split::SquadSplit;
use crate::error::{DrawError, Result};
use crate::rating::{RatingCalculator, WeightedRatingCalculator};
use crate::types::{Player, Squad};
use crate::utils::average_rating;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

/// Smallest pool that can be split
pub const MIN_POOL_SIZE: usize = 4;

/// Number of squads a draw produces
pub const SQUAD_COUNT: usize = 2;

/// Configuration for squad naming
#[derive(Debug, Clone)]
pub struct BalancerConfig {
    /// Squads are labelled "<prefix> 1" and "<prefix> 2"
    pub label_prefix: String,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            label_prefix: "Squad".to_string(),
        }
    }
}

impl BalancerConfig {
    pub fn squad_label(&self, index: usize) -> String {
        format!("{} {}", self.label_prefix, index + 1)
    }
}

/// A player together with its computed rating
#[derive(Debug, Clone)]
struct RatedPlayer {
    player: Player,
    rating: f64,
}

/// Squad under construction
#[derive(Debug)]
struct SquadBuilder {
    label: String,
    members: Vec<RatedPlayer>,
}

impl SquadBuilder {
    fn build(self) -> Squad {
        let average_rating = average_rating(self.members.iter().map(|m| m.rating));

        Squad {
            label: self.label,
            members: self.members.into_iter().map(|m| m.player).collect(),
            average_rating,
        }
    }
}

/// Two-squad roster balancer
#[derive(Clone)]
pub struct RosterBalancer {
    rating_calculator: Arc<dyn RatingCalculator>,
    config: BalancerConfig,
}

impl std::fmt::Debug for RosterBalancer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterBalancer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for RosterBalancer {
    fn default() -> Self {
        Self::new(
            Arc::new(WeightedRatingCalculator::default()),
            BalancerConfig::default(),
        )
    }
}

impl RosterBalancer {
    pub fn new(rating_calculator: Arc<dyn RatingCalculator>, config: BalancerConfig) -> Self {
        Self {
            rating_calculator,
            config,
        }
    }

    pub fn config(&self) -> &BalancerConfig {
        &self.config
    }

    /// Rating of a single player with this balancer's calculator
    pub fn rating(&self, player: &Player) -> f64 {
        self.rating_calculator.rating(player)
    }

    /// Split the pool into two squads
    ///
    /// Fails with [`DrawError::InsufficientPlayers`] when the pool has fewer
    /// than [`MIN_POOL_SIZE`] players. Duplicate ids are not filtered.
    pub fn balance(&self, players: &[Player]) -> Result<SquadSplit> {
        if players.len() < MIN_POOL_SIZE {
            return Err(DrawError::InsufficientPlayers {
                count: players.len(),
                minimum: MIN_POOL_SIZE,
            });
        }

        let (goalkeepers, mut outfield): (Vec<RatedPlayer>, Vec<RatedPlayer>) = players
            .iter()
            .map(|player| RatedPlayer {
                rating: self.rating_calculator.rating(player),
                player: player.clone(),
            })
            .partition(|rated| rated.player.role.is_goalkeeper());

        // sort_by is stable; equal keys keep input order, and -0.0 ties with 0.0
        outfield.sort_by(|a, b| {
            a.player
                .role
                .priority()
                .cmp(&b.player.role.priority())
                .then_with(|| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal))
        });

        let mut squads: [SquadBuilder; SQUAD_COUNT] = std::array::from_fn(|index| SquadBuilder {
            label: self.config.squad_label(index),
            members: Vec::new(),
        });

        let keeper_count = goalkeepers.len();
        for (index, keeper) in goalkeepers.into_iter().enumerate() {
            squads[index % SQUAD_COUNT].members.push(keeper);
        }

        let cursor = DraftCursor::starting_at(SQUAD_COUNT, keeper_count);
        for (rated, squad) in outfield.into_iter().zip(cursor) {
            squads[squad].members.push(rated);
        }

        let split = SquadSplit::from(squads.map(SquadBuilder::build));

        debug!(
            "Balanced {} players: {} ({}, avg {:.2}) vs {} ({}, avg {:.2})",
            players.len(),
            split.first().label,
            split.first().len(),
            split.first().average_rating,
            split.second().label,
            split.second().len(),
            split.second().average_rating
        );

        Ok(split)
    }
}
