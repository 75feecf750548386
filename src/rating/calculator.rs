//! Rating calculator trait and implementations
//!
//! A rating is a single strength score per player. Players with attribute
//! scores are rated by a role-weighted sum; players without them fall back
//! to their level.

use crate::error::Result;
use crate::rating::weights::RoleWeightTable;
use crate::types::{Player, PlayerId};
use std::collections::HashMap;

/// Points per level step on the fallback path
pub const LEVEL_RATING_STEP: f64 = 20.0;

/// Trait for turning a player into a scalar strength
pub trait RatingCalculator: Send + Sync {
    /// Strength of a player; pure and deterministic
    fn rating(&self, player: &Player) -> f64;
}

/// Rating used when a player carries no attribute scores
pub fn level_rating(level: u8) -> f64 {
    f64::from(level) * LEVEL_RATING_STEP
}

/// Role-weighted attribute calculator
#[derive(Debug, Clone, Default)]
pub struct WeightedRatingCalculator {
    table: RoleWeightTable,
}

impl WeightedRatingCalculator {
    pub fn new(table: RoleWeightTable) -> Self {
        Self { table }
    }

    /// Calculator over a custom table, rejecting unnormalized weights
    pub fn try_new(table: RoleWeightTable) -> Result<Self> {
        table.validate()?;
        Ok(Self::new(table))
    }

    pub fn table(&self) -> &RoleWeightTable {
        &self.table
    }
}

impl RatingCalculator for WeightedRatingCalculator {
    fn rating(&self, player: &Player) -> f64 {
        match &player.attributes {
            Some(attributes) => self.table.weights_for(player.role).score(attributes),
            None => level_rating(player.level),
        }
    }
}

/// Calculator with preset ratings by player id, for tests and replays
///
/// Players without a preset rating use the level fallback.
#[derive(Debug, Default)]
pub struct FixedRatingCalculator {
    ratings: HashMap<PlayerId, f64>,
    rating_calls: std::sync::Mutex<Vec<PlayerId>>,
}

impl FixedRatingCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rating(mut self, player_id: impl Into<PlayerId>, rating: f64) -> Self {
        self.ratings.insert(player_id.into(), rating);
        self
    }

    /// Player ids rated so far, in call order
    pub fn get_rating_calls(&self) -> Vec<PlayerId> {
        self.rating_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl RatingCalculator for FixedRatingCalculator {
    fn rating(&self, player: &Player) -> f64 {
        if let Ok(mut calls) = self.rating_calls.lock() {
            calls.push(player.id.clone());
        }

        self.ratings
            .get(&player.id)
            .copied()
            .unwrap_or_else(|| level_rating(player.level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::weights::RoleWeights;
    use crate::types::{PlayerAttributes, Role};

    const EPSILON: f64 = 1e-9;

    fn attributes(
        speed: f64,
        finishing: f64,
        passing: f64,
        dribbling: f64,
        defense: f64,
        physical: f64,
    ) -> PlayerAttributes {
        PlayerAttributes {
            speed,
            finishing,
            passing,
            dribbling,
            defense,
            physical,
        }
    }

    #[test]
    fn test_level_fallback() {
        let calculator = WeightedRatingCalculator::default();

        for level in 1..=5u8 {
            for role in [Role::Goalkeeper, Role::Forward, Role::Unknown] {
                let player = Player::new("p", role, level);
                assert_eq!(calculator.rating(&player), f64::from(level) * 20.0);
            }
        }
    }

    #[test]
    fn test_forward_weighting() {
        let calculator = WeightedRatingCalculator::default();
        let player = Player::new("striker", Role::Forward, 3)
            .with_attributes(attributes(80.0, 90.0, 60.0, 70.0, 30.0, 50.0));

        // 80*.25 + 90*.30 + 60*.15 + 70*.20 + 30*.05 + 50*.05
        let expected = 20.0 + 27.0 + 9.0 + 14.0 + 1.5 + 2.5;
        assert!((calculator.rating(&player) - expected).abs() < EPSILON);
    }

    #[test]
    fn test_goalkeeper_weighting() {
        let calculator = WeightedRatingCalculator::default();
        let player = Player::new("keeper", Role::Goalkeeper, 2)
            .with_attributes(attributes(50.0, 10.0, 40.0, 20.0, 90.0, 80.0));

        // 50*.15 + 10*.05 + 40*.15 + 20*.05 + 90*.40 + 80*.20
        let expected = 7.5 + 0.5 + 6.0 + 1.0 + 36.0 + 16.0;
        assert!((calculator.rating(&player) - expected).abs() < EPSILON);
    }

    #[test]
    fn test_attributes_override_level() {
        let calculator = WeightedRatingCalculator::default();
        let player = Player::new("mid", Role::Midfielder, 5)
            .with_attributes(PlayerAttributes::default());

        assert_eq!(calculator.rating(&player), 0.0);
    }

    #[test]
    fn test_same_attributes_rate_differently_by_role() {
        let calculator = WeightedRatingCalculator::default();
        let scores = attributes(90.0, 20.0, 50.0, 40.0, 95.0, 85.0);

        let defender = Player::new("d", Role::Defender, 3).with_attributes(scores);
        let forward = Player::new("f", Role::Forward, 3).with_attributes(scores);

        assert!(calculator.rating(&defender) > calculator.rating(&forward));
    }

    #[test]
    fn test_try_new_rejects_unnormalized_default() {
        let table = RoleWeightTable::with_default(RoleWeights {
            physical: 0.5,
            ..RoleWeights::DEFAULT
        });
        assert!(WeightedRatingCalculator::try_new(table).is_err());
        assert!(WeightedRatingCalculator::try_new(RoleWeightTable::standard()).is_ok());
    }

    #[test]
    fn test_fixed_calculator() {
        let calculator = FixedRatingCalculator::new().with_rating("a", 77.0);

        assert_eq!(calculator.rating(&Player::new("a", Role::Forward, 1)), 77.0);
        assert_eq!(calculator.rating(&Player::new("b", Role::Forward, 4)), 80.0);
        assert_eq!(calculator.get_rating_calls(), vec!["a", "b"]);
    }
}
