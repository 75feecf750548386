//! Player strength ratings
//!
//! This module provides the role weight table and the calculators that
//! turn a player into a single comparable score.

pub mod calculator;
pub mod weights;

// Re-export commonly used types
pub use calculator::{
    level_rating, FixedRatingCalculator, RatingCalculator, WeightedRatingCalculator,
};
pub use weights::{RoleWeightTable, RoleWeights};
