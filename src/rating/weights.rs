//! Role weight table
//!
//! Each role maps to a distribution of importance over the six player
//! attributes. Roles without an explicit entry fall back to the table's
//! default vector.

use crate::error::{DrawError, Result};
use crate::types::{PlayerAttributes, Role};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Allowed deviation of a weight vector's sum from 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Importance of each attribute for one role; weights sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleWeights {
    pub speed: f64,
    pub finishing: f64,
    pub passing: f64,
    pub dribbling: f64,
    pub defense: f64,
    pub physical: f64,
}

impl RoleWeights {
    /// Vector used for `Role::Unknown` and any role not in the table
    pub const DEFAULT: RoleWeights = RoleWeights {
        speed: 0.20,
        finishing: 0.20,
        passing: 0.15,
        dribbling: 0.15,
        defense: 0.15,
        physical: 0.15,
    };

    pub const GOALKEEPER: RoleWeights = RoleWeights {
        speed: 0.15,
        finishing: 0.05,
        passing: 0.15,
        dribbling: 0.05,
        defense: 0.40,
        physical: 0.20,
    };

    pub const DEFENDER: RoleWeights = RoleWeights {
        speed: 0.20,
        finishing: 0.05,
        passing: 0.15,
        dribbling: 0.10,
        defense: 0.30,
        physical: 0.20,
    };

    pub const MIDFIELDER: RoleWeights = RoleWeights {
        speed: 0.20,
        finishing: 0.15,
        passing: 0.25,
        dribbling: 0.20,
        defense: 0.10,
        physical: 0.10,
    };

    pub const FORWARD: RoleWeights = RoleWeights {
        speed: 0.25,
        finishing: 0.30,
        passing: 0.15,
        dribbling: 0.20,
        defense: 0.05,
        physical: 0.05,
    };

    /// Weighted sum of the given attributes
    pub fn score(&self, attributes: &PlayerAttributes) -> f64 {
        attributes.speed * self.speed
            + attributes.finishing * self.finishing
            + attributes.passing * self.passing
            + attributes.dribbling * self.dribbling
            + attributes.defense * self.defense
            + attributes.physical * self.physical
    }

    pub fn total(&self) -> f64 {
        self.speed + self.finishing + self.passing + self.dribbling + self.defense + self.physical
    }
}

impl Default for RoleWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Lookup from role to weight vector, with a named fallback entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleWeightTable {
    entries: HashMap<Role, RoleWeights>,
    default: RoleWeights,
}

impl RoleWeightTable {
    /// Table with no role entries; every role uses `default`
    pub fn with_default(default: RoleWeights) -> Self {
        Self {
            entries: HashMap::new(),
            default,
        }
    }

    /// The standard table shipped with the engine
    pub fn standard() -> Self {
        Self::with_default(RoleWeights::DEFAULT)
            .with_entry(Role::Goalkeeper, RoleWeights::GOALKEEPER)
            .with_entry(Role::Defender, RoleWeights::DEFENDER)
            .with_entry(Role::Midfielder, RoleWeights::MIDFIELDER)
            .with_entry(Role::Forward, RoleWeights::FORWARD)
    }

    pub fn with_entry(mut self, role: Role, weights: RoleWeights) -> Self {
        self.entries.insert(role, weights);
        self
    }

    /// Weights for a role, falling back to the default vector
    pub fn weights_for(&self, role: Role) -> &RoleWeights {
        self.entries.get(&role).unwrap_or(&self.default)
    }

    pub fn default_weights(&self) -> &RoleWeights {
        &self.default
    }

    /// Roles whose weight vector does not sum to one
    pub fn unnormalized_roles(&self, tolerance: f64) -> Vec<Option<Role>> {
        let mut roles: Vec<Option<Role>> = self
            .entries
            .iter()
            .filter(|(_, weights)| (weights.total() - 1.0).abs() > tolerance)
            .map(|(role, _)| Some(*role))
            .collect();

        if (self.default.total() - 1.0).abs() > tolerance {
            roles.push(None);
        }

        roles
    }

    /// Reject tables with a weight vector that does not sum to one
    pub fn validate(&self) -> Result<()> {
        let unnormalized = self.unnormalized_roles(WEIGHT_SUM_TOLERANCE);
        if unnormalized.is_empty() {
            return Ok(());
        }

        let names: Vec<&str> = unnormalized
            .iter()
            .map(|role| role.map(Role::as_str).unwrap_or("default"))
            .collect();
        Err(DrawError::Configuration {
            message: format!("Role weights must sum to 1.0: {}", names.join(", ")),
        })
    }
}

impl Default for RoleWeightTable {
    fn default() -> Self {
        Self::standard()
    }
}
