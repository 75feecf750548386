//! Common types used throughout the balancing engine

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unique identifier for players within a group
pub type PlayerId = String;

/// Unique identifier for groups
pub type GroupId = String;

/// Identifier of whoever triggered a save
pub type ActorId = String;

/// Position a player usually fills on the pitch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Role {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    #[default]
    Unknown,
}

impl Role {
    /// Ordering priority used when drafting outfield players
    pub fn priority(self) -> u8 {
        match self {
            Role::Goalkeeper => 1,
            Role::Defender => 2,
            Role::Midfielder => 3,
            Role::Forward => 4,
            Role::Unknown => 5,
        }
    }

    pub fn is_goalkeeper(self) -> bool {
        self == Role::Goalkeeper
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Goalkeeper => "goalkeeper",
            Role::Defender => "defender",
            Role::Midfielder => "midfielder",
            Role::Forward => "forward",
            Role::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    /// Unrecognized role names map to `Role::Unknown`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "goalkeeper" => Role::Goalkeeper,
            "defender" => Role::Defender,
            "midfielder" => Role::Midfielder,
            "forward" => Role::Forward,
            _ => Role::Unknown,
        })
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(role) => role,
            Err(never) => match never {},
        }
    }
}

/// Per-player skill scores, each in `[0, 100]`
///
/// Keys missing from the serialized form read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerAttributes {
    pub speed: f64,
    pub finishing: f64,
    pub passing: f64,
    pub dribbling: f64,
    pub defense: f64,
    pub physical: f64,
}

/// Player information as read from the player directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Role,
    /// Coarse skill tier, 1 to 5
    pub level: u8,
    #[serde(default)]
    pub attributes: Option<PlayerAttributes>,
}

impl Player {
    /// Create a player rated only by level
    pub fn new(id: impl Into<PlayerId>, role: Role, level: u8) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            role,
            level,
            attributes: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_attributes(mut self, attributes: PlayerAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }
}

/// One side of a draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Squad {
    pub label: String,
    pub members: Vec<Player>,
    pub average_rating: f64,
}

impl Squad {
    /// Create an empty squad with the given label
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            members: Vec::new(),
            average_rating: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &PlayerId> + '_ {
        self.members.iter().map(|p| &p.id)
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.members.iter().any(|p| p.id == player_id)
    }

    pub fn goalkeeper_count(&self) -> usize {
        self.members
            .iter()
            .filter(|p| p.role.is_goalkeeper())
            .count()
    }
}

/// Kind of pitch a group plays on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VenueType {
    FullField,
    ReducedField,
    Indoor,
}

impl VenueType {
    /// Suggested players per squad
    pub fn target_squad_size(self) -> usize {
        match self {
            VenueType::FullField => 11,
            VenueType::ReducedField => 7,
            VenueType::Indoor => 5,
        }
    }

    /// Suggested minimum pool for a proper match
    pub fn min_pool_size(self) -> usize {
        match self {
            VenueType::FullField => 14,
            VenueType::ReducedField => 10,
            VenueType::Indoor => 6,
        }
    }

    /// Advisory only: the balancer splits any pool of four or more
    pub fn pool_meets_minimum(self, pool_size: usize) -> bool {
        pool_size >= self.min_pool_size()
    }
}

impl std::fmt::Display for VenueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VenueType::FullField => write!(f, "full-field"),
            VenueType::ReducedField => write!(f, "reduced-field"),
            VenueType::Indoor => write!(f, "indoor"),
        }
    }
}
