//! Squad Draw - roster balancing for recurring pickup games
//!
//! This crate rates players from their role and attributes, splits a
//! selected pool into two balanced squads, and keeps one draw record per
//! group and date together with who took part.

pub mod balancer;
pub mod config;
pub mod directory;
pub mod draw;
pub mod error;
pub mod metrics;
pub mod rating;
pub mod selection;
pub mod service;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{DrawError, Result};
pub use types::*;

// Re-export key components
pub use balancer::{RosterBalancer, SquadSplit};
pub use directory::{PlayerDirectory, StaticPlayerDirectory};
pub use draw::{DrawKey, DrawRecord, DrawRecordStore, InMemoryDrawRecordStore};
pub use rating::{RatingCalculator, WeightedRatingCalculator};
pub use selection::PoolSelection;
pub use service::{DrawService, PendingDraw};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
