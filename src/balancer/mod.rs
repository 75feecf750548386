//! Two-squad roster balancing
//!
//! This module holds the draft order, the balancer itself and the split
//! type it returns.

pub mod draft;
pub mod engine;
pub mod split;

// Re-export commonly used types
pub use draft::{DraftCursor, DraftDirection};
pub use engine::{BalancerConfig, RosterBalancer, MIN_POOL_SIZE, SQUAD_COUNT};
pub use split::SquadSplit;
