//! Error types for the roster balancing engine
//!
//! The engine reports two kinds of failure to callers: a pool that is too
//! small to split, and a storage failure while persisting a draw. The
//! orchestration layer adds a few checks of its own on top.

/// Result type alias for convenience
pub type Result<T, E = DrawError> = std::result::Result<T, E>;

/// Custom error types for balancing and draw persistence
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DrawError {
    #[error("Insufficient players: {count} selected, at least {minimum} required")]
    InsufficientPlayers { count: usize, minimum: usize },

    #[error("Persistence failed: {message}")]
    Persistence { message: String },

    #[error("Selection changed since the draw was computed (revision {expected}, now {actual})")]
    StaleSelection { expected: u64, actual: u64 },

    #[error("Player not found in directory: {player_id}")]
    UnknownPlayer { player_id: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DrawError {
    /// Build a persistence error from anything displayable
    pub fn persistence(err: impl std::fmt::Display) -> Self {
        DrawError::Persistence {
            message: err.to_string(),
        }
    }

    /// Whether the caller may retry the failed operation as a whole
    pub fn is_retryable(&self) -> bool {
        matches!(self, DrawError::Persistence { .. })
    }
}
