//! Service layer for the squad draw service
//!
//! Draw orchestration on top of the engine, and the wiring that builds it
//! from configuration.

pub mod app;
pub mod draw;

pub use app::{open_store, AppState, IN_MEMORY_DATABASE};
pub use draw::{DrawService, PendingDraw};
