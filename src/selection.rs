//! Caller-owned pool selection
//!
//! The set of players chosen for a draw lives here, outside the engine, and
//! is passed in explicitly. Every effective change bumps the revision, which
//! lets a computed but unsaved draw detect that it no longer matches.

use crate::types::PlayerId;
use serde::{Deserialize, Serialize};

/// Ordered set of selected player ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSelection {
    ids: Vec<PlayerId>,
    revision: u64,
}

impl PoolSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection holding the given ids in order; repeated ids are kept once
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PlayerId>,
    {
        let mut selection = Self::new();
        for id in ids {
            selection.select(id);
        }
        selection
    }

    /// Add a player at the end; returns false if already selected
    pub fn select(&mut self, player_id: impl Into<PlayerId>) -> bool {
        let player_id = player_id.into();
        if self.contains(&player_id) {
            return false;
        }

        self.ids.push(player_id);
        self.revision += 1;
        true
    }

    /// Remove a player; returns false if not selected
    pub fn deselect(&mut self, player_id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| id != player_id);

        if self.ids.len() == before {
            return false;
        }
        self.revision += 1;
        true
    }

    /// Flip a player's selection; returns whether it is now selected
    pub fn toggle(&mut self, player_id: &str) -> bool {
        if self.deselect(player_id) {
            false
        } else {
            self.select(player_id)
        }
    }

    pub fn clear(&mut self) {
        if !self.ids.is_empty() {
            self.ids.clear();
            self.revision += 1;
        }
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.ids.iter().any(|id| id == player_id)
    }

    /// Selected ids in selection order
    pub fn ids(&self) -> &[PlayerId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Counter bumped on every effective change
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_keeps_order_and_ignores_repeats() {
        let selection = PoolSelection::from_ids(["c", "a", "c", "b"]);
        assert_eq!(selection.ids(), &["c", "a", "b"]);
        assert_eq!(selection.revision(), 3);
    }

    #[test]
    fn test_noop_changes_keep_revision() {
        let mut selection = PoolSelection::from_ids(["a", "b"]);
        let revision = selection.revision();

        assert!(!selection.select("a"));
        assert!(!selection.deselect("zzz"));
        assert_eq!(selection.revision(), revision);
    }

    #[test]
    fn test_toggle() {
        let mut selection = PoolSelection::new();

        assert!(selection.toggle("a"));
        assert!(selection.contains("a"));
        assert!(!selection.toggle("a"));
        assert!(!selection.contains("a"));
        assert_eq!(selection.revision(), 2);
    }

    #[test]
    fn test_clear() {
        let mut selection = PoolSelection::from_ids(["a", "b"]);
        selection.clear();
        assert!(selection.is_empty());
        assert_eq!(selection.revision(), 3);

        selection.clear();
        assert_eq!(selection.revision(), 3);
    }
}
