//! Player directory interface and a static implementation
//!
//! The directory owns players and group settings; the engine only reads
//! from it. The static directory is backed by a JSON roster snapshot.

use crate::types::{GroupId, Player, PlayerId, VenueType};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Trait for reading players and group settings
#[async_trait]
pub trait PlayerDirectory: Send + Sync {
    /// Active players of a group; unknown groups have none
    async fn active_players(&self, group_id: &str) -> crate::error::Result<Vec<Player>>;

    /// Venue type configured for a group, if any
    async fn venue_type(&self, group_id: &str) -> crate::error::Result<Option<VenueType>>;
}

/// Exported roster of one group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub group_id: GroupId,
    #[serde(default)]
    pub venue_type: Option<VenueType>,
    pub players: Vec<Player>,
}

impl RosterSnapshot {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Players whose id is in `ids`, in the order of `ids`
    pub fn players_by_id<'a>(&'a self, ids: &[PlayerId]) -> Vec<Option<&'a Player>> {
        ids.iter()
            .map(|id| self.players.iter().find(|p| &p.id == id))
            .collect()
    }
}

#[derive(Debug, Default)]
struct GroupRoster {
    venue_type: Option<VenueType>,
    players: Vec<Player>,
}

/// In-memory directory for tests, demos and file-based runs
#[derive(Debug, Default)]
pub struct StaticPlayerDirectory {
    groups: RwLock<HashMap<GroupId, GroupRoster>>,
}

impl StaticPlayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory holding a single group's snapshot
    pub fn from_snapshot(snapshot: RosterSnapshot) -> Self {
        let mut groups = HashMap::new();
        groups.insert(
            snapshot.group_id,
            GroupRoster {
                venue_type: snapshot.venue_type,
                players: snapshot.players,
            },
        );

        Self {
            groups: RwLock::new(groups),
        }
    }

    /// Add a player, replacing any existing entry with the same id
    pub async fn upsert_player(&self, group_id: &str, player: Player) {
        let mut groups = self.groups.write().await;
        let roster = groups.entry(group_id.to_string()).or_default();

        match roster.players.iter_mut().find(|p| p.id == player.id) {
            Some(existing) => *existing = player,
            None => roster.players.push(player),
        }
    }

    pub async fn remove_player(&self, group_id: &str, player_id: &str) -> bool {
        let mut groups = self.groups.write().await;
        match groups.get_mut(group_id) {
            Some(roster) => {
                let before = roster.players.len();
                roster.players.retain(|p| p.id != player_id);
                roster.players.len() != before
            }
            None => false,
        }
    }

    pub async fn set_venue_type(&self, group_id: &str, venue_type: VenueType) {
        let mut groups = self.groups.write().await;
        groups.entry(group_id.to_string()).or_default().venue_type = Some(venue_type);
    }
}

#[async_trait]
impl PlayerDirectory for StaticPlayerDirectory {
    async fn active_players(&self, group_id: &str) -> crate::error::Result<Vec<Player>> {
        let groups = self.groups.read().await;
        Ok(groups
            .get(group_id)
            .map(|roster| roster.players.clone())
            .unwrap_or_default())
    }

    async fn venue_type(&self, group_id: &str) -> crate::error::Result<Option<VenueType>> {
        let groups = self.groups.read().await;
        Ok(groups.get(group_id).and_then(|roster| roster.venue_type))
    }
}
