//! Persisted draw records

use crate::balancer::SquadSplit;
use crate::types::{ActorId, GroupId, PlayerId, Squad};
use crate::utils::current_timestamp;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identity of a draw: one per group per calendar day
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DrawKey {
    pub group_id: GroupId,
    pub date: NaiveDate,
}

impl DrawKey {
    pub fn new(group_id: impl Into<GroupId>, date: NaiveDate) -> Self {
        Self {
            group_id: group_id.into(),
            date,
        }
    }
}

impl std::fmt::Display for DrawKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.group_id, self.date)
    }
}

/// Stored outcome of one balancing run
///
/// The participant set is derived from the squads whenever a record is
/// built or deserialized, so the two can never drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredDrawRecord")]
pub struct DrawRecord {
    pub key: DrawKey,
    squads: [Squad; 2],
    participants: BTreeSet<PlayerId>,
    pub created_by: ActorId,
    pub created_at: DateTime<Utc>,
}

/// Serialized form; any stored participant list is recomputed
#[derive(Deserialize)]
struct StoredDrawRecord {
    key: DrawKey,
    squads: [Squad; 2],
    created_by: ActorId,
    created_at: DateTime<Utc>,
}

impl From<StoredDrawRecord> for DrawRecord {
    fn from(stored: StoredDrawRecord) -> Self {
        DrawRecord::restore(
            stored.key,
            stored.squads,
            stored.created_by,
            stored.created_at,
        )
    }
}

impl DrawRecord {
    /// Build a record for a freshly computed split
    pub fn new(key: DrawKey, split: SquadSplit, created_by: impl Into<ActorId>) -> Self {
        Self::restore(key, split.into_squads(), created_by, current_timestamp())
    }

    /// Rebuild a record from stored parts
    pub fn restore(
        key: DrawKey,
        squads: [Squad; 2],
        created_by: impl Into<ActorId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let participants = squads
            .iter()
            .flat_map(|squad| squad.member_ids().cloned())
            .collect();

        Self {
            key,
            squads,
            participants,
            created_by: created_by.into(),
            created_at,
        }
    }

    pub fn squads(&self) -> &[Squad; 2] {
        &self.squads
    }

    pub fn participants(&self) -> &BTreeSet<PlayerId> {
        &self.participants
    }

    pub fn split(&self) -> SquadSplit {
        SquadSplit::from(self.squads.clone())
    }

    /// Same key, squads and author; timestamps are ignored
    pub fn same_draw(&self, other: &DrawRecord) -> bool {
        self.key == other.key && self.squads == other.squads && self.created_by == other.created_by
    }
}
