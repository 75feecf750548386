//! The pair of squads produced by one balancing run

use crate::types::{PlayerId, Squad};
use crate::utils::rating_difference;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Two squads covering the whole pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadSplit {
    squads: [Squad; 2],
}

impl SquadSplit {
    pub fn new(first: Squad, second: Squad) -> Self {
        Self {
            squads: [first, second],
        }
    }

    pub fn first(&self) -> &Squad {
        &self.squads[0]
    }

    pub fn second(&self) -> &Squad {
        &self.squads[1]
    }

    pub fn squads(&self) -> &[Squad; 2] {
        &self.squads
    }

    pub fn into_squads(self) -> [Squad; 2] {
        self.squads
    }

    /// Total number of players across both squads
    pub fn player_count(&self) -> usize {
        self.squads.iter().map(Squad::len).sum()
    }

    /// Absolute difference between the squads' average ratings
    pub fn rating_gap(&self) -> f64 {
        rating_difference(self.squads[0].average_rating, self.squads[1].average_rating)
    }

    /// Distinct player ids across both squads
    pub fn participant_ids(&self) -> BTreeSet<PlayerId> {
        self.squads
            .iter()
            .flat_map(|squad| squad.member_ids().cloned())
            .collect()
    }

    /// Index of the squad holding the given player
    pub fn find_player(&self, player_id: &str) -> Option<usize> {
        self.squads
            .iter()
            .position(|squad| squad.contains(player_id))
    }
}

impl From<[Squad; 2]> for SquadSplit {
    fn from(squads: [Squad; 2]) -> Self {
        Self { squads }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Player, Role};

    fn squad(label: &str, ids: &[&str], average_rating: f64) -> Squad {
        Squad {
            label: label.to_string(),
            members: ids
                .iter()
                .map(|id| Player::new(*id, Role::Unknown, 3))
                .collect(),
            average_rating,
        }
    }

    #[test]
    fn test_split_accessors() {
        let split = SquadSplit::new(
            squad("Squad 1", &["a", "c"], 70.0),
            squad("Squad 2", &["b", "d", "e"], 62.5),
        );

        assert_eq!(split.player_count(), 5);
        assert_eq!(split.rating_gap(), 7.5);
        assert_eq!(split.find_player("c"), Some(0));
        assert_eq!(split.find_player("e"), Some(1));
        assert_eq!(split.find_player("z"), None);

        let ids: Vec<_> = split.participant_ids().into_iter().collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_participants_collapse_duplicates() {
        let split = SquadSplit::new(
            squad("Squad 1", &["a", "b"], 60.0),
            squad("Squad 2", &["a", "c"], 60.0),
        );

        assert_eq!(split.player_count(), 4);
        assert_eq!(split.participant_ids().len(), 3);
    }
}
