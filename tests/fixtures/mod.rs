//! Test fixtures and mock implementations for integration testing

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use squad_draw::balancer::SquadSplit;
use squad_draw::directory::StaticPlayerDirectory;
use squad_draw::draw::{DrawKey, DrawRecord, DrawRecordStore};
use squad_draw::error::Result;
use squad_draw::types::{Player, PlayerAttributes, PlayerId, Role};
use std::collections::BTreeSet;

mock! {
    pub DrawStore {}

    #[async_trait]
    impl DrawRecordStore for DrawStore {
        async fn find(&self, key: &DrawKey) -> Result<Option<DrawRecord>>;
        async fn save(&self, key: &DrawKey, split: &SquadSplit, actor_id: &str) -> Result<DrawRecord>;
        async fn delete(&self, key: &DrawKey) -> Result<bool>;
        async fn participants(&self, key: &DrawKey) -> Result<BTreeSet<PlayerId>>;
        async fn list_for_group(&self, group_id: &str) -> Result<Vec<DrawRecord>>;
        async fn participation_history(&self, player_id: &str) -> Result<Vec<DrawKey>>;
    }
}

pub const GROUP: &str = "sunday-league";

pub fn match_day(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

pub fn attributes(value: f64) -> PlayerAttributes {
    PlayerAttributes {
        speed: value,
        finishing: value,
        passing: value,
        dribbling: value,
        defense: value,
        physical: value,
    }
}

/// Player the weighted calculator rates at `rating`, up to float rounding
///
/// Uniform attributes score their own value under any normalized weight set.
pub fn rated_player(id: &str, role: Role, rating: f64) -> Player {
    Player::new(id, role, 3).with_attributes(attributes(rating))
}

/// Ten players with two goalkeepers and mixed ratings
pub fn create_test_roster() -> Vec<Player> {
    vec![
        rated_player("keeper_a", Role::Goalkeeper, 72.0),
        rated_player("keeper_b", Role::Goalkeeper, 64.0),
        rated_player("def_1", Role::Defender, 81.0),
        rated_player("def_2", Role::Defender, 58.0),
        rated_player("def_3", Role::Defender, 66.0),
        rated_player("mid_1", Role::Midfielder, 77.0),
        rated_player("mid_2", Role::Midfielder, 69.0),
        rated_player("fwd_1", Role::Forward, 88.0),
        rated_player("fwd_2", Role::Forward, 61.0),
        Player::new("guest", Role::Unknown, 2),
    ]
}

pub fn roster_ids() -> Vec<PlayerId> {
    create_test_roster().into_iter().map(|p| p.id).collect()
}

pub async fn create_test_directory() -> StaticPlayerDirectory {
    let directory = StaticPlayerDirectory::new();
    for player in create_test_roster() {
        directory.upsert_player(GROUP, player).await;
    }
    directory
}
