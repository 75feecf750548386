//! SQLite-backed draw storage
//!
//! Draw headers live in `draws`, one participation row per player in
//! `draw_participants`. A save deletes and inserts inside a single
//! transaction, so a failure before commit leaves the previous draw intact.

use crate::balancer::SquadSplit;
use crate::draw::record::{DrawKey, DrawRecord};
use crate::draw::store::DrawRecordStore;
use crate::error::{DrawError, Result};
use crate::types::{PlayerId, Squad};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info};

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    group_id TEXT NOT NULL,
    draw_date TEXT NOT NULL,
    squads TEXT NOT NULL,
    created_by TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (group_id, draw_date)
);
CREATE TABLE IF NOT EXISTS draw_participants (
    draw_id INTEGER NOT NULL,
    group_id TEXT NOT NULL,
    draw_date TEXT NOT NULL,
    player_id TEXT NOT NULL,
    PRIMARY KEY (draw_id, player_id)
);
CREATE INDEX IF NOT EXISTS idx_draw_participants_key
    ON draw_participants (group_id, draw_date);
CREATE INDEX IF NOT EXISTS idx_draw_participants_player
    ON draw_participants (player_id);
";

/// Raw header row before the squads are decoded
type HeaderRow = (String, NaiveDate, String, String, DateTime<Utc>);

/// Wait this long on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Draw storage on a pooled SQLite database
#[derive(Clone)]
pub struct SqliteDrawRecordStore {
    pool: DbPool,
}

impl SqliteDrawRecordStore {
    /// Open (or create) a database file and make sure the schema exists
    pub fn open(database_path: &str, pool_size: u32) -> Result<Self> {
        let manager = SqliteConnectionManager::file(database_path)
            .with_init(|conn| conn.busy_timeout(BUSY_TIMEOUT));
        Self::from_builder(r2d2::Pool::builder().max_size(pool_size), manager)
    }

    /// Private in-memory database; a single long-lived connection so all
    /// calls see the same data
    pub fn in_memory() -> Result<Self> {
        let builder = r2d2::Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None);
        Self::from_builder(builder, SqliteConnectionManager::memory())
    }

    fn from_builder(
        builder: r2d2::Builder<SqliteConnectionManager>,
        manager: SqliteConnectionManager,
    ) -> Result<Self> {
        let pool = builder
            .build(manager)
            .map_err(|e| {
                DrawError::persistence(format!("Failed to create database connection pool: {e}"))
            })?;

        let store = Self { pool };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        let conn = get_connection(&self.pool)?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| DrawError::persistence(format!("Failed to create schema: {e}")))?;
        debug!("Draw schema ready");
        Ok(())
    }

    /// Run blocking database work off the async runtime
    async fn with_connection<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut DbConn) -> Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = get_connection(&pool)?;
            work(&mut conn)
        })
        .await
        .map_err(|e| DrawError::persistence(format!("Database task failed: {e}")))?
    }
}

fn get_connection(pool: &DbPool) -> Result<DbConn> {
    pool.get().map_err(|e| {
        DrawError::persistence(format!("Failed to get database connection from pool: {e}"))
    })
}

fn query_error(context: &'static str) -> impl FnOnce(rusqlite::Error) -> DrawError {
    move |e| DrawError::persistence(format!("{context}: {e}"))
}

fn decode_record(row: HeaderRow) -> Result<DrawRecord> {
    let (group_id, date, squads_json, created_by, created_at) = row;
    let squads: [Squad; 2] = serde_json::from_str(&squads_json)
        .map_err(|e| DrawError::persistence(format!("Corrupt squads for {group_id}@{date}: {e}")))?;

    Ok(DrawRecord::restore(
        DrawKey::new(group_id, date),
        squads,
        created_by,
        created_at,
    ))
}

fn parse_header_row(row: &rusqlite::Row) -> rusqlite::Result<HeaderRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn find_record(conn: &DbConn, key: &DrawKey) -> Result<Option<DrawRecord>> {
    let sql = "SELECT group_id, draw_date, squads, created_by, created_at FROM draws WHERE group_id = ?1 AND draw_date = ?2";

    conn.query_row(sql, params![key.group_id, key.date], parse_header_row)
        .optional()
        .map_err(query_error("Failed to load draw"))?
        .map(decode_record)
        .transpose()
}

fn delete_record(conn: &rusqlite::Connection, key: &DrawKey) -> Result<bool> {
    conn.execute(
        "DELETE FROM draw_participants WHERE group_id = ?1 AND draw_date = ?2",
        params![key.group_id, key.date],
    )
    .map_err(query_error("Failed to delete participation rows"))?;

    let removed = conn
        .execute(
            "DELETE FROM draws WHERE group_id = ?1 AND draw_date = ?2",
            params![key.group_id, key.date],
        )
        .map_err(query_error("Failed to delete draw header"))?;

    Ok(removed > 0)
}

fn save_record(conn: &mut DbConn, record: &DrawRecord) -> Result<()> {
    let key = &record.key;
    let squads_json = serde_json::to_string(record.squads())
        .map_err(|e| DrawError::persistence(format!("Failed to encode squads: {e}")))?;

    let tx = conn
        .transaction()
        .map_err(query_error("Failed to begin transaction"))?;

    if delete_record(&tx, key)? {
        debug!("Replacing existing draw {}", key);
    }

    tx.execute(
        "INSERT INTO draws (group_id, draw_date, squads, created_by, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            key.group_id,
            key.date,
            squads_json,
            record.created_by,
            record.created_at
        ],
    )
    .map_err(query_error("Failed to insert draw header"))?;
    let draw_id = tx.last_insert_rowid();

    {
        let mut stmt = tx
            .prepare("INSERT INTO draw_participants (draw_id, group_id, draw_date, player_id) VALUES (?1, ?2, ?3, ?4)")
            .map_err(query_error("Failed to prepare participation insert"))?;
        for player_id in record.participants() {
            stmt.execute(params![draw_id, key.group_id, key.date, player_id])
                .map_err(query_error("Failed to insert participation row"))?;
        }
    }

    tx.commit()
        .map_err(query_error("Failed to commit draw"))
}

#[async_trait]
impl DrawRecordStore for SqliteDrawRecordStore {
    async fn find(&self, key: &DrawKey) -> Result<Option<DrawRecord>> {
        let key = key.clone();
        self.with_connection(move |conn| find_record(conn, &key))
            .await
    }

    async fn save(&self, key: &DrawKey, split: &SquadSplit, actor_id: &str) -> Result<DrawRecord> {
        let record = DrawRecord::new(key.clone(), split.clone(), actor_id);
        let saved = record.clone();

        self.with_connection(move |conn| save_record(conn, &record))
            .await?;

        info!(
            "Saved draw {} with {} participants",
            saved.key,
            saved.participants().len()
        );
        Ok(saved)
    }

    async fn delete(&self, key: &DrawKey) -> Result<bool> {
        let key = key.clone();
        self.with_connection(move |conn| {
            let tx = conn
                .transaction()
                .map_err(query_error("Failed to begin transaction"))?;
            let removed = delete_record(&tx, &key)?;
            tx.commit().map_err(query_error("Failed to commit delete"))?;
            Ok(removed)
        })
        .await
    }

    async fn participants(&self, key: &DrawKey) -> Result<BTreeSet<PlayerId>> {
        let key = key.clone();
        self.with_connection(move |conn| {
            let mut stmt = conn
                .prepare("SELECT player_id FROM draw_participants WHERE group_id = ?1 AND draw_date = ?2")
                .map_err(query_error("Failed to prepare participant query"))?;
            let rows = stmt
                .query_map(params![key.group_id, key.date], |row| row.get(0))
                .map_err(query_error("Failed to query participants"))?
                .collect::<rusqlite::Result<BTreeSet<PlayerId>>>()
                .map_err(query_error("Failed to read participant row"))?;
            Ok(rows)
        })
        .await
    }

    async fn list_for_group(&self, group_id: &str) -> Result<Vec<DrawRecord>> {
        let group_id = group_id.to_string();
        self.with_connection(move |conn| {
            let mut stmt = conn
                .prepare("SELECT group_id, draw_date, squads, created_by, created_at FROM draws WHERE group_id = ?1 ORDER BY draw_date")
                .map_err(query_error("Failed to prepare draw listing"))?;
            let rows = stmt
                .query_map(params![group_id], parse_header_row)
                .map_err(query_error("Failed to list draws"))?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(query_error("Failed to read draw row"))?;

            rows.into_iter().map(decode_record).collect()
        })
        .await
    }

    async fn participation_history(&self, player_id: &str) -> Result<Vec<DrawKey>> {
        let player_id = player_id.to_string();
        self.with_connection(move |conn| {
            let mut stmt = conn
                .prepare("SELECT group_id, draw_date FROM draw_participants WHERE player_id = ?1 ORDER BY draw_date, group_id")
                .map_err(query_error("Failed to prepare history query"))?;
            let keys = stmt
                .query_map(params![player_id], |row| {
                    Ok(DrawKey::new(row.get::<_, String>(0)?, row.get(1)?))
                })
                .map_err(query_error("Failed to query participation history"))?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(query_error("Failed to read history row"))?;
            Ok(keys)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Player, Role};

    fn split(first: &[&str], second: &[&str]) -> SquadSplit {
        let squad = |label: &str, ids: &[&str]| Squad {
            label: label.to_string(),
            members: ids
                .iter()
                .map(|id| Player::new(*id, Role::Defender, 2))
                .collect(),
            average_rating: 40.0,
        };
        SquadSplit::new(squad("Squad 1", first), squad("Squad 2", second))
    }

    fn key(day: u32) -> DrawKey {
        DrawKey::new("tuesday-five", NaiveDate::from_ymd_opt(2024, 9, day).unwrap())
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let store = SqliteDrawRecordStore::in_memory().unwrap();
        let saved = store
            .save(&key(3), &split(&["a", "b"], &["c", "d"]), "admin")
            .await
            .unwrap();

        let loaded = store.find(&key(3)).await.unwrap().unwrap();
        assert!(loaded.same_draw(&saved));
        assert_eq!(loaded.created_at.timestamp(), saved.created_at.timestamp());
        assert_eq!(loaded.squads()[0].label, "Squad 1");
    }

    #[tokio::test]
    async fn test_failed_save_keeps_previous_draw() {
        let store = SqliteDrawRecordStore::in_memory().unwrap();
        let previous = store
            .save(&key(3), &split(&["a", "b"], &["c", "d"]), "admin")
            .await
            .unwrap();

        // connection goes back to the single-slot pool before the next save
        {
            let conn = get_connection(&store.pool).unwrap();
            conn.execute_batch(
                "CREATE TRIGGER reject_player BEFORE INSERT ON draw_participants
                 WHEN NEW.player_id = 'z'
                 BEGIN SELECT RAISE(ABORT, 'participant rejected'); END;",
            )
            .unwrap();
        }

        let err = store
            .save(&key(3), &split(&["a", "z"], &["c", "y"]), "coach")
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(err, DrawError::Persistence { .. }));

        let kept = store.find(&key(3)).await.unwrap().unwrap();
        assert_eq!(kept.squads(), previous.squads());
        assert_eq!(kept.created_by, "admin");

        let rows: Vec<_> = store
            .participants(&key(3))
            .await
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(rows, vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_missing_key() {
        let store = SqliteDrawRecordStore::in_memory().unwrap();
        assert!(store.find(&key(3)).await.unwrap().is_none());
        assert!(store.participants(&key(3)).await.unwrap().is_empty());
        assert!(!store.delete(&key(3)).await.unwrap());
    }

    #[tokio::test]
    async fn test_replace_drops_excluded_players() {
        let store = SqliteDrawRecordStore::in_memory().unwrap();

        store
            .save(&key(3), &split(&["a", "b"], &["c", "d"]), "admin")
            .await
            .unwrap();
        store
            .save(&key(3), &split(&["a", "x"], &["c", "y"]), "admin")
            .await
            .unwrap();

        let rows: Vec<_> = store
            .participants(&key(3))
            .await
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(rows, vec!["a", "c", "x", "y"]);
        assert_eq!(store.list_for_group("tuesday-five").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_save_leaves_single_header() {
        let store = SqliteDrawRecordStore::in_memory().unwrap();
        let split = split(&["a", "b"], &["c", "d"]);

        let first = store.save(&key(3), &split, "admin").await.unwrap();
        let second = store.save(&key(3), &split, "admin").await.unwrap();

        assert!(first.same_draw(&second));
        assert_eq!(store.list_for_group("tuesday-five").await.unwrap().len(), 1);
        assert_eq!(store.participants(&key(3)).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_history_and_delete() {
        let store = SqliteDrawRecordStore::in_memory().unwrap();

        store
            .save(&key(10), &split(&["a", "b"], &["c", "d"]), "admin")
            .await
            .unwrap();
        store
            .save(&key(3), &split(&["a", "e"], &["f", "g"]), "admin")
            .await
            .unwrap();

        assert_eq!(
            store.participation_history("a").await.unwrap(),
            vec![key(3), key(10)]
        );

        assert!(store.delete(&key(3)).await.unwrap());
        assert_eq!(
            store.participation_history("a").await.unwrap(),
            vec![key(10)]
        );
        assert!(store.participation_history("e").await.unwrap().is_empty());
    }
}
