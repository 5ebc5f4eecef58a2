// SQLite persistence for source rosters and the last generated batch.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use tracing::warn;

use squadmix_core::{GeneratedBatch, Roster, Source};

/// Storage key for source roster A.
pub const TEAM1_KEY: &str = "ipl_fantasy_team1";
/// Storage key for source roster B.
pub const TEAM2_KEY: &str = "ipl_fantasy_team2";
/// Storage key for the last generated batch.
pub const GENERATED_TEAMS_KEY: &str = "ipl_fantasy_generated_teams";
/// Storage key for when the last batch was generated.
pub const GENERATED_AT_KEY: &str = "ipl_fantasy_generated_at";

/// Storage key holding the roster for `side`.
pub fn roster_key(side: Source) -> &'static str {
    match side {
        Source::A => TEAM1_KEY,
        Source::B => TEAM2_KEY,
    }
}

/// Key-value store of JSON blobs backed by a single SQLite table.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) a SQLite database at `path` and ensure the table
    /// exists. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS app_state (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Persist an arbitrary JSON value under `key`. Uses INSERT OR REPLACE so
    /// repeated saves overwrite the previous value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO app_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`. Returns `None` if the key
    /// does not exist.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let Some(json_str) = self.load_raw(key)? else {
            return Ok(None);
        };
        let value: serde_json::Value =
            serde_json::from_str(&json_str).context("failed to deserialize state value")?;
        Ok(Some(value))
    }

    /// Store raw text under `key` without JSON validation.
    pub fn save_raw(&self, key: &str, text: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT OR REPLACE INTO app_state (key, value) VALUES (?1, ?2)",
            params![key, text],
        )
        .context("failed to save raw state")?;
        Ok(())
    }

    fn load_raw(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM app_state WHERE key = ?1")
            .context("failed to prepare load_state query")?;

        let mut rows = stmt
            .query_map(params![key], |row| row.get::<_, String>(0))
            .context("failed to query app state")?;

        match rows.next() {
            Some(row) => Ok(Some(row.context("failed to read state row")?)),
            None => Ok(None),
        }
    }

    /// Remove `key` if present.
    pub fn delete_state(&self, key: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute("DELETE FROM app_state WHERE key = ?1", params![key])
            .context("failed to delete state")?;
        Ok(())
    }

    /// Best-effort typed load: absent keys and malformed blobs both yield
    /// `None`; malformed blobs are logged.
    fn load_lenient<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json_str = match self.load_raw(key) {
            Ok(Some(s)) => s,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read {}: {:#}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&json_str) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring malformed {}: {}", key, e);
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Typed blobs
    // ------------------------------------------------------------------

    pub fn save_roster(&self, side: Source, roster: &Roster) -> Result<()> {
        let value = serde_json::to_value(roster).context("failed to serialize roster")?;
        self.save_state(roster_key(side), &value)
    }

    pub fn load_roster(&self, side: Source) -> Option<Roster> {
        self.load_lenient(roster_key(side))
    }

    pub fn save_batch(&self, batch: &GeneratedBatch) -> Result<()> {
        let value = serde_json::to_value(batch).context("failed to serialize generated teams")?;
        self.save_state(GENERATED_TEAMS_KEY, &value)
    }

    pub fn load_batch(&self) -> Option<GeneratedBatch> {
        self.load_lenient(GENERATED_TEAMS_KEY)
    }

    /// Record (or with `None`, forget) when the current batch was generated.
    pub fn save_generated_at(&self, at: Option<DateTime<Utc>>) -> Result<()> {
        match at {
            Some(ts) => self.save_state(
                GENERATED_AT_KEY,
                &serde_json::Value::String(ts.to_rfc3339()),
            ),
            None => self.delete_state(GENERATED_AT_KEY),
        }
    }

    pub fn load_generated_at(&self) -> Option<DateTime<Utc>> {
        let raw: String = self.load_lenient(GENERATED_AT_KEY)?;
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                warn!("Ignoring malformed {}: {}", GENERATED_AT_KEY, e);
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use squadmix_core::{CompositeRoster, Player, Role};

    fn store() -> Store {
        Store::open(":memory:").expect("in-memory db should open")
    }

    #[test]
    fn save_and_load_raw_json() {
        let db = store();
        let value = serde_json::json!({"players": [], "n": 3});
        db.save_state("k", &value).unwrap();
        assert_eq!(db.load_state("k").unwrap(), Some(value));
        assert_eq!(db.load_state("missing").unwrap(), None);
    }

    #[test]
    fn save_overwrites_previous_value() {
        let db = store();
        db.save_state("k", &serde_json::json!(1)).unwrap();
        db.save_state("k", &serde_json::json!(2)).unwrap();
        assert_eq!(db.load_state("k").unwrap(), Some(serde_json::json!(2)));
    }

    #[test]
    fn roster_round_trip_per_side() {
        let db = store();
        let mut a = Roster::new();
        a.add_player("Dhoni", Role::WicketKeeper).unwrap();
        let mut b = Roster::new();
        b.add_player("Bumrah", Role::Bowler).unwrap();

        db.save_roster(Source::A, &a).unwrap();
        db.save_roster(Source::B, &b).unwrap();

        assert_eq!(db.load_roster(Source::A), Some(a));
        assert_eq!(db.load_roster(Source::B), Some(b));
    }

    #[test]
    fn roster_json_shape_matches_stored_format() {
        let db = store();
        let mut a = Roster::new();
        a.add_player("Dhoni", Role::WicketKeeper).unwrap();
        db.save_roster(Source::A, &a).unwrap();

        let raw = db.load_state(TEAM1_KEY).unwrap().unwrap();
        assert_eq!(raw["players"][0]["name"], "Dhoni");
        assert_eq!(raw["players"][0]["role"], "WK");
    }

    #[test]
    fn missing_blobs_load_as_none() {
        let db = store();
        assert!(db.load_roster(Source::A).is_none());
        assert!(db.load_batch().is_none());
        assert!(db.load_generated_at().is_none());
    }

    #[test]
    fn malformed_blobs_are_ignored() {
        let db = store();
        db.save_raw(TEAM2_KEY, "{not json").unwrap();
        db.save_raw(GENERATED_TEAMS_KEY, r#"{"unexpected": true}"#).unwrap();
        db.save_raw(GENERATED_AT_KEY, r#""yesterday""#).unwrap();

        assert!(db.load_roster(Source::B).is_none());
        assert!(db.load_batch().is_none());
        assert!(db.load_generated_at().is_none());
    }

    #[test]
    fn batch_round_trip() {
        let db = store();
        let mut captain = Player::new("Kohli", Role::Batter).stamped(Source::A);
        captain.is_captain = true;
        let batch = GeneratedBatch::new(vec![CompositeRoster::new(vec![
            captain,
            Player::new("Rashid", Role::AllRounder).stamped(Source::B),
        ])]);

        db.save_batch(&batch).unwrap();
        assert_eq!(db.load_batch(), Some(batch));
    }

    #[test]
    fn generated_at_round_trip_and_clear() {
        let db = store();
        let now = Utc::now();
        db.save_generated_at(Some(now)).unwrap();
        let loaded = db.load_generated_at().unwrap();
        assert_eq!(loaded.timestamp_millis(), now.timestamp_millis());

        db.save_generated_at(None).unwrap();
        assert!(db.load_generated_at().is_none());
    }
}
