//! Timed response cache
//!
//! SQLite-backed key/value store with per-domain TTLs. Each entry records
//! when it was stored; a read returns the value only while it is younger
//! than the TTL passed by the caller. Storage failures of any kind (file
//! unwritable, corrupt JSON, quota) degrade to a cache miss and are never
//! surfaced to the pipelines.

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Cache key prefixes, one per data domain. Clearing a domain removes
/// exactly the keys under its prefixes.
pub mod prefix {
    pub const QUOTE: &str = "quote_";
    pub const ODDS: &str = "odds_";
    pub const SCORES: &str = "scores_";
    pub const ESPN: &str = "espn_";
    pub const NEWS: &str = "news_";
}

/// Persistent key/value cache with expiry on read.
pub struct TimedCache {
    conn: Mutex<Option<Connection>>,
}

impl TimedCache {
    /// Open (or create) the cache database. A database that cannot be
    /// opened yields a cache that misses on every read.
    pub fn open(path: &Path) -> Self {
        let conn = match Connection::open(path) {
            Ok(conn) => match Self::init_schema(&conn) {
                Ok(()) => Some(conn),
                Err(e) => {
                    warn!("Cache schema init failed, caching disabled: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("Cache open failed at {:?}, caching disabled: {}", path, e);
                None
            }
        };
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// In-memory cache, used by tests and key-less trial runs.
    pub fn in_memory() -> Self {
        let conn = Connection::open_in_memory()
            .ok()
            .and_then(|conn| Self::init_schema(&conn).ok().map(|_| conn));
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS cache_entries (
                key TEXT PRIMARY KEY,
                stored_at_ms INTEGER NOT NULL,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Read a value if present and younger than `ttl`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        self.get_at(key, ttl, Utc::now().timestamp_millis())
    }

    /// Read with an explicit clock, for deterministic expiry tests.
    pub fn get_at<T: DeserializeOwned>(&self, key: &str, ttl: Duration, now_ms: i64) -> Option<T> {
        let guard = self.conn.lock();
        let conn = guard.as_ref()?;

        let row: rusqlite::Result<(i64, String)> = conn.query_row(
            "SELECT stored_at_ms, value FROM cache_entries WHERE key = ?1",
            params![key],
            |row| Ok((row.get(0)?, row.get(1)?)),
        );

        let (stored_at_ms, value) = match row {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => return None,
            Err(e) => {
                warn!("Cache read error for {}: {}", key, e);
                return None;
            }
        };

        if now_ms - stored_at_ms >= ttl.as_millis() as i64 {
            return None;
        }

        match serde_json::from_str(&value) {
            Ok(decoded) => {
                debug!("Using cached data for {}", key);
                Some(decoded)
            }
            Err(e) => {
                // Malformed stored data is a miss, not an error.
                warn!("Cache entry for {} is malformed: {}", key, e);
                None
            }
        }
    }

    /// Store a value, overwriting any previous entry for the key.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        self.set_at(key, value, Utc::now().timestamp_millis());
    }

    /// Store with an explicit timestamp, for deterministic expiry tests.
    pub fn set_at<T: Serialize>(&self, key: &str, value: &T, now_ms: i64) {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Cache encode error for {}: {}", key, e);
                return;
            }
        };

        let guard = self.conn.lock();
        let Some(conn) = guard.as_ref() else { return };

        let result = conn.execute(
            "INSERT INTO cache_entries (key, stored_at_ms, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET stored_at_ms = ?2, value = ?3",
            params![key, now_ms, encoded],
        );
        match result {
            Ok(_) => debug!("Cached data for {}", key),
            Err(e) => warn!("Cache write error for {}: {}", key, e),
        }
    }

    /// Remove a single entry.
    pub fn remove(&self, key: &str) {
        let guard = self.conn.lock();
        let Some(conn) = guard.as_ref() else { return };
        if let Err(e) = conn.execute("DELETE FROM cache_entries WHERE key = ?1", params![key]) {
            warn!("Cache delete error for {}: {}", key, e);
        }
    }

    /// Remove every entry whose key starts with `prefix`.
    pub fn clear_prefix(&self, prefix: &str) {
        let guard = self.conn.lock();
        let Some(conn) = guard.as_ref() else { return };
        let pattern = format!("{}%", prefix.replace('%', "\\%").replace('_', "\\_"));
        let result = conn.execute(
            "DELETE FROM cache_entries WHERE key LIKE ?1 ESCAPE '\\'",
            params![pattern],
        );
        match result {
            Ok(n) => debug!("Cleared {} cache entries under {}", n, prefix),
            Err(e) => warn!("Cache clear error for {}: {}", prefix, e),
        }
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        let guard = self.conn.lock();
        let Some(conn) = guard.as_ref() else { return 0 };
        conn.query_row("SELECT COUNT(*) FROM cache_entries", [], |row| row.get(0))
            .map(|n: i64| n as usize)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
