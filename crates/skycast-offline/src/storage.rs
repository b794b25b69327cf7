//! Named cache storage: SQLite on disk, or a map in memory.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use rusqlite::{params, Connection, OptionalExtension};
use skycast_core::HttpResponse;

use crate::error::OfflineError;

/// A stored response keyed by its request URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedEntry {
    pub url: String,
    pub response: HttpResponse,
}

/// A set of named caches, each mapping request URLs to responses.
pub trait CacheStorage: Send + Sync {
    /// Names of every cache that exists.
    fn cache_names(&self) -> Result<Vec<String>, OfflineError>;

    /// Create `cache` if needed and store all `entries` in one step.
    ///
    /// Either every entry is written or none is.
    fn put_all(&self, cache: &str, entries: &[CachedEntry]) -> Result<(), OfflineError>;

    fn lookup(&self, cache: &str, url: &str) -> Result<Option<HttpResponse>, OfflineError>;

    /// Stored URLs of `cache`, sorted; empty if the cache does not exist.
    fn keys(&self, cache: &str) -> Result<Vec<String>, OfflineError>;

    /// Drop `cache` and its entries. Returns false if it did not exist.
    fn delete_cache(&self, cache: &str) -> Result<bool, OfflineError>;
}

/// SQLite-backed cache storage.
pub struct SqliteCacheStorage {
    conn: Mutex<Connection>,
}

impl SqliteCacheStorage {
    /// Open (or create) the store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, OfflineError> {
        let conn = Connection::open(path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_schema()?;
        Ok(storage)
    }

    /// Create an in-memory store (for testing).
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, OfflineError> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_schema()?;
        Ok(storage)
    }

    fn init_schema(&self) -> Result<(), OfflineError> {
        self.conn.lock().execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS caches (
                name TEXT PRIMARY KEY,
                created_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS entries (
                cache_name TEXT NOT NULL REFERENCES caches(name) ON DELETE CASCADE,
                url TEXT NOT NULL,
                status INTEGER NOT NULL,
                content_type TEXT,
                body BLOB NOT NULL,
                stored_at INTEGER NOT NULL,
                PRIMARY KEY (cache_name, url)
            );
            "#,
        )?;
        Ok(())
    }
}

impl CacheStorage for SqliteCacheStorage {
    fn cache_names(&self) -> Result<Vec<String>, OfflineError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT name FROM caches ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<String>, _>>()?)
    }

    fn put_all(&self, cache: &str, entries: &[CachedEntry]) -> Result<(), OfflineError> {
        let now = Utc::now().timestamp_millis();
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT OR IGNORE INTO caches (name, created_at) VALUES (?1, ?2)",
            params![cache, now],
        )?;
        for entry in entries {
            tx.execute(
                r#"
                INSERT OR REPLACE INTO entries
                (cache_name, url, status, content_type, body, stored_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    cache,
                    entry.url,
                    entry.response.status,
                    entry.response.content_type,
                    entry.response.body,
                    now,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn lookup(&self, cache: &str, url: &str) -> Result<Option<HttpResponse>, OfflineError> {
        let conn = self.conn.lock();
        let response = conn
            .query_row(
                "SELECT status, content_type, body FROM entries WHERE cache_name = ?1 AND url = ?2",
                params![cache, url],
                |row| Ok(HttpResponse::new(row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        Ok(response)
    }

    fn keys(&self, cache: &str) -> Result<Vec<String>, OfflineError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT url FROM entries WHERE cache_name = ?1 ORDER BY url")?;
        let rows = stmt.query_map(params![cache], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<String>, _>>()?)
    }

    fn delete_cache(&self, cache: &str) -> Result<bool, OfflineError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM entries WHERE cache_name = ?1", params![cache])?;
        let removed = tx.execute("DELETE FROM caches WHERE name = ?1", params![cache])?;
        tx.commit()?;
        Ok(removed > 0)
    }
}

/// Process-local cache storage.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    caches: RwLock<BTreeMap<String, BTreeMap<String, HttpResponse>>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStorage for MemoryCacheStorage {
    fn cache_names(&self) -> Result<Vec<String>, OfflineError> {
        Ok(self.caches.read().keys().cloned().collect())
    }

    fn put_all(&self, cache: &str, entries: &[CachedEntry]) -> Result<(), OfflineError> {
        let mut caches = self.caches.write();
        let target = caches.entry(cache.to_string()).or_default();
        for entry in entries {
            target.insert(entry.url.clone(), entry.response.clone());
        }
        Ok(())
    }

    fn lookup(&self, cache: &str, url: &str) -> Result<Option<HttpResponse>, OfflineError> {
        Ok(self
            .caches
            .read()
            .get(cache)
            .and_then(|entries| entries.get(url))
            .cloned())
    }

    fn keys(&self, cache: &str) -> Result<Vec<String>, OfflineError> {
        Ok(self
            .caches
            .read()
            .get(cache)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn delete_cache(&self, cache: &str) -> Result<bool, OfflineError> {
        Ok(self.caches.write().remove(cache).is_some())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn entry(url: &str, body: &str) -> CachedEntry {
        CachedEntry {
            url: url.to_string(),
            response: HttpResponse::new(200, Some("text/plain".into()), body.as_bytes().to_vec()),
        }
    }

    fn exercise(storage: &dyn CacheStorage) {
        assert!(storage.cache_names().unwrap().is_empty());
        assert!(storage.keys("v1").unwrap().is_empty());

        storage
            .put_all("v1", &[entry("http://a/index.html", "<html>"), entry("http://a/", "root")])
            .unwrap();
        storage.put_all("v2", &[entry("http://a/", "root v2")]).unwrap();

        assert_eq!(storage.cache_names().unwrap(), vec!["v1", "v2"]);
        assert_eq!(
            storage.keys("v1").unwrap(),
            vec!["http://a/", "http://a/index.html"]
        );

        let hit = storage.lookup("v1", "http://a/index.html").unwrap().unwrap();
        assert_eq!(hit.text(), "<html>");
        assert_eq!(hit.content_type.as_deref(), Some("text/plain"));
        assert_eq!(storage.lookup("v2", "http://a/").unwrap().unwrap().text(), "root v2");
        assert!(storage.lookup("v2", "http://a/index.html").unwrap().is_none());

        assert!(storage.delete_cache("v1").unwrap());
        assert!(!storage.delete_cache("v1").unwrap());
        assert_eq!(storage.cache_names().unwrap(), vec!["v2"]);
        assert!(storage.lookup("v1", "http://a/").unwrap().is_none());
    }

    #[test]
    fn test_sqlite_storage() {
        exercise(&SqliteCacheStorage::in_memory().unwrap());
    }

    #[test]
    fn test_memory_storage() {
        exercise(&MemoryCacheStorage::new());
    }

    #[test]
    fn test_put_all_replaces_entry() {
        let storage = SqliteCacheStorage::in_memory().unwrap();
        storage.put_all("v1", &[entry("http://a/", "old")]).unwrap();
        storage.put_all("v1", &[entry("http://a/", "new")]).unwrap();

        assert_eq!(storage.keys("v1").unwrap().len(), 1);
        assert_eq!(storage.lookup("v1", "http://a/").unwrap().unwrap().text(), "new");
    }

    #[test]
    fn test_empty_install_creates_cache() {
        let storage = SqliteCacheStorage::in_memory().unwrap();
        storage.put_all("v1", &[]).unwrap();
        assert_eq!(storage.cache_names().unwrap(), vec!["v1"]);
    }

    #[test]
    fn test_sqlite_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offline.sqlite");

        {
            let storage = SqliteCacheStorage::new(&path).unwrap();
            storage.put_all("skycast-v1", &[entry("http://a/style.css", "body{}")]).unwrap();
        }

        let storage = SqliteCacheStorage::new(&path).unwrap();
        assert_eq!(storage.cache_names().unwrap(), vec!["skycast-v1"]);
        assert_eq!(
            storage.lookup("skycast-v1", "http://a/style.css").unwrap().unwrap().text(),
            "body{}"
        );
    }
}
