//! Database repository layer
//!
//! Stores tags keyed by storage domain and session id.

use crate::error::{Error, Result};
use crate::types::{SessionKey, StorageDomain};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// A stored tag with its write time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTag {
    pub key: SessionKey,
    pub tag: String,
    pub updated_at: DateTime<Utc>,
}

/// Database handle (single connection)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        super::schema::run_migrations(&conn)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Persistence("database connection lock poisoned".to_string()))
    }

    // ============================================
    // Tag operations
    // ============================================

    /// Insert or replace the tag for a session (last write wins)
    pub fn upsert_tag(&self, key: &SessionKey, tag: &str, updated_at: DateTime<Utc>) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO session_tags (domain, session_id, tag, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(domain, session_id) DO UPDATE SET
                tag = excluded.tag,
                updated_at = excluded.updated_at
            "#,
            params![key.domain.as_str(), key.id, tag, updated_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Get the stored tag for a session
    pub fn get_tag(&self, key: &SessionKey) -> Result<Option<StoredTag>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT * FROM session_tags WHERE domain = ?1 AND session_id = ?2",
            params![key.domain.as_str(), key.id],
            Self::row_to_stored_tag,
        )
        .optional()
        .map_err(Error::from)
    }

    /// All stored tags for one storage domain, keyed by session id
    pub fn load_tags(&self, domain: StorageDomain) -> Result<HashMap<String, String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT session_id, tag FROM session_tags WHERE domain = ?1")?;
        let rows = stmt.query_map([domain.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut tags = HashMap::new();
        for row in rows {
            let (id, tag) = row?;
            tags.insert(id, tag);
        }
        Ok(tags)
    }

    /// Most recently written tag, if any
    pub fn latest_tag(&self) -> Result<Option<StoredTag>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT * FROM session_tags ORDER BY updated_at DESC LIMIT 1",
            [],
            Self::row_to_stored_tag,
        )
        .optional()
        .map_err(Error::from)
    }

    /// Number of stored tags, empty ones included
    pub fn count_tags(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM session_tags", [], |r| r.get(0))?;
        Ok(count)
    }

    fn row_to_stored_tag(row: &Row) -> rusqlite::Result<StoredTag> {
        let domain_str: String = row.get("domain")?;
        let updated_at_str: String = row.get("updated_at")?;

        let domain = domain_str.parse::<StorageDomain>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                e.into(),
            )
        })?;

        Ok(StoredTag {
            key: SessionKey::new(domain, row.get::<_, String>("session_id")?),
            tag: row.get("tag")?,
            updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    #[test]
    fn upsert_then_get() {
        let db = db();
        let key = SessionKey::local("/videos/2024-09-10 20-01-02 - Raid.mp4");
        let now = Utc::now();

        db.upsert_tag(&key, "prog", now).unwrap();
        let stored = db.get_tag(&key).unwrap().expect("tag stored");

        assert_eq!(stored.key, key);
        assert_eq!(stored.tag, "prog");
        assert_eq!(stored.updated_at.timestamp(), now.timestamp());
    }

    #[test]
    fn later_write_replaces_earlier() {
        let db = db();
        let key = SessionKey::cloud("raid-1.mp4");
        let now = Utc::now();

        db.upsert_tag(&key, "first", now).unwrap();
        db.upsert_tag(&key, "second", now - Duration::hours(1)).unwrap();

        // Arrival order wins, not the timestamp.
        assert_eq!(db.get_tag(&key).unwrap().unwrap().tag, "second");
        assert_eq!(db.count_tags().unwrap(), 1);
    }

    #[test]
    fn domains_are_disjoint() {
        let db = db();
        let now = Utc::now();
        db.upsert_tag(&SessionKey::local("a.mp4"), "local tag", now).unwrap();
        db.upsert_tag(&SessionKey::cloud("a.mp4"), "cloud tag", now).unwrap();

        let local = db.load_tags(StorageDomain::Local).unwrap();
        let cloud = db.load_tags(StorageDomain::Cloud).unwrap();

        assert_eq!(local.get("a.mp4").map(String::as_str), Some("local tag"));
        assert_eq!(cloud.get("a.mp4").map(String::as_str), Some("cloud tag"));
        assert_eq!(db.count_tags().unwrap(), 2);
    }

    #[test]
    fn latest_tag_orders_by_write_time() {
        let db = db();
        assert!(db.latest_tag().unwrap().is_none());

        let now = Utc::now();
        db.upsert_tag(&SessionKey::local("new.mp4"), "new", now).unwrap();
        db.upsert_tag(&SessionKey::local("old.mp4"), "old", now - Duration::days(2))
            .unwrap();

        assert_eq!(db.latest_tag().unwrap().unwrap().tag, "new");
    }

    #[test]
    fn missing_tag_is_none() {
        let db = db();
        assert!(db.get_tag(&SessionKey::local("nope")).unwrap().is_none());
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/tags.db");
        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();
        assert!(path.exists());
    }
}
