//! Commit tagging against an external versioned parameter store.
//!
//! Loggers only need two things from the store: its backing path, recorded in
//! log metadata, and its most recent commit. That capability is the
//! [`CommitSource`] trait; [`CommitDb`] is the bundled `SQLite`-backed
//! implementation.

use std::path::Path;

use jiff::Zoned;
use rusqlite::{Connection, OptionalExtension};

use crate::error::{LogError, Result};

/// A single commit in a versioned store.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    /// Monotonically increasing version tag.
    pub id: i64,
    pub message: String,
    pub committed_at: Zoned,
}

/// What a logger consumes from a versioned store.
pub trait CommitSource {
    /// Backing location of the store, embedded in log metadata.
    fn path(&self) -> &str;

    /// The most recent commit, or `None` if the store has never been
    /// committed to.
    fn latest_commit(&self) -> Result<Option<Commit>>;
}

/// `SQLite`-backed commit store.
///
/// Commit IDs are assigned by the database and only ever increase.
pub struct CommitDb {
    conn: Connection,
    path: String,
}

impl CommitDb {
    /// Opens the commit database at the given path, creating the file and
    /// schema if they don't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS commits (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 message TEXT NOT NULL,
                 committed_at TEXT NOT NULL
             )",
            [],
        )?;
        Ok(Self {
            conn,
            path: path.to_string_lossy().into_owned(),
        })
    }

    /// Records a new commit and returns it with its assigned ID.
    pub fn commit(&self, message: &str) -> Result<Commit> {
        let committed_at = Zoned::now();
        self.conn.execute(
            "INSERT INTO commits (message, committed_at) VALUES (?1, ?2)",
            rusqlite::params![message, committed_at.to_string()],
        )?;
        Ok(Commit {
            id: self.conn.last_insert_rowid(),
            message: message.to_string(),
            committed_at,
        })
    }
}

impl CommitSource for CommitDb {
    fn path(&self) -> &str {
        &self.path
    }

    fn latest_commit(&self) -> Result<Option<Commit>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, message, committed_at FROM commits ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;
        let Some((id, message, committed_at_str)) = row else {
            return Ok(None);
        };
        let committed_at = committed_at_str
            .parse::<Zoned>()
            .map_err(|e| LogError::Corrupt(format!("invalid committed_at: {e}")))?;
        Ok(Some(Commit {
            id,
            message,
            committed_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn test_db() -> (TempDir, CommitDb) {
        let dir = TempDir::new().unwrap();
        let db = CommitDb::open(dir.path().join("params.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn empty_db_has_no_latest_commit() {
        let (_dir, db) = test_db();
        assert!(db.latest_commit().unwrap().is_none());
    }

    #[test]
    fn commit_ids_increase_monotonically() {
        let (_dir, db) = test_db();

        let first = db.commit("initial calibration").unwrap();
        let second = db.commit("retuned").unwrap();

        assert!(second.id > first.id);
    }

    #[test]
    fn latest_commit_tracks_the_newest_entry() {
        let (_dir, db) = test_db();

        db.commit("initial calibration").unwrap();
        let second = db.commit("retuned").unwrap();

        let latest = db.latest_commit().unwrap().unwrap();
        assert_eq!(latest.id, second.id);
        assert_eq!(latest.message, "retuned");
    }

    #[test]
    fn commits_survive_reopening() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("params.db");

        let committed = {
            let db = CommitDb::open(&path).unwrap();
            db.commit("initial calibration").unwrap()
        };

        let db = CommitDb::open(&path).unwrap();
        let latest = db.latest_commit().unwrap().unwrap();
        assert_eq!(latest.id, committed.id);
        assert_eq!(latest.committed_at, committed.committed_at);
    }
}
