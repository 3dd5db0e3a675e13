use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, Result};
use std::path::Path;

use crate::analytics::DEFAULT_SUBJECT;
use crate::models::{Companion, CompanionRecord, SessionEntry};
use crate::source::CompanionSource;

// Fixed-width so timestamps sort lexically
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS companions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                subject TEXT,
                topic TEXT,
                duration INTEGER CHECK(duration IS NULL OR duration >= 0),
                created_at TEXT NOT NULL
            );

            -- One row per session a user held with a companion
            CREATE TABLE IF NOT EXISTS session_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                companion_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (companion_id) REFERENCES companions(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_companions_user ON companions(user_id);
            CREATE INDEX IF NOT EXISTS idx_session_history_user ON session_history(user_id);
            CREATE INDEX IF NOT EXISTS idx_session_history_companion ON session_history(companion_id);
            "#,
        )?;

        Ok(())
    }

    // Companion operations
    pub fn add_companion(
        &self,
        user_id: &str,
        name: &str,
        subject: Option<&str>,
        topic: Option<&str>,
        duration: Option<u32>,
    ) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO companions (user_id, name, subject, topic, duration, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![user_id, name, subject, topic, duration, now_timestamp()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_companion(&self, id: i64) -> Result<Option<Companion>> {
        let companion = self.conn.query_row(
            r#"
            SELECT id, user_id, name, subject, topic, duration, created_at
            FROM companions
            WHERE id = ?1
            "#,
            params![id],
            |row| {
                Ok(Companion {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    name: row.get(2)?,
                    subject: row.get(3)?,
                    topic: row.get(4)?,
                    duration: row.get(5)?,
                    created_at: row.get(6)?,
                })
            },
        );

        match companion {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn list_companions(&self, user_id: &str) -> Result<Vec<Companion>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, user_id, name, subject, topic, duration, created_at
            FROM companions
            WHERE user_id = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )?;

        let rows = stmt.query_map(params![user_id], |row| {
            Ok(Companion {
                id: row.get(0)?,
                user_id: row.get(1)?,
                name: row.get(2)?,
                subject: row.get(3)?,
                topic: row.get(4)?,
                duration: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;

        rows.collect()
    }

    /// Deletes only if `user_id` owns the companion.
    pub fn delete_companion(&self, user_id: &str, id: i64) -> Result<bool> {
        let rows = self.conn.execute(
            "DELETE FROM companions WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }

    // Session history operations
    pub fn record_session(&self, user_id: &str, companion_id: i64) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO session_history (user_id, companion_id, created_at) VALUES (?1, ?2, ?3)",
            params![user_id, companion_id, now_timestamp()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent first. `None` returns the full history.
    pub fn list_sessions(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<SessionEntry>> {
        // SQLite treats a negative LIMIT as unbounded
        let limit: i64 = limit.map(|l| l as i64).unwrap_or(-1);

        let mut stmt = self.conn.prepare(
            r#"
            SELECT sh.id, sh.companion_id, c.name, c.subject, c.topic, c.duration, sh.created_at
            FROM session_history sh
            JOIN companions c ON c.id = sh.companion_id
            WHERE sh.user_id = ?1
            ORDER BY sh.created_at DESC, sh.id DESC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![user_id, limit], |row| {
            Ok(SessionEntry {
                id: row.get(0)?,
                companion_id: row.get(1)?,
                companion_name: row.get(2)?,
                subject: row.get(3)?,
                topic: row.get(4)?,
                duration: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;

        rows.collect()
    }

    pub fn get_stats(&self, user_id: &str) -> Result<Stats> {
        let companions: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM companions WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;

        let sessions: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM session_history WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;

        let subjects: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT COALESCE(NULLIF(subject, ''), ?2)) FROM companions WHERE user_id = ?1",
            params![user_id, DEFAULT_SUBJECT],
            |row| row.get(0),
        )?;

        Ok(Stats {
            companions,
            sessions,
            subjects,
        })
    }
}

impl CompanionSource for Database {
    fn get_user_sessions(&self, user_id: &str) -> crate::error::Result<Vec<CompanionRecord>> {
        let sessions = self.list_sessions(user_id, None)?;
        Ok(sessions.iter().map(CompanionRecord::from).collect())
    }

    fn get_user_companions(&self, user_id: &str) -> crate::error::Result<Vec<CompanionRecord>> {
        let companions = self.list_companions(user_id)?;
        Ok(companions.iter().map(CompanionRecord::from).collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub companions: i64,
    pub sessions: i64,
    pub subjects: i64,
}
