// src/persist/store.rs — SQLite operations

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

/// Low-level SQLite operations for context snapshots and the event mirror.
pub struct Store {
    conn: Connection,
}

/// A mirrored usage event as stored.
#[derive(Debug, Clone)]
pub struct UsageEventRow {
    pub id: String,
    pub user_id: String,
    pub tool_id: String,
    pub action: String,
    pub success: bool,
    pub data_json: Option<String>,
    pub created_at: String,
}

impl Store {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // -- User contexts --

    pub fn upsert_user_context(
        &self,
        user_id: &str,
        context_json: &str,
    ) -> anyhow::Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO user_contexts (user_id, context_json, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET context_json = ?2, updated_at = ?3",
            params![user_id, context_json, now],
        )?;
        Ok(())
    }

    pub fn get_user_context(&self, user_id: &str) -> anyhow::Result<Option<String>> {
        let json = self
            .conn
            .query_row(
                "SELECT context_json FROM user_contexts WHERE user_id = ?1",
                [user_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(json)
    }

    pub fn count_user_contexts(&self) -> anyhow::Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM user_contexts", [], |r| r.get(0))?;
        Ok(count)
    }

    // -- Usage event mirror --

    pub fn insert_usage_event(
        &self,
        id: &str,
        user_id: &str,
        tool_id: &str,
        action: &str,
        success: bool,
        data_json: Option<&str>,
        created_at: &str,
    ) -> anyhow::Result<()> {
        self.conn.execute(
            "INSERT INTO usage_events (id, user_id, tool_id, action, success, data_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![id, user_id, tool_id, action, success, data_json, created_at],
        )?;
        Ok(())
    }

    /// Most recent mirrored events for a user, newest last.
    pub fn query_recent_events(
        &self,
        user_id: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<UsageEventRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, tool_id, action, success, data_json, created_at
             FROM usage_events WHERE user_id = ?1
             ORDER BY created_at DESC LIMIT ?2",
        )?;
        let mut rows: Vec<UsageEventRow> = stmt
            .query_map(params![user_id, limit as i64], |row| {
                Ok(UsageEventRow {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    tool_id: row.get(2)?,
                    action: row.get(3)?,
                    success: row.get(4)?,
                    data_json: row.get(5)?,
                    created_at: row.get(6)?,
                })
            })?
            .collect::<Result<_, _>>()?;
        rows.reverse();
        Ok(rows)
    }

    pub fn count_usage_events(&self) -> anyhow::Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM usage_events", [], |r| r.get(0))?;
        Ok(count)
    }
}
