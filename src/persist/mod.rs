// src/persist/mod.rs — Persistence adapter (SQLite)

pub mod schema;
pub mod store;

use async_trait::async_trait;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::context::events::ToolUsageEvent;
use crate::context::seed::SeedSource;
use crate::infra::errors::VonkError;

/// Owns the SQLite connection behind the seed source.
pub struct PersistManager {
    pub store: store::Store,
}

impl PersistManager {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> Result<Self, VonkError> {
        let conn = Connection::open(path)?;
        // Enable WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        schema::run_migrations(&conn)?;

        Ok(Self {
            store: store::Store::new(conn),
        })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, VonkError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        schema::run_migrations(&conn)?;
        Ok(Self {
            store: store::Store::new(conn),
        })
    }

    /// Wrap this manager in a shareable seed source for the engine.
    pub fn into_seed_source(self) -> SqliteSeedSource {
        SqliteSeedSource {
            store: Arc::new(Mutex::new(self.store)),
        }
    }
}

/// Seed source backed by the SQLite store: loads cold-start snapshots,
/// mirrors profile snapshots and tracked events.
#[derive(Clone)]
pub struct SqliteSeedSource {
    store: Arc<Mutex<store::Store>>,
}

impl SqliteSeedSource {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, store::Store>, VonkError> {
        self.store.lock().map_err(|_| VonkError::LockPoisoned)
    }

    /// Shared access to the underlying store (status reporting).
    pub fn with_store<T>(
        &self,
        f: impl FnOnce(&store::Store) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let store = self.lock()?;
        f(&store)
    }
}

#[async_trait]
impl SeedSource for SqliteSeedSource {
    async fn load_seed(&self, user_id: &str) -> anyhow::Result<Option<serde_json::Value>> {
        let json = self.lock()?.get_user_context(user_id)?;
        match json {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn save_context(
        &self,
        user_id: &str,
        context: &serde_json::Value,
    ) -> anyhow::Result<()> {
        let raw = serde_json::to_string(context)?;
        self.lock()?.upsert_user_context(user_id, &raw)?;
        Ok(())
    }

    async fn record_event(&self, user_id: &str, event: &ToolUsageEvent) -> anyhow::Result<()> {
        let id = Uuid::new_v4().to_string();
        let data_json = event
            .data
            .as_ref()
            .map(|d| serde_json::to_string(d))
            .transpose()?;
        self.lock()?.insert_usage_event(
            &id,
            user_id,
            &event.tool_id,
            &event.action,
            event.success,
            data_json.as_deref(),
            &event.timestamp.to_rfc3339(),
        )?;
        Ok(())
    }
}
