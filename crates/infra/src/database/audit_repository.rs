//! SQLite-backed implementation of the AuditLog port.

use std::sync::Arc;

use async_trait::async_trait;
use chairside_core::scheduling::ports::AuditLog;
use chairside_domain::constants::PUBLIC_ACTOR_ROLE;
use chairside_domain::{Actor, Result};
use chrono::Utc;
use rusqlite::params;
use tracing::instrument;

use super::manager::DbManager;
use crate::errors::InfraError;

/// SQLite implementation of AuditLog, an append-only trail of who invoked
/// which engine operation.
pub struct SqliteAuditLog {
    manager: Arc<DbManager>,
}

impl SqliteAuditLog {
    /// Create a new audit log
    pub fn new(manager: Arc<DbManager>) -> Self {
        Self { manager }
    }

    /// Number of recorded entries, for diagnostics and tests.
    pub fn entry_count(&self) -> Result<i64> {
        let conn = self.manager.get()?;
        let count = conn
            .query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))
            .map_err(InfraError::from)?;
        Ok(count)
    }
}

#[async_trait]
impl AuditLog for SqliteAuditLog {
    #[instrument(skip(self, actor, details))]
    async fn record(&self, actor: Option<&Actor>, action: &str, details: &str) -> Result<()> {
        let conn = self.manager.get()?;

        let actor_id = actor.and_then(|a| a.id);
        let actor_role = actor.map_or(PUBLIC_ACTOR_ROLE, |a| a.role.as_str());

        conn.execute(
            "INSERT INTO audit_log (actor_id, actor_role, action, details, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![actor_id, actor_role, action, details, Utc::now()],
        )
        .map_err(InfraError::from)?;

        Ok(())
    }
}
