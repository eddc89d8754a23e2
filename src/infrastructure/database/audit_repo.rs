//! Append-only audit log persistence. Mutation is blocked at the schema
//! level (triggers in `schema::SCHEMA_SQL`); this repository only inserts
//! and queries.

use sqlx::{Row, SqlitePool};

use crate::domain::models::{AuditAction, AuditEvent, NewAuditEvent};

use super::{utils::parse_datetime, DatabaseError};

pub struct AuditRepository {
    pool: SqlitePool,
}

impl AuditRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_event(row: &sqlx::sqlite::SqliteRow) -> Result<AuditEvent, DatabaseError> {
        let action = parse_action(row.get::<String, _>("action").as_str())
            .ok_or_else(|| DatabaseError::RowNotFound("invalid audit action".into()))?;
        Ok(AuditEvent {
            id: row.get("id"),
            timestamp: parse_datetime(row.get::<String, _>("timestamp").as_str())?,
            actor_agent_id: row.get("agent_id"),
            action,
            target_agent_id: row.get("target_agent_id"),
            success: row.get::<i64, _>("success") != 0,
            details: serde_json::from_str(row.get::<String, _>("details").as_str())
                .unwrap_or(serde_json::Value::Null),
        })
    }

    /// Append one row. Returns the assigned rowid.
    pub async fn append(&self, event: &NewAuditEvent) -> Result<i64, DatabaseError> {
        let details = serde_json::to_string(&event.details)?;
        let result = sqlx::query(
            "INSERT INTO audit_log (agent_id, action, target_agent_id, success, details)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&event.actor_agent_id)
        .bind(event.action.as_str())
        .bind(&event.target_agent_id)
        .bind(event.success)
        .bind(details)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn for_agent(&self, agent_id: &str) -> Result<Vec<AuditEvent>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT * FROM audit_log WHERE agent_id = ? OR target_agent_id = ? ORDER BY id ASC",
        )
        .bind(agent_id)
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::row_to_event).collect()
    }

    pub async fn all(&self) -> Result<Vec<AuditEvent>, DatabaseError> {
        let rows = sqlx::query("SELECT * FROM audit_log ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_event).collect()
    }
}

fn parse_action(s: &str) -> Option<AuditAction> {
    match s {
        "HIRE" => Some(AuditAction::Hire),
        "FIRE" => Some(AuditAction::Fire),
        "PAUSE" => Some(AuditAction::Pause),
        "RESUME" => Some(AuditAction::Resume),
        "CONFIG_UPDATE" => Some(AuditAction::ConfigUpdate),
        "TASK_CREATE" => Some(AuditAction::TaskCreate),
        "TASK_UPDATE" => Some(AuditAction::TaskUpdate),
        "TASK_COMPLETE" => Some(AuditAction::TaskComplete),
        "DELEGATE" => Some(AuditAction::Delegate),
        "SYSTEM_MESSAGE" => Some(AuditAction::SystemMessage),
        _ => None,
    }
}
