//! Audit event domain model.
//!
//! Append-only record of every state-changing kernel operation. The store
//! layer enforces immutability via triggers (see
//! `infrastructure::database::schema`); this module only models the row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of state-changing operation an audit row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Hire,
    Fire,
    Pause,
    Resume,
    ConfigUpdate,
    TaskCreate,
    TaskUpdate,
    TaskComplete,
    Delegate,
    SystemMessage,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hire => "HIRE",
            Self::Fire => "FIRE",
            Self::Pause => "PAUSE",
            Self::Resume => "RESUME",
            Self::ConfigUpdate => "CONFIG_UPDATE",
            Self::TaskCreate => "TASK_CREATE",
            Self::TaskUpdate => "TASK_UPDATE",
            Self::TaskComplete => "TASK_COMPLETE",
            Self::Delegate => "DELEGATE",
            Self::SystemMessage => "SYSTEM_MESSAGE",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single append-only audit row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub actor_agent_id: Option<String>,
    pub action: AuditAction,
    pub target_agent_id: Option<String>,
    pub success: bool,
    pub details: Value,
}

/// Fields needed to append a new audit row; `id`/`timestamp` are assigned by
/// the store.
#[derive(Debug, Clone)]
pub struct NewAuditEvent {
    pub actor_agent_id: Option<String>,
    pub action: AuditAction,
    pub target_agent_id: Option<String>,
    pub success: bool,
    pub details: Value,
}

impl NewAuditEvent {
    pub fn success(
        actor_agent_id: Option<String>,
        action: AuditAction,
        target_agent_id: Option<String>,
        details: Value,
    ) -> Self {
        Self {
            actor_agent_id,
            action,
            target_agent_id,
            success: true,
            details,
        }
    }

    pub fn failure(
        actor_agent_id: Option<String>,
        action: AuditAction,
        target_agent_id: Option<String>,
        error: impl std::fmt::Display,
    ) -> Self {
        Self {
            actor_agent_id,
            action,
            target_agent_id,
            success: false,
            details: serde_json::json!({ "error": error.to_string() }),
        }
    }
}
