//! Append-only audit logging (§4.10).
//!
//! A thin service wrapper over `AuditRepository`: every state-changing
//! kernel operation calls `record` exactly once, on both the success and
//! failure path. Immutability is enforced by the store's own triggers, not
//! by this layer.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::models::{AuditEvent, NewAuditEvent};
use crate::infrastructure::database::AuditRepository;

pub struct AuditLog {
    repo: Arc<AuditRepository>,
}

impl AuditLog {
    pub fn new(repo: Arc<AuditRepository>) -> Self {
        Self { repo }
    }

    /// Append one row. Logs but does not propagate a failure to append —
    /// the audit trail is best-effort with respect to its own storage
    /// failures, never the reason a kernel operation itself fails.
    pub async fn record(&self, event: NewAuditEvent) {
        let action = event.action;
        let success = event.success;
        match self.repo.append(&event).await {
            Ok(id) => debug!(audit_id = id, action = %action, success, "audit row appended"),
            Err(e) => warn!(action = %action, error = %e, "failed to append audit row"),
        }
    }

    pub async fn for_agent(&self, agent_id: &str) -> Result<Vec<AuditEvent>, crate::infrastructure::database::DatabaseError> {
        self.repo.for_agent(agent_id).await
    }

    pub async fn all(&self) -> Result<Vec<AuditEvent>, crate::infrastructure::database::DatabaseError> {
        self.repo.all().await
    }
}
