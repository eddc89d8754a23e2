//! Agent registry: create/update agents, org-hierarchy queries (§4.5).

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::domain::errors::{KernelError, KernelResult};
use crate::domain::models::{Agent, AgentStatus, AgentUpdate, AuditAction, NewAuditEvent};
use crate::infrastructure::database::AgentRepository;
use crate::services::audit_log::AuditLog;

pub struct AgentRegistry {
    agents: Arc<AgentRepository>,
    audit: Arc<AuditLog>,
}

impl AgentRegistry {
    pub fn new(agents: Arc<AgentRepository>, audit: Arc<AuditLog>) -> Self {
        Self { agents, audit }
    }

    /// Insert the agent row plus its org-hierarchy rows (§4.5), then append
    /// the `HIRE` audit row. Precondition checks (manager exists/active,
    /// budget, cycle) are `lifecycle_orchestrator::validate_hire`'s job —
    /// this is the pure registry mutation, reusable outside the full hire
    /// workflow (e.g. by store-seeding test fixtures).
    pub async fn create_agent(&self, agent: &Agent) -> KernelResult<()> {
        if self.agents.exists(&agent.id).await? {
            self.audit
                .record(NewAuditEvent::failure(
                    agent.created_by.clone(),
                    AuditAction::Hire,
                    Some(agent.id.clone()),
                    "agent id already exists",
                ))
                .await;
            return Err(KernelError::Conflict {
                entity: "agent",
                id: agent.id.clone(),
            });
        }

        self.agents.create_agent(agent).await?;

        self.audit
            .record(NewAuditEvent::success(
                agent.created_by.clone(),
                AuditAction::Hire,
                Some(agent.id.clone()),
                json!({ "role": agent.role, "reportingTo": agent.reporting_to }),
            ))
            .await;

        info!(agent_id = %agent.id, role = %agent.role, "agent hired");
        Ok(())
    }

    pub async fn get_agent(&self, id: &str) -> KernelResult<Option<Agent>> {
        Ok(self.agents.get(id).await?)
    }

    /// Apply a partial update, selecting the audit action from the status
    /// transition per §4.5: `active->paused` => PAUSE, `paused->active` =>
    /// RESUME, `->fired` => FIRE, anything else => CONFIG_UPDATE.
    pub async fn update_agent(
        &self,
        id: &str,
        actor: Option<String>,
        update: &AgentUpdate,
    ) -> KernelResult<Agent> {
        let before = self.agents.get(id).await?.ok_or_else(|| KernelError::NotFound {
            entity: "agent",
            id: id.to_string(),
        })?;

        let Some(after) = self.agents.update(id, update).await? else {
            return Err(KernelError::NotFound {
                entity: "agent",
                id: id.to_string(),
            });
        };

        let action = match (before.status, after.status) {
            (AgentStatus::Active, AgentStatus::Paused) => AuditAction::Pause,
            (AgentStatus::Paused, AgentStatus::Active) => AuditAction::Resume,
            (_, AgentStatus::Fired) if before.status != AgentStatus::Fired => AuditAction::Fire,
            _ => AuditAction::ConfigUpdate,
        };

        self.audit
            .record(NewAuditEvent::success(
                actor,
                action,
                Some(id.to_string()),
                json!({ "previousStatus": before.status.as_str(), "newStatus": after.status.as_str() }),
            ))
            .await;

        Ok(after)
    }

    pub async fn get_subordinates(&self, id: &str) -> KernelResult<Vec<Agent>> {
        Ok(self.agents.subordinates(id).await?)
    }

    pub async fn get_org_chart(&self) -> KernelResult<Vec<Agent>> {
        Ok(self.agents.org_chart().await?)
    }

    pub async fn is_subordinate(&self, candidate_id: &str, ancestor_id: &str) -> KernelResult<bool> {
        Ok(self.agents.is_ancestor(candidate_id, ancestor_id).await?)
    }

    pub async fn direct_subordinate_count(&self, id: &str) -> KernelResult<u64> {
        Ok(self.agents.direct_subordinate_count(id).await?)
    }
}
