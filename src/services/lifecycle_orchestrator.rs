//! Hire/pause/resume/fire workflows and completion notifications (§4.8).
//!
//! These operations compose a DB mutation with filesystem side effects that
//! happen after commit (§5): the store is the source of truth, the agent
//! directory tree is its mirror. Filesystem steps are best-effort except
//! where a hard failure must propagate (`HireAgentError`).

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::errors::{KernelError, KernelResult};
use crate::domain::models::{
    Agent, AgentConfig, AgentStatus, AgentUpdate, AuditAction, Message, MessageChannel, MessagePriority,
    NewAuditEvent, Schedule, ScheduleTrigger, Task, TaskPriority,
};
use crate::infrastructure::database::{AgentRepository, MessageRepository, ScheduleRepository, TaskRepository};
use crate::infrastructure::fs::{atomic_io, AgentPaths};
use crate::services::audit_log::AuditLog;
use crate::services::config_service;
use crate::services::messaging;

/// Error surface for `hireAgent`. `Validation` covers preconditions rejected
/// before any mutation; `Materialization` is raised when the DB insert has
/// already committed but a subsequent filesystem step fails — the DB cannot
/// be rolled back at that point, so this variant carries the agent id the
/// caller must use to run remediation.
#[derive(Debug, Error)]
pub enum HireAgentError {
    #[error(transparent)]
    Validation(#[from] KernelError),

    #[error("hire of agent {agent_id} committed to the store but failed during filesystem setup: {source}")]
    Materialization { agent_id: String, source: KernelError },
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct SubordinateEntry {
    id: String,
    role: String,
    display_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct AgentMetadata {
    hiring_budget_remaining: u32,
    total_executions: u32,
    total_runtime_minutes: u32,
}

pub struct PauseResult {
    pub agent_id: String,
    pub previous_status: AgentStatus,
    pub notifications_sent: u32,
    pub total_tasks: u32,
    pub blocked_count: u32,
    pub already_blocked: u32,
}

pub struct ResumeResult {
    pub agent_id: String,
    pub previous_status: AgentStatus,
    pub notifications_sent: u32,
    pub unblocked_count: u32,
}

pub struct LifecycleOrchestrator {
    agents: Arc<AgentRepository>,
    tasks: Arc<TaskRepository>,
    schedules: Arc<ScheduleRepository>,
    messages: Arc<MessageRepository>,
    audit: Arc<AuditLog>,
    base_dir: PathBuf,
}

impl LifecycleOrchestrator {
    pub fn new(
        agents: Arc<AgentRepository>,
        tasks: Arc<TaskRepository>,
        schedules: Arc<ScheduleRepository>,
        messages: Arc<MessageRepository>,
        audit: Arc<AuditLog>,
        base_dir: PathBuf,
    ) -> Self {
        Self { agents, tasks, schedules, messages, audit, base_dir }
    }

    /// `validateHire` (§4.8.1 step 1).
    async fn validate_hire(&self, manager_id: Option<&str>, config: &AgentConfig) -> KernelResult<()> {
        let new_id = &config.identity.id;

        if self.agents.exists(new_id).await? {
            return Err(KernelError::Conflict { entity: "agent", id: new_id.clone() });
        }

        match manager_id {
            None => {
                if config.identity.reporting_to.is_some() {
                    return Err(KernelError::SchemaInvalid(
                        "reportingTo must be null when no manager is given".to_string(),
                    ));
                }
            }
            Some(manager_id) => {
                if manager_id == new_id {
                    return Err(KernelError::SelfReference(format!("agent {new_id} cannot report to itself")));
                }

                let manager = self.agents.get(manager_id).await?.ok_or_else(|| KernelError::NotFound {
                    entity: "agent",
                    id: manager_id.to_string(),
                })?;
                if !manager.is_active() {
                    return Err(KernelError::InvalidState {
                        entity: "agent",
                        id: manager_id.to_string(),
                        state: manager.status.as_str().to_string(),
                    });
                }

                let manager_config = config_service::load_agent_config(&PathBuf::from(&manager.config_path)).await?;
                if !manager_config.permissions.can_hire {
                    return Err(KernelError::Forbidden(format!("agent {manager_id} is not permitted to hire")));
                }

                let direct_count = self.agents.direct_subordinate_count(manager_id).await?;
                if direct_count >= manager_config.permissions.max_subordinates as u64 {
                    return Err(KernelError::LimitExceeded(format!(
                        "agent {manager_id} already has {direct_count} direct subordinates"
                    )));
                }

                let remaining = self.hiring_budget_remaining(manager_id, &manager_config).await?;
                if remaining == 0 {
                    return Err(KernelError::BudgetExceeded(format!("agent {manager_id} has no hiring budget remaining")));
                }

                if self.agents.is_ancestor(manager_id, new_id).await? {
                    return Err(KernelError::CycleDetected(vec![new_id.clone(), manager_id.to_string()]));
                }
            }
        }

        Ok(())
    }

    async fn hiring_budget_remaining(&self, manager_id: &str, manager_config: &AgentConfig) -> KernelResult<u32> {
        let paths = AgentPaths::new(&self.base_dir, manager_id);
        match atomic_io::safe_load(&paths.metadata_json(), |b| serde_json::from_slice::<AgentMetadata>(b).is_ok()).await {
            Ok(bytes) => {
                let metadata: AgentMetadata =
                    serde_json::from_slice(&bytes).map_err(|e| KernelError::InvalidJson(e.to_string()))?;
                Ok(metadata.hiring_budget_remaining)
            }
            Err(KernelError::NotFound { .. }) => Ok(manager_config.permissions.hiring_budget),
            Err(e) => Err(e),
        }
    }

    /// `hireAgent` (§4.8.1).
    pub async fn hire_agent(&self, manager_id: Option<String>, mut config: AgentConfig) -> Result<Agent, HireAgentError> {
        self.validate_hire(manager_id.as_deref(), &config).await?;
        config.identity.reporting_to = manager_id.clone();

        let created_by = Some(manager_id.clone().unwrap_or_else(|| "system".to_string()));
        let agent = Agent::new(
            config.identity.id.clone(),
            config.identity.role.clone(),
            config.identity.display_name.clone(),
            config.main_goal.clone(),
            AgentPaths::new(&self.base_dir, &config.identity.id).config_json().display().to_string(),
            created_by,
            manager_id.clone(),
        );

        self.agents.create_agent(&agent).await.map_err(KernelError::from)?;

        if let Err(e) = self.materialize_agent_tree(&agent, &config, manager_id.as_deref()).await {
            self.audit
                .record(NewAuditEvent::failure(None, AuditAction::Hire, Some(agent.id.clone()), e.to_string()))
                .await;
            return Err(HireAgentError::Materialization { agent_id: agent.id.clone(), source: e });
        }

        self.audit
            .record(NewAuditEvent::success(
                manager_id.clone(),
                AuditAction::Hire,
                Some(agent.id.clone()),
                json!({ "role": agent.role, "reportingTo": manager_id }),
            ))
            .await;

        info!(agent_id = %agent.id, manager = ?manager_id, "agent hired");
        Ok(agent)
    }

    async fn materialize_agent_tree(
        &self,
        agent: &Agent,
        config: &AgentConfig,
        manager_id: Option<&str>,
    ) -> KernelResult<()> {
        let paths = AgentPaths::new(&self.base_dir, &agent.id);
        for dir in paths.all_dirs() {
            tokio::fs::create_dir_all(&dir).await?;
        }

        config_service::save_agent_config(&paths.config_json(), config).await?;

        let now = Utc::now();
        let schedule = Schedule {
            id: format!("sched-{}", agent.id),
            agent_id: agent.id.clone(),
            trigger_type: ScheduleTrigger::Continuous,
            cron_expression: None,
            next_execution_at: None,
            minimum_interval_seconds: None,
            enabled: true,
            last_triggered_at: None,
            created_at: now,
            updated_at: now,
        };
        self.schedules.insert(&schedule).await?;
        let schedule_json = serde_json::to_vec_pretty(&schedule).map_err(|e| KernelError::InvalidJson(e.to_string()))?;
        atomic_io::atomic_write(&paths.schedule_json(), &schedule_json, true, 0o644).await?;

        let metadata = AgentMetadata {
            hiring_budget_remaining: config.permissions.hiring_budget,
            total_executions: 0,
            total_runtime_minutes: 0,
        };
        let metadata_json = serde_json::to_vec_pretty(&metadata).map_err(|e| KernelError::InvalidJson(e.to_string()))?;
        atomic_io::atomic_write(&paths.metadata_json(), &metadata_json, true, 0o644).await?;

        let empty_registry: Vec<SubordinateEntry> = Vec::new();
        let registry_json =
            serde_json::to_vec_pretty(&empty_registry).map_err(|e| KernelError::InvalidJson(e.to_string()))?;
        atomic_io::atomic_write(&paths.subordinates_registry_json(), &registry_json, true, 0o644).await?;

        let readme = format!(
            "# {}\n\nRole: {}\nMain goal: {}\n",
            agent.display_name, agent.role, agent.main_goal
        );
        atomic_io::atomic_write(&paths.readme(), readme.as_bytes(), true, 0o644).await?;

        if let Some(manager_id) = manager_id {
            self.append_to_subordinate_registry(manager_id, agent).await?;
            self.decrement_hiring_budget(manager_id).await?;
        }

        Ok(())
    }

    async fn append_to_subordinate_registry(&self, manager_id: &str, subordinate: &Agent) -> KernelResult<()> {
        let paths = AgentPaths::new(&self.base_dir, manager_id);
        let path = paths.subordinates_registry_json();

        let mut entries: Vec<SubordinateEntry> = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => Vec::new(),
        };
        entries.push(SubordinateEntry {
            id: subordinate.id.clone(),
            role: subordinate.role.clone(),
            display_name: subordinate.display_name.clone(),
        });

        atomic_io::create_backup(&path).await;
        let bytes = serde_json::to_vec_pretty(&entries).map_err(|e| KernelError::InvalidJson(e.to_string()))?;
        atomic_io::atomic_write(&path, &bytes, true, 0o644).await
    }

    async fn decrement_hiring_budget(&self, manager_id: &str) -> KernelResult<()> {
        let paths = AgentPaths::new(&self.base_dir, manager_id);
        let path = paths.metadata_json();

        let mut metadata: AgentMetadata = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| KernelError::InvalidJson(e.to_string()))?,
            Err(_) => AgentMetadata { hiring_budget_remaining: 0, total_executions: 0, total_runtime_minutes: 0 },
        };
        metadata.hiring_budget_remaining = metadata.hiring_budget_remaining.saturating_sub(1);

        atomic_io::create_backup(&path).await;
        let bytes = serde_json::to_vec_pretty(&metadata).map_err(|e| KernelError::InvalidJson(e.to_string()))?;
        atomic_io::atomic_write(&path, &bytes, true, 0o644).await
    }

    /// `pauseAgent` (§4.8.2).
    pub async fn pause_agent(&self, id: &str) -> KernelResult<PauseResult> {
        let agent = self.agents.get(id).await?.ok_or_else(|| KernelError::NotFound { entity: "agent", id: id.to_string() })?;
        if !matches!(agent.status, AgentStatus::Active) {
            return Err(KernelError::InvalidState { entity: "agent", id: id.to_string(), state: agent.status.as_str().to_string() });
        }

        self.agents
            .update(id, &AgentUpdate { status: Some(AgentStatus::Paused), ..Default::default() })
            .await?;

        let now = Utc::now();
        let non_terminal = self.tasks.non_terminal_tasks(id).await.unwrap_or_default();
        let mut blocked_count = 0u32;
        let mut already_blocked = 0u32;
        for task in &non_terminal {
            if task.status == crate::domain::models::TaskStatus::Blocked {
                already_blocked += 1;
                continue;
            }
            if self.tasks.mark_auto_blocked(&task.id, now).await.is_ok() {
                blocked_count += 1;
            } else {
                warn!(task_id = %task.id, "failed to auto-block task on agent pause");
            }
        }

        let mut notifications_sent = 0u32;
        if self.notify(id, "Paused", "This agent has been paused.").await.is_ok() {
            notifications_sent += 1;
        }
        if let Some(manager_id) = &agent.reporting_to {
            if self.notify(manager_id, "Subordinate Paused", &format!("Agent {id} has been paused.")).await.is_ok() {
                notifications_sent += 1;
            }
        }

        self.audit
            .record(NewAuditEvent::success(
                None,
                AuditAction::Pause,
                Some(id.to_string()),
                json!({ "tasksBlocked": blocked_count, "alreadyBlocked": already_blocked, "totalTasks": non_terminal.len() }),
            ))
            .await;

        Ok(PauseResult {
            agent_id: id.to_string(),
            previous_status: AgentStatus::Active,
            notifications_sent,
            total_tasks: non_terminal.len() as u32,
            blocked_count,
            already_blocked,
        })
    }

    /// `resumeAgent` (§4.8.2).
    pub async fn resume_agent(&self, id: &str) -> KernelResult<ResumeResult> {
        let agent = self.agents.get(id).await?.ok_or_else(|| KernelError::NotFound { entity: "agent", id: id.to_string() })?;
        if !matches!(agent.status, AgentStatus::Paused) {
            return Err(KernelError::InvalidState { entity: "agent", id: id.to_string(), state: agent.status.as_str().to_string() });
        }

        self.agents
            .update(id, &AgentUpdate { status: Some(AgentStatus::Active), ..Default::default() })
            .await?;

        let now = Utc::now();
        let auto_blocked = self.tasks.auto_blocked_tasks(id).await.unwrap_or_default();
        let mut unblocked_count = 0u32;
        for task in &auto_blocked {
            if self.tasks.unmark_auto_blocked(&task.id, now).await.is_ok() {
                unblocked_count += 1;
            } else {
                warn!(task_id = %task.id, "failed to unblock task on agent resume");
            }
        }

        let mut notifications_sent = 0u32;
        if self.notify(id, "Resumed", "This agent has been resumed.").await.is_ok() {
            notifications_sent += 1;
        }
        if let Some(manager_id) = &agent.reporting_to {
            if self.notify(manager_id, "Subordinate Resumed", &format!("Agent {id} has resumed.")).await.is_ok() {
                notifications_sent += 1;
            }
        }

        self.audit
            .record(NewAuditEvent::success(None, AuditAction::Resume, Some(id.to_string()), json!({ "unblockedCount": unblocked_count })))
            .await;

        Ok(ResumeResult { agent_id: id.to_string(), previous_status: AgentStatus::Paused, notifications_sent, unblocked_count })
    }

    /// `fireAgent`: flips status to `fired`; never deletes the row (§3).
    pub async fn fire_agent(&self, id: &str) -> KernelResult<Agent> {
        let agent = self.agents.get(id).await?.ok_or_else(|| KernelError::NotFound { entity: "agent", id: id.to_string() })?;
        if matches!(agent.status, AgentStatus::Fired) {
            return Err(KernelError::InvalidState { entity: "agent", id: id.to_string(), state: "fired".to_string() });
        }

        let after = self
            .agents
            .update(id, &AgentUpdate { status: Some(AgentStatus::Fired), ..Default::default() })
            .await?
            .ok_or_else(|| KernelError::NotFound { entity: "agent", id: id.to_string() })?;

        self.audit
            .record(NewAuditEvent::success(None, AuditAction::Fire, Some(id.to_string()), json!({ "previousStatus": agent.status.as_str() })))
            .await;

        Ok(after)
    }

    async fn notify(&self, recipient_id: &str, subject: &str, body: &str) -> KernelResult<()> {
        let msg = Message::new(
            messaging::generate_message_id(),
            "kernel",
            recipient_id,
            MessagePriority::Normal,
            MessageChannel::Internal,
            Some(subject.to_string()),
            None,
            None,
            body,
        );
        let path = messaging::write_message_to_inbox(&self.base_dir, recipient_id, &msg, false).await?;
        self.messages.insert(&msg, &path.display().to_string()).await?;
        Ok(())
    }

    /// `notifyTaskCompletion` (§4.8.3). Returns `Ok(None)` when no
    /// notification was owed (no manager, or the manager opted out) — this
    /// is success, not an error; callers must not audit a "no manager"
    /// short-circuit as a completion notice.
    pub async fn notify_task_completion(&self, task: &Task) -> KernelResult<Option<Message>> {
        let owner = self.agents.get(&task.agent_id).await?.ok_or_else(|| KernelError::NotFound {
            entity: "agent",
            id: task.agent_id.clone(),
        })?;
        let Some(manager_id) = &owner.reporting_to else {
            return Ok(None);
        };
        let manager = self.agents.get(manager_id).await?.ok_or_else(|| KernelError::NotFound {
            entity: "agent",
            id: manager_id.clone(),
        })?;
        let manager_config = config_service::load_agent_config(&PathBuf::from(&manager.config_path)).await?;
        if !manager_config.communication.notify_on_completion {
            return Ok(None);
        }

        let priority = match task.priority {
            TaskPriority::Urgent | TaskPriority::High => MessagePriority::High,
            TaskPriority::Medium => MessagePriority::Normal,
            TaskPriority::Low => MessagePriority::Low,
        };

        let elapsed = task
            .completed_at
            .zip(Some(task.created_at))
            .map(|(done, start)| done - start)
            .unwrap_or_default();
        let total_minutes = elapsed.num_minutes().max(0);
        let time_to_complete = if total_minutes >= 60 {
            format!("{}h {}m", total_minutes / 60, total_minutes % 60)
        } else {
            format!("{total_minutes}m")
        };

        let body = format!(
            "Title: {}\nOwner: {}\nPriority: {}\nParent: {}\nDepth: {}\nProgress: {}%\nSubtasks: {}/{}\nDelegatedTo: {}\nTaskPath: {}\nTimeToComplete: {}\n",
            task.title,
            owner.id,
            task.priority.as_str(),
            task.parent_task_id.as_deref().unwrap_or("none"),
            task.depth,
            task.percent_complete,
            task.subtasks_completed,
            task.subtasks_total,
            task.delegated_to.as_deref().unwrap_or("none"),
            task.task_path,
            time_to_complete,
        );

        let msg = Message::new(
            messaging::generate_message_id(),
            owner.id.clone(),
            manager_id.clone(),
            priority,
            MessageChannel::Internal,
            Some(format!("Task Completed: {}", task.title)),
            Some(format!("task-{}", task.id)),
            None,
            body,
        );

        let path = messaging::write_message_to_inbox(&self.base_dir, manager_id, &msg, false).await?;
        self.messages.insert(&msg, &path.display().to_string()).await?;

        self.audit
            .record(NewAuditEvent::success(
                Some(owner.id.clone()),
                AuditAction::TaskComplete,
                Some(manager_id.clone()),
                json!({ "taskId": task.id, "action": "notify_completion" }),
            ))
            .await;

        Ok(Some(msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Behavior, Communication, Identity, Permissions};
    use crate::infrastructure::database::{AuditRepository, DatabaseConnection};

    fn config_for(id: &str, role: &str, reporting_to: Option<String>, can_hire: bool) -> AgentConfig {
        AgentConfig {
            identity: Identity { id: id.to_string(), role: role.to_string(), display_name: role.to_string(), reporting_to },
            permissions: Permissions { can_hire, max_subordinates: if can_hire { 5 } else { 0 }, hiring_budget: if can_hire { 2 } else { 0 }, ..Permissions::default() },
            behavior: Behavior::default(),
            communication: Communication::default(),
            main_goal: "do the work".to_string(),
        }
    }

    async fn setup(tmp: &std::path::Path) -> LifecycleOrchestrator {
        let conn = DatabaseConnection::new("sqlite::memory:").await.unwrap();
        conn.migrate().await.unwrap();
        let pool = conn.pool().clone();
        let agents = Arc::new(AgentRepository::new(pool.clone()));
        let tasks = Arc::new(TaskRepository::new(pool.clone()));
        let schedules = Arc::new(ScheduleRepository::new(pool.clone()));
        let messages = Arc::new(MessageRepository::new(pool.clone()));
        let audit = Arc::new(AuditLog::new(Arc::new(AuditRepository::new(pool))));
        LifecycleOrchestrator::new(agents, tasks, schedules, messages, audit, tmp.to_path_buf())
    }

    #[tokio::test]
    async fn hiring_without_a_manager_materializes_the_full_directory_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let orchestrator = setup(tmp.path()).await;
        let config = config_for("ceo", "CEO", None, true);
        let agent = orchestrator.hire_agent(None, config).await.unwrap();

        let paths = AgentPaths::new(tmp.path(), &agent.id);
        assert!(tokio::fs::metadata(paths.config_json()).await.is_ok());
        assert!(tokio::fs::metadata(paths.tasks_active_dir()).await.is_ok());
        assert!(tokio::fs::metadata(paths.readme()).await.is_ok());
    }

    #[tokio::test]
    async fn hiring_under_a_manager_without_can_hire_is_forbidden() {
        let tmp = tempfile::tempdir().unwrap();
        let orchestrator = setup(tmp.path()).await;
        let manager_config = config_for("mgr", "Manager", None, false);
        orchestrator.hire_agent(None, manager_config).await.unwrap();

        let sub_config = config_for("sub", "Sub", Some("mgr".to_string()), false);
        let err = orchestrator.hire_agent(Some("mgr".to_string()), sub_config).await.unwrap_err();
        assert!(matches!(err, HireAgentError::Validation(KernelError::Forbidden(_))));
    }

    #[tokio::test]
    async fn hiring_past_the_budget_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let orchestrator = setup(tmp.path()).await;
        let manager_config = config_for("mgr", "Manager", None, true);
        orchestrator.hire_agent(None, manager_config).await.unwrap();

        for i in 0..2 {
            let sub = config_for(&format!("sub-{i}"), "Sub", Some("mgr".to_string()), false);
            orchestrator.hire_agent(Some("mgr".to_string()), sub).await.unwrap();
        }

        let over_budget = config_for("sub-2", "Sub", Some("mgr".to_string()), false);
        let err = orchestrator.hire_agent(Some("mgr".to_string()), over_budget).await.unwrap_err();
        assert!(matches!(err, HireAgentError::Validation(KernelError::BudgetExceeded(_))));
    }

    #[tokio::test]
    async fn pause_then_resume_round_trips_auto_blocked_tasks() {
        let tmp = tempfile::tempdir().unwrap();
        let orchestrator = setup(tmp.path()).await;
        let config = config_for("agent-1", "Eng", None, false);
        orchestrator.hire_agent(None, config).await.unwrap();

        let pause = orchestrator.pause_agent("agent-1").await.unwrap();
        assert_eq!(pause.previous_status, AgentStatus::Active);

        let resume = orchestrator.resume_agent("agent-1").await.unwrap();
        assert_eq!(resume.previous_status, AgentStatus::Paused);
    }

    #[tokio::test]
    async fn firing_an_already_fired_agent_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let orchestrator = setup(tmp.path()).await;
        let config = config_for("agent-1", "Eng", None, false);
        orchestrator.hire_agent(None, config).await.unwrap();
        orchestrator.fire_agent("agent-1").await.unwrap();
        let err = orchestrator.fire_agent("agent-1").await.unwrap_err();
        assert!(matches!(err, KernelError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn notify_task_completion_is_a_no_op_without_a_manager() {
        let tmp = tempfile::tempdir().unwrap();
        let orchestrator = setup(tmp.path()).await;
        let config = config_for("agent-1", "Eng", None, false);
        orchestrator.hire_agent(None, config).await.unwrap();

        let task = orchestrator
            .tasks
            .insert(&Task {
                id: "task-1-solo".to_string(),
                agent_id: "agent-1".to_string(),
                title: "solo task".to_string(),
                status: crate::domain::models::TaskStatus::Completed,
                priority: TaskPriority::Medium,
                created_at: Utc::now(),
                started_at: None,
                completed_at: Some(Utc::now()),
                blocked_since: None,
                parent_task_id: None,
                depth: 0,
                percent_complete: 100,
                subtasks_completed: 0,
                subtasks_total: 0,
                delegated_to: None,
                delegated_at: None,
                blocked_by: Vec::new(),
                task_path: String::new(),
                version: 0,
                last_updated: Utc::now(),
                last_executed: None,
                execution_count: 0,
            })
            .await;
        task.unwrap();

        let fetched = orchestrator.tasks.get("task-1-solo").await.unwrap().unwrap();
        let result = orchestrator.notify_task_completion(&fetched).await.unwrap();
        assert!(result.is_none());
    }
}
