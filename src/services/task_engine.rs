//! Task lifecycle: creation, status/progress updates, delegation, queries
//! (§4.6).

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::domain::errors::{KernelError, KernelResult};
use crate::domain::models::{
    AuditAction, NewAuditEvent, NewTask, Task, TaskPriority, TaskStatus, TASK_MAX_DEPTH,
};
use crate::infrastructure::database::{AgentRepository, AuditRepository, TaskRepository};
use crate::services::config_service::slug;
use crate::services::dependency_analyzer::DependencyAnalyzer;

pub struct TaskEngine {
    tasks: Arc<TaskRepository>,
    agents: Arc<AgentRepository>,
    audit: Arc<AuditRepository>,
    dependencies: DependencyAnalyzer,
}

impl TaskEngine {
    pub fn new(tasks: Arc<TaskRepository>, agents: Arc<AgentRepository>, audit: Arc<AuditRepository>) -> Self {
        let dependencies = DependencyAnalyzer::new(tasks.clone());
        Self { tasks, agents, audit, dependencies }
    }

    async fn record(&self, action: AuditAction, target: Option<String>, success: bool, details: serde_json::Value) {
        let event = if success {
            NewAuditEvent::success(None, action, target, details)
        } else {
            NewAuditEvent::failure(None, action, target, details.to_string())
        };
        let _ = self.audit.append(&event).await;
    }

    /// `createTask` (§4.6.1): validate agent/parent/blockers, probe for
    /// cycles among the requested blockers, then insert.
    pub async fn create_task(&self, input: NewTask) -> KernelResult<Task> {
        if self.agents.get(&input.agent_id).await?.is_none() {
            return Err(KernelError::NotFound { entity: "agent", id: input.agent_id.clone() });
        }

        let (depth, task_path) = if let Some(parent_id) = &input.parent_task_id {
            let parent = self.tasks.get(parent_id).await?.ok_or_else(|| KernelError::NotFound {
                entity: "task",
                id: parent_id.clone(),
            })?;
            if parent.depth >= TASK_MAX_DEPTH {
                return Err(KernelError::DepthExceeded(format!(
                    "task {parent_id} is already at max depth {TASK_MAX_DEPTH}"
                )));
            }
            (parent.depth + 1, input.task_path.clone().unwrap_or(parent.task_path.clone()))
        } else {
            (0, input.task_path.clone().unwrap_or_default())
        };

        let id = match &input.id {
            Some(id) => id.clone(),
            None => {
                let n = self.tasks.next_sequence(&input.agent_id).await?;
                format!("task-{n}-{}", slug(&input.title))
            }
        };

        for blocker_id in &input.blocked_by {
            if *blocker_id == id {
                self.record(
                    AuditAction::TaskCreate,
                    Some(id.clone()),
                    false,
                    json!({ "error": "self-reference" }),
                )
                .await;
                return Err(KernelError::SelfReference(format!("task {id} cannot block itself")));
            }
            let blocker = self.tasks.get(blocker_id).await?.ok_or_else(|| KernelError::BlockerMissing(blocker_id.clone()))?;
            if !blocker.status.is_live() {
                return Err(KernelError::BlockerTerminal(blocker_id.clone()));
            }
            if self.dependencies.reaches(blocker_id, &id).await {
                return Err(KernelError::CycleDetected(vec![id.clone(), blocker_id.clone()]));
            }
        }

        let now = Utc::now();
        let blocked = !input.blocked_by.is_empty();
        let task = Task {
            id: id.clone(),
            agent_id: input.agent_id.clone(),
            title: input.title.clone(),
            status: if blocked { TaskStatus::Blocked } else { TaskStatus::Pending },
            priority: input.priority.unwrap_or_default(),
            created_at: now,
            started_at: None,
            completed_at: None,
            blocked_since: if blocked { Some(now) } else { None },
            parent_task_id: input.parent_task_id.clone(),
            depth,
            percent_complete: 0,
            subtasks_completed: 0,
            subtasks_total: 0,
            delegated_to: input.delegated_to.clone(),
            delegated_at: if input.delegated_to.is_some() { Some(now) } else { None },
            blocked_by: input.blocked_by.clone(),
            task_path,
            version: 0,
            last_updated: now,
            last_executed: None,
            execution_count: 0,
        };

        if let Err(e) = self.tasks.insert(&task).await {
            self.record(AuditAction::TaskCreate, Some(id.clone()), false, json!({ "error": e.to_string() })).await;
            return Err(e.into());
        }

        if let Some(parent_id) = &input.parent_task_id {
            self.tasks.increment_subtasks_total(parent_id).await?;
        }

        self.record(
            AuditAction::TaskCreate,
            Some(id.clone()),
            true,
            json!({ "agentId": task.agent_id, "title": task.title }),
        )
        .await;
        info!(task_id = %task.id, agent_id = %task.agent_id, "task created");
        Ok(task)
    }

    /// `updateStatus` (§4.6.2).
    pub async fn update_status(&self, id: &str, new_status: TaskStatus, expected_version: u32) -> KernelResult<Task> {
        let current = self.tasks.get(id).await?.ok_or_else(|| KernelError::NotFound {
            entity: "task",
            id: id.to_string(),
        })?;

        let now = Utc::now();
        let started_at = matches!(new_status, TaskStatus::InProgress).then_some(now);
        let completed_at = matches!(new_status, TaskStatus::Completed).then_some(now);
        let clear_completed_at = !matches!(new_status, TaskStatus::Completed);

        let rows = self
            .tasks
            .update_status_versioned(id, new_status, expected_version, started_at, completed_at, clear_completed_at, now)
            .await?;

        let action = if matches!(new_status, TaskStatus::Completed) { AuditAction::TaskComplete } else { AuditAction::TaskUpdate };

        if rows == 0 {
            self.record(action, Some(id.to_string()), false, json!({ "error": "version mismatch" })).await;
            return Err(KernelError::VersionMismatch { entity: "task", id: id.to_string(), expected: expected_version });
        }

        self.record(
            action,
            Some(id.to_string()),
            true,
            json!({ "previousStatus": current.status.as_str(), "newStatus": new_status.as_str() }),
        )
        .await;

        if matches!(new_status, TaskStatus::Completed) {
            if let Some(parent_id) = &current.parent_task_id {
                self.update_parent_task_progress(parent_id).await?;
            }
        }

        self.tasks.get(id).await?.ok_or_else(|| KernelError::NotFound { entity: "task", id: id.to_string() })
    }

    /// `updateProgress` (§4.6.3).
    pub async fn update_progress(&self, id: &str, percent: i32, expected_version: u32) -> KernelResult<Task> {
        let current = self.tasks.get(id).await?.ok_or_else(|| KernelError::NotFound {
            entity: "task",
            id: id.to_string(),
        })?;
        let clamped = Task::clamp_percent(percent);
        let now = Utc::now();

        let rows = self.tasks.update_progress_versioned(id, clamped, expected_version, now).await?;
        if rows == 0 {
            self.record(AuditAction::TaskUpdate, Some(id.to_string()), false, json!({ "error": "version mismatch" })).await;
            return Err(KernelError::VersionMismatch { entity: "task", id: id.to_string(), expected: expected_version });
        }

        self.record(
            AuditAction::TaskUpdate,
            Some(id.to_string()),
            true,
            json!({ "previousProgress": current.percent_complete, "newProgress": clamped }),
        )
        .await;

        self.tasks.get(id).await?.ok_or_else(|| KernelError::NotFound { entity: "task", id: id.to_string() })
    }

    /// `updateParentTaskProgress` (§4.6.4): recompute a parent's rollup from
    /// its children, write it without a version check, then recurse upward.
    /// Recursion depth is bounded by `TASK_MAX_DEPTH`.
    pub async fn update_parent_task_progress(&self, parent_id: &str) -> KernelResult<()> {
        let Some(parent) = self.tasks.get(parent_id).await? else {
            return Ok(());
        };

        let children = self.tasks.children(parent_id).await?;
        let completed_count = children.iter().filter(|c| c.status == TaskStatus::Completed).count() as u32;
        let pct = if parent.subtasks_total > 0 {
            ((100 * completed_count as u64) as f64 / parent.subtasks_total as f64).round() as u8
        } else {
            0
        };

        let now = Utc::now();
        self.tasks.update_parent_progress(parent_id, completed_count, pct, now).await?;

        self.record(
            AuditAction::TaskUpdate,
            Some(parent_id.to_string()),
            true,
            json!({ "action": "parent_progress_update", "completedCount": completed_count, "percentComplete": pct }),
        )
        .await;

        if let Some(grandparent_id) = &parent.parent_task_id {
            Box::pin(self.update_parent_task_progress(grandparent_id)).await?;
        }
        Ok(())
    }

    /// `delegateTask` (§4.6.5).
    pub async fn delegate_task(
        &self,
        task_id: &str,
        to_agent_id: &str,
        expected_version: Option<u32>,
    ) -> KernelResult<Task> {
        let task = self.tasks.get(task_id).await?.ok_or_else(|| KernelError::NotFound {
            entity: "task",
            id: task_id.to_string(),
        })?;
        if self.agents.get(to_agent_id).await?.is_none() {
            return Err(KernelError::NotFound { entity: "agent", id: to_agent_id.to_string() });
        }

        if !self.agents.is_ancestor(to_agent_id, &task.agent_id).await? {
            return Err(KernelError::NotSubordinate(to_agent_id.to_string(), task.agent_id.clone()));
        }

        if task.delegated_to.as_deref() == Some(to_agent_id) {
            return Ok(task);
        }

        let now = Utc::now();
        let rows = self.tasks.delegate(task_id, to_agent_id, expected_version, now).await?;
        if let Some(expected) = expected_version {
            if rows == 0 {
                self.record(AuditAction::Delegate, Some(task_id.to_string()), false, json!({ "error": "version mismatch" })).await;
                return Err(KernelError::VersionMismatch { entity: "task", id: task_id.to_string(), expected });
            }
        }

        self.record(
            AuditAction::Delegate,
            Some(task_id.to_string()),
            true,
            json!({ "action": "delegate", "fromAgent": task.agent_id, "toAgent": to_agent_id }),
        )
        .await;

        self.tasks.get(task_id).await?.ok_or_else(|| KernelError::NotFound { entity: "task", id: task_id.to_string() })
    }

    /// `getActiveTasks` (§4.6.6).
    pub async fn active_tasks(&self, agent_id: &str) -> KernelResult<Vec<Task>> {
        Ok(self.tasks.active_tasks(agent_id).await?)
    }

    /// `getBlockedTasks` (§4.6.6).
    pub async fn blocked_tasks(&self, agent_id: &str) -> KernelResult<Vec<Task>> {
        Ok(self.tasks.blocked_tasks(agent_id).await?)
    }

    /// `completeTask` (§4.6.6): rejects an already-archived task, otherwise
    /// delegates to `updateStatus`.
    pub async fn complete_task(&self, id: &str, expected_version: u32) -> KernelResult<Task> {
        let current = self.tasks.get(id).await?.ok_or_else(|| KernelError::NotFound {
            entity: "task",
            id: id.to_string(),
        })?;
        if current.status == TaskStatus::Archived {
            return Err(KernelError::InvalidState {
                entity: "task",
                id: id.to_string(),
                state: current.status.as_str().to_string(),
            });
        }
        self.update_status(id, TaskStatus::Completed, expected_version).await
    }

    pub fn priority_rank(priority: TaskPriority) -> u8 {
        priority.rank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Agent;
    use crate::infrastructure::database::DatabaseConnection;

    async fn setup() -> (TaskEngine, Arc<AgentRepository>) {
        let conn = DatabaseConnection::new("sqlite::memory:").await.unwrap();
        conn.migrate().await.unwrap();
        let pool = conn.pool().clone();
        let tasks = Arc::new(TaskRepository::new(pool.clone()));
        let agents = Arc::new(AgentRepository::new(pool.clone()));
        let audit = Arc::new(AuditRepository::new(pool));
        agents
            .create_agent(&Agent::new("agent-1", "eng", "Eng", "ship", "agent-1/config.json", None, None))
            .await
            .unwrap();
        (TaskEngine::new(tasks, agents.clone(), audit), agents)
    }

    fn new_task(title: &str) -> NewTask {
        NewTask {
            id: None,
            agent_id: "agent-1".to_string(),
            title: title.to_string(),
            priority: None,
            parent_task_id: None,
            delegated_to: None,
            task_path: None,
            blocked_by: Vec::new(),
        }
    }

    #[tokio::test]
    async fn create_task_generates_sequential_slugged_ids() {
        let (engine, _agents) = setup().await;
        let a = engine.create_task(new_task("Ship release")).await.unwrap();
        let b = engine.create_task(new_task("Ship release")).await.unwrap();
        assert_eq!(a.id, "task-1-ship-release");
        assert_eq!(b.id, "task-2-ship-release");
        assert_eq!(a.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn create_task_with_live_blocker_is_blocked() {
        let (engine, _agents) = setup().await;
        let blocker = engine.create_task(new_task("blocker")).await.unwrap();
        let mut input = new_task("dependent");
        input.blocked_by = vec![blocker.id.clone()];
        let dependent = engine.create_task(input).await.unwrap();
        assert_eq!(dependent.status, TaskStatus::Blocked);
        assert!(dependent.blocked_since.is_some());
    }

    #[tokio::test]
    async fn create_task_rejects_terminal_blocker() {
        let (engine, _agents) = setup().await;
        let blocker = engine.create_task(new_task("blocker")).await.unwrap();
        engine.update_status(&blocker.id, TaskStatus::Completed, 0).await.unwrap();
        let mut input = new_task("dependent");
        input.blocked_by = vec![blocker.id.clone()];
        let err = engine.create_task(input).await.unwrap_err();
        assert!(matches!(err, KernelError::BlockerTerminal(_)));
    }

    #[tokio::test]
    async fn update_status_with_stale_version_is_rejected() {
        let (engine, _agents) = setup().await;
        let task = engine.create_task(new_task("work")).await.unwrap();
        engine.update_status(&task.id, TaskStatus::InProgress, 0).await.unwrap();
        let err = engine.update_status(&task.id, TaskStatus::Completed, 0).await.unwrap_err();
        assert!(matches!(err, KernelError::VersionMismatch { .. }));
    }

    #[tokio::test]
    async fn completing_children_propagates_rollup_to_parent() {
        let (engine, _agents) = setup().await;
        let parent = engine.create_task(new_task("parent")).await.unwrap();
        let mut c1 = new_task("child-1");
        c1.parent_task_id = Some(parent.id.clone());
        let child1 = engine.create_task(c1).await.unwrap();
        let mut c2 = new_task("child-2");
        c2.parent_task_id = Some(parent.id.clone());
        let child2 = engine.create_task(c2).await.unwrap();

        engine.update_status(&child1.id, TaskStatus::Completed, 0).await.unwrap();
        let parent_after_one = engine.tasks.get(&parent.id).await.unwrap().unwrap();
        assert_eq!(parent_after_one.subtasks_completed, 1);
        assert_eq!(parent_after_one.percent_complete, 50);

        engine.update_status(&child2.id, TaskStatus::Completed, 0).await.unwrap();
        let parent_after_two = engine.tasks.get(&parent.id).await.unwrap().unwrap();
        assert_eq!(parent_after_two.subtasks_completed, 2);
        assert_eq!(parent_after_two.percent_complete, 100);
    }

    #[tokio::test]
    async fn delegate_task_requires_a_transitive_subordinate() {
        let (engine, agents) = setup().await;
        agents
            .create_agent(&Agent::new("agent-2", "eng", "Eng2", "ship", "agent-2/config.json", None, None))
            .await
            .unwrap();
        let task = engine.create_task(new_task("work")).await.unwrap();
        let err = engine.delegate_task(&task.id, "agent-2", None).await.unwrap_err();
        assert!(matches!(err, KernelError::NotSubordinate(_, _)));
    }

    #[tokio::test]
    async fn delegate_task_to_same_agent_twice_is_idempotent() {
        let (engine, agents) = setup().await;
        agents
            .create_agent(&Agent::new(
                "sub-1", "eng", "Sub", "ship", "sub-1/config.json", None, Some("agent-1".to_string()),
            ))
            .await
            .unwrap();
        let task = engine.create_task(new_task("work")).await.unwrap();
        let once = engine.delegate_task(&task.id, "sub-1", None).await.unwrap();
        let twice = engine.delegate_task(&task.id, "sub-1", None).await.unwrap();
        assert_eq!(once.version, twice.version);
    }

    #[tokio::test]
    async fn complete_task_rejects_archived_task() {
        let (engine, _agents) = setup().await;
        let task = engine.create_task(new_task("work")).await.unwrap();
        engine.tasks.update_status_versioned(&task.id, TaskStatus::Archived, 0, None, None, true, Utc::now()).await.unwrap();
        let err = engine.complete_task(&task.id, 1).await.unwrap_err();
        assert!(matches!(err, KernelError::InvalidState { .. }));
    }
}
