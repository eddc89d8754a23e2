//! Progress roll-up, deadlock detection, and optimistic-lock scenarios,
//! exercised through the `Kernel` facade (and, where the store needs to be
//! put into a state `createTask` itself would refuse to reach, through raw
//! SQL against the same pool, mirroring "via direct store manipulation").

mod common;

use std::sync::Arc;

use foreman::domain::models::{AgentConfig, Behavior, Communication, Identity, NewTask, Permissions, TaskStatus};
use foreman::infrastructure::database::{AgentRepository, AuditRepository, DatabaseConnection, TaskRepository};
use foreman::services::{AgentRegistry, AuditLog, DependencyAnalyzer, TaskEngine};

fn solo_config(id: &str) -> AgentConfig {
    AgentConfig {
        identity: Identity { id: id.to_string(), role: "eng".to_string(), display_name: "Eng".to_string(), reporting_to: None },
        permissions: Permissions::default(),
        behavior: Behavior::default(),
        communication: Communication::default(),
        main_goal: "ship".to_string(),
    }
}

fn root_task(agent_id: &str, title: &str) -> NewTask {
    NewTask {
        id: None,
        agent_id: agent_id.to_string(),
        title: title.to_string(),
        priority: None,
        parent_task_id: None,
        delegated_to: None,
        task_path: None,
        blocked_by: Vec::new(),
    }
}

fn child_task(agent_id: &str, parent: &str, title: &str) -> NewTask {
    NewTask { parent_task_id: Some(parent.to_string()), ..root_task(agent_id, title) }
}

async fn fetch_task(kernel: &foreman::Kernel, agent_id: &str, id: &str) -> foreman::domain::models::Task {
    let active = kernel.tasks.active_tasks(agent_id).await.unwrap();
    if let Some(t) = active.into_iter().find(|t| t.id == id) {
        return t;
    }
    let blocked = kernel.tasks.blocked_tasks(agent_id).await.unwrap();
    blocked.into_iter().find(|t| t.id == id).expect("task present in the agent's active or blocked set")
}

#[tokio::test]
async fn three_children_completing_in_order_rolls_up_to_33_67_100() {
    let (_tmp, kernel) = common::kernel().await;
    kernel.lifecycle.hire_agent(None, solo_config("agent-1")).await.unwrap();

    let parent = kernel.tasks.create_task(root_task("agent-1", "parent")).await.unwrap();
    let c1 = kernel.tasks.create_task(child_task("agent-1", &parent.id, "child-1")).await.unwrap();
    let c2 = kernel.tasks.create_task(child_task("agent-1", &parent.id, "child-2")).await.unwrap();
    let c3 = kernel.tasks.create_task(child_task("agent-1", &parent.id, "child-3")).await.unwrap();

    kernel.tasks.update_status(&c1.id, TaskStatus::Completed, 0).await.unwrap();
    let after_one = fetch_task(&kernel, "agent-1", &parent.id).await;
    assert_eq!(after_one.subtasks_completed, 1);
    assert_eq!(after_one.percent_complete, 33);

    kernel.tasks.update_status(&c2.id, TaskStatus::Completed, 0).await.unwrap();
    let after_two = fetch_task(&kernel, "agent-1", &parent.id).await;
    assert_eq!(after_two.subtasks_completed, 2);
    assert_eq!(after_two.percent_complete, 67);

    kernel.tasks.update_status(&c3.id, TaskStatus::Completed, 0).await.unwrap();
    let after_three = fetch_task(&kernel, "agent-1", &parent.id).await;
    assert_eq!(after_three.subtasks_completed, 3);
    assert_eq!(after_three.percent_complete, 100);
}

#[tokio::test]
async fn deadlock_detected_from_every_member_of_an_injected_cycle_and_absent_for_unrelated_task() {
    let conn = DatabaseConnection::new("sqlite::memory:").await.unwrap();
    conn.migrate().await.unwrap();
    let pool = conn.pool().clone();

    let agents = Arc::new(AgentRepository::new(pool.clone()));
    let tasks = Arc::new(TaskRepository::new(pool.clone()));
    let audit_repo = Arc::new(AuditRepository::new(pool.clone()));
    let audit = Arc::new(AuditLog::new(audit_repo.clone()));
    let registry = AgentRegistry::new(agents.clone(), audit);
    registry
        .create_agent(&foreman::domain::models::Agent::new("agent-1", "eng", "Eng", "ship", "agent-1/config.json", None, None))
        .await
        .unwrap();

    let engine = TaskEngine::new(tasks.clone(), agents.clone(), audit_repo);
    let analyzer = DependencyAnalyzer::new(tasks.clone());

    let a = engine.create_task(root_task("agent-1", "a")).await.unwrap();
    let b = engine.create_task(root_task("agent-1", "b")).await.unwrap();
    let c = engine.create_task(root_task("agent-1", "c")).await.unwrap();
    let unrelated = engine.create_task(root_task("agent-1", "unrelated")).await.unwrap();

    for (task_id, blocker_id) in [(&a.id, &b.id), (&b.id, &c.id), (&c.id, &a.id)] {
        sqlx::query("UPDATE tasks SET blocked_by = ? WHERE id = ?")
            .bind(serde_json::to_string(&vec![blocker_id.clone()]).unwrap())
            .bind(task_id)
            .execute(&pool)
            .await
            .unwrap();
    }

    for member in [&a.id, &b.id, &c.id] {
        let cycle = analyzer.detect_task_deadlock(member).await.unwrap();
        assert_eq!(cycle.len(), 3);
        for id in [&a.id, &b.id, &c.id] {
            assert!(cycle.contains(id));
        }
    }

    assert!(analyzer.detect_task_deadlock(&unrelated.id).await.is_none());
}

#[tokio::test]
async fn version_mismatch_then_refetch_then_retry_succeeds() {
    let (_tmp, kernel) = common::kernel().await;
    kernel.lifecycle.hire_agent(None, solo_config("agent-1")).await.unwrap();

    let task = kernel.tasks.create_task(root_task("agent-1", "shared")).await.unwrap();
    assert_eq!(task.version, 0);

    // Reader 1 updates at version 0: succeeds, bumps to version 1.
    let after_reader_one = kernel.tasks.update_status(&task.id, TaskStatus::InProgress, 0).await.unwrap();
    assert_eq!(after_reader_one.version, 1);

    // Reader 2 still holds the stale version 0: rejected.
    let err = kernel.tasks.update_status(&task.id, TaskStatus::Blocked, 0).await.unwrap_err();
    assert!(matches!(err, foreman::KernelError::VersionMismatch { expected: 0, .. }));

    // Reader 2 re-fetches (now at version 1) and retries: succeeds, bumps to 2.
    let refetched = fetch_task(&kernel, "agent-1", &task.id).await;
    assert_eq!(refetched.version, 1);
    let after_retry = kernel.tasks.update_status(&task.id, TaskStatus::Blocked, refetched.version).await.unwrap();
    assert_eq!(after_retry.version, 2);
}
