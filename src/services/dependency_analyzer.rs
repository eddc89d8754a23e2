//! Cycle detection on the `blocked_by` graph (§4.7).
//!
//! Pure with respect to the store: every lookup goes through
//! `TaskRepository::get`, and a missing task or unparseable `blocked_by` is
//! treated as "no dependencies" rather than raised, keeping the detector
//! total over any stored state.

use std::sync::Arc;

use crate::infrastructure::database::TaskRepository;

pub struct DependencyAnalyzer {
    tasks: Arc<TaskRepository>,
}

impl DependencyAnalyzer {
    pub fn new(tasks: Arc<TaskRepository>) -> Self {
        Self { tasks }
    }

    /// DFS from `start_id` over `blocked_by` edges. Returns the cycle as the
    /// path slice from the first repeated node, or `None` if the start id is
    /// not reachable into a cycle.
    pub async fn detect_task_deadlock(&self, start_id: &str) -> Option<Vec<String>> {
        let mut path: Vec<String> = Vec::new();
        self.walk(start_id, &mut path).await
    }

    /// True if `target_id` is reachable from `start_id` by following
    /// `blocked_by` edges. Used by `createTask`'s cycle-probe: a not-yet-
    /// inserted task can only be part of an existing chain if its id was
    /// explicitly chosen and some live task already names it as a blocker.
    pub async fn reaches(&self, start_id: &str, target_id: &str) -> bool {
        self.walk_to(start_id, target_id, &mut Vec::new()).await
    }

    fn walk_to<'a>(
        &'a self,
        node: &'a str,
        target: &'a str,
        visited: &'a mut Vec<String>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = bool> + Send + 'a>> {
        Box::pin(async move {
            if node == target {
                return true;
            }
            if visited.iter().any(|id| id == node) {
                return false;
            }
            visited.push(node.to_string());

            let blockers = match self.tasks.get(node).await {
                Ok(Some(task)) => task.blocked_by,
                _ => Vec::new(),
            };

            for blocker in &blockers {
                if self.walk_to(blocker, target, visited).await {
                    return true;
                }
            }
            false
        })
    }

    fn walk<'a>(
        &'a self,
        node: &'a str,
        path: &'a mut Vec<String>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Option<Vec<String>>> + Send + 'a>> {
        Box::pin(async move {
            if let Some(pos) = path.iter().position(|id| id == node) {
                return Some(path[pos..].to_vec());
            }

            path.push(node.to_string());

            let blockers = match self.tasks.get(node).await {
                Ok(Some(task)) => task.blocked_by,
                _ => Vec::new(),
            };

            for blocker in &blockers {
                if let Some(cycle) = self.walk(blocker, path).await {
                    return Some(cycle);
                }
            }

            path.pop();
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{NewTask, TaskPriority};
    use crate::infrastructure::database::DatabaseConnection;
    use crate::services::task_engine::TaskEngine;
    use std::sync::Arc;

    async fn setup() -> (Arc<TaskRepository>, TaskEngine) {
        let conn = DatabaseConnection::new("sqlite::memory:").await.unwrap();
        conn.migrate().await.unwrap();
        let pool = conn.pool().clone();
        let tasks = Arc::new(TaskRepository::new(pool.clone()));
        let agents = Arc::new(crate::infrastructure::database::AgentRepository::new(pool.clone()));
        let audit = Arc::new(crate::infrastructure::database::AuditRepository::new(pool));
        agents
            .create_agent(&crate::domain::models::Agent::new(
                "agent-1", "eng", "Eng", "ship", "agent-1/config.json", None, None,
            ))
            .await
            .unwrap();
        let engine = TaskEngine::new(tasks.clone(), agents, audit);
        (tasks, engine)
    }

    #[tokio::test]
    async fn finds_no_cycle_on_unrelated_task() {
        let (tasks, engine) = setup().await;
        let t = engine
            .create_task(NewTask {
                id: None,
                agent_id: "agent-1".to_string(),
                title: "solo".to_string(),
                priority: Some(TaskPriority::Medium),
                parent_task_id: None,
                delegated_to: None,
                task_path: None,
                blocked_by: Vec::new(),
            })
            .await
            .unwrap();

        let analyzer = DependencyAnalyzer::new(tasks);
        assert!(analyzer.detect_task_deadlock(&t.id).await.is_none());
    }

    #[tokio::test]
    async fn finds_cycle_injected_directly_into_the_store() {
        let (tasks, engine) = setup().await;
        let a = engine
            .create_task(NewTask {
                id: None,
                agent_id: "agent-1".to_string(),
                title: "a".to_string(),
                priority: None,
                parent_task_id: None,
                delegated_to: None,
                task_path: None,
                blocked_by: Vec::new(),
            })
            .await
            .unwrap();
        let b = engine
            .create_task(NewTask {
                id: None,
                agent_id: "agent-1".to_string(),
                title: "b".to_string(),
                priority: None,
                parent_task_id: None,
                delegated_to: None,
                task_path: None,
                blocked_by: Vec::new(),
            })
            .await
            .unwrap();
        let c = engine
            .create_task(NewTask {
                id: None,
                agent_id: "agent-1".to_string(),
                title: "c".to_string(),
                priority: None,
                parent_task_id: None,
                delegated_to: None,
                task_path: None,
                blocked_by: Vec::new(),
            })
            .await
            .unwrap();

        // Inject a cycle directly, bypassing createTask's own cycle rejection,
        // to exercise the detector against an already-persisted cyclic graph.
        tasks.force_blocked_by(&a.id, &[b.id.clone()]).await.unwrap();
        tasks.force_blocked_by(&b.id, &[c.id.clone()]).await.unwrap();
        tasks.force_blocked_by(&c.id, &[a.id.clone()]).await.unwrap();

        let analyzer = DependencyAnalyzer::new(tasks);
        let cycle = analyzer.detect_task_deadlock(&a.id).await.unwrap();
        assert_eq!(cycle.len(), 3);
        for id in [&a.id, &b.id, &c.id] {
            assert!(cycle.contains(id));
        }
    }
}
