//! Task persistence, including the optimistic-locking `UPDATE ... WHERE
//! version = ?` pattern from §4.6.2/§9.

use sqlx::{Row, SqlitePool};

use crate::domain::models::{Task, TaskPriority, TaskStatus};

use super::{
    utils::{decode_blocked_by, encode_blocked_by, parse_datetime},
    DatabaseError,
};

pub struct TaskRepository {
    pool: SqlitePool,
}

impl TaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_task(row: &sqlx::sqlite::SqliteRow) -> Result<Task, DatabaseError> {
        Ok(Task {
            id: row.get("id"),
            agent_id: row.get("agent_id"),
            title: row.get("title"),
            status: TaskStatus::from_str(row.get::<String, _>("status").as_str())
                .ok_or_else(|| DatabaseError::RowNotFound("invalid task status".into()))?,
            priority: TaskPriority::from_str(row.get::<String, _>("priority").as_str())
                .ok_or_else(|| DatabaseError::RowNotFound("invalid task priority".into()))?,
            created_at: parse_datetime(row.get::<String, _>("created_at").as_str())?,
            started_at: row
                .get::<Option<String>, _>("started_at")
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            completed_at: row
                .get::<Option<String>, _>("completed_at")
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            blocked_since: row
                .get::<Option<String>, _>("blocked_since")
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            parent_task_id: row.get("parent_task_id"),
            depth: row.get::<i64, _>("depth") as u32,
            percent_complete: row.get::<i64, _>("percent_complete") as u8,
            subtasks_completed: row.get::<i64, _>("subtasks_completed") as u32,
            subtasks_total: row.get::<i64, _>("subtasks_total") as u32,
            delegated_to: row.get("delegated_to"),
            delegated_at: row
                .get::<Option<String>, _>("delegated_at")
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            blocked_by: decode_blocked_by(row.get::<Option<String>, _>("blocked_by").as_deref()),
            task_path: row.get("task_path"),
            version: row.get::<i64, _>("version") as u32,
            last_updated: parse_datetime(row.get::<String, _>("last_updated").as_str())?,
            last_executed: row
                .get::<Option<String>, _>("last_executed")
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            execution_count: row.get::<i64, _>("execution_count") as u32,
        })
    }

    pub async fn get(&self, id: &str) -> Result<Option<Task>, DatabaseError> {
        let row = sqlx::query("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_task).transpose()
    }

    /// One greater than the maximum `N` found in any existing task id for
    /// `agent_id` matching `^task-(\d+)-`.
    pub async fn next_sequence(&self, agent_id: &str) -> Result<u64, DatabaseError> {
        let ids: Vec<String> = sqlx::query("SELECT id FROM tasks WHERE agent_id = ?")
            .bind(agent_id)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|r| r.get::<String, _>("id"))
            .collect();

        let max = ids
            .iter()
            .filter_map(|id| id.strip_prefix("task-"))
            .filter_map(|rest| rest.split('-').next())
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }

    pub async fn insert(&self, task: &Task) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO tasks (id, agent_id, title, status, priority, created_at, started_at,
                completed_at, blocked_since, parent_task_id, depth, percent_complete,
                subtasks_completed, subtasks_total, delegated_to, delegated_at, blocked_by,
                task_path, version, last_updated, last_executed, execution_count,
                auto_blocked_by_pause)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(&task.id)
        .bind(&task.agent_id)
        .bind(&task.title)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.created_at.to_rfc3339())
        .bind(task.started_at.map(|t| t.to_rfc3339()))
        .bind(task.completed_at.map(|t| t.to_rfc3339()))
        .bind(task.blocked_since.map(|t| t.to_rfc3339()))
        .bind(&task.parent_task_id)
        .bind(i64::from(task.depth))
        .bind(i64::from(task.percent_complete))
        .bind(i64::from(task.subtasks_completed))
        .bind(i64::from(task.subtasks_total))
        .bind(&task.delegated_to)
        .bind(task.delegated_at.map(|t| t.to_rfc3339()))
        .bind(encode_blocked_by(&task.blocked_by))
        .bind(&task.task_path)
        .bind(i64::from(task.version))
        .bind(task.last_updated.to_rfc3339())
        .bind(task.last_executed.map(|t| t.to_rfc3339()))
        .bind(i64::from(task.execution_count))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn increment_subtasks_total(&self, parent_id: &str) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE tasks SET subtasks_total = subtasks_total + 1 WHERE id = ?")
            .bind(parent_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn children(&self, parent_id: &str) -> Result<Vec<Task>, DatabaseError> {
        let rows = sqlx::query("SELECT * FROM tasks WHERE parent_task_id = ?")
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_task).collect()
    }

    /// `UPDATE ... WHERE id = ? AND version = ?`; returns rows affected (0 or
    /// 1). The caller maps 0 to `VersionMismatch` (after confirming the row
    /// exists at all, in which case it's `NotFound`).
    #[allow(clippy::too_many_arguments)]
    pub async fn update_status_versioned(
        &self,
        id: &str,
        new_status: TaskStatus,
        expected_version: u32,
        started_at: Option<chrono::DateTime<chrono::Utc>>,
        completed_at: Option<chrono::DateTime<chrono::Utc>>,
        clear_completed_at: bool,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64, DatabaseError> {
        let completed_at_sql = if clear_completed_at {
            None
        } else {
            completed_at.map(|t| t.to_rfc3339())
        };

        let result = sqlx::query(
            "UPDATE tasks SET status = ?, version = version + 1, last_updated = ?,
                started_at = COALESCE(started_at, ?),
                completed_at = CASE WHEN ? THEN NULL ELSE COALESCE(?, completed_at) END
             WHERE id = ? AND version = ?",
        )
        .bind(new_status.as_str())
        .bind(now.to_rfc3339())
        .bind(started_at.map(|t| t.to_rfc3339()))
        .bind(clear_completed_at)
        .bind(completed_at_sql)
        .bind(id)
        .bind(i64::from(expected_version))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn update_progress_versioned(
        &self,
        id: &str,
        percent: u8,
        expected_version: u32,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            "UPDATE tasks SET percent_complete = ?, version = version + 1, last_updated = ?
             WHERE id = ? AND version = ?",
        )
        .bind(i64::from(percent))
        .bind(now.to_rfc3339())
        .bind(id)
        .bind(i64::from(expected_version))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Eventually-consistent parent progress write: no version check (§4.6.4).
    pub async fn update_parent_progress(
        &self,
        id: &str,
        subtasks_completed: u32,
        percent_complete: u8,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE tasks SET subtasks_completed = ?, percent_complete = ?, last_updated = ?
             WHERE id = ?",
        )
        .bind(i64::from(subtasks_completed))
        .bind(i64::from(percent_complete))
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delegate(
        &self,
        id: &str,
        to_agent_id: &str,
        expected_version: Option<u32>,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64, DatabaseError> {
        let result = if let Some(expected) = expected_version {
            sqlx::query(
                "UPDATE tasks SET delegated_to = ?, delegated_at = ?, last_updated = ?,
                    version = version + 1
                 WHERE id = ? AND version = ?",
            )
            .bind(to_agent_id)
            .bind(now.to_rfc3339())
            .bind(now.to_rfc3339())
            .bind(id)
            .bind(i64::from(expected))
            .execute(&self.pool)
            .await?
        } else {
            sqlx::query(
                "UPDATE tasks SET delegated_to = ?, delegated_at = ?, last_updated = ?
                 WHERE id = ?",
            )
            .bind(to_agent_id)
            .bind(now.to_rfc3339())
            .bind(now.to_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await?
        };
        Ok(result.rows_affected())
    }

    /// Active tasks (pending/in-progress/blocked) ordered by priority then
    /// creation time, per §4.6.6.
    pub async fn active_tasks(&self, agent_id: &str) -> Result<Vec<Task>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT * FROM tasks WHERE agent_id = ? AND status IN ('pending', 'in-progress', 'blocked')
             ORDER BY
                CASE priority WHEN 'urgent' THEN 0 WHEN 'high' THEN 1 WHEN 'medium' THEN 2 ELSE 3 END ASC,
                created_at ASC",
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::row_to_task).collect()
    }

    pub async fn blocked_tasks(&self, agent_id: &str) -> Result<Vec<Task>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT * FROM tasks WHERE agent_id = ? AND status = 'blocked'
             ORDER BY
                CASE priority WHEN 'urgent' THEN 0 WHEN 'high' THEN 1 WHEN 'medium' THEN 2 ELSE 3 END ASC,
                created_at ASC",
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::row_to_task).collect()
    }

    /// Non-terminal tasks of an agent, used by `pauseAgent`'s best-effort
    /// blocking.
    pub async fn non_terminal_tasks(&self, agent_id: &str) -> Result<Vec<Task>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT * FROM tasks WHERE agent_id = ? AND status NOT IN ('completed', 'archived')",
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::row_to_task).collect()
    }

    /// Mark a task as auto-blocked by an agent pause: flips status to
    /// `blocked`, stamps `blocked_since`, and sets the `auto_blocked_by_pause`
    /// marker so `resumeAgent` knows to unblock exactly these tasks and not
    /// ones genuinely blocked by a live dependency.
    pub async fn mark_auto_blocked(&self, id: &str, now: chrono::DateTime<chrono::Utc>) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE tasks SET status = 'blocked', blocked_since = ?, auto_blocked_by_pause = 1,
                version = version + 1, last_updated = ?
             WHERE id = ?",
        )
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn auto_blocked_tasks(&self, agent_id: &str) -> Result<Vec<Task>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT * FROM tasks WHERE agent_id = ? AND auto_blocked_by_pause = 1",
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::row_to_task).collect()
    }

    pub async fn unmark_auto_blocked(&self, id: &str, now: chrono::DateTime<chrono::Utc>) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE tasks SET status = 'pending', blocked_since = NULL, auto_blocked_by_pause = 0,
                version = version + 1, last_updated = ?
             WHERE id = ?",
        )
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Overwrite `blocked_by` directly, bypassing the task engine's own
    /// cycle rejection. Exists for the deadlock-detector's own test suite
    /// (§8 scenario 3 requires injecting a cycle "via direct store
    /// manipulation" rather than through `createTask`).
    #[cfg(test)]
    pub async fn force_blocked_by(&self, id: &str, blocked_by: &[String]) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE tasks SET blocked_by = ? WHERE id = ?")
            .bind(encode_blocked_by(blocked_by))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
