//! Agent + org-hierarchy persistence.
//!
//! `create_agent` performs the whole of §4.5's `createAgent` transaction:
//! insert the agent row, the self-reference hierarchy row, and — when the
//! agent reports to a manager — a copy of the manager's own ancestor rows
//! one level deeper, all in the same sqlx transaction.

use sqlx::{Row, SqlitePool};

use crate::domain::models::{Agent, AgentStatus, AgentUpdate, OrgHierarchyRow};

use super::{utils::parse_datetime, DatabaseError};

pub struct AgentRepository {
    pool: SqlitePool,
}

impl AgentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_agent(row: &sqlx::sqlite::SqliteRow) -> Result<Agent, DatabaseError> {
        Ok(Agent {
            id: row.get("id"),
            role: row.get("role"),
            display_name: row.get("display_name"),
            created_at: parse_datetime(row.get::<String, _>("created_at").as_str())?,
            created_by: row.get("created_by"),
            reporting_to: row.get("reporting_to"),
            status: AgentStatus::from_str(row.get::<String, _>("status").as_str())
                .ok_or_else(|| DatabaseError::RowNotFound("invalid agent status".into()))?,
            main_goal: row.get("main_goal"),
            config_path: row.get("config_path"),
            last_execution_at: row
                .get::<Option<String>, _>("last_execution_at")
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            total_executions: row.get::<i64, _>("total_executions") as u32,
            total_runtime_minutes: row.get::<i64, _>("total_runtime_minutes") as u32,
        })
    }

    pub async fn exists(&self, id: &str) -> Result<bool, DatabaseError> {
        let row = sqlx::query("SELECT 1 AS present FROM agents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Agent>, DatabaseError> {
        let row = sqlx::query("SELECT * FROM agents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_agent).transpose()
    }

    /// Hierarchy rows owned by `agent_id` (i.e. `agent_id`'s view of its own
    /// ancestor chain, self-row included).
    pub async fn ancestor_rows(&self, agent_id: &str) -> Result<Vec<OrgHierarchyRow>, DatabaseError> {
        let rows = sqlx::query("SELECT * FROM org_hierarchy WHERE agent_id = ?")
            .bind(agent_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|r| {
                Ok(OrgHierarchyRow {
                    agent_id: r.get("agent_id"),
                    ancestor_id: r.get("ancestor_id"),
                    depth: r.get::<i64, _>("depth") as u32,
                    path: r.get("path"),
                })
            })
            .collect()
    }

    /// Whether `ancestor_id` is a (transitive, depth >= 0) ancestor of
    /// `agent_id`.
    pub async fn is_ancestor(&self, agent_id: &str, ancestor_id: &str) -> Result<bool, DatabaseError> {
        let row = sqlx::query(
            "SELECT 1 AS present FROM org_hierarchy WHERE agent_id = ? AND ancestor_id = ?",
        )
        .bind(agent_id)
        .bind(ancestor_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }

    /// Create the agent, its self-reference row, and — if it reports to a
    /// manager — the copied, depth-shifted ancestor rows. All in one
    /// transaction, per §4.5.
    pub async fn create_agent(&self, agent: &Agent) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO agents (id, role, display_name, created_at, created_by, reporting_to,
                status, main_goal, config_path, last_execution_at, total_executions, total_runtime_minutes)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&agent.id)
        .bind(&agent.role)
        .bind(&agent.display_name)
        .bind(agent.created_at.to_rfc3339())
        .bind(&agent.created_by)
        .bind(&agent.reporting_to)
        .bind(agent.status.as_str())
        .bind(&agent.main_goal)
        .bind(&agent.config_path)
        .bind(agent.last_execution_at.map(|t| t.to_rfc3339()))
        .bind(i64::from(agent.total_executions))
        .bind(i64::from(agent.total_runtime_minutes))
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO org_hierarchy (agent_id, ancestor_id, depth, path) VALUES (?, ?, 0, ?)",
        )
        .bind(&agent.id)
        .bind(&agent.id)
        .bind(&agent.role)
        .execute(&mut *tx)
        .await?;

        if let Some(manager_id) = &agent.reporting_to {
            let manager_rows = sqlx::query("SELECT * FROM org_hierarchy WHERE agent_id = ?")
                .bind(manager_id)
                .fetch_all(&mut *tx)
                .await?;

            for row in manager_rows {
                let ancestor_id: String = row.get("ancestor_id");
                let depth: i64 = row.get("depth");
                let path: String = row.get("path");
                sqlx::query(
                    "INSERT INTO org_hierarchy (agent_id, ancestor_id, depth, path) VALUES (?, ?, ?, ?)",
                )
                .bind(&agent.id)
                .bind(&ancestor_id)
                .bind(depth + 1)
                .bind(format!("{path}/{}", agent.role))
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Apply a partial update to an agent; returns the updated row.
    pub async fn update(&self, id: &str, update: &AgentUpdate) -> Result<Option<Agent>, DatabaseError> {
        let Some(mut agent) = self.get(id).await? else {
            return Ok(None);
        };

        if let Some(v) = &update.display_name {
            agent.display_name = v.clone();
        }
        if let Some(v) = update.status {
            agent.status = v;
        }
        if let Some(v) = &update.main_goal {
            agent.main_goal = v.clone();
        }
        if let Some(v) = update.last_execution_at {
            agent.last_execution_at = Some(v);
        }
        if let Some(v) = update.total_executions {
            agent.total_executions = v;
        }
        if let Some(v) = update.total_runtime_minutes {
            agent.total_runtime_minutes = v;
        }

        sqlx::query(
            "UPDATE agents SET display_name = ?, status = ?, main_goal = ?, last_execution_at = ?,
                total_executions = ?, total_runtime_minutes = ? WHERE id = ?",
        )
        .bind(&agent.display_name)
        .bind(agent.status.as_str())
        .bind(&agent.main_goal)
        .bind(agent.last_execution_at.map(|t| t.to_rfc3339()))
        .bind(i64::from(agent.total_executions))
        .bind(i64::from(agent.total_runtime_minutes))
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Some(agent))
    }

    /// Transitive subordinates (`depth > 0`) of `id`.
    pub async fn subordinates(&self, id: &str) -> Result<Vec<Agent>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT a.* FROM agents a
             JOIN org_hierarchy h ON h.agent_id = a.id
             WHERE h.ancestor_id = ? AND h.depth > 0
             ORDER BY h.depth ASC, a.id ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::row_to_agent).collect()
    }

    /// Direct (depth == 1) subordinates of `id`.
    pub async fn direct_subordinate_count(&self, id: &str) -> Result<u64, DatabaseError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM org_hierarchy WHERE ancestor_id = ? AND depth = 1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<i64, _>("n") as u64)
    }

    pub async fn org_chart(&self) -> Result<Vec<Agent>, DatabaseError> {
        let rows = sqlx::query("SELECT * FROM agents ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_agent).collect()
    }
}
