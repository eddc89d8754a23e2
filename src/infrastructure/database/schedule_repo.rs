//! Schedule persistence. No cross-schedule invariants; consumed via
//! "schedules ready now" by an external executor (out of scope).

use sqlx::{Row, SqlitePool};

use crate::domain::models::{Schedule, ScheduleTrigger};

use super::{utils::parse_datetime, DatabaseError};

pub struct ScheduleRepository {
    pool: SqlitePool,
}

impl ScheduleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_schedule(row: &sqlx::sqlite::SqliteRow) -> Result<Schedule, DatabaseError> {
        Ok(Schedule {
            id: row.get("id"),
            agent_id: row.get("agent_id"),
            trigger_type: ScheduleTrigger::from_str(row.get::<String, _>("trigger_type").as_str())
                .ok_or_else(|| DatabaseError::RowNotFound("invalid trigger_type".into()))?,
            cron_expression: row.get("cron_expression"),
            next_execution_at: row
                .get::<Option<String>, _>("next_execution_at")
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            minimum_interval_seconds: row
                .get::<Option<i64>, _>("minimum_interval_seconds")
                .map(|v| v as u32),
            enabled: row.get::<i64, _>("enabled") != 0,
            last_triggered_at: row
                .get::<Option<String>, _>("last_triggered_at")
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            created_at: parse_datetime(row.get::<String, _>("created_at").as_str())?,
            updated_at: parse_datetime(row.get::<String, _>("updated_at").as_str())?,
        })
    }

    pub async fn insert(&self, schedule: &Schedule) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO schedules (id, agent_id, trigger_type, cron_expression, next_execution_at,
                minimum_interval_seconds, enabled, last_triggered_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&schedule.id)
        .bind(&schedule.agent_id)
        .bind(schedule.trigger_type.as_str())
        .bind(&schedule.cron_expression)
        .bind(schedule.next_execution_at.map(|t| t.to_rfc3339()))
        .bind(schedule.minimum_interval_seconds.map(i64::from))
        .bind(schedule.enabled)
        .bind(schedule.last_triggered_at.map(|t| t.to_rfc3339()))
        .bind(schedule.created_at.to_rfc3339())
        .bind(schedule.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn for_agent(&self, agent_id: &str) -> Result<Vec<Schedule>, DatabaseError> {
        let rows = sqlx::query("SELECT * FROM schedules WHERE agent_id = ?")
            .bind(agent_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_schedule).collect()
    }

    /// Schedules enabled and due at or before `now`.
    pub async fn ready_now(&self, now: chrono::DateTime<chrono::Utc>) -> Result<Vec<Schedule>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT * FROM schedules WHERE enabled = 1
             AND (next_execution_at IS NULL OR next_execution_at <= ?)",
        )
        .bind(now.to_rfc3339())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::row_to_schedule).collect()
    }
}
