//! Message record persistence. The file mirror lives under the agent's
//! inbox (see `infrastructure::fs::path_resolver` and `services::messaging`);
//! this repository only records the DB row.

use sqlx::{Row, SqlitePool};

use crate::domain::models::{Message, MessageChannel, MessagePriority};

use super::{utils::parse_datetime, DatabaseError};

pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_message(row: &sqlx::sqlite::SqliteRow) -> Result<Message, DatabaseError> {
        let priority = match row.get::<String, _>("priority").as_str() {
            "low" => MessagePriority::Low,
            "normal" => MessagePriority::Normal,
            "high" => MessagePriority::High,
            "urgent" => MessagePriority::Urgent,
            _ => return Err(DatabaseError::RowNotFound("invalid message priority".into())),
        };
        let channel = match row.get::<String, _>("channel").as_str() {
            "internal" => MessageChannel::Internal,
            "slack" => MessageChannel::Slack,
            "telegram" => MessageChannel::Telegram,
            "email" => MessageChannel::Email,
            _ => return Err(DatabaseError::RowNotFound("invalid message channel".into())),
        };
        Ok(Message {
            id: row.get("id"),
            from: row.get("from_agent_id"),
            to: row.get("to_agent_id"),
            timestamp: parse_datetime(row.get::<String, _>("timestamp").as_str())?,
            priority,
            channel,
            read: row.get::<i64, _>("read") != 0,
            action_required: row.get::<i64, _>("action_required") != 0,
            subject: row.get("subject"),
            thread_id: row.get("thread_id"),
            in_reply_to: row.get("in_reply_to"),
            body: String::new(),
        })
    }

    pub async fn insert(&self, message: &Message, message_path: &str) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO messages (id, from_agent_id, to_agent_id, timestamp, priority, channel,
                read, action_required, subject, thread_id, in_reply_to, message_path)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&message.id)
        .bind(&message.from)
        .bind(&message.to)
        .bind(message.timestamp.to_rfc3339())
        .bind(message.priority.as_str())
        .bind(message.channel.as_str())
        .bind(message.read)
        .bind(message.action_required)
        .bind(&message.subject)
        .bind(&message.thread_id)
        .bind(&message.in_reply_to)
        .bind(message_path)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn for_agent(&self, agent_id: &str) -> Result<Vec<Message>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE to_agent_id = ? ORDER BY timestamp DESC",
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::row_to_message).collect()
    }
}
