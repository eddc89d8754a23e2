//! Message domain model.
//!
//! Messages flow between agents' inboxes. They are recorded in the store
//! and mirrored as markdown files with YAML-like frontmatter (see
//! `services::messaging`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessagePriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl MessagePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageChannel {
    Internal,
    Slack,
    Telegram,
    Email,
}

impl MessageChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Slack => "slack",
            Self::Telegram => "telegram",
            Self::Email => "email",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub from: String,
    pub to: String,
    pub timestamp: DateTime<Utc>,
    pub priority: MessagePriority,
    pub channel: MessageChannel,
    pub read: bool,
    pub action_required: bool,
    pub subject: Option<String>,
    pub thread_id: Option<String>,
    pub in_reply_to: Option<String>,
    pub body: String,
}

impl Message {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        priority: MessagePriority,
        channel: MessageChannel,
        subject: Option<String>,
        thread_id: Option<String>,
        in_reply_to: Option<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            timestamp: Utc::now(),
            priority,
            channel,
            read: false,
            action_required: false,
            subject,
            thread_id,
            in_reply_to,
            body: body.into(),
        }
    }
}
