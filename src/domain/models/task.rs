//! Task domain model.
//!
//! Tasks are units of work owned by an agent. They nest under a
//! `parent_task_id` up to `TASK_MAX_DEPTH`, can be blocked by other tasks,
//! and carry an optimistic-lock `version` token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum nesting depth for a task subtree (root = depth 0).
pub const TASK_MAX_DEPTH: u32 = 5;

/// Status of a task in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Blocked,
    Completed,
    Archived,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Blocked => "blocked",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "in-progress" | "in_progress" => Some(Self::InProgress),
            "blocked" => Some(Self::Blocked),
            "completed" => Some(Self::Completed),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    /// A task counts as "live" (can be blocked on, participates in cycle
    /// detection) unless it has reached a terminal status.
    pub fn is_live(&self) -> bool {
        !matches!(self, Self::Completed | Self::Archived)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority level; ordering is urgent < high < medium < low for queue sort
/// purposes (urgent sorts first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Urgent,
    High,
    Medium,
    Low,
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "urgent" => Some(Self::Urgent),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Sort rank: lower sorts first (urgent first).
    pub fn rank(&self) -> u8 {
        match self {
            Self::Urgent => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work owned by an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub agent_id: String,
    pub title: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub blocked_since: Option<DateTime<Utc>>,
    pub parent_task_id: Option<String>,
    pub depth: u32,
    pub percent_complete: u8,
    pub subtasks_completed: u32,
    pub subtasks_total: u32,
    pub delegated_to: Option<String>,
    pub delegated_at: Option<DateTime<Utc>>,
    pub blocked_by: Vec<String>,
    pub task_path: String,
    pub version: u32,
    pub last_updated: DateTime<Utc>,
    pub last_executed: Option<DateTime<Utc>>,
    pub execution_count: u32,
}

impl Task {
    /// Clamp a raw progress value into the valid `[0, 100]` range.
    pub fn clamp_percent(value: i32) -> u8 {
        value.clamp(0, 100) as u8
    }
}

/// Fields accepted by `createTask`; `id` is generated by the store when
/// absent.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub id: Option<String>,
    pub agent_id: String,
    pub title: String,
    pub priority: Option<TaskPriority>,
    pub parent_task_id: Option<String>,
    pub delegated_to: Option<String>,
    pub task_path: Option<String>,
    pub blocked_by: Vec<String>,
}
