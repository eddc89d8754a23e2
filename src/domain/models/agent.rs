//! Agent domain model.
//!
//! An agent is a persisted actor in the organization: it has a role, a
//! manager (`reporting_to`), a status, and a main goal. Agents are created by
//! `hire`, mutated by `pause`/`resume`/`fire`/config-update, and never
//! physically deleted — firing only flips `status`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Active,
    Paused,
    Fired,
}

impl Default for AgentStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Fired => "fired",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            "fired" => Some(Self::Fired),
            _ => None,
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| format!("invalid agent status: {s}"))
    }
}

/// A persisted actor within the organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub role: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub reporting_to: Option<String>,
    pub status: AgentStatus,
    pub main_goal: String,
    pub config_path: String,
    pub last_execution_at: Option<DateTime<Utc>>,
    pub total_executions: u32,
    pub total_runtime_minutes: u32,
}

impl Agent {
    /// Construct a new agent with the creation-time defaults from §3.
    pub fn new(
        id: impl Into<String>,
        role: impl Into<String>,
        display_name: impl Into<String>,
        main_goal: impl Into<String>,
        config_path: impl Into<String>,
        created_by: Option<String>,
        reporting_to: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
            display_name: display_name.into(),
            created_at: Utc::now(),
            created_by,
            reporting_to,
            status: AgentStatus::Active,
            main_goal: main_goal.into(),
            config_path: config_path.into(),
            last_execution_at: None,
            total_executions: 0,
            total_runtime_minutes: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AgentStatus::Active
    }
}

/// Partial update applied by `updateAgent`; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct AgentUpdate {
    pub display_name: Option<String>,
    pub status: Option<AgentStatus>,
    pub main_goal: Option<String>,
    pub last_execution_at: Option<DateTime<Utc>>,
    pub total_executions: Option<u32>,
    pub total_runtime_minutes: Option<u32>,
}

/// A row of the transitive closure of the reporting tree: `(agent_id,
/// ancestor_id)` is a composite key; `depth` is 0 for the self-row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgHierarchyRow {
    pub agent_id: String,
    pub ancestor_id: String,
    pub depth: u32,
    pub path: String,
}
