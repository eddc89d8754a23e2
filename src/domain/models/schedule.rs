//! Schedule domain model.
//!
//! A per-agent execution trigger, consumed by an external executor (out of
//! scope) via "schedules ready now" queries. No cross-schedule invariants
//! are enforced here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What causes a schedule to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleTrigger {
    Continuous,
    Cron,
    Reactive,
}

impl ScheduleTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Continuous => "continuous",
            Self::Cron => "cron",
            Self::Reactive => "reactive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "continuous" => Some(Self::Continuous),
            "cron" => Some(Self::Cron),
            "reactive" => Some(Self::Reactive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub agent_id: String,
    pub trigger_type: ScheduleTrigger,
    pub cron_expression: Option<String>,
    pub next_execution_at: Option<DateTime<Utc>>,
    pub minimum_interval_seconds: Option<u32>,
    pub enabled: bool,
    pub last_triggered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
