//! Agent configuration document.
//!
//! The validated JSON document persisted at `<agent>/config.json`. The
//! document shape is intentionally plain data (serde, `deny_unknown_fields`
//! for schema strictness) — merging happens generically over
//! `serde_json::Value` (see `services::config_service::merge_configs`) so the
//! merge rule in §4.4/§9 stays schema-agnostic.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Identity {
    pub id: String,
    pub role: String,
    pub display_name: String,
    pub reporting_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Permissions {
    pub can_hire: bool,
    pub max_subordinates: u32,
    pub hiring_budget: u32,
    pub can_access_external_apis: bool,
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    pub max_execution_minutes: u32,
    pub can_escalate: bool,
    #[serde(default)]
    pub workspace_quota_mb: u32,
    #[serde(default)]
    pub max_delegation_depth: u32,
    #[serde(default)]
    pub max_cost_usd: f64,
}

impl Default for Permissions {
    fn default() -> Self {
        Self {
            can_hire: false,
            max_subordinates: 0,
            hiring_budget: 0,
            can_access_external_apis: false,
            allowed_domains: Vec::new(),
            max_execution_minutes: 60,
            can_escalate: false,
            workspace_quota_mb: 512,
            max_delegation_depth: 3,
            max_cost_usd: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Behavior {
    pub max_execution_time: u32,
    #[serde(default)]
    pub auto_escalate_blocked_tasks: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            max_execution_time: 60,
            auto_escalate_blocked_tasks: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Communication {
    #[serde(default = "default_true")]
    pub notify_on_completion: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Communication {
    fn default() -> Self {
        Self {
            notify_on_completion: true,
        }
    }
}

/// The full validated agent configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AgentConfig {
    pub identity: Identity,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub behavior: Behavior,
    #[serde(default)]
    pub communication: Communication,
    pub main_goal: String,
}

impl AgentConfig {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("AgentConfig always serializes")
    }
}

/// Outcome of business-rule validation: distinct from schema validation,
/// which is a hard failure. Errors make "strict" validation fail; warnings
/// never block a save.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Business validation rules from §4.4.1. Pure function over the typed
/// document; never mutates or depends on the store.
pub fn validate_business_rules(cfg: &AgentConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    let p = &cfg.permissions;

    if !p.can_hire {
        if p.max_subordinates != 0 {
            report.warnings.push(
                "canHire is false but maxSubordinates is non-zero".to_string(),
            );
        }
        if p.hiring_budget != 0 {
            report
                .warnings
                .push("canHire is false but hiringBudget is non-zero".to_string());
        }
    } else if p.max_subordinates < 1 {
        report
            .errors
            .push("canHire is true but maxSubordinates is less than 1".to_string());
    }

    if p.hiring_budget > p.max_subordinates {
        report.errors.push(format!(
            "hiringBudget ({}) exceeds maxSubordinates ({})",
            p.hiring_budget, p.max_subordinates
        ));
    }

    if !p.can_access_external_apis && !p.allowed_domains.is_empty() {
        report.warnings.push(
            "canAccessExternalAPIs is false but allowedDomains is non-empty".to_string(),
        );
    }
    if p.can_access_external_apis && p.allowed_domains.is_empty() {
        report.warnings.push(
            "canAccessExternalAPIs is true but allowedDomains is empty".to_string(),
        );
    }

    if cfg.behavior.max_execution_time > p.max_execution_minutes {
        report.errors.push(format!(
            "behavior.maxExecutionTime ({}) exceeds permissions.maxExecutionMinutes ({})",
            cfg.behavior.max_execution_time, p.max_execution_minutes
        ));
    }

    if cfg.behavior.auto_escalate_blocked_tasks && !p.can_escalate {
        report.errors.push(
            "autoEscalateBlockedTasks is true but canEscalate is false".to_string(),
        );
    }

    if p.workspace_quota_mb > 10_000 {
        report.warnings.push(format!(
            "workspaceQuotaMb ({}) is unusually large",
            p.workspace_quota_mb
        ));
    }
    if p.max_delegation_depth > 10 {
        report.warnings.push(format!(
            "maxDelegationDepth ({}) is unusually large",
            p.max_delegation_depth
        ));
    }
    if p.max_execution_minutes > 24 * 60 {
        report.warnings.push(format!(
            "maxExecutionMinutes ({}) is unusually large",
            p.max_execution_minutes
        ));
    }
    if p.max_cost_usd > 1000.0 {
        report
            .warnings
            .push(format!("maxCostUsd ({}) is unusually large", p.max_cost_usd));
    }

    report
}
