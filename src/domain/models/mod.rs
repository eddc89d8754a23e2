//! Domain models.
//!
//! Pure entities with no infrastructure dependency: no sqlx, no filesystem,
//! no tracing. Persistence concerns live in `infrastructure::database`.

pub mod agent;
pub mod agent_config;
pub mod audit;
pub mod message;
pub mod schedule;
pub mod task;

pub use agent::{Agent, AgentStatus, AgentUpdate, OrgHierarchyRow};
pub use agent_config::{
    validate_business_rules, AgentConfig, Behavior, Communication, Identity, Permissions, ValidationReport,
};
pub use audit::{AuditAction, AuditEvent, NewAuditEvent};
pub use message::{Message, MessageChannel, MessagePriority};
pub use schedule::{Schedule, ScheduleTrigger};
pub use task::{NewTask, Task, TaskPriority, TaskStatus, TASK_MAX_DEPTH};
