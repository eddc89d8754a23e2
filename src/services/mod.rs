//! Business-logic services, composed over `infrastructure::database` and
//! `infrastructure::fs`. Each service is a thin orchestration layer; the
//! store enforces the invariants it can express declaratively (uniqueness,
//! foreign keys, append-only triggers), and these services enforce the rest.

pub mod agent_registry;
pub mod audit_log;
pub mod config_service;
pub mod dependency_analyzer;
pub mod lifecycle_orchestrator;
pub mod messaging;
pub mod task_engine;

pub use agent_registry::AgentRegistry;
pub use audit_log::AuditLog;
pub use dependency_analyzer::DependencyAnalyzer;
pub use lifecycle_orchestrator::{HireAgentError, LifecycleOrchestrator, PauseResult, ResumeResult};
pub use task_engine::TaskEngine;
