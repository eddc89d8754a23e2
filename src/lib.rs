//! foreman - persistent state-keeping and coordination kernel for a
//! hierarchical multi-agent orchestrator.
//!
//! The kernel is organized in layers, each depending only on those below it:
//! - `infrastructure` — the `SQLite` store, the agent-directory filesystem
//!   layout, atomic file I/O, process configuration, and logging.
//! - `domain` — entities and the kernel-wide error taxonomy; no I/O.
//! - `services` — the agent registry, task engine, dependency analyzer,
//!   messaging, audit log, and the lifecycle orchestrator that composes them
//!   into hire/pause/resume/fire/delegate workflows.
//! - `cli` — a thin demonstration shell over the above (out of scope per the
//!   core kernel's own charter, included so the kernel is runnable).

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

use std::path::PathBuf;
use std::sync::Arc;

use infrastructure::database::{
    AgentRepository, AuditRepository, DatabaseConnection, MessageRepository, ScheduleRepository, TaskRepository,
};
use services::{AgentRegistry, AuditLog, DependencyAnalyzer, LifecycleOrchestrator, TaskEngine};

pub use domain::errors::{KernelError, KernelResult};

/// Wires the store and every service together. This is the single
/// construction point a caller (the CLI, an integration test, or an
/// embedding application) needs: open the database, migrate it, and hand
/// back a `Kernel` exposing every service described in §4.
pub struct Kernel {
    pub agents: Arc<AgentRegistry>,
    pub tasks: Arc<TaskEngine>,
    pub dependencies: Arc<DependencyAnalyzer>,
    pub audit: Arc<AuditLog>,
    pub lifecycle: Arc<LifecycleOrchestrator>,
    pub base_dir: PathBuf,
}

impl Kernel {
    /// Open `database_url`, run the embedded schema migration, and
    /// construct every repository and service over the resulting pool.
    pub async fn bootstrap(database_url: &str, base_dir: PathBuf) -> KernelResult<Self> {
        let conn = DatabaseConnection::new(database_url).await?;
        conn.migrate().await?;
        Ok(Self::from_connection(conn, base_dir))
    }

    fn from_connection(conn: DatabaseConnection, base_dir: PathBuf) -> Self {
        let pool = conn.pool().clone();
        let agent_repo = Arc::new(AgentRepository::new(pool.clone()));
        let task_repo = Arc::new(TaskRepository::new(pool.clone()));
        let schedule_repo = Arc::new(ScheduleRepository::new(pool.clone()));
        let message_repo = Arc::new(MessageRepository::new(pool.clone()));
        let audit_repo = Arc::new(AuditRepository::new(pool));

        let audit = Arc::new(AuditLog::new(audit_repo.clone()));
        let agents = Arc::new(AgentRegistry::new(agent_repo.clone(), audit.clone()));
        let tasks = Arc::new(TaskEngine::new(task_repo.clone(), agent_repo.clone(), audit_repo));
        let dependencies = Arc::new(DependencyAnalyzer::new(task_repo.clone()));
        let lifecycle = Arc::new(LifecycleOrchestrator::new(
            agent_repo,
            task_repo,
            schedule_repo,
            message_repo,
            audit.clone(),
            base_dir.clone(),
        ));

        Self { agents, tasks, dependencies, audit, lifecycle, base_dir }
    }
}
