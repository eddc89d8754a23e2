//! Database infrastructure.
//!
//! `SQLite` via `sqlx`: WAL mode, foreign keys, one repository struct per
//! entity. Repositories are concrete types (not trait objects) — this crate
//! has exactly one store backend, so a ports/adapters split for swappable
//! backends isn't needed here.

pub mod agent_repo;
pub mod audit_repo;
pub mod connection;
pub mod errors;
pub mod message_repo;
pub mod schedule_repo;
pub mod schema;
pub mod task_repo;
pub mod utils;

pub use agent_repo::AgentRepository;
pub use audit_repo::AuditRepository;
pub use connection::DatabaseConnection;
pub use errors::DatabaseError;
pub use message_repo::MessageRepository;
pub use schedule_repo::ScheduleRepository;
pub use task_repo::TaskRepository;
