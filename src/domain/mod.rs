//! Domain layer: entities, the kernel error taxonomy, and pure business
//! rules. Framework-agnostic — no sqlx, no tokio, no filesystem access.

pub mod errors;
pub mod models;

pub use errors::{KernelError, KernelResult};
