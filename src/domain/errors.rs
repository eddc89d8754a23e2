//! Kernel-wide error taxonomy.
//!
//! Every public operation in `services` and `infrastructure::database`
//! returns `KernelResult<T>`. Callers branch on the `KernelError` variant
//! (the discriminator), never on a downcast, per the error-carrying-control-flow
//! strategy in the design notes.

use thiserror::Error;

use crate::infrastructure::database::DatabaseError;

/// Errors raised by the kernel's public operations.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} already exists: {id}")]
    Conflict { entity: &'static str, id: String },

    #[error("operation not valid for {entity} {id} in state {state}")]
    InvalidState {
        entity: &'static str,
        id: String,
        state: String,
    },

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("budget exceeded: {0}")]
    BudgetExceeded(String),

    #[error("depth exceeded: {0}")]
    DepthExceeded(String),

    #[error("self-reference is not allowed: {0}")]
    SelfReference(String),

    #[error("cycle detected: {0:?}")]
    CycleDetected(Vec<String>),

    #[error("blocker task not found: {0}")]
    BlockerMissing(String),

    #[error("blocker task {0} is already terminal and cannot block another task")]
    BlockerTerminal(String),

    #[error("{0} is not a transitive subordinate of {1}")]
    NotSubordinate(String, String),

    #[error(
        "version conflict on {entity} {id}: expected version {expected}, record has moved on; re-fetch and retry"
    )]
    VersionMismatch {
        entity: &'static str,
        id: String,
        expected: u32,
    },

    #[error("schema validation failed: {0}")]
    SchemaInvalid(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("corrupted file at {0}, no usable backup found")]
    Corrupted(String),

    #[error("write failed: {0}")]
    WriteFailed(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type KernelResult<T> = Result<T, KernelError>;
