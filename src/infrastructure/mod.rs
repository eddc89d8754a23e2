//! Adapters to the outside world: the `SQLite` store, the agent-directory
//! filesystem layout, process configuration, and logging.

pub mod config;
pub mod database;
pub mod fs;
pub mod logging;
