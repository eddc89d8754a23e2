//! Kernel operating configuration via `figment`: programmatic defaults,
//! project YAML, then `FOREMAN_`-prefixed environment variables.

pub mod loader;

pub use loader::{ConfigError, ConfigLoader, DatabaseConfig, KernelConfig};
