//! Filesystem infrastructure: deterministic agent directory layout and
//! atomic writes with backup/recovery (§4.2, §4.3, §6).

pub mod atomic_io;
pub mod path_resolver;

pub use path_resolver::AgentPaths;
