//! Structured logging infrastructure built on `tracing`: `EnvFilter`-driven
//! level control, pretty or JSON stdout output, and optional rotated JSON
//! file output via `tracing-appender`.

pub mod config;
pub mod logger;

pub use config::{LogConfig, LogFormat, RotationPolicy};
pub use logger::LoggerImpl;
