//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber, with an
//! optional rolling JSON log file.

pub mod config;
pub mod logger;

pub use config::{LogConfig, LogFormat, RotationPolicy};
pub use logger::LoggerImpl;
