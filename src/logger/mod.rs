//! Logging for the directive lifecycle.
//!
//! Loggers are plain `log::Log` values passed explicitly to each component.
//! A single [`SinkLogger`] is created at startup; components wrap it in a
//! [`ModuleLogger`] so their level can be configured on its own.

pub mod entry;
pub mod module_logger;

pub use entry::LogEntry;
pub use module_logger::{ModuleLogger, SinkLogger};

use log::LevelFilter;

use crate::error::{AgentError, Result};

/// Parse a level name.
///
/// Accepts `NONE`, `CRITICAL`, `ERROR`, `WARN`, `INFO`, `DEBUG0`..`DEBUG9`
/// as well as the `log` crate names (`OFF`, `DEBUG`, `TRACE`), ignoring case.
/// `DEBUG0`..`DEBUG8` map to `Debug` and `DEBUG9` to `Trace`.
pub fn parse_level(name: &str) -> Result<LevelFilter> {
    let upper = name.trim().to_ascii_uppercase();
    let level = match upper.as_str() {
        "NONE" | "OFF" => LevelFilter::Off,
        "CRITICAL" | "ERROR" => LevelFilter::Error,
        "WARN" | "WARNING" => LevelFilter::Warn,
        "INFO" => LevelFilter::Info,
        "DEBUG" => LevelFilter::Debug,
        "DEBUG9" | "TRACE" => LevelFilter::Trace,
        other => match other.strip_prefix("DEBUG") {
            Some(n) if n.len() == 1 && matches!(n.as_bytes()[0], b'0'..=b'8') => LevelFilter::Debug,
            _ => return Err(AgentError::InvalidLogLevel(name.to_string())),
        },
    };
    Ok(level)
}
