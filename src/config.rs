//! Runtime configuration.
//!
//! Configuration is a JSON document. Top-level keys other than the ones
//! modelled here are kept as named sections, so each component can look up
//! its own settings under a config key:
//!
//! ```json
//! {
//!   "namespace": "SpeechSynthesizer",
//!   "logLevel": "INFO",
//!   "capabilityAgent": { "logLevel": "DEBUG9" }
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::logger::parse_level;

/// Config key holding the log level of a section.
pub const LOG_LEVEL_KEY: &str = "logLevel";

/// Level used for the sink when the configuration names none.
pub const DEFAULT_SINK_LEVEL: LevelFilter = LevelFilter::Info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    /// Namespace handled by the configured capability agent.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Level of the root sink logger.
    #[serde(default)]
    pub log_level: Option<String>,
    /// Per-component sections, keyed by config key.
    #[serde(flatten)]
    pub sections: HashMap<String, Value>,
}

impl AgentConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Level configured for the root sink, or [`DEFAULT_SINK_LEVEL`].
    pub fn sink_level(&self) -> Result<LevelFilter> {
        match self.log_level.as_deref() {
            Some(name) => parse_level(name),
            None => Ok(DEFAULT_SINK_LEVEL),
        }
    }

    /// Level configured under `<config_key>.logLevel`, if any.
    pub fn log_level_for(&self, config_key: &str) -> Result<Option<LevelFilter>> {
        let name = self
            .sections
            .get(config_key)
            .and_then(|section| section.get(LOG_LEVEL_KEY))
            .and_then(Value::as_str);
        name.map(parse_level).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgentError;
    use std::io::Write;

    const CONFIG: &str = r#"{
        "namespace": "SpeechSynthesizer",
        "logLevel": "WARN",
        "capabilityAgent": { "logLevel": "DEBUG9" },
        "other": { "enabled": true }
    }"#;

    #[test]
    fn test_parse_sections() {
        let config = AgentConfig::from_json_str(CONFIG).unwrap();
        assert_eq!(config.namespace.as_deref(), Some("SpeechSynthesizer"));
        assert_eq!(config.sink_level().unwrap(), LevelFilter::Warn);
        assert_eq!(
            config.log_level_for("capabilityAgent").unwrap(),
            Some(LevelFilter::Trace)
        );
        assert_eq!(config.log_level_for("other").unwrap(), None);
        assert_eq!(config.log_level_for("missing").unwrap(), None);
    }

    #[test]
    fn test_defaults_when_empty() {
        let config = AgentConfig::from_json_str("{}").unwrap();
        assert_eq!(config.namespace, None);
        assert_eq!(config.sink_level().unwrap(), DEFAULT_SINK_LEVEL);
    }

    #[test]
    fn test_invalid_level_is_an_error() {
        let config = AgentConfig::from_json_str(r#"{"a": {"logLevel": "LOUD"}}"#).unwrap();
        assert!(matches!(
            config.log_level_for("a"),
            Err(AgentError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();

        let config = AgentConfig::from_path(file.path()).unwrap();
        assert_eq!(config.namespace.as_deref(), Some("SpeechSynthesizer"));
    }

    #[test]
    fn test_from_missing_path() {
        let err = AgentConfig::from_path("/nonexistent/directive-agent.json").unwrap_err();
        assert!(matches!(err, AgentError::Io(_)));
    }
}
