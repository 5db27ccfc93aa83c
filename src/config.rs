//! Engine configuration.
//!
//! Configuration is attached to a machine type when it is built and is
//! immutable afterwards. Every field has a default, so a JSON document only
//! needs to name the settings it changes.
//!
//! # Example
//!
//! ```json
//! {
//!   "terminal_suffixes": ["Complete", "End"],
//!   "terminal_step": "ignore",
//!   "record_transitions": false,
//!   "graph": { "font_size": 14, "default_shape": "box" }
//! }
//! ```

use crate::graph::NodeShape;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Suffixes a terminal state name must end with unless configured otherwise.
pub const DEFAULT_TERMINAL_SUFFIXES: [&str; 3] = ["Complete", "End", "Done"];

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse engine configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid engine configuration: {0}")]
    Invalid(String),
}

/// What `step` does when the machine is already in a terminal state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalStepPolicy {
    /// Fail with `RuntimeError::TerminalStep`.
    #[default]
    Reject,
    /// Leave the machine untouched and report it as halted.
    Ignore,
}

/// Presentation settings for exported graphs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphStyle {
    pub font_size: u32,
    pub default_shape: NodeShape,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            font_size: 12,
            default_shape: NodeShape::Box,
        }
    }
}

/// Settings shared by every instance of a machine type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Accepted terminal-name suffixes. Empty disables the naming check.
    pub terminal_suffixes: Vec<String>,
    pub terminal_step: TerminalStepPolicy,
    /// Keep a [`TransitionLog`](crate::core::TransitionLog) on each instance.
    pub record_transitions: bool,
    pub graph: GraphStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            terminal_suffixes: DEFAULT_TERMINAL_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            terminal_step: TerminalStepPolicy::default(),
            record_transitions: true,
            graph: GraphStyle::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.terminal_suffixes.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "terminal_suffixes must not contain blank entries".to_string(),
            ));
        }
        if self.graph.font_size == 0 {
            return Err(ConfigError::Invalid(
                "graph.font_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `name` satisfies the terminal naming convention.
    pub fn is_terminal_name(&self, name: &str) -> bool {
        self.terminal_suffixes.is_empty()
            || self
                .terminal_suffixes
                .iter()
                .any(|suffix| name.ends_with(suffix.as_str()))
    }

    pub fn with_terminal_step(mut self, policy: TerminalStepPolicy) -> Self {
        self.terminal_step = policy;
        self
    }

    pub fn with_terminal_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terminal_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_recording(mut self, record: bool) -> Self {
        self.record_transitions = record;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reject_terminal_steps_and_record() {
        let config = EngineConfig::default();
        assert_eq!(config.terminal_step, TerminalStepPolicy::Reject);
        assert!(config.record_transitions);
        assert_eq!(config.graph.font_size, 12);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "terminal_step": "ignore" }"#).unwrap();

        assert_eq!(config.terminal_step, TerminalStepPolicy::Ignore);
        assert_eq!(config.terminal_suffixes.len(), DEFAULT_TERMINAL_SUFFIXES.len());
        assert!(config.record_transitions);
    }

    #[test]
    fn full_json_overrides_everything() {
        let json = r#"{
            "terminal_suffixes": ["Halt"],
            "terminal_step": "reject",
            "record_transitions": false,
            "graph": { "font_size": 9, "default_shape": "ellipse" }
        }"#;
        let config = EngineConfig::from_json_str(json).unwrap();

        assert_eq!(config.terminal_suffixes, vec!["Halt".to_string()]);
        assert!(!config.record_transitions);
        assert_eq!(config.graph.default_shape, NodeShape::Ellipse);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = EngineConfig::from_json_str("{ terminal_step: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn blank_suffix_is_invalid() {
        let result = EngineConfig::from_json_str(r#"{ "terminal_suffixes": ["End", " "] }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_font_size_is_invalid() {
        let result = EngineConfig::from_json_str(r#"{ "graph": { "font_size": 0 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn terminal_name_convention() {
        let config = EngineConfig::default();
        assert!(config.is_terminal_name("CalcComplete"));
        assert!(config.is_terminal_name("SearchEnd"));
        assert!(config.is_terminal_name("Done"));
        assert!(!config.is_terminal_name("Finished"));

        let relaxed = config.with_terminal_suffixes(Vec::<String>::new());
        assert!(relaxed.is_terminal_name("Finished"));
    }
}
