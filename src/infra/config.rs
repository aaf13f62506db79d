// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::errors::VonkError;
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub persistence: PersistenceConfig,
}

/// Tunables for the context engine. Defaults match the platform's
/// production behavior; tests override them to probe edge cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Per-user usage-log cap (FIFO eviction beyond this).
    pub max_events: usize,
    /// Window (per tool) for the learning-progress ratio.
    pub progress_window: usize,
    /// Window (per tool) scanned for recent failures when enriching.
    pub reminder_window: usize,
    /// How many tools the preferred-tools list holds.
    pub preferred_tools: usize,
    /// First step of every recommended learning path.
    pub foundational_tool: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_events: 100,
            progress_window: 10,
            reminder_window: 5,
            preferred_tools: 3,
            foundational_tool: "profile-builder".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { port: 8721 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Whether the SQLite store is opened at all.
    pub enabled: bool,
    /// Mirror updated profiles back to the store after every track call.
    pub mirror_profiles: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mirror_profiles: true,
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> Result<Self, VonkError> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, VonkError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| VonkError::Config(e.to_string()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.engine.max_events, 100);
        assert_eq!(c.engine.progress_window, 10);
        assert_eq!(c.engine.reminder_window, 5);
        assert_eq!(c.engine.preferred_tools, 3);
        assert_eq!(c.engine.foundational_tool, "profile-builder");
        assert!(c.persistence.enabled);
        assert!(c.persistence.mirror_profiles);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.engine.max_events, 100);
        assert_eq!(config.api.port, 8721);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[engine]
max_events = 50
progress_window = 5
reminder_window = 3
preferred_tools = 2
foundational_tool = "intake-scan"

[api]
port = 9100

[persistence]
enabled = false
mirror_profiles = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.engine.max_events, 50);
        assert_eq!(config.engine.progress_window, 5);
        assert_eq!(config.engine.foundational_tool, "intake-scan");
        assert_eq!(config.api.port, 9100);
        assert!(!config.persistence.enabled);
        assert!(!config.persistence.mirror_profiles);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.engine.max_events, config.engine.max_events);
        assert_eq!(
            deserialized.engine.foundational_tool,
            config.engine.foundational_tool
        );
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }
}
