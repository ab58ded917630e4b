//! Capturer configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest frame accepted under strict validation.
pub const DEFAULT_MAX_WIDTH: u32 = 1920;
pub const DEFAULT_MAX_HEIGHT: u32 = 1080;

/// How much checking a submission gets before conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Only reject empty buffers. Anything else that is wrong surfaces as an
    /// internal error from the conversion.
    #[default]
    Lax,
    /// Also check dimensions against the buffer length and the maximum size,
    /// and reject formats other than NV21.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CapturerConfig {
    pub validation: ValidationPolicy,
    pub max_width: u32,
    pub max_height: u32,
    /// Drop frames submitted before the producer confirmed it started
    pub require_started: bool,
}

impl Default for CapturerConfig {
    fn default() -> Self {
        Self {
            validation: ValidationPolicy::Lax,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            require_started: false,
        }
    }
}

impl CapturerConfig {
    pub fn strict() -> Self {
        Self {
            validation: ValidationPolicy::Strict,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CapturerConfig::default();
        assert_eq!(config.validation, ValidationPolicy::Lax);
        assert_eq!(config.max_width, 1920);
        assert_eq!(config.max_height, 1080);
        assert!(!config.require_started);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = CapturerConfig::from_json(r#"{"validation": "strict"}"#).unwrap();
        assert_eq!(config.validation, ValidationPolicy::Strict);
        assert_eq!(config.max_width, DEFAULT_MAX_WIDTH);
        assert!(!config.require_started);
    }

    #[test]
    fn test_empty_json_object() {
        assert_eq!(CapturerConfig::from_json("{}").unwrap(), CapturerConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = CapturerConfig::from_json(r#"{"rotation": 90}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(CapturerConfig::from_json(r#"{"validation": "paranoid"}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_width": 1280, "max_height": 720, "require_started": true}}"#).unwrap();

        let config = CapturerConfig::load(file.path()).unwrap();
        assert_eq!(config.max_width, 1280);
        assert_eq!(config.max_height, 720);
        assert!(config.require_started);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CapturerConfig::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
