//! Bridge configuration, read from JSON.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;
use usbcam_capturer::CapturerConfig;
use usbcam_video::CaptureFormat;

/// Default preview configuration
pub const DEFAULT_PREVIEW_WIDTH: u32 = 640;
pub const DEFAULT_PREVIEW_HEIGHT: u32 = 480;
pub const DEFAULT_PREVIEW_FPS: u32 = 15;
pub const DEFAULT_FRAME_COUNT: u64 = 90;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    pub capturer: CapturerConfig,
    pub camera: CameraSettings,
}

/// Settings for the preview camera feeding the capturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Frames to deliver before requesting a stop
    pub frames: u64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_PREVIEW_WIDTH,
            height: DEFAULT_PREVIEW_HEIGHT,
            fps: DEFAULT_PREVIEW_FPS,
            frames: DEFAULT_FRAME_COUNT,
        }
    }
}

impl CameraSettings {
    pub fn format(&self) -> CaptureFormat {
        CaptureFormat::new(self.width, self.height, self.fps)
    }
}

impl BridgeConfig {
    /// `<config_dir>/usbcam-bridge/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("usbcam-bridge").join("config.json"))
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Load from an explicit path, else the default path if it exists, else
    /// fall back to defaults.
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            info!("Loading config from {}", path.display());
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                info!("Loading config from {}", path.display());
                Self::load(&path)
            }
            _ => {
                info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use usbcam_capturer::ValidationPolicy;

    #[test]
    fn test_camera_settings_default() {
        let settings = CameraSettings::default();
        assert_eq!(settings.format(), CaptureFormat::new(640, 480, 15));
        assert_eq!(settings.frames, 90);
    }

    #[test]
    fn test_load_nested_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"capturer": {{"validation": "strict"}}, "camera": {{"width": 320, "height": 240}}}}"#
        )
        .unwrap();

        let config = BridgeConfig::resolve(Some(file.path())).unwrap();
        assert_eq!(config.capturer.validation, ValidationPolicy::Strict);
        assert_eq!(config.camera.width, 320);
        assert_eq!(config.camera.height, 240);
        assert_eq!(config.camera.fps, DEFAULT_PREVIEW_FPS);
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(BridgeConfig::resolve(Some(&dir.path().join("nope.json"))).is_err());
    }

    #[test]
    fn test_unknown_field_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"camera": {{"rotation": 90}}}}"#).unwrap();
        assert!(BridgeConfig::load(file.path()).is_err());
    }
}
