//! # Host Configuration
//!
//! Loaded once at startup from a TOML document. Every table and field has a
//! default, so an empty document is a valid configuration.
//!
//! ```toml
//! initial_scene = "title"
//! seed = 7
//!
//! [stage]
//! capacity = 32
//!
//! [frame]
//! target_fps = 30
//! max_frames = 600
//! pace = false
//!
//! [console]
//! menu_step_degrees = 30.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use starbase_core::StageConfig;

use crate::error::{AppError, AppResult};
use crate::scene::SceneKey;

/// Default frame rate of the reference handheld.
pub const DEFAULT_TARGET_FPS: u32 = 30;

/// Default crank travel per menu step, in degrees.
pub const DEFAULT_MENU_STEP_DEGREES: f32 = 30.0;

/// Frame pacing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameConfig {
    /// Target frames per second.
    pub target_fps: u32,
    /// Stop after this many frames. `None` runs until the input ends.
    pub max_frames: Option<u64>,
    /// Sleep to hold the target rate. Off for tests and replays.
    pub pace: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            max_frames: None,
            pace: true,
        }
    }
}

/// Console widget tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Crank travel per menu cursor step, in degrees.
    pub menu_step_degrees: f32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            menu_step_degrees: DEFAULT_MENU_STEP_DEGREES,
        }
    }
}

/// Complete host configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Actor pool sizing.
    pub stage: StageConfig,
    /// Frame pacing.
    pub frame: FrameConfig,
    /// Console widget tuning.
    pub console: ConsoleConfig,
    /// Scene installed on the first frame.
    pub initial_scene: SceneKey,
    /// Seed for galaxy generation. The same seed replays the same missions.
    pub seed: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stage: StageConfig::default(),
            frame: FrameConfig::default(),
            console: ConsoleConfig::default(),
            initial_scene: SceneKey::Game,
            seed: 0,
        }
    }
}

impl AppConfig {
    /// Parses a configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the document does not parse or fails
    /// validation.
    pub fn from_toml_str(text: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`] if the file cannot be read, or
    /// [`AppError::Config`] if it is invalid.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AppError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] on the first invalid field.
    pub fn validate(&self) -> AppResult<()> {
        self.stage
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;
        if self.frame.target_fps == 0 {
            return Err(AppError::Config(
                "frame.target_fps must be greater than zero".to_string(),
            ));
        }
        let step = self.console.menu_step_degrees;
        if step.is_nan() || step <= 0.0 {
            return Err(AppError::Config(
                "console.menu_step_degrees must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.stage.capacity, 32);
        assert_eq!(config.frame.target_fps, 30);
        assert_eq!(config.initial_scene, SceneKey::Game);
    }

    #[test]
    fn test_full_document() {
        let config = AppConfig::from_toml_str(
            r#"
            initial_scene = "title"
            seed = 42

            [stage]
            capacity = 8

            [frame]
            target_fps = 60
            max_frames = 100
            pace = false

            [console]
            menu_step_degrees = 15.0
            "#,
        )
        .unwrap();

        assert_eq!(config.initial_scene, SceneKey::Title);
        assert_eq!(config.seed, 42);
        assert_eq!(config.stage.capacity, 8);
        assert_eq!(config.frame.max_frames, Some(100));
        assert!(!config.frame.pace);
        assert!((config.console.menu_step_degrees - 15.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_zero_fps_rejected() {
        let err = AppConfig::from_toml_str("[frame]\ntarget_fps = 0").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(AppConfig::from_toml_str("[stage]\ncapacity = 0").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load("/nonexistent/starbase.toml").unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }
}
