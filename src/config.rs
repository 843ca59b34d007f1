use serde::{Deserialize, Serialize};

use crate::controller::SpinSettings;
use crate::error::ConfigError;

/// Startup configuration, read from a RON file on native builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub spin: SpinSettings,
    /// World units visible from the bottom to the top of the viewport
    pub visible_height: f32,
    /// Brighten the background with spin speed
    pub speed_tint: bool,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            spin: SpinSettings::default(),
            visible_height: 4.0,
            speed_tint: false,
            window_width: 1280,
            window_height: 720,
        }
    }
}

impl AppConfig {
    const APP_NAME: &'static str = "FidgetShuriken";
    const CONFIG_FILE: &'static str = "config.ron";
    const PATH_ENV: &'static str = "SHURIKEN_CONFIG";

    pub fn from_ron_str(src: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stop the spin from ever decaying or flip
    /// ordinary drags across the wrap correction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let spin = &self.spin;
        if !(spin.decay_rate.is_finite() && spin.decay_rate > 0.0) {
            return Err(ConfigError::Invalid {
                field: "spin.decay_rate",
                value: spin.decay_rate,
                expected: "finite and > 0",
            });
        }
        if !(180.0..360.0).contains(&spin.wrap_threshold) {
            return Err(ConfigError::Invalid {
                field: "spin.wrap_threshold",
                value: spin.wrap_threshold,
                expected: "in [180, 360)",
            });
        }
        if !(self.visible_height.is_finite() && self.visible_height > 0.0) {
            return Err(ConfigError::Invalid {
                field: "visible_height",
                value: self.visible_height,
                expected: "finite and > 0",
            });
        }
        Ok(())
    }

    /// Load from `SHURIKEN_CONFIG` or the per-user config dir, else defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::read(&path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "{e}, using defaults");
                Self::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn read(path: &std::path::Path) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path)?;
        Self::from_ron_str(&src)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn config_path() -> Option<std::path::PathBuf> {
        if let Ok(path) = std::env::var(Self::PATH_ENV) {
            return Some(path.into());
        }
        directories::ProjectDirs::from("com", Self::APP_NAME, Self::APP_NAME)
            .map(|dirs| dirs.config_dir().join(Self::CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = AppConfig::from_ron_str("(speed_tint: true, spin: (decay_rate: 1.5))").unwrap();
        assert!(config.speed_tint);
        assert_eq!(config.spin.decay_rate, 1.5);
        assert_eq!(config.spin.wrap_threshold, 350.0, "unset spin fields fall back to defaults");
        assert_eq!(config.visible_height, 4.0);
        assert_eq!(config.window_width, 1280);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = AppConfig::from_ron_str("()").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    fn invalid_field(src: &str) -> &'static str {
        match AppConfig::from_ron_str(src) {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("expected {src} to be rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_non_decaying_spin() {
        assert_eq!(invalid_field("(spin: (decay_rate: -1.0))"), "spin.decay_rate");
        assert_eq!(invalid_field("(spin: (decay_rate: 0.0))"), "spin.decay_rate");

        let mut config = AppConfig::default();
        config.spin.decay_rate = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "spin.decay_rate", .. })));
    }

    #[test]
    fn test_rejects_wrap_threshold_out_of_range() {
        assert_eq!(invalid_field("(spin: (wrap_threshold: 10.0))"), "spin.wrap_threshold");
        assert_eq!(invalid_field("(spin: (wrap_threshold: 179.9))"), "spin.wrap_threshold");
        assert_eq!(invalid_field("(spin: (wrap_threshold: 360.0))"), "spin.wrap_threshold");
        assert!(AppConfig::from_ron_str("(spin: (wrap_threshold: 180.0))").is_ok());
    }

    #[test]
    fn test_rejects_non_positive_visible_height() {
        assert_eq!(invalid_field("(visible_height: 0.0)"), "visible_height");
        assert_eq!(invalid_field("(visible_height: -4.0)"), "visible_height");
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_malformed_config_is_error() {
        let result = AppConfig::from_ron_str("(visible_height: \"tall\")");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
