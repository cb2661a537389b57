// Configuration - Load settings from config.toml
//
// Provides sensible defaults if the config file is missing or has errors.
// The validation settings collapse into an immutable ValidationConfig that
// is built once at startup and passed by value to the backend.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::ffi::CString;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub debug: DebugConfig,
}

/// Window settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Vulkan Practice".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Debug settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub validation_layers: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            validation_layers: true,
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults if not found
    pub fn load() -> Self {
        Self::load_from_path("config.toml").unwrap_or_else(|e| {
            log::warn!("Failed to load config.toml: {}. Using defaults.", e);
            Config::default()
        })
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        log::info!("Loaded configuration from {:?}", path);
        log::debug!("Config: {:?}", config);

        Ok(config)
    }

    /// The immutable validation configuration derived from this config.
    pub fn validation(&self) -> ValidationConfig {
        ValidationConfig::from_debug(&self.debug)
    }
}

/// Process-wide diagnostics configuration, fixed at startup.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub diagnostics_enabled: bool,
    pub required_layers: Vec<CString>,
}

impl ValidationConfig {
    pub fn from_debug(debug: &DebugConfig) -> Self {
        Self {
            // Diagnostics is a build-mode switch: release builds never
            // enable it, debug builds honor the config flag.
            diagnostics_enabled: cfg!(debug_assertions) && debug.validation_layers,
            required_layers: vec![c"VK_LAYER_KHRONOS_validation".to_owned()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_provide_a_complete_window_config() {
        let config = Config::default();
        assert_eq!(config.window.title, "Vulkan Practice");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert!(config.debug.validation_layers);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [window]
            title = "Demo"
            "#,
        )
        .unwrap();
        assert_eq!(config.window.title, "Demo");
        assert_eq!(config.window.width, 800);
        assert!(config.debug.validation_layers);
    }

    #[test]
    fn validation_layers_flag_parses() {
        let config: Config = toml::from_str(
            r#"
            [debug]
            validation_layers = false
            "#,
        )
        .unwrap();
        assert!(!config.validation().diagnostics_enabled);
    }

    #[test]
    fn validation_config_carries_the_khronos_layer() {
        let validation = Config::default().validation();
        assert_eq!(
            validation.required_layers,
            vec![c"VK_LAYER_KHRONOS_validation".to_owned()]
        );
        // Diagnostics follows the build mode when the flag is on.
        assert_eq!(validation.diagnostics_enabled, cfg!(debug_assertions));
    }
}
