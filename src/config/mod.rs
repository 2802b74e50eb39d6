//! Configuration file management
//!
//! Loads TOML configuration files and provides application settings.
//! Default config path: ~/.config/evtap/config.toml

use anyhow::{bail, Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device settings
    pub device: DeviceConfig,
    /// Output settings
    pub output: OutputConfig,
}

/// Device settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Input device node to watch
    pub path: String,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Include the kernel timestamp in each printed line
    pub timestamps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: DeviceConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: "/dev/input/event0".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { timestamps: true }
    }
}

/// Default config file template written by --init-config
const CONFIG_TEMPLATE: &str = r#"# evtap configuration

[device]
# Input device node to watch (see `evtap --list`)
path = "/dev/input/event0"

[output]
# Include the kernel timestamp in each printed line
timestamps = true
"#;

impl Config {
    const SYSTEM_CONFIG_PATH: &'static str = "/etc/evtap/config.toml";

    /// Get the path that would be used for loading config
    /// Returns None if using built-in defaults
    pub fn config_path() -> Option<PathBuf> {
        // 1. EVTAP_CONFIG environment variable
        if let Ok(path) = std::env::var("EVTAP_CONFIG") {
            let p = std::path::Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
        }

        // 2. User config: ~/.config/evtap/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("evtap").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }
        }

        // 3. System config: /etc/evtap/config.toml
        let system_config = std::path::Path::new(Self::SYSTEM_CONFIG_PATH);
        if system_config.exists() {
            return Some(system_config.to_path_buf());
        }

        None
    }

    /// Load configuration with priority:
    /// 1. EVTAP_CONFIG environment variable
    /// 2. ~/.config/evtap/config.toml (user config)
    /// 3. /etc/evtap/config.toml (system config)
    /// 4. Built-in defaults
    ///
    /// A broken config file logs a warning and falls back; it is never fatal.
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(path.to_string_lossy().as_ref()) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        Ok(config)
    }

    /// Write the default config template to the user config path.
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn write_default(force: bool) -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("evtap");
        let config_path = config_dir.join("config.toml");

        if config_path.exists() && !force {
            bail!(
                "Config file already exists: {} (use --force to overwrite)",
                config_path.display()
            );
        }

        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create {}", config_dir.display()))?;
        std::fs::write(&config_path, CONFIG_TEMPLATE)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;

        Ok(config_path)
    }
}
