//! Configuration management for droidcheck
//!
//! Supports environment variables, config files, and runtime overrides.
//! The Appium and device documents themselves are loaded by
//! [`crate::core::types`]; this file only says where to find them and how the
//! harness behaves around them.
//!
//! Config file location: ./droidcheck.toml, then ~/.config/droidcheck/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::error::{HarnessError, Result};

/// Main configuration for droidcheck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Locations of the externally authored documents
    pub paths: PathsConfig,
    /// Remote automation behaviour
    pub driver: DriverConfig,
    /// Test selection
    #[serde(default)]
    pub run: RunConfig,
}

/// File system locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Application/server/default-capability YAML document
    pub appium_config: PathBuf,
    /// Device inventory JSON document
    pub device_config: PathBuf,
    /// Root of every suite folder
    pub reports_dir: PathBuf,
    /// Directory the engines discover scenarios in
    pub scenarios_dir: PathBuf,
}

/// Remote driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Overrides `server.full_server_path` from the Appium config
    pub server_url: Option<String>,
    /// Implicit wait configured once per page, in milliseconds
    pub implicit_wait_ms: u64,
    /// HTTP request timeout in seconds (0 keeps the client default)
    pub request_timeout_secs: u64,
}

/// Test selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Application used when a scenario does not name one
    pub application: String,
    /// Fixed inventory index; `None` probes adb
    pub device_index: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            driver: DriverConfig::default(),
            run: RunConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            appium_config: env::var("DROIDCHECK_APPIUM_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("config/appium_config.yaml")),
            device_config: env::var("DROIDCHECK_DEVICE_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("config/device_config.json")),
            reports_dir: env::var("DROIDCHECK_REPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("reports")),
            scenarios_dir: PathBuf::from("scenarios"),
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            server_url: env::var("DROIDCHECK_SERVER_URL").ok(),
            implicit_wait_ms: 10_000,
            request_timeout_secs: 0,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            application: env::var("DROIDCHECK_APPLICATION")
                .unwrap_or_else(|_| "calculator".to_string()),
            device_index: env::var("DROIDCHECK_DEVICE_INDEX")
                .ok()
                .and_then(|i| i.parse().ok()),
        }
    }
}

impl Settings {
    /// Get the per-user config file path
    pub fn user_config_file() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("droidcheck")
            .join("config.toml")
    }

    /// Load settings from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();

        let local = PathBuf::from("droidcheck.toml");
        for candidate in [local, Self::user_config_file()] {
            if let Ok(mut settings) = Self::load_from_file(&candidate) {
                settings.apply_env();
                return settings;
            }
        }

        Self::default()
    }

    /// Let `DROIDCHECK_*` variables override values read from a file
    fn apply_env(&mut self) {
        self.apply_env_from(|name| env::var(name).ok());
    }

    /// Apply overrides from `lookup`, keyed by `DROIDCHECK_*` variable name
    fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("DROIDCHECK_APPIUM_CONFIG") {
            self.paths.appium_config = PathBuf::from(path);
        }
        if let Some(path) = lookup("DROIDCHECK_DEVICE_CONFIG") {
            self.paths.device_config = PathBuf::from(path);
        }
        if let Some(path) = lookup("DROIDCHECK_REPORTS_DIR") {
            self.paths.reports_dir = PathBuf::from(path);
        }
        if let Some(url) = lookup("DROIDCHECK_SERVER_URL") {
            self.driver.server_url = Some(url);
        }
        if let Some(app) = lookup("DROIDCHECK_APPLICATION") {
            self.run.application = app;
        }
        if let Some(index) = lookup("DROIDCHECK_DEVICE_INDEX").and_then(|i| i.parse().ok()) {
            self.run.device_index = Some(index);
        }
    }

    /// Load an explicit settings file, then apply environment overrides
    pub fn load_path(path: &Path) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut settings = Self::load_from_file(path)?;
        settings.apply_env();
        Ok(settings)
    }

    /// Load settings from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HarnessError::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| HarnessError::config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| HarnessError::config(format!("Failed to parse config: {}", e)))
    }

    /// Implicit wait as a duration
    pub fn implicit_wait(&self) -> Duration {
        Duration::from_millis(self.driver.implicit_wait_ms)
    }

    /// HTTP timeout, if one is configured
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.driver.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Generate a default config file content for display
    pub fn default_config_toml() -> String {
        toml::to_string_pretty(&Settings::default())
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}
