//! Shared types used across droidcheck modules
//!
//! Capability dictionaries, device and application descriptors, and the two
//! externally authored configuration documents they come from.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::core::error::{HarnessError, Result};

/// Flat key/value capability dictionary sent at session start
pub type CapabilitySet = Map<String, Value>;

/// One entry of the device inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// adb serial / Appium device name, the identity key
    #[serde(rename = "deviceName")]
    pub device_name: String,
    /// Remaining platform attributes, forwarded verbatim
    #[serde(flatten)]
    pub attributes: CapabilitySet,
}

impl DeviceDescriptor {
    /// Create a descriptor with no extra attributes
    pub fn new(device_name: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            attributes: Map::new(),
        }
    }

    /// Capability view of this descriptor, `deviceName` included
    pub fn capabilities(&self) -> CapabilitySet {
        let mut caps = self.attributes.clone();
        caps.insert(
            "deviceName".to_string(),
            Value::String(self.device_name.clone()),
        );
        caps
    }
}

/// Device inventory document (`device_config.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceInventory {
    pub devices: Vec<DeviceDescriptor>,
}

impl DeviceInventory {
    /// Load the inventory from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HarnessError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Automation server location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Full URL of the Appium endpoint, e.g. `http://127.0.0.1:4723`
    pub full_server_path: String,
}

/// Application/server/default-capability document (`appium_config.yaml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppiumConfig {
    pub server: ServerConfig,
    /// Default capabilities applied before device and application entries
    #[serde(default)]
    pub capabilities: CapabilitySet,
    /// Application descriptors keyed by logical name. A `null` entry is kept
    /// so lookups can report it as missing.
    #[serde(default)]
    pub applications: BTreeMap<String, Option<CapabilitySet>>,
}

impl AppiumConfig {
    /// Load the config from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HarnessError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse the config from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Look up an application descriptor, rejecting absent or empty entries
    pub fn application(&self, name: &str) -> Result<&CapabilitySet> {
        match self.applications.get(name) {
            Some(Some(app)) if !app.is_empty() => Ok(app),
            _ => Err(HarnessError::UnknownApplication(name.to_string())),
        }
    }
}
