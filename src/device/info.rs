//! Persisted device capabilities
//!
//! The session manager writes the merged capability set next to the test's
//! logs; tests and reports read it back from there.

use std::fs;

use crate::artifacts::ArtifactManager;
use crate::core::{CapabilitySet, Result};

/// Reads and writes `device_capabilities.json` in the current execution folder
pub struct DeviceInfo;

impl DeviceInfo {
    /// Write the capability set into the current execution folder
    pub fn save_capabilities(artifacts: &ArtifactManager, caps: &CapabilitySet) -> Result<()> {
        let path = artifacts.execution()?.capabilities_file();
        let content = serde_json::to_string_pretty(caps)?;
        fs::write(&path, content)?;
        tracing::debug!("Capabilities saved to {}", path.display());
        Ok(())
    }

    /// Read the capability set stored for the current execution
    pub fn load_capabilities(artifacts: &ArtifactManager) -> Result<CapabilitySet> {
        let path = artifacts.execution()?.capabilities_file();
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
