//! Device/capability resolver
//!
//! Loads the Appium config and device inventory, chooses a device either by
//! inventory index or by matching against adb, and merges
//! defaults → device → application into one flat capability set.

use std::sync::Arc;

use crate::core::{
    AppiumConfig, CapabilitySet, DeviceDescriptor, DeviceInventory, HarnessError, Result, Settings,
};
use crate::system::{AdbProbe, DeviceProbe};

/// Output of a successful resolution
#[derive(Debug, Clone)]
pub struct ResolvedCapabilities {
    /// Selected device
    pub device: DeviceDescriptor,
    /// Logical application name
    pub application: String,
    /// Merged capability set
    pub capabilities: CapabilitySet,
    /// Automation server endpoint
    pub server_url: String,
}

impl ResolvedCapabilities {
    /// Name of the selected device
    pub fn device_name(&self) -> &str {
        &self.device.device_name
    }
}

/// Top-level merge, later layers win per key
pub fn merge_capabilities(layers: &[&CapabilitySet]) -> CapabilitySet {
    let mut merged = CapabilitySet::new();
    for layer in layers {
        for (key, value) in layer.iter() {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// First configured device whose name is in `connected`
pub fn select_connected_device<'a>(
    configured: &'a [DeviceDescriptor],
    connected: &[String],
) -> Result<&'a DeviceDescriptor> {
    if connected.is_empty() {
        return Err(HarnessError::NoDeviceFound);
    }

    configured
        .iter()
        .find(|device| connected.iter().any(|name| *name == device.device_name))
        .ok_or_else(|| HarnessError::NoMatchingDevice {
            connected: connected.to_vec(),
        })
}

/// Resolves the capability set for one session
pub struct CapabilityResolver {
    config: AppiumConfig,
    inventory: DeviceInventory,
    probe: Arc<dyn DeviceProbe>,
    server_override: Option<String>,
}

impl CapabilityResolver {
    /// Create a resolver from already loaded documents, probing adb
    pub fn new(config: AppiumConfig, inventory: DeviceInventory) -> Self {
        Self {
            config,
            inventory,
            probe: Arc::new(AdbProbe),
            server_override: None,
        }
    }

    /// Load both documents from the paths in `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let config = AppiumConfig::load(&settings.paths.appium_config)?;
        let inventory = DeviceInventory::load(&settings.paths.device_config)?;

        let mut resolver = Self::new(config, inventory);
        resolver.server_override = settings.driver.server_url.clone();
        Ok(resolver)
    }

    /// Replace the device probe
    pub fn with_probe(mut self, probe: Arc<dyn DeviceProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Configured devices
    pub fn devices(&self) -> &[DeviceDescriptor] {
        &self.inventory.devices
    }

    /// Server endpoint sessions are opened against
    pub fn server_url(&self) -> &str {
        self.server_override
            .as_deref()
            .unwrap_or(&self.config.server.full_server_path)
    }

    /// Select the device under test
    pub async fn select_device(&self, device_index: Option<usize>) -> Result<DeviceDescriptor> {
        match device_index {
            Some(index) => self.inventory.devices.get(index).cloned().ok_or_else(|| {
                HarnessError::config(format!(
                    "Device index {} out of range ({} devices configured)",
                    index,
                    self.inventory.devices.len()
                ))
            }),
            None => {
                let connected = self.probe.connected_devices().await?;
                tracing::debug!("Connected devices: {:?}", connected);
                select_connected_device(&self.inventory.devices, &connected).cloned()
            }
        }
    }

    /// Resolve device, application and merged capabilities
    pub async fn resolve(
        &self,
        device_index: Option<usize>,
        application: &str,
    ) -> Result<ResolvedCapabilities> {
        let device = self.select_device(device_index).await?;
        tracing::info!(
            "Initializing driver manager for {} on {}",
            application,
            device.device_name
        );

        let app = self.config.application(application)?;

        tracing::debug!("Setting up capabilities");
        let device_caps = device.capabilities();
        let capabilities = merge_capabilities(&[&self.config.capabilities, &device_caps, app]);

        Ok(ResolvedCapabilities {
            device,
            application: application.to_string(),
            capabilities,
            server_url: self.server_url().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct StaticProbe(Vec<String>);

    #[async_trait]
    impl DeviceProbe for StaticProbe {
        async fn connected_devices(&self) -> Result<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    fn caps(value: serde_json::Value) -> CapabilitySet {
        value.as_object().cloned().unwrap()
    }

    fn resolver(connected: &[&str]) -> CapabilityResolver {
        let config = AppiumConfig::from_yaml(
            r#"
server:
  full_server_path: "http://127.0.0.1:4723"
capabilities:
  platformName: Android
  orientation: PORTRAIT
  newCommandTimeout: 60
applications:
  calculator:
    appPackage: com.google.android.calculator
    orientation: LANDSCAPE
"#,
        )
        .unwrap();
        let mut x = DeviceDescriptor::new("X");
        x.attributes.insert("newCommandTimeout".into(), json!(120));
        let inventory = DeviceInventory {
            devices: vec![x, DeviceDescriptor::new("Y")],
        };
        let probe = StaticProbe(connected.iter().map(|s| s.to_string()).collect());
        CapabilityResolver::new(config, inventory).with_probe(Arc::new(probe))
    }

    #[test]
    fn test_merge_is_right_biased() {
        let defaults = caps(json!({"a": 1, "b": 2}));
        let device = caps(json!({"b": 3, "c": 4}));
        let app = caps(json!({"c": 5, "d": 6}));

        let merged = merge_capabilities(&[&defaults, &device, &app]);
        assert_eq!(
            serde_json::Value::Object(merged),
            json!({"a": 1, "b": 3, "c": 5, "d": 6})
        );
    }

    #[test]
    fn test_merge_replaces_nested_values_whole() {
        let defaults = caps(json!({"opts": {"x": 1, "y": 2}}));
        let app = caps(json!({"opts": {"x": 9}}));

        let merged = merge_capabilities(&[&defaults, &app]);
        assert_eq!(merged["opts"], json!({"x": 9}));
    }

    #[test]
    fn test_select_connected_device() {
        let configured = vec![DeviceDescriptor::new("X"), DeviceDescriptor::new("Y")];

        let picked = select_connected_device(&configured, &["X".to_string()]).unwrap();
        assert_eq!(picked.device_name, "X");

        let err = select_connected_device(&configured, &[]).unwrap_err();
        assert!(matches!(err, HarnessError::NoDeviceFound));

        let err = select_connected_device(&configured, &["Z".to_string()]).unwrap_err();
        assert!(matches!(err, HarnessError::NoMatchingDevice { .. }));
    }

    #[test]
    fn test_select_prefers_inventory_order() {
        let configured = vec![DeviceDescriptor::new("X"), DeviceDescriptor::new("Y")];
        let connected = vec!["Y".to_string(), "X".to_string()];

        let picked = select_connected_device(&configured, &connected).unwrap();
        assert_eq!(picked.device_name, "X");
    }

    #[tokio::test]
    async fn test_resolve_auto_selects_and_merges() {
        let resolved = resolver(&["X"]).resolve(None, "calculator").await.unwrap();

        assert_eq!(resolved.device_name(), "X");
        assert_eq!(resolved.server_url, "http://127.0.0.1:4723");
        assert_eq!(resolved.capabilities["deviceName"], "X");
        assert_eq!(resolved.capabilities["newCommandTimeout"], 120);
        assert_eq!(resolved.capabilities["orientation"], "LANDSCAPE");
        assert_eq!(resolved.capabilities["platformName"], "Android");
    }

    #[tokio::test]
    async fn test_resolve_by_index_skips_probe() {
        let resolved = resolver(&[]).resolve(Some(1), "calculator").await.unwrap();
        assert_eq!(resolved.device_name(), "Y");
    }

    #[tokio::test]
    async fn test_resolve_out_of_range_index() {
        let err = resolver(&["X"]).resolve(Some(7), "calculator").await.unwrap_err();
        assert!(matches!(err, HarnessError::Config(_)));
    }

    #[tokio::test]
    async fn test_resolve_unknown_application() {
        let err = resolver(&["X"]).resolve(None, "browser").await.unwrap_err();
        assert!(matches!(err, HarnessError::UnknownApplication(_)));
    }

    #[tokio::test]
    async fn test_resolve_without_devices() {
        let err = resolver(&[]).resolve(None, "calculator").await.unwrap_err();
        assert!(matches!(err, HarnessError::NoDeviceFound));

        let err = resolver(&["Z"]).resolve(None, "calculator").await.unwrap_err();
        assert!(matches!(err, HarnessError::NoMatchingDevice { .. }));
    }
}
