//! System module - OS command wrappers
//!
//! Wraps the `adb` CLI used for device discovery.

mod command;

pub use command::{list_adb_devices, parse_adb_devices, AdbProbe, DeviceProbe, SystemCommand};
