//! Device module - device selection and capability resolution
//!
//! Picks the device under test and merges the capability dictionaries sent
//! at session start.

mod info;
mod resolver;

pub use info::DeviceInfo;
pub use resolver::{
    merge_capabilities, select_connected_device, CapabilityResolver, ResolvedCapabilities,
};
