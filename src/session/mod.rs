//! Session module - driver session lifecycle
//!
//! Opens and closes the single remote session a test runs against.

mod manager;

pub use manager::{DriverSessionManager, SessionConnector, WebDriverConnector};
