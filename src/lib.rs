//! droidcheck - UI test harness for Android apps driven through Appium
//!
//! Resolves which device and application a test targets, opens a remote
//! WebDriver session with the merged capabilities, drives the calculator
//! through page objects and stores logs, capabilities and screenshots in a
//! per-test execution folder.
//!
//! # Architecture
//!
//! - **Core**: Settings, Appium/device documents and error handling
//! - **System**: Shell commands and the adb device probe
//! - **Device**: Device selection and capability merging
//! - **Artifacts**: Suite and execution folders
//! - **Logging**: Per-test log sinks
//! - **WebDriver**: Minimal W3C client for the Appium server
//! - **Session**: Driver session lifecycle
//! - **Pages**: Calculator page objects and locators
//! - **Runner**: Scenario discovery and the two test engines
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use droidcheck::device::CapabilityResolver;
//! use droidcheck::runner::{Harness, StandardEngine, TestEngine};
//! use droidcheck::session::WebDriverConnector;
//! use droidcheck::{RunContext, Settings};
//!
//! #[tokio::main]
//! async fn main() -> droidcheck::Result<()> {
//!     let settings = Settings::load();
//!     let harness = Harness {
//!         resolver: CapabilityResolver::from_settings(&settings)?,
//!         connector: Arc::new(WebDriverConnector::new(settings.request_timeout())),
//!         device_index: settings.run.device_index,
//!     };
//!     let dir = settings.paths.scenarios_dir.clone();
//!     let mut ctx = RunContext::new(settings);
//!
//!     let summary = StandardEngine.run(&mut ctx, &harness, &dir).await?;
//!     std::process::exit(summary.exit_code().into());
//! }
//! ```

pub mod artifacts;
pub mod context;
pub mod core;
pub mod device;
pub mod logging;
pub mod pages;
pub mod runner;
pub mod session;
pub mod system;
pub mod webdriver;

// Re-export commonly used items
pub use context::RunContext;
pub use crate::core::{ErrorKind, HarnessError, Result, Settings};
pub use pages::CalculatorPage;
pub use session::DriverSessionManager;
