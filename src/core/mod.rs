//! Core module - shared infrastructure for droidcheck
//!
//! This module contains foundational types, configuration, and error handling
//! used throughout the harness.

pub mod config;
pub mod error;
pub mod types;

pub use config::Settings;
pub use error::{ErrorKind, HarnessError, Result};
pub use types::*;
