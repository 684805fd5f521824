//! Custom error types for droidcheck
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Boxed cause carried by session lifecycle errors
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for droidcheck operations
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Missing or malformed configuration entry
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested application is absent from the Appium config
    #[error("Application '{0}' not found in appium config")]
    UnknownApplication(String),

    /// adb reported no connected devices
    #[error("No devices found via adb")]
    NoDeviceFound,

    /// None of the configured devices is connected
    #[error("No matching device found in device config (connected: {})", .connected.join(", "))]
    NoMatchingDevice { connected: Vec<String> },

    /// The remote session could not be opened
    #[error("Unable to start driver: {source}")]
    DriverStartFailed {
        #[source]
        source: BoxError,
    },

    /// The remote session could not be closed
    #[error("Unable to stop driver: {source}")]
    DriverStopFailed {
        #[source]
        source: BoxError,
    },

    /// Page object received a symbol it has no locator for
    #[error("Invalid locator request: {0}")]
    InvalidLocatorRequest(String),

    /// Execution paths were read before the folders were created
    #[error("Artifact state error: {0}")]
    ArtifactState(String),

    /// The automation server answered with a W3C error payload
    #[error("WebDriver error '{error}': {message}")]
    WebDriver { error: String, message: String },

    /// External command could not be executed
    #[error("Failed to execute command `{command}`: {source}")]
    Command {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for droidcheck operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Coarse error family, used by the runner to classify failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    DeviceResolution,
    SessionLifecycle,
    Locator,
    ArtifactState,
    Transport,
}

impl HarnessError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an artifact state error
    pub fn artifact_state(msg: impl Into<String>) -> Self {
        Self::ArtifactState(msg.into())
    }

    /// Create a locator error
    pub fn locator(msg: impl Into<String>) -> Self {
        Self::InvalidLocatorRequest(msg.into())
    }

    /// Wrap a failure raised while opening a session
    pub fn start_failed<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::DriverStartFailed {
            source: error.into(),
        }
    }

    /// Wrap a failure raised while closing a session
    pub fn stop_failed<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::DriverStopFailed {
            source: error.into(),
        }
    }

    /// Family this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::UnknownApplication(_) | Self::Yaml(_) => {
                ErrorKind::Configuration
            }
            Self::NoDeviceFound | Self::NoMatchingDevice { .. } => ErrorKind::DeviceResolution,
            Self::DriverStartFailed { .. } | Self::DriverStopFailed { .. } => {
                ErrorKind::SessionLifecycle
            }
            Self::InvalidLocatorRequest(_) => ErrorKind::Locator,
            Self::ArtifactState(_) => ErrorKind::ArtifactState,
            Self::WebDriver { .. }
            | Self::Command { .. }
            | Self::Json(_)
            | Self::Http(_)
            | Self::Io(_) => ErrorKind::Transport,
        }
    }
}
