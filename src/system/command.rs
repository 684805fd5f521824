//! System command wrapper
//!
//! Runs OS-level commands and hands back their raw text output.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use crate::core::{HarnessError, Result};

/// Executor for plain system commands
pub struct SystemCommand;

impl SystemCommand {
    /// Name of the host operating system (`linux`, `macos`, `windows`, ...)
    pub fn os_name() -> &'static str {
        std::env::consts::OS
    }

    /// Run a command and return its trimmed stdout
    ///
    /// A non-zero exit status is not an error here; callers inspect the
    /// output the same way whatever the status.
    pub async fn send_cmd(program: &str, args: &[&str]) -> Result<String> {
        tracing::debug!("Running command: {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| HarnessError::Command {
                command: format!("{} {}", program, args.join(" ")),
                source,
            })?;

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Check if adb is installed and accessible
    pub async fn is_adb_available() -> bool {
        Self::send_cmd("adb", &["version"])
            .await
            .map(|out| out.contains("Android Debug Bridge"))
            .unwrap_or(false)
    }
}

/// Parse the output of `adb devices` into device serials
///
/// Skips the `List of devices attached` header and blank lines, and keeps
/// only lines whose state mentions `device`.
pub fn parse_adb_devices(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.contains("device") && !line.contains("List"))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// List Android devices connected through adb
pub async fn list_adb_devices() -> Result<Vec<String>> {
    let output = SystemCommand::send_cmd("adb", &["devices"]).await?;
    Ok(parse_adb_devices(&output))
}

/// Source of currently connected device names
#[async_trait]
pub trait DeviceProbe: Send + Sync {
    /// Names of connected devices; empty when none are attached
    async fn connected_devices(&self) -> Result<Vec<String>>;
}

/// Probe backed by `adb devices`
#[derive(Debug, Clone, Copy, Default)]
pub struct AdbProbe;

#[async_trait]
impl DeviceProbe for AdbProbe {
    async fn connected_devices(&self) -> Result<Vec<String>> {
        list_adb_devices().await
    }
}
