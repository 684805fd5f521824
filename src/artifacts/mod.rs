//! Execution artifact manager
//!
//! Lays out the report tree:
//!
//! ```text
//! reports/test-suite-{device}-{timestamp}/
//!     test_report.json
//!     {test}-{timestamp}/
//!         device_capabilities.json
//!         logs/execution.log
//!         screenshots/{test}.png
//! ```

use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::{HarnessError, Result};

/// Timestamp format used in folder names
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Device name used when the suite folder is created implicitly
pub const UNKNOWN_DEVICE: &str = "unknown_device";

/// Folders of a single test execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionDir {
    pub root: PathBuf,
    pub logs: PathBuf,
    pub screenshots: PathBuf,
}

impl ExecutionDir {
    /// Log file inside `logs/`
    pub fn log_file(&self) -> PathBuf {
        self.logs.join("execution.log")
    }

    /// Persisted capability set
    pub fn capabilities_file(&self) -> PathBuf {
        self.root.join("device_capabilities.json")
    }

    /// Screenshot path for a given name
    pub fn screenshot_file(&self, name: &str) -> PathBuf {
        self.screenshots.join(format!("{}.png", sanitize(name)))
    }
}

/// Owns the suite folder and the current execution folder
#[derive(Debug)]
pub struct ArtifactManager {
    base_dir: PathBuf,
    suite_dir: Option<PathBuf>,
    execution: Option<ExecutionDir>,
}

impl ArtifactManager {
    /// Create a manager rooted at `base_dir` (usually `reports/`)
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            suite_dir: None,
            execution: None,
        }
    }

    /// Create the suite folder; later calls keep the first folder
    pub fn setup_suite_folder(&mut self, device_name: &str) -> Result<&Path> {
        if self.suite_dir.is_none() {
            let name = format!("test-suite-{}-{}", sanitize(device_name), timestamp());
            let dir = self.base_dir.join(name);
            fs::create_dir_all(&dir)?;
            tracing::debug!("Suite folder: {}", dir.display());
            self.suite_dir = Some(dir);
        }
        self.suite_dir()
    }

    /// Create a fresh execution folder for `test_name`
    ///
    /// Each call yields a new folder. Two calls for the same test within one
    /// second get a numeric suffix rather than sharing a folder.
    pub fn setup_execution_folder(&mut self, test_name: &str) -> Result<&ExecutionDir> {
        if self.suite_dir.is_none() {
            self.setup_suite_folder(UNKNOWN_DEVICE)?;
        }
        let suite = self.suite_dir()?.to_path_buf();

        let stem = format!("{}-{}", sanitize(test_name), timestamp());
        let root = create_unique_dir(&suite, &stem)?;

        let execution = ExecutionDir {
            logs: root.join("logs"),
            screenshots: root.join("screenshots"),
            root,
        };
        fs::create_dir_all(&execution.logs)?;
        fs::create_dir_all(&execution.screenshots)?;

        Ok(&*self.execution.insert(execution))
    }

    /// Root of every suite folder
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Current suite folder
    pub fn suite_dir(&self) -> Result<&Path> {
        self.suite_dir
            .as_deref()
            .ok_or_else(|| HarnessError::artifact_state("suite folder is not set up"))
    }

    /// Current execution folders
    pub fn execution(&self) -> Result<&ExecutionDir> {
        self.execution
            .as_ref()
            .ok_or_else(|| HarnessError::artifact_state("execution folder is not set up"))
    }

    /// Current execution folder
    pub fn execution_dir(&self) -> Result<&Path> {
        self.execution().map(|e| e.root.as_path())
    }

    /// Current `logs/` folder
    pub fn log_dir(&self) -> Result<&Path> {
        self.execution().map(|e| e.logs.as_path())
    }

    /// Current `screenshots/` folder
    pub fn screenshot_dir(&self) -> Result<&Path> {
        self.execution().map(|e| e.screenshots.as_path())
    }
}

fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Keep folder names portable (device serials may contain `:`)
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

fn create_unique_dir(parent: &Path, stem: &str) -> Result<PathBuf> {
    let mut attempt = 0u32;
    loop {
        let name = match attempt {
            0 => stem.to_string(),
            n => format!("{}-{}", stem, n),
        };
        let candidate = parent.join(name);
        match fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    }
}
