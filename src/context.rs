//! Run context shared by the runner, session manager and pages
//!
//! Holds the state that must outlive a single test: settings, the artifact
//! folders and the memoized log sinks. It is created once per run and passed
//! by reference; nothing here is global.

use crate::artifacts::ArtifactManager;
use crate::core::{Result, Settings};
use crate::logging::{LogRegistry, LogSink};

/// Per-run state
#[derive(Debug)]
pub struct RunContext {
    pub settings: Settings,
    pub artifacts: ArtifactManager,
    pub loggers: LogRegistry,
}

impl RunContext {
    /// Create a context writing reports under `settings.paths.reports_dir`
    pub fn new(settings: Settings) -> Self {
        let artifacts = ArtifactManager::new(settings.paths.reports_dir.clone());
        Self {
            settings,
            artifacts,
            loggers: LogRegistry::new(),
        }
    }

    /// Replace the logger registry
    pub fn with_loggers(mut self, loggers: LogRegistry) -> Self {
        self.loggers = loggers;
        self
    }

    /// Create the execution folder for `test_name` and its log sink
    ///
    /// The sink is memoized under `test_id`, which must be unique per test
    /// case; two cases sharing a name still get their own log file.
    pub fn begin_test(&mut self, test_name: &str, test_id: &str) -> Result<LogSink> {
        let log_dir = self.artifacts.setup_execution_folder(test_name)?.logs.clone();
        self.loggers.get_logger(test_id, &log_dir)
    }
}
