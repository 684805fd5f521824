//! Suite report
//!
//! Aggregated counts for one run, written as `test_report.json` in the suite
//! folder.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::Result;
use crate::runner::case::{CaseReport, Outcome};

/// File name of the suite report
pub const REPORT_FILE_NAME: &str = "test_report.json";

/// Result of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct SuiteSummary {
    pub engine: String,
    pub device: String,
    pub started_at: String,
    pub duration_ms: u128,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub cases: Vec<CaseReport>,
}

impl SuiteSummary {
    /// Tally the outcomes of `cases`
    pub fn new(
        engine: &str,
        device: &str,
        started_at: String,
        duration_ms: u128,
        cases: Vec<CaseReport>,
    ) -> Self {
        let mut passed = 0;
        let mut failed = 0;
        let mut errors = 0;
        for case in &cases {
            match case.outcome {
                Outcome::Passed => passed += 1,
                Outcome::Failed(_) => failed += 1,
                Outcome::Error(_) => errors += 1,
            }
        }

        Self {
            engine: engine.to_string(),
            device: device.to_string(),
            started_at,
            duration_ms,
            passed,
            failed,
            errors,
            cases,
        }
    }

    pub fn total(&self) -> usize {
        self.cases.len()
    }

    /// At least one test ran and none failed or errored
    pub fn is_success(&self) -> bool {
        self.total() > 0 && self.failed == 0 && self.errors == 0
    }

    /// Process exit code for this run
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    /// Write `test_report.json` into `suite_dir`
    pub fn write(&self, suite_dir: &Path) -> Result<PathBuf> {
        let path = suite_dir.join(REPORT_FILE_NAME);
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        tracing::debug!("Report written to {}", path.display());
        Ok(path)
    }
}
