//! Test runner
//!
//! Scenario discovery, per-test execution and the two console engines.

pub mod case;
pub mod engine;
pub mod report;
pub mod scenario;

pub use case::{
    capture_screenshot, error_chain, load_failure_report, run_case, CaseReport, Harness, Outcome,
};
pub use engine::{select_engine, SlashEngine, StandardEngine, TestEngine};
pub use report::{SuiteSummary, REPORT_FILE_NAME};
pub use scenario::{discover, Discovery, LoadFailure, Scenario, Step};
