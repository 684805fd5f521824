//! Test engines
//!
//! Two interchangeable runners over the same scenario set. They share
//! discovery, the suite folder, per-test execution and the JSON report; they
//! differ only in how they talk to the console.

use async_trait::async_trait;
use std::path::Path;
use std::time::Instant;

use crate::artifacts::TIMESTAMP_FORMAT;
use crate::context::RunContext;
use crate::core::Result;
use crate::runner::case::{load_failure_report, run_case, CaseReport, Harness, Outcome};
use crate::runner::report::SuiteSummary;
use crate::runner::scenario::{discover, Discovery};

/// A test runner
#[async_trait]
pub trait TestEngine: Send + Sync {
    /// Short name recorded in the report
    fn name(&self) -> &'static str;

    /// Called once before any test runs
    fn on_start(&self, _discovery: &Discovery) {}

    /// Called after each test
    fn on_case(&self, _report: &CaseReport) {}

    /// Called once after the report is written
    fn on_finish(&self, summary: &SuiteSummary);

    /// Discover scenarios under `dir` and run them all
    async fn run(
        &self,
        ctx: &mut RunContext,
        harness: &Harness,
        dir: &Path,
    ) -> Result<SuiteSummary> {
        let discovery = discover(dir)?;
        tracing::info!("Discovered {} scenario(s) in {}", discovery.len(), dir.display());
        self.on_start(&discovery);

        let started_at = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        let clock = Instant::now();
        let device = harness.suite_device_name().await;

        let mut cases = Vec::with_capacity(discovery.len());
        if !discovery.is_empty() {
            ctx.artifacts.setup_suite_folder(&device)?;
            for scenario in &discovery.scenarios {
                let report = run_case(ctx, harness, scenario).await;
                self.on_case(&report);
                cases.push(report);
            }
            for failure in &discovery.failures {
                let report = load_failure_report(failure);
                self.on_case(&report);
                cases.push(report);
            }
        }

        let summary = SuiteSummary::new(
            self.name(),
            &device,
            started_at,
            clock.elapsed().as_millis(),
            cases,
        );
        if let Ok(suite_dir) = ctx.artifacts.suite_dir() {
            summary.write(suite_dir)?;
        }
        self.on_finish(&summary);
        Ok(summary)
    }
}

/// Default engine: one line per test, counts at the end
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardEngine;

#[async_trait]
impl TestEngine for StandardEngine {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn on_start(&self, discovery: &Discovery) {
        println!("collected {} item(s)", discovery.len());
    }

    fn on_case(&self, report: &CaseReport) {
        println!("{} {}", report.id, report.outcome.label());
    }

    fn on_finish(&self, summary: &SuiteSummary) {
        let failures = summary
            .cases
            .iter()
            .filter_map(|case| match &case.outcome {
                Outcome::Passed => None,
                Outcome::Failed(msg) | Outcome::Error(msg) => Some((case, msg)),
            })
            .collect::<Vec<_>>();

        if !failures.is_empty() {
            println!("\n---- failures ----");
            for (case, msg) in failures {
                println!("{} {}: {}", case.outcome.label(), case.id, msg);
            }
        }

        println!(
            "\n{} passed, {} failed, {} errors in {:.2}s",
            summary.passed,
            summary.failed,
            summary.errors,
            summary.duration_ms as f64 / 1000.0
        );
    }
}

/// Alternate engine: quiet while running, summary block at the end
#[derive(Debug, Default, Clone, Copy)]
pub struct SlashEngine;

#[async_trait]
impl TestEngine for SlashEngine {
    fn name(&self) -> &'static str {
        "slash"
    }

    fn on_finish(&self, summary: &SuiteSummary) {
        if summary.total() == 0 {
            println!("No tests found to run.");
            return;
        }

        println!("\n===== TEST SUMMARY =====");
        println!("Successful: {}", summary.passed);
        println!("Failed: {}", summary.failed);
        println!("Errors: {}", summary.errors);
        println!("========================");
    }
}

/// Engine selected by the `--slash` flag
pub fn select_engine(slash: bool) -> Box<dyn TestEngine> {
    if slash {
        Box::new(SlashEngine)
    } else {
        Box::new(StandardEngine)
    }
}
