//! Execution of a single test case
//!
//! Shared by both engines: per-test folder and log sink, device and
//! capability resolution, a fresh session, the scenario steps, and teardown
//! whatever the outcome.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::context::RunContext;
use crate::core::{HarnessError, Result};
use crate::device::CapabilityResolver;
use crate::pages::CalculatorPage;
use crate::runner::scenario::{LoadFailure, Scenario, Step};
use crate::session::{DriverSessionManager, SessionConnector};
use crate::webdriver::UiSession;

/// Result of one test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "message", rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    /// An expectation did not hold
    Failed(String),
    /// Setup, interaction or teardown raised an error
    Error(String),
}

impl Outcome {
    fn from_error(err: &HarnessError) -> Self {
        Outcome::Error(format!("{:?}: {}", err.kind(), error_chain(err)))
    }

    /// Label used in console output
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "PASSED",
            Outcome::Failed(_) => "FAILED",
            Outcome::Error(_) => "ERROR",
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

/// Report line for one test case
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub duration_ms: u128,
    pub execution_dir: Option<PathBuf>,
}

/// Collaborators every test case needs
pub struct Harness {
    pub resolver: CapabilityResolver,
    pub connector: Arc<dyn SessionConnector>,
    pub device_index: Option<usize>,
}

impl Harness {
    /// Device name used for the suite folder; falls back to `unknown_device`
    pub async fn suite_device_name(&self) -> String {
        match self.resolver.select_device(self.device_index).await {
            Ok(device) => device.device_name,
            Err(e) => {
                tracing::warn!("Could not resolve suite device: {}", e);
                crate::artifacts::UNKNOWN_DEVICE.to_string()
            }
        }
    }
}

/// Run one scenario with a fresh session
pub async fn run_case(ctx: &mut RunContext, harness: &Harness, scenario: &Scenario) -> CaseReport {
    let started = Instant::now();
    let id = scenario.id();
    let previous = current_execution_dir(ctx);

    let outcome = match ctx.begin_test(&scenario.name, &id) {
        Ok(sink) => sink.scope(execute(ctx, harness, scenario)).await,
        Err(e) => Outcome::from_error(&e),
    };

    // Execution folders are unique, so an unchanged path belongs to an earlier test
    let execution_dir = current_execution_dir(ctx).filter(|dir| Some(dir) != previous.as_ref());

    CaseReport {
        id,
        name: scenario.name.clone(),
        outcome,
        duration_ms: started.elapsed().as_millis(),
        execution_dir,
    }
}

/// Report for a scenario file that could not be loaded
pub fn load_failure_report(failure: &LoadFailure) -> CaseReport {
    let name = failure
        .path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    tracing::error!("Cannot load {}: {}", failure.path.display(), failure.error);

    CaseReport {
        id: failure.path.display().to_string(),
        name,
        outcome: Outcome::from_error(&failure.error),
        duration_ms: 0,
        execution_dir: None,
    }
}

fn current_execution_dir(ctx: &RunContext) -> Option<PathBuf> {
    ctx.artifacts.execution_dir().ok().map(PathBuf::from)
}

async fn execute(ctx: &RunContext, harness: &Harness, scenario: &Scenario) -> Outcome {
    tracing::info!("Running {}", scenario.id());

    let application = scenario
        .application
        .as_deref()
        .unwrap_or(ctx.settings.run.application.as_str());

    let resolved = match harness
        .resolver
        .resolve(harness.device_index, application)
        .await
    {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::error!("Capability resolution failed: {}", error_chain(&e));
            return Outcome::from_error(&e);
        }
    };

    let mut manager = DriverSessionManager::new(resolved, harness.connector.clone());
    let outcome = match manager.start(ctx).await {
        Ok(session) => run_steps(ctx, session, scenario).await,
        Err(e) => {
            tracing::error!("{}", error_chain(&e));
            Outcome::from_error(&e)
        }
    };

    if manager.is_active() {
        if let Err(e) = manager.stop().await {
            tracing::error!("{}", error_chain(&e));
            if outcome.is_passed() {
                return Outcome::from_error(&e);
            }
        }
    }

    match &outcome {
        Outcome::Passed => tracing::info!("{} passed", scenario.name),
        Outcome::Failed(msg) | Outcome::Error(msg) => {
            tracing::error!("{} {}: {}", scenario.name, outcome.label(), msg)
        }
    }
    outcome
}

async fn run_steps(ctx: &RunContext, session: &dyn UiSession, scenario: &Scenario) -> Outcome {
    let outcome = match drive(ctx, session, scenario).await {
        Ok(None) => Outcome::Passed,
        Ok(Some(failure)) => Outcome::Failed(failure),
        Err(e) => Outcome::from_error(&e),
    };

    if !outcome.is_passed() {
        if let Err(e) = capture_screenshot(ctx, session, &scenario.name).await {
            tracing::warn!("Screenshot capture failed: {}", e);
        }
    }
    outcome
}

/// Play the steps; `Ok(Some(_))` carries the first failed expectation
async fn drive(
    ctx: &RunContext,
    session: &dyn UiSession,
    scenario: &Scenario,
) -> Result<Option<String>> {
    let page = CalculatorPage::open(session, ctx.settings.implicit_wait()).await?;

    for step in &scenario.steps {
        tracing::debug!("Step {:?}", step);
        match step {
            Step::PressNumber(n) => page.press_number(*n).await?,
            Step::PressOperator(symbol) => page.press_operator(symbol).await?,
            Step::PressEqual => page.press_equal().await?,
            Step::Clear => page.clear().await?,
            Step::ExpectResult(expected) => {
                let actual = page.get_result().await?;
                if actual != *expected {
                    return Ok(Some(format!("Expected {:?}, but got {:?}", expected, actual)));
                }
            }
            Step::ExpectEmptyResult(expected) => {
                let actual = page.get_empty_result().await?;
                if actual != *expected {
                    return Ok(Some(format!(
                        "Expected empty result {:?}, but got {:?}",
                        expected, actual
                    )));
                }
            }
        }
    }
    Ok(None)
}

/// Save a PNG of the current screen as `screenshots/{name}.png`
pub async fn capture_screenshot(
    ctx: &RunContext,
    session: &dyn UiSession,
    name: &str,
) -> Result<PathBuf> {
    let path = ctx.artifacts.execution()?.screenshot_file(name);
    let png = session.screenshot().await?;
    tokio::fs::write(&path, png).await?;
    tracing::info!("Screenshot saved to {}", path.display());
    Ok(path)
}

/// Error message followed by its sources, joined with ` <- `
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(" <- ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
