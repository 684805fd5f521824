//! droidcheck - Android calculator UI tests over Appium
//!
//! Main entry point for the test runner.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use droidcheck::device::CapabilityResolver;
use droidcheck::logging::init_console;
use droidcheck::runner::{select_engine, Harness};
use droidcheck::session::WebDriverConnector;
use droidcheck::system::SystemCommand;
use droidcheck::{RunContext, Settings};

/// droidcheck - Android calculator UI tests over Appium
#[derive(Parser, Debug)]
#[command(name = "droidcheck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Use the alternate engine (summary block output)
    #[arg(long)]
    slash: bool,

    /// Directory to discover scenarios in
    #[arg(long, short = 't')]
    tests_dir: Option<PathBuf>,

    /// Pick the device by inventory index instead of probing adb
    #[arg(long, short = 'i')]
    device_index: Option<usize>,

    /// Application used by scenarios that do not name one
    #[arg(long, short = 'a')]
    app: Option<String>,

    /// Settings file (TOML)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Print the default settings file and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output on the console
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    if args.print_config {
        println!("{}", Settings::default_config_toml());
        return Ok(ExitCode::SUCCESS);
    }

    init_console(args.verbose);

    // Build settings
    let mut settings = match args.config {
        Some(ref path) => Settings::load_path(path)?,
        None => Settings::load(),
    };

    // Apply CLI overrides
    if let Some(dir) = args.tests_dir {
        settings.paths.scenarios_dir = dir;
    }
    if let Some(index) = args.device_index {
        settings.run.device_index = Some(index);
    }
    if let Some(app) = args.app {
        settings.run.application = app;
    }

    tracing::debug!("Running on {}", SystemCommand::os_name());
    if settings.run.device_index.is_none() && !SystemCommand::is_adb_available().await {
        tracing::warn!("adb is not available; device selection will fail without --device-index");
    }

    let harness = Harness {
        resolver: CapabilityResolver::from_settings(&settings)?,
        connector: Arc::new(WebDriverConnector::new(settings.request_timeout())),
        device_index: settings.run.device_index,
    };

    let engine = select_engine(args.slash);
    let scenarios_dir = settings.paths.scenarios_dir.clone();
    let mut ctx = RunContext::new(settings);

    let summary = engine.run(&mut ctx, &harness, &scenarios_dir).await?;
    Ok(ExitCode::from(summary.exit_code()))
}
