//! Logging for test executions
//!
//! Each test gets a [`LogSink`]: a `tracing` dispatcher with two outputs, the
//! console (INFO and above) and `logs/execution.log` in the test's execution
//! folder (DEBUG and above, truncated on open). Sinks are memoized per key in
//! a [`LogRegistry`], so a repeated lookup never attaches a second pair of
//! outputs.
//!
//! Outside a test the binary uses the plain console subscriber installed by
//! [`init_console`].

use std::collections::HashMap;
use std::fs::File;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::instrument::WithSubscriber;
use tracing::level_filters::LevelFilter;
use tracing::Dispatch;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::core::Result;

/// Timestamp format of every log line
pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// File name of the per-execution log
pub const LOG_FILE_NAME: &str = "execution.log";

/// Log sink bound to one key
#[derive(Clone)]
pub struct LogSink {
    key: String,
    log_file: PathBuf,
    dispatch: Dispatch,
}

impl LogSink {
    fn open(key: &str, log_dir: &Path, console: Option<BoxMakeWriter>) -> Result<Self> {
        let log_file = log_dir.join(LOG_FILE_NAME);
        let file = File::create(&log_file)?;

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()))
            .with_file(true)
            .with_line_number(false)
            .with_target(false)
            .with_filter(LevelFilter::DEBUG);

        let console_layer = console.map(|writer| {
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()))
                .with_file(true)
                .with_line_number(false)
                .with_target(false)
                .with_filter(LevelFilter::INFO)
        });

        let subscriber = tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer);

        Ok(Self {
            key: key.to_string(),
            log_file,
            dispatch: Dispatch::new(subscriber),
        })
    }

    /// Key this sink was created for
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Path of the file output
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Underlying dispatcher
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run a closure with this sink as the default subscriber
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Drive a future with this sink as the default subscriber
    pub async fn scope<F: Future>(&self, future: F) -> F::Output {
        future.with_subscriber(self.dispatch.clone()).await
    }
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSink")
            .field("key", &self.key)
            .field("log_file", &self.log_file)
            .finish()
    }
}

type ConsoleFactory = Arc<dyn Fn() -> BoxMakeWriter + Send + Sync>;

/// Memoized sinks, one per key
pub struct LogRegistry {
    sinks: HashMap<String, LogSink>,
    console: Option<ConsoleFactory>,
}

impl LogRegistry {
    /// Registry whose sinks also write to stderr
    pub fn new() -> Self {
        Self::with_console(std::io::stderr)
    }

    /// Registry whose sinks also write to `writer`
    pub fn with_console<W>(writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Clone + Send + Sync + 'static,
    {
        Self {
            sinks: HashMap::new(),
            console: Some(Arc::new(move || BoxMakeWriter::new(writer.clone()))),
        }
    }

    /// Registry whose sinks only write to their file
    pub fn file_only() -> Self {
        Self {
            sinks: HashMap::new(),
            console: None,
        }
    }

    /// Sink for `key`, created under `log_dir` on first lookup
    ///
    /// Later lookups return the memoized sink and ignore `log_dir`.
    pub fn get_logger(&mut self, key: &str, log_dir: &Path) -> Result<LogSink> {
        if let Some(sink) = self.sinks.get(key) {
            return Ok(sink.clone());
        }

        let console = self.console.as_ref().map(|make| make());
        let sink = LogSink::open(key, log_dir, console)?;
        self.sinks.insert(key.to_string(), sink.clone());
        Ok(sink)
    }

    /// Already created sink, if any
    pub fn get(&self, key: &str) -> Option<&LogSink> {
        self.sinks.get(key)
    }

    /// Number of sinks created so far
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether no sink has been created yet
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl std::fmt::Debug for LogRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogRegistry")
            .field("sinks", &self.sinks)
            .field("console", &self.console.is_some())
            .finish()
    }
}

impl Default for LogRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Install the process-wide console subscriber used outside of tests
pub fn init_console(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("droidcheck=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("droidcheck=info"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()))
        .try_init();
}
