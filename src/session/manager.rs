//! Driver session manager
//!
//! Owns one remote automation session: `start` opens it with the resolved
//! capabilities, `stop` closes it. Transport failures never leak out as-is;
//! they are wrapped into `DriverStartFailed` / `DriverStopFailed` with the
//! underlying error as the source.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::context::RunContext;
use crate::core::{CapabilitySet, HarnessError, Result};
use crate::device::{DeviceInfo, ResolvedCapabilities};
use crate::webdriver::{UiSession, WebDriverClient};

/// Opens remote sessions
#[async_trait]
pub trait SessionConnector: Send + Sync {
    /// Open a session on `server_url` with a flat capability set
    async fn connect(
        &self,
        server_url: &str,
        capabilities: &CapabilitySet,
    ) -> Result<Box<dyn UiSession>>;
}

/// Connector backed by the HTTP WebDriver client
#[derive(Debug, Clone, Default)]
pub struct WebDriverConnector {
    timeout: Option<Duration>,
}

impl WebDriverConnector {
    /// Create a connector with an optional request timeout
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl SessionConnector for WebDriverConnector {
    async fn connect(
        &self,
        server_url: &str,
        capabilities: &CapabilitySet,
    ) -> Result<Box<dyn UiSession>> {
        let client = WebDriverClient::with_timeout(server_url, self.timeout)?;
        let session = client.new_session(capabilities).await?;
        Ok(Box::new(session))
    }
}

/// Lifecycle of one driver session
pub struct DriverSessionManager {
    resolved: ResolvedCapabilities,
    connector: Arc<dyn SessionConnector>,
    session: Option<Box<dyn UiSession>>,
}

impl DriverSessionManager {
    /// Create a manager for already resolved capabilities
    pub fn new(resolved: ResolvedCapabilities, connector: Arc<dyn SessionConnector>) -> Self {
        Self {
            resolved,
            connector,
            session: None,
        }
    }

    /// Capabilities the session is started with
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.resolved.capabilities
    }

    /// Selected device name
    pub fn device_name(&self) -> &str {
        self.resolved.device_name()
    }

    /// Whether a session is currently open
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Active session, if started
    pub fn session(&self) -> Option<&dyn UiSession> {
        self.session.as_deref()
    }

    /// Open the session
    ///
    /// The capability set is written to the current execution folder before
    /// connecting.
    pub async fn start(&mut self, ctx: &RunContext) -> Result<&dyn UiSession> {
        if self.session.is_some() {
            return Err(HarnessError::start_failed("a session is already active"));
        }

        DeviceInfo::save_capabilities(&ctx.artifacts, &self.resolved.capabilities)?;

        tracing::info!(
            "Starting driver for {} on {}",
            self.resolved.application,
            self.resolved.device_name()
        );
        let session = self
            .connector
            .connect(&self.resolved.server_url, &self.resolved.capabilities)
            .await
            .map_err(HarnessError::start_failed)?;

        Ok(&**self.session.insert(session))
    }

    /// Close the session
    ///
    /// Calling `stop` without an open session only logs a warning.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            tracing::warn!("stop called without an active session");
            return Ok(());
        };

        tracing::info!("Stopping driver session {}", session.session_id());
        session.quit().await.map_err(HarnessError::stop_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DeviceDescriptor, ErrorKind, Settings};
    use crate::logging::LogRegistry;
    use crate::webdriver::{ElementRef, Locator};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullSession {
        quits: Arc<AtomicUsize>,
        fail_quit: bool,
    }

    #[async_trait]
    impl UiSession for NullSession {
        fn session_id(&self) -> &str {
            "null-session"
        }
        async fn set_implicit_wait(&self, _wait: Duration) -> Result<()> {
            Ok(())
        }
        async fn find_element(&self, locator: &Locator) -> Result<ElementRef> {
            Ok(ElementRef::new(locator.value()))
        }
        async fn click(&self, _element: &ElementRef) -> Result<()> {
            Ok(())
        }
        async fn clear(&self, _element: &ElementRef) -> Result<()> {
            Ok(())
        }
        async fn send_keys(&self, _element: &ElementRef, _text: &str) -> Result<()> {
            Ok(())
        }
        async fn text(&self, _element: &ElementRef) -> Result<String> {
            Ok(String::new())
        }
        async fn screenshot(&self) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
        async fn quit(&self) -> Result<()> {
            self.quits.fetch_add(1, Ordering::SeqCst);
            if self.fail_quit {
                return Err(HarnessError::WebDriver {
                    error: "invalid session id".into(),
                    message: "gone".into(),
                });
            }
            Ok(())
        }
    }

    struct FakeConnector {
        refuse: bool,
        fail_quit: bool,
        quits: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SessionConnector for FakeConnector {
        async fn connect(
            &self,
            _server_url: &str,
            _capabilities: &CapabilitySet,
        ) -> Result<Box<dyn UiSession>> {
            if self.refuse {
                return Err(HarnessError::WebDriver {
                    error: "session not created".into(),
                    message: "device offline".into(),
                });
            }
            Ok(Box::new(NullSession {
                quits: self.quits.clone(),
                fail_quit: self.fail_quit,
            }))
        }
    }

    fn context(dir: &std::path::Path) -> RunContext {
        let mut settings = Settings::default();
        settings.paths.reports_dir = dir.to_path_buf();
        let mut ctx = RunContext::new(settings).with_loggers(LogRegistry::file_only());
        ctx.artifacts.setup_execution_folder("test_session").unwrap();
        ctx
    }

    fn manager(refuse: bool, fail_quit: bool) -> (DriverSessionManager, Arc<AtomicUsize>) {
        let quits = Arc::new(AtomicUsize::new(0));
        let resolved = ResolvedCapabilities {
            device: DeviceDescriptor::new("X"),
            application: "calculator".into(),
            capabilities: json!({"deviceName": "X", "appPackage": "pkg"})
                .as_object()
                .cloned()
                .unwrap(),
            server_url: "http://127.0.0.1:4723".into(),
        };
        let connector = FakeConnector {
            refuse,
            fail_quit,
            quits: quits.clone(),
        };
        (DriverSessionManager::new(resolved, Arc::new(connector)), quits)
    }

    #[tokio::test]
    async fn test_start_persists_capabilities() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = context(temp.path());
        let (mut manager, quits) = manager(false, false);

        let session = manager.start(&ctx).await.unwrap();
        assert_eq!(session.session_id(), "null-session");
        assert!(manager.is_active());

        let stored = DeviceInfo::load_capabilities(&ctx.artifacts).unwrap();
        assert_eq!(stored["appPackage"], "pkg");

        manager.stop().await.unwrap();
        assert!(!manager.is_active());
        assert_eq!(quits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_start_failure_is_wrapped() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = context(temp.path());
        let (mut manager, _) = manager(true, false);

        let err = manager.start(&ctx).await.err().unwrap();
        assert!(matches!(err, HarnessError::DriverStartFailed { .. }));
        assert_eq!(err.kind(), ErrorKind::SessionLifecycle);
        assert!(err.to_string().contains("device offline"));
        assert!(!manager.is_active());
    }

    #[tokio::test]
    async fn test_stop_failure_is_wrapped() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = context(temp.path());
        let (mut manager, _) = manager(false, true);

        manager.start(&ctx).await.unwrap();
        let err = manager.stop().await.unwrap_err();
        assert!(matches!(err, HarnessError::DriverStopFailed { .. }));
    }

    #[tokio::test]
    async fn test_second_stop_is_a_no_op() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = context(temp.path());
        let (mut manager, quits) = manager(false, false);

        manager.start(&ctx).await.unwrap();
        manager.stop().await.unwrap();
        manager.stop().await.unwrap();
        assert_eq!(quits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_start_requires_execution_folder() {
        let temp = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.paths.reports_dir = temp.path().to_path_buf();
        let ctx = RunContext::new(settings).with_loggers(LogRegistry::file_only());
        let (mut manager, _) = manager(false, false);

        let err = manager.start(&ctx).await.err().unwrap();
        assert!(matches!(err, HarnessError::ArtifactState(_)));
    }
}
