//! WebDriver HTTP client
//!
//! Async client for the Appium server's W3C endpoints.

use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

use crate::core::{CapabilitySet, HarnessError, Result};
use crate::webdriver::protocol::{
    element_from, error_from_body, new_session_body, send_keys_body, session_id_from, Envelope,
};
use crate::webdriver::{ElementRef, Locator, UiSession};

/// Client bound to one automation server
#[derive(Clone, Debug)]
pub struct WebDriverClient {
    client: Client,
    base_url: Url,
}

impl WebDriverClient {
    /// Create a client for `server_url`, keeping reqwest's default timeouts
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_timeout(server_url, None)
    }

    /// Create a client with an optional request timeout
    pub fn with_timeout(server_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(server_url).map_err(|e| {
            HarnessError::config(format!("Invalid server URL '{}': {}", server_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(HarnessError::config(format!(
                "Server URL '{}' cannot carry a path",
                server_url
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    /// Server base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Endpoint URL for the given path segments
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a command and unwrap the `value` envelope
    async fn command(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<Envelope> {
        let url = self.endpoint(segments);
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &text));
        }

        if text.trim().is_empty() {
            return Ok(Envelope {
                value: Value::Null,
                session_id: None,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Open a new session with the given flat capability set
    pub async fn new_session(&self, capabilities: &CapabilitySet) -> Result<RemoteSession> {
        let envelope = self
            .command(Method::POST, &["session"], Some(new_session_body(capabilities)))
            .await?;
        let session_id = session_id_from(&envelope)?;
        tracing::info!("Session {} started on {}", session_id, self.base_url);

        Ok(RemoteSession {
            client: self.clone(),
            session_id,
        })
    }
}

/// Live session on a remote Appium server
#[derive(Debug)]
pub struct RemoteSession {
    client: WebDriverClient,
    session_id: String,
}

impl RemoteSession {
    async fn session_command(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<Value> {
        let mut path = vec!["session", self.session_id.as_str()];
        path.extend_from_slice(segments);
        Ok(self.client.command(method, &path, body).await?.value)
    }

    async fn element_command(
        &self,
        method: Method,
        element: &ElementRef,
        action: &str,
        body: Option<Value>,
    ) -> Result<Value> {
        self.session_command(method, &["element", element.id(), action], body)
            .await
    }
}

#[async_trait]
impl UiSession for RemoteSession {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    async fn set_implicit_wait(&self, wait: Duration) -> Result<()> {
        let body = json!({ "implicit": wait.as_millis() as u64 });
        self.session_command(Method::POST, &["timeouts"], Some(body))
            .await?;
        Ok(())
    }

    async fn find_element(&self, locator: &Locator) -> Result<ElementRef> {
        tracing::debug!("Finding element {}", locator);
        let body = serde_json::to_value(locator)?;
        let value = self
            .session_command(Method::POST, &["element"], Some(body))
            .await?;
        element_from(&value)
    }

    async fn click(&self, element: &ElementRef) -> Result<()> {
        self.element_command(Method::POST, element, "click", Some(json!({})))
            .await?;
        Ok(())
    }

    async fn clear(&self, element: &ElementRef) -> Result<()> {
        self.element_command(Method::POST, element, "clear", Some(json!({})))
            .await?;
        Ok(())
    }

    async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
        self.element_command(Method::POST, element, "value", Some(send_keys_body(text)))
            .await?;
        Ok(())
    }

    async fn text(&self, element: &ElementRef) -> Result<String> {
        let value = self
            .element_command(Method::GET, element, "text", None)
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        let value = self
            .session_command(Method::GET, &["screenshot"], None)
            .await?;
        let encoded = value.as_str().unwrap_or_default();
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| HarnessError::WebDriver {
                error: "invalid response".to_string(),
                message: format!("screenshot is not valid base64: {}", e),
            })
    }

    async fn quit(&self) -> Result<()> {
        self.client
            .command(Method::DELETE, &["session", self.session_id.as_str()], None)
            .await?;
        tracing::info!("Session {} closed", self.session_id);
        Ok(())
    }
}
