//! Session trait for driving a remote UI
//!
//! Page objects only see this trait, so they run the same against the remote
//! client and against in-process doubles.

use async_trait::async_trait;
use std::time::Duration;

use crate::core::Result;
use crate::webdriver::Locator;

/// Opaque reference to an element found in the current session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef(pub String);

impl ElementRef {
    /// Create an element reference
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Element id as reported by the server
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// One live automation session
#[async_trait]
pub trait UiSession: Send + Sync {
    /// Server-assigned session id
    fn session_id(&self) -> &str;

    /// Configure how long element lookups wait
    async fn set_implicit_wait(&self, wait: Duration) -> Result<()>;

    /// Find a single element
    async fn find_element(&self, locator: &Locator) -> Result<ElementRef>;

    /// Click an element
    async fn click(&self, element: &ElementRef) -> Result<()>;

    /// Clear an editable element
    async fn clear(&self, element: &ElementRef) -> Result<()>;

    /// Type text into an element
    async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()>;

    /// Visible text of an element
    async fn text(&self, element: &ElementRef) -> Result<String>;

    /// PNG screenshot of the device screen
    async fn screenshot(&self) -> Result<Vec<u8>>;

    /// End the session
    async fn quit(&self) -> Result<()>;
}
