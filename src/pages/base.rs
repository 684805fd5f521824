//! Base page
//!
//! Common element interactions shared by every page object.

use std::time::Duration;

use crate::core::Result;
use crate::webdriver::{ElementRef, Locator, UiSession};

/// Page bound to an active session
pub struct BasePage<'a> {
    session: &'a dyn UiSession,
}

impl<'a> BasePage<'a> {
    /// Bind to a session, configuring the implicit wait once
    pub async fn open(session: &'a dyn UiSession, implicit_wait: Duration) -> Result<Self> {
        session.set_implicit_wait(implicit_wait).await?;
        Ok(Self { session })
    }

    /// Underlying session
    pub fn session(&self) -> &'a dyn UiSession {
        self.session
    }

    /// Find a single element
    pub async fn find_element(&self, locator: &Locator) -> Result<ElementRef> {
        self.session.find_element(locator).await
    }

    /// Click an element
    pub async fn click(&self, locator: &Locator) -> Result<()> {
        let element = self.find_element(locator).await?;
        self.session.click(&element).await
    }

    /// Replace the content of an input field
    pub async fn send_keys(&self, locator: &Locator, text: &str) -> Result<()> {
        let element = self.find_element(locator).await?;
        self.session.clear(&element).await?;
        self.session.send_keys(&element, text).await
    }

    /// Text content of an element
    pub async fn get_text(&self, locator: &Locator) -> Result<String> {
        let element = self.find_element(locator).await?;
        self.session.text(&element).await
    }
}
