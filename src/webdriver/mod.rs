//! WebDriver module - remote automation protocol
//!
//! A small W3C WebDriver client speaking the Appium dialect, plus the
//! [`UiSession`] trait page objects are written against.

mod client;
mod locator;
mod protocol;
mod traits;

pub use client::{RemoteSession, WebDriverClient};
pub use locator::Locator;
pub use protocol::{to_w3c_capabilities, ELEMENT_KEY, LEGACY_ELEMENT_KEY};
pub use traits::{ElementRef, UiSession};
