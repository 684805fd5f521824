//! Page objects
//!
//! Domain actions on application screens, expressed as locator lookups plus
//! one interaction each.

mod base;
mod calculator;
mod locators;

pub use base::BasePage;
pub use calculator::CalculatorPage;
pub use locators::{CalculatorLocators, Operator};
