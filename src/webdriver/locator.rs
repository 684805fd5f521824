//! Element locators

use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy plus value identifying one UI element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "using", content = "value", rename_all = "lowercase")]
pub enum Locator {
    /// Android resource id, e.g. `com.google.android.calculator:id/eq`
    Id(String),
    /// XPath over the UI hierarchy
    XPath(String),
}

impl Locator {
    /// Create an id locator
    pub fn id(value: impl Into<String>) -> Self {
        Self::Id(value.into())
    }

    /// Create an XPath locator
    pub fn xpath(value: impl Into<String>) -> Self {
        Self::XPath(value.into())
    }

    /// Wire name of the strategy
    pub fn strategy(&self) -> &'static str {
        match self {
            Locator::Id(_) => "id",
            Locator::XPath(_) => "xpath",
        }
    }

    /// Locator value
    pub fn value(&self) -> &str {
        match self {
            Locator::Id(v) | Locator::XPath(v) => v,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}
