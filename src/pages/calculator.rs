//! Page object for the calculator application

use std::time::Duration;

use crate::core::Result;
use crate::pages::base::BasePage;
use crate::pages::locators::{CalculatorLocators, Operator};
use crate::webdriver::UiSession;

/// Calculator screen
pub struct CalculatorPage<'a> {
    base: BasePage<'a>,
}

impl<'a> CalculatorPage<'a> {
    /// Open the page on an active session
    pub async fn open(session: &'a dyn UiSession, implicit_wait: Duration) -> Result<Self> {
        Ok(Self {
            base: BasePage::open(session, implicit_wait).await?,
        })
    }

    /// Press a digit button
    pub async fn press_number(&self, number: i64) -> Result<()> {
        tracing::debug!("Pressing number {}", number);
        self.base.click(&CalculatorLocators::numeric(number)?).await
    }

    /// Press an operator button by symbol (`+`, `-`, `*`, `/`, `=`, `C`)
    pub async fn press_operator(&self, symbol: &str) -> Result<()> {
        let operator: Operator = symbol.parse()?;
        tracing::debug!("Pressing operator {}", operator);
        self.base.click(&CalculatorLocators::operator(operator)).await
    }

    /// Press `=`
    pub async fn press_equal(&self) -> Result<()> {
        self.base
            .click(&CalculatorLocators::operator(Operator::Equals))
            .await
    }

    /// Press `C`
    pub async fn clear(&self) -> Result<()> {
        self.base
            .click(&CalculatorLocators::operator(Operator::Clear))
            .await
    }

    /// Text of the result field
    pub async fn get_result(&self) -> Result<String> {
        let result = self.base.get_text(&CalculatorLocators::result()).await?;
        tracing::info!("Calculator result: {:?}", result);
        Ok(result)
    }

    /// Text of the formula field, empty after a clear
    pub async fn get_empty_result(&self) -> Result<String> {
        self.base
            .get_text(&CalculatorLocators::empty_result())
            .await
    }
}
