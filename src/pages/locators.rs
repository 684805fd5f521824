//! Locators for the Google calculator application

use std::fmt;
use std::str::FromStr;

use crate::core::{HarnessError, Result};
use crate::webdriver::Locator;

const APP_ID_PREFIX: &str = "com.google.android.calculator:id/";
const RESULT_ID: &str = "com.google.android.calculator:id/result_final";
const EMPTY_RESULT_ID: &str = "com.google.android.calculator:id/formula";

/// Calculator operator keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equals,
    Clear,
}

impl Operator {
    /// All operator keys
    pub const ALL: [Operator; 6] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Equals,
        Operator::Clear,
    ];

    /// Symbol used in scenarios
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Equals => "=",
            Operator::Clear => "C",
        }
    }

    /// Resource id suffix of the button
    fn button_id(self) -> &'static str {
        match self {
            Operator::Add => "op_add",
            Operator::Subtract => "op_sub",
            Operator::Multiply => "op_mul",
            Operator::Divide => "op_div",
            Operator::Equals => "eq",
            Operator::Clear => "clr",
        }
    }
}

impl FromStr for Operator {
    type Err = HarnessError;

    fn from_str(symbol: &str) -> Result<Self> {
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol() == symbol)
            .ok_or_else(|| {
                HarnessError::locator(format!(
                    "Invalid operator: {:?}. Allowed: +, -, *, /, =, C",
                    symbol
                ))
            })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Locator table for the calculator screen
pub struct CalculatorLocators;

impl CalculatorLocators {
    /// Digit button
    pub fn numeric(number: i64) -> Result<Locator> {
        if !(0..=9).contains(&number) {
            return Err(HarnessError::locator(format!(
                "Invalid number: {}. Allowed: 0-9",
                number
            )));
        }
        Ok(Locator::xpath(format!(
            "//android.widget.ImageButton[@content-desc='{}']",
            number
        )))
    }

    /// Digit button from a single-character string
    pub fn numeric_str(input: &str) -> Result<Locator> {
        let mut chars = input.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_digit() => Self::numeric(i64::from(c as u8 - b'0')),
            _ => Err(HarnessError::locator(format!(
                "Invalid number: {:?}. Allowed: 0-9",
                input
            ))),
        }
    }

    /// Operator button
    pub fn operator(operator: Operator) -> Locator {
        Locator::id(format!("{}{}", APP_ID_PREFIX, operator.button_id()))
    }

    /// Operator button from its symbol
    pub fn operator_symbol(symbol: &str) -> Result<Locator> {
        Ok(Self::operator(symbol.parse()?))
    }

    /// Final result field
    pub fn result() -> Locator {
        Locator::id(RESULT_ID)
    }

    /// Formula field, empty after a clear
    pub fn empty_result() -> Locator {
        Locator::id(EMPTY_RESULT_ID)
    }
}
