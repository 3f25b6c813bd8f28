//! Account balance type using decimal arithmetic.
//!
//! Balances travel as JSON numbers on the wire, but are held as
//! [`Decimal`] locally so that text input either parses to an exact amount
//! or is rejected. There is no "not a number" state.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Money`] amount from text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// The input is empty (after trimming).
    #[error("amount cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("{0:?} is not a number")]
    NotANumber(String),
    /// The input has more fractional digits than the currency allows.
    #[error("amount must have at most {max} decimal places")]
    TooPrecise {
        /// Maximum number of fractional digits.
        max: u32,
    },
}

/// An account balance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    /// Maximum number of fractional digits accepted from input.
    pub const MAX_SCALE: u32 = 2;

    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount with no fractional part.
    #[must_use]
    pub fn from_major(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Returns the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Parse an amount typed by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, is not a plain decimal
    /// number, or has more than [`Self::MAX_SCALE`] fractional digits.
    ///
    /// ```
    /// use rollcall_core::{Money, MoneyError};
    ///
    /// assert_eq!(Money::parse("10.50").unwrap(), Money::parse("10.5").unwrap());
    /// assert_eq!(Money::parse(""), Err(MoneyError::Empty));
    /// assert!(matches!(Money::parse("1O"), Err(MoneyError::NotANumber(_))));
    /// ```
    pub fn parse(s: &str) -> Result<Self, MoneyError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MoneyError::Empty);
        }

        let amount = Decimal::from_str(trimmed)
            .map_err(|_| MoneyError::NotANumber(trimmed.to_owned()))?;

        if amount.normalize().scale() > Self::MAX_SCALE {
            return Err(MoneyError::TooPrecise {
                max: Self::MAX_SCALE,
            });
        }

        Ok(Self(amount.normalize()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Text typed into a numeric field, together with its parse result.
///
/// Edit drafts keep whatever the user typed so the input can be shown back
/// unchanged; an invalid value is carried as an error and blocks commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyInput {
    raw: String,
    value: Result<Money, MoneyError>,
}

impl MoneyInput {
    /// Input pre-filled from an existing amount.
    #[must_use]
    pub fn from_value(money: Money) -> Self {
        Self {
            raw: money.0.normalize().to_string(),
            value: Ok(money),
        }
    }

    /// Input parsed from raw text.
    #[must_use]
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let value = Money::parse(&raw);
        Self { raw, value }
    }

    /// The text as typed.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed amount, or the reason it could not be parsed.
    ///
    /// # Errors
    ///
    /// Returns the parse error recorded when the text was entered.
    pub fn value(&self) -> Result<Money, &MoneyError> {
        self.value.as_ref().copied()
    }

    /// Whether the text parsed to a valid amount.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.value.is_ok()
    }
}
