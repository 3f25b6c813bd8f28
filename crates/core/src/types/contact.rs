//! Contact field types: full name and phone number.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`FullName`] or [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// The input is empty (after trimming).
    #[error("cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character that is not allowed.
    #[error("contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// The phone number has too few or too many digits.
    #[error("must contain between {min} and {max} digits (got {got})")]
    DigitCount {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
        /// Digits actually present.
        got: usize,
    },
}

/// A person's full name as shown in the admin lists.
///
/// Surrounding whitespace is trimmed. Interior content is free-form.
///
/// ## Examples
///
/// ```
/// use rollcall_core::FullName;
///
/// assert_eq!(FullName::parse("  Asha Rao ").unwrap().as_str(), "Asha Rao");
/// assert!(FullName::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct FullName(String);

impl FullName {
    /// Maximum length of a name, in characters.
    pub const MAX_LENGTH: usize = 100;

    /// Parse a `FullName` from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than
    /// [`Self::MAX_LENGTH`] characters, or contains control characters.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ContactError::Empty);
        }

        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(ContactError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = trimmed.chars().find(|c| c.is_control()) {
            return Err(ContactError::InvalidCharacter(c));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `FullName` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A phone number.
///
/// Accepts digits plus the usual separators (`+`, `-`, space, parentheses,
/// dot). The formatting is kept as typed; only the digit count is checked.
///
/// ## Examples
///
/// ```
/// use rollcall_core::Phone;
///
/// assert!(Phone::parse("+91 98765-43210").is_ok());
/// assert!(Phone::parse("12ab").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 6;
    /// Maximum number of digits (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `Phone` from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, contains a character
    /// other than a digit or separator, or has a digit count outside
    /// [`Self::MIN_DIGITS`]..=[`Self::MAX_DIGITS`].
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ContactError::Empty);
        }

        if let Some(c) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')' | '.')))
        {
            return Err(ContactError::InvalidCharacter(c));
        }

        let digits = trimmed.chars().filter(char::is_ascii_digit).count();
        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits) {
            return Err(ContactError::DigitCount {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
                got: digits,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
