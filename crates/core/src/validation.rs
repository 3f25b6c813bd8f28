//! Locally detected input errors.

use core::fmt;

use crate::types::{ContactError, MoneyError};

/// A problem with one field of an edit draft.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// A contact field (name, phone) failed to parse.
    #[error("{field} {source}")]
    Contact {
        /// Field label.
        field: &'static str,
        #[source]
        source: ContactError,
    },
    /// A numeric field failed to parse.
    #[error("{field}: {source}")]
    Money {
        /// Field label.
        field: &'static str,
        #[source]
        source: MoneyError,
    },
}

impl FieldError {
    /// Label of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Contact { field, .. } | Self::Money { field, .. } => field,
        }
    }
}

/// One or more invalid fields; nothing is sent while any remain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    /// Collect field errors.
    #[must_use]
    pub const fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// The individual field errors.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether a specific field failed.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field() == field)
    }

    /// `Ok(value)` if no errors were collected.
    ///
    /// # Errors
    ///
    /// Returns `self` if at least one field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Check an edited contact field against `parse`.
///
/// A value equal to `stored` is passed through without parsing; only input
/// the user changed is validated. The parsed (trimmed) form is returned.
pub(crate) fn edited_contact(
    field: &'static str,
    value: &str,
    stored: &str,
    parse: impl FnOnce(&str) -> Result<String, ContactError>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    if value == stored {
        return Some(value.to_owned());
    }
    parse(value)
        .map_err(|source| errors.push(FieldError::Contact { field, source }))
        .ok()
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("invalid input");
        }
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
