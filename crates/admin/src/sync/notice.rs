//! Hooks between the list engine and whatever presents it.

use std::fmt;

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Short-lived message for the user, such as "User updated successfully".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.level, NoticeLevel::Error)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Asks the user to confirm a delete before any request is sent.
pub trait ConfirmDelete {
    /// Show `prompt` and return whether the user agreed.
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> ConfirmDelete for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Capitalize the first letter of a record noun for sentence starts.
pub(crate) fn capitalized(noun: &str) -> String {
    let mut chars = noun.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
