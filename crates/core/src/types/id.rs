//! Newtype IDs for type-safe record references.
//!
//! Record identifiers are opaque tokens assigned by the record service. Use
//! the `define_id!` macro to create wrappers that prevent accidentally
//! mixing IDs from different collections.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `Display`, `AsRef<str>`, `From<String>` and `From<&str>`
///
/// # Example
///
/// ```rust
/// # use rollcall_core::define_id;
/// define_id!(AccountId);
/// define_id!(LedgerId);
///
/// let account_id = AccountId::new("64f1c2");
/// let ledger_id = LedgerId::new("64f1c2");
///
/// // These are different types, so this won't compile:
/// // let _: AccountId = ledger_id;
/// assert_eq!(account_id.as_str(), ledger_id.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::std::string::String);

        impl $name {
            /// Create a new ID from the service-assigned token.
            #[must_use]
            pub fn new(id: impl Into<::std::string::String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying token.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying token.
            #[must_use]
            pub fn into_inner(self) -> ::std::string::String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<::std::string::String> for $name {
            fn from(id: ::std::string::String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

// Define standard record IDs
define_id!(MemberId);
define_id!(UserId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_transparent_in_json() {
        let id = MemberId::new("650a1f0c9d");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"650a1f0c9d\"");

        let parsed: UserId = serde_json::from_str("\"abc/def\"").unwrap();
        assert_eq!(parsed.as_str(), "abc/def");
    }

    #[test]
    fn test_id_display_is_verbatim() {
        let id = UserId::from("u 1");
        assert_eq!(id.to_string(), "u 1");
        assert_eq!(id.into_inner(), "u 1");
    }
}
