//! The record abstraction shared by every admin list.
//!
//! A [`Record`] is one row of a remote collection. The list machinery in
//! `rollcall-admin` is generic over this trait, so members and users share a
//! single cache, view and mutation implementation.

use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::types::SortKey;
use crate::validation::ValidationError;

/// One entity tracked by the remote record service.
pub trait Record: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + 'static {
    /// Service-assigned identifier. Unique within a collection.
    type Id: Clone
        + Eq
        + Hash
        + Debug
        + Display
        + AsRef<str>
        + From<String>
        + Send
        + Sync
        + 'static;

    /// Typed set of optional field values.
    ///
    /// Serialized as the body of an update request and deserialized from the
    /// service's update response.
    type Patch: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Edit draft holding this record's mutable fields.
    type Draft: Draft<Patch = Self::Patch>;

    /// Singular noun used in messages ("member").
    const NOUN: &'static str;

    /// Path segment under `/api/` ("members").
    const COLLECTION: &'static str;

    /// Key holding the array in a wrapped list response.
    const LIST_FIELD: &'static str;

    /// Key holding the object in a wrapped single-record response.
    const ITEM_FIELD: &'static str;

    /// Keys this record type can be sorted by.
    const SORT_KEYS: &'static [SortKey];

    /// The record's identifier.
    fn id(&self) -> &Self::Id;

    /// Field values a search term is matched against.
    fn search_fields(&self) -> Vec<&str>;

    /// Ascending comparison on one sort key.
    ///
    /// Keys outside [`Self::SORT_KEYS`] compare equal.
    fn compare_by(&self, other: &Self, key: SortKey) -> Ordering;

    /// Overwrite every field that is present in `patch`.
    fn apply_patch(&mut self, patch: &Self::Patch);

    /// Copy the mutable fields into a fresh edit draft.
    fn draft(&self) -> Self::Draft;

    /// Whether `needle` occurs in any searchable field, ignoring case.
    ///
    /// `needle` must already be lowercase.
    fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self
                .search_fields()
                .into_iter()
                .any(|field| field.to_lowercase().contains(needle))
    }

    /// Whether the record type supports sorting by `key`.
    #[must_use]
    fn supports_sort(key: SortKey) -> bool {
        Self::SORT_KEYS.contains(&key)
    }
}

/// Transient, editable copy of one record's mutable fields.
pub trait Draft: Clone + Debug + Send + 'static {
    /// Tagged per-field update command carrying the raw input.
    type Field: Debug + Send;

    /// Patch produced by a valid draft.
    type Patch;

    /// Apply one field update. Never touches the network.
    fn set(&mut self, field: Self::Field);

    /// Validate numeric fields and any edited text field, then build the
    /// patch to send. Text left as loaded is sent unchanged.
    ///
    /// # Errors
    ///
    /// Returns every invalid field at once.
    fn to_patch(&self) -> Result<Self::Patch, ValidationError>;
}

/// Case-insensitive name ordering with a case-sensitive tiebreak so the
/// comparison stays total.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
