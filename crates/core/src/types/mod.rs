//! Core types for Rollcall.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod contact;
pub mod id;
pub mod money;
pub mod sort;

pub use contact::{ContactError, FullName, Phone};
pub use id::*;
pub use money::{Money, MoneyError, MoneyInput};
pub use sort::{SortDirection, SortKey, SortSpec};
