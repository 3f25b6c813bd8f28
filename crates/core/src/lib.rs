//! Rollcall Core - Shared record types.
//!
//! This crate provides the types used by every Rollcall component:
//! - `admin` - List synchronization engine and record service client
//! - `cli` - Command-line front-end for the member and user lists
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, balances, contact fields and sort keys
//! - [`record`] - The [`Record`] and [`Draft`] traits the list engine is generic over
//! - [`member`] / [`user`] - The two record collections
//! - [`validation`] - Field-level input errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod member;
pub mod record;
pub mod types;
pub mod user;
pub mod validation;

pub use member::{Member, MemberDraft, MemberField, MemberPatch};
pub use record::{Draft, Record, compare_names};
pub use types::*;
pub use user::{User, UserDraft, UserField, UserPatch};
pub use validation::{FieldError, ValidationError};
