//! Rollcall admin library.
//!
//! Keeps a local, searchable copy of the member and user collections held by
//! the record service, and edits or deletes records through it. Every change
//! is confirmed by the service before the local copy is touched.
//!
//! # Layout
//!
//! - [`client`] - HTTP client for the record service
//! - [`sync`] - Collection cache, view stage and mutation coordination
//! - [`components`] - Table layout for list front ends
//! - [`config`] - Environment-based configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod components;
pub mod config;
pub mod error;
pub mod format;
pub mod sync;

use rollcall_core::{Member, User};

pub use client::{CollectionClient, RecordClient, RecordService};
pub use config::{AdminConfig, ConfigError};
pub use error::{ErrorKind, SyncError};
pub use sync::{ConfirmDelete, DeleteOutcome, ListStore, Notice, NoticeLevel};

/// Member list backed by the HTTP record service.
pub type MemberStore = ListStore<Member, CollectionClient<Member>>;

/// User list backed by the HTTP record service.
pub type UserStore = ListStore<User, CollectionClient<User>>;
