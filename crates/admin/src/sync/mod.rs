//! Client-side list state for one remote collection.
//!
//! # Modules
//!
//! - `cache` - Last committed copy of the collection
//! - `view` - Search and sort projection over the cache
//! - `coordinator` - Edit drafts and per-record request serialization
//! - `notice` - Notices and delete confirmation for the presentation layer
//! - `store` - `ListStore`, which ties the above to a `RecordService`

pub mod cache;
pub mod coordinator;
pub mod notice;
pub mod store;
pub mod view;

pub use cache::{CollectionCache, LoadOutcome, LoadStatus, LoadTicket};
pub use coordinator::{EditState, MutationCoordinator, Operation, PendingUpdate};
pub use notice::{ConfirmDelete, Notice, NoticeLevel};
pub use store::{DeleteOutcome, ListStore};
pub use view::{ListView, ViewQuery, project};
