//! Collection cache: the last committed copy of a remote collection.

use std::collections::HashSet;

use rollcall_core::Record;
use tracing::{debug, warn};

use crate::error::SyncError;

/// Where the cache stands relative to the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Never loaded.
    #[default]
    Idle,
    /// A load is in flight; the current contents are the last known good.
    Loading,
    /// The last load succeeded.
    Ready,
    /// The last load failed; the contents are from before it.
    Failed { message: String, retryable: bool },
}

/// Handle for one started load.
///
/// Only the ticket from the most recently started load can install data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Result of handing a finished load back to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The collection was replaced with `count` records.
    Installed { count: usize },
    /// The load failed; the previous contents were kept.
    Failed,
    /// A newer load was started meanwhile; this result was dropped.
    Superseded,
}

/// A mutation committed while a load was in flight.
#[derive(Debug, Clone)]
enum Committed<R: Record> {
    Patched(R::Id, R::Patch),
    Removed(R::Id),
}

/// Ordered, id-unique copy of a remote collection.
///
/// Only three operations change the contents: a full load, a patch and a
/// removal, each of which follows a successful server response.
#[derive(Debug, Clone)]
pub struct CollectionCache<R: Record> {
    records: Vec<R>,
    status: LoadStatus,
    revision: u64,
    generation: u64,
    journal: Vec<Committed<R>>,
}

impl<R: Record> Default for CollectionCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> CollectionCache<R> {
    /// Create an empty, never-loaded cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            status: LoadStatus::Idle,
            revision: 0,
            generation: 0,
            journal: Vec::new(),
        }
    }

    /// Records in service order.
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, id: &R::Id) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: &R::Id) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub const fn status(&self) -> &LoadStatus {
        &self.status
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.status, LoadStatus::Loading)
    }

    /// Counter bumped on every content change.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Mark a load as started and return its ticket.
    ///
    /// Any earlier in-flight load becomes superseded.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.status = LoadStatus::Loading;
        self.journal.clear();
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Hand a finished load back to the cache.
    ///
    /// On success the collection is replaced wholesale and mutations that
    /// committed during the load are replayed on top. On failure the contents
    /// stay as they were. Results for superseded tickets are dropped either way.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<R>, &SyncError>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                latest = self.generation,
                "Dropping superseded load"
            );
            return LoadOutcome::Superseded;
        }

        let journal = std::mem::take(&mut self.journal);
        match result {
            Ok(records) => {
                self.replace_all(records);
                for committed in &journal {
                    match committed {
                        Committed::Patched(id, patch) => {
                            self.patch_in_place(id, patch);
                        }
                        Committed::Removed(id) => {
                            self.remove_in_place(id);
                        }
                    }
                }
                if !journal.is_empty() {
                    debug!(replayed = journal.len(), "Replayed mutations onto fresh load");
                }
                self.status = LoadStatus::Ready;
                LoadOutcome::Installed {
                    count: self.records.len(),
                }
            }
            Err(err) => {
                self.status = LoadStatus::Failed {
                    message: err.to_string(),
                    retryable: err.is_retryable(),
                };
                LoadOutcome::Failed
            }
        }
    }

    /// Replace the contents wholesale.
    ///
    /// Keeps the first occurrence of a repeated id.
    pub fn replace_all(&mut self, records: Vec<R>) {
        let mut seen = HashSet::with_capacity(records.len());
        let mut unique = Vec::with_capacity(records.len());
        for record in records {
            if seen.insert(record.id().clone()) {
                unique.push(record);
            } else {
                warn!(id = %record.id(), "Service returned duplicate id, keeping first");
            }
        }
        self.records = unique;
        self.revision += 1;
    }

    /// Overwrite the fields present in `patch` on the record with `id`.
    ///
    /// Returns `false` if no such record is cached.
    pub fn apply_patch(&mut self, id: &R::Id, patch: &R::Patch) -> bool {
        if self.is_loading() {
            self.journal
                .push(Committed::Patched(id.clone(), patch.clone()));
        }
        self.patch_in_place(id, patch)
    }

    /// Remove the record with `id`. Returns `false` if it was not cached.
    pub fn remove(&mut self, id: &R::Id) -> bool {
        if self.is_loading() {
            self.journal.push(Committed::Removed(id.clone()));
        }
        self.remove_in_place(id)
    }

    fn patch_in_place(&mut self, id: &R::Id, patch: &R::Patch) -> bool {
        let Some(record) = self.records.iter_mut().find(|r| r.id() == id) else {
            return false;
        };
        record.apply_patch(patch);
        self.revision += 1;
        true
    }

    fn remove_in_place(&mut self, id: &R::Id) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        let removed = self.records.len() != before;
        if removed {
            self.revision += 1;
        }
        removed
    }
}
