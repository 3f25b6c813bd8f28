//! The list store: one collection's cache, view and mutations behind a
//! single context object.

use std::sync::{Mutex, MutexGuard};

use rollcall_core::{Draft, Record, SortSpec};
use tracing::{info, instrument};

use super::cache::{CollectionCache, LoadOutcome, LoadStatus};
use super::coordinator::{EditState, MutationCoordinator};
use super::notice::{ConfirmDelete, Notice, capitalized};
use super::view::{ListView, ViewQuery};
use crate::client::RecordService;
use crate::error::SyncError;

/// Result of a delete request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The service deleted the record and it was removed from the cache.
    Deleted,
    /// The user declined; nothing was sent.
    Declined,
}

struct StoreState<R: Record> {
    cache: CollectionCache<R>,
    view: ListView,
    coordinator: MutationCoordinator<R>,
    notices: Vec<Notice>,
}

/// Client-side state for one admin list.
///
/// All methods take `&self`. The internal lock is released before every
/// request, so reads and operations on other records proceed while a request
/// is outstanding.
pub struct ListStore<R: Record, S> {
    service: S,
    state: Mutex<StoreState<R>>,
}

impl<R: Record, S> std::fmt::Debug for ListStore<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListStore")
            .field("collection", &R::COLLECTION)
            .finish_non_exhaustive()
    }
}

impl<R: Record, S: RecordService<R>> ListStore<R, S> {
    /// Create an empty store backed by `service`.
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: Mutex::new(StoreState {
                cache: CollectionCache::new(),
                view: ListView::new(),
                coordinator: MutationCoordinator::new(),
                notices: Vec::new(),
            }),
        }
    }

    /// The record service this store talks to.
    pub const fn service(&self) -> &S {
        &self.service
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState<R>>, SyncError> {
        self.state
            .lock()
            .map_err(|_| SyncError::Internal("Lock poisoned".to_string()))
    }

    /// Fetch the whole collection and replace the cache with it.
    ///
    /// While the request is in flight the previous contents stay readable.
    /// If another load starts meanwhile, this one's result is dropped.
    ///
    /// # Errors
    ///
    /// Returns the service error; the cache keeps its previous contents.
    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    pub async fn load(&self) -> Result<LoadOutcome, SyncError> {
        let ticket = self.lock()?.cache.begin_load();
        let result = self.service.list().await;

        let mut state = self.lock()?;
        let err = match result {
            Ok(records) => return Ok(state.cache.finish_load(ticket, Ok(records))),
            Err(err) => err,
        };

        let outcome = state.cache.finish_load(ticket, Err(&err));
        if outcome == LoadOutcome::Superseded {
            return Ok(outcome);
        }
        state
            .notices
            .push(Notice::error(format!("Failed to fetch {}", R::LIST_FIELD)));
        drop(state);

        err.report();
        Err(err)
    }

    /// Records matching the current search, in the current sort order.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the store lock is poisoned.
    pub fn visible(&self) -> Result<Vec<R>, SyncError> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        Ok(state
            .view
            .visible(&state.cache)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Every cached record, in service order.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the store lock is poisoned.
    pub fn records(&self) -> Result<Vec<R>, SyncError> {
        Ok(self.lock()?.cache.records().to_vec())
    }

    /// The cached record with `id`.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the store lock is poisoned.
    pub fn get(&self, id: &R::Id) -> Result<Option<R>, SyncError> {
        Ok(self.lock()?.cache.get(id).cloned())
    }

    /// # Errors
    ///
    /// Returns `Internal` if the store lock is poisoned.
    pub fn load_status(&self) -> Result<LoadStatus, SyncError> {
        Ok(self.lock()?.cache.status().clone())
    }

    /// # Errors
    ///
    /// Returns `Internal` if the store lock is poisoned.
    pub fn query(&self) -> Result<ViewQuery, SyncError> {
        Ok(self.lock()?.view.query().clone())
    }

    /// # Errors
    ///
    /// Returns `Internal` if the store lock is poisoned.
    pub fn set_search(&self, term: &str) -> Result<(), SyncError> {
        self.lock()?.view.set_search(term);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `UnsupportedSort` if `R` cannot be sorted by the key.
    pub fn set_sort(&self, sort: Option<SortSpec>) -> Result<(), SyncError> {
        self.lock()?.view.set_sort::<R>(sort)
    }

    /// Open an edit draft for the cached record `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` is not cached, or `Busy` while a request
    /// for `id` is in flight.
    pub fn begin_edit(&self, id: &R::Id) -> Result<R::Draft, SyncError> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let record = state.cache.get(id).ok_or_else(|| SyncError::NotFound {
            id: id.to_string(),
        })?;
        state.coordinator.begin_edit(record).cloned()
    }

    /// Apply one field update to the open draft and return the result.
    ///
    /// # Errors
    ///
    /// Returns `NoDraft` or `Busy`.
    pub fn update_draft(
        &self,
        field: <R::Draft as Draft>::Field,
    ) -> Result<R::Draft, SyncError> {
        self.lock()?.coordinator.update_draft(field).cloned()
    }

    /// # Errors
    ///
    /// Returns `Internal` if the store lock is poisoned.
    pub fn draft(&self) -> Result<Option<R::Draft>, SyncError> {
        Ok(self.lock()?.coordinator.draft().cloned())
    }

    /// # Errors
    ///
    /// Returns `Internal` if the store lock is poisoned.
    pub fn edit_state(&self) -> Result<EditState<R::Id>, SyncError> {
        Ok(self.lock()?.coordinator.state())
    }

    /// Discard the open draft. Returns whether there was one.
    ///
    /// # Errors
    ///
    /// Returns `Busy` while the draft is submitting.
    pub fn cancel_edit(&self) -> Result<bool, SyncError> {
        self.lock()?.coordinator.cancel_edit()
    }

    /// Validate and send the open draft, then apply what the service
    /// committed to the cache.
    ///
    /// Returns the committed values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailure` without sending anything, `Busy` if a
    /// request for the record is already in flight, or the service error.
    /// On error the cache is untouched and the draft stays open.
    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    pub async fn commit_edit(&self) -> Result<R::Patch, SyncError> {
        let pending = {
            let mut state = self.lock()?;
            match state.coordinator.start_update() {
                Ok(pending) => pending,
                Err(err @ SyncError::ValidationFailure(_)) => {
                    state.notices.push(update_failed::<R>(&err));
                    drop(state);
                    err.report();
                    return Err(err);
                }
                Err(err) => return Err(err),
            }
        };

        let result = self.service.update(&pending.id, &pending.patch).await;

        let mut state = self.lock()?;
        state
            .coordinator
            .finish_update(&pending.id, result.as_ref().map(|_| ()));
        match result {
            Ok(committed) => {
                if !state.cache.apply_patch(&pending.id, &committed) {
                    info!(id = %pending.id, "Updated record is no longer cached");
                }
                state.notices.push(Notice::success(format!(
                    "{} updated successfully",
                    capitalized(R::NOUN)
                )));
                info!(id = %pending.id, "Record updated");
                Ok(committed)
            }
            Err(err) => {
                state.notices.push(update_failed::<R>(&err));
                drop(state);
                err.report();
                Err(err)
            }
        }
    }

    /// Ask for confirmation, then delete `id` and drop it from the cache.
    ///
    /// Nothing is removed locally until the service confirms.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` is not cached, `Busy` if a request for it is
    /// already in flight, or the service error.
    #[instrument(skip_all, fields(collection = R::COLLECTION, id = %id))]
    pub async fn delete_record(
        &self,
        id: &R::Id,
        confirm: &impl ConfirmDelete,
    ) -> Result<DeleteOutcome, SyncError> {
        {
            let state = self.lock()?;
            if !state.cache.contains(id) {
                return Err(SyncError::NotFound { id: id.to_string() });
            }
            if state.coordinator.in_flight(id).is_some() {
                return Err(SyncError::Busy { id: id.to_string() });
            }
        }

        let prompt = format!("Are you sure you want to delete this {}?", R::NOUN);
        if !confirm.confirm(&prompt) {
            info!("Delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        self.lock()?.coordinator.start_delete(id)?;
        let result = self.service.delete(id).await;

        let mut state = self.lock()?;
        state.coordinator.finish_delete(id, result.is_ok());
        match result {
            Ok(()) => {
                state.cache.remove(id);
                state.notices.push(Notice::success(format!(
                    "{} deleted successfully",
                    capitalized(R::NOUN)
                )));
                info!("Record deleted");
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                state
                    .notices
                    .push(Notice::error(format!("Failed to delete {}: {err}", R::NOUN)));
                drop(state);
                err.report();
                Err(err)
            }
        }
    }

    /// Drain pending notices, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the store lock is poisoned.
    pub fn take_notices(&self) -> Result<Vec<Notice>, SyncError> {
        Ok(std::mem::take(&mut self.lock()?.notices))
    }
}

fn update_failed<R: Record>(err: &SyncError) -> Notice {
    Notice::error(format!("Failed to update {}: {err}", R::NOUN))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rollcall_core::{Member, MemberField, MemberId, MemberPatch, Money, SortKey};
    use tokio::sync::Notify;

    use super::*;
    use crate::sync::notice::NoticeLevel;

    /// In-memory stand-in for the record service.
    #[derive(Default)]
    struct FakeService {
        records: Mutex<Vec<Member>>,
        /// Canned list responses, served before falling back to `records`.
        lists: Mutex<VecDeque<Vec<Member>>>,
        fail_with: Mutex<Option<u16>>,
        /// Held by the next request until notified.
        gate: Mutex<Option<Arc<Notify>>>,
        updates: AtomicUsize,
        deletes: AtomicUsize,
    }

    impl FakeService {
        fn with(records: Vec<Member>) -> Self {
            Self {
                records: Mutex::new(records),
                ..Self::default()
            }
        }

        fn fail_next(&self, status: u16) {
            *self.fail_with.lock().unwrap() = Some(status);
        }

        fn hold_next(&self) -> Arc<Notify> {
            let gate = Arc::new(Notify::new());
            *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
            gate
        }

        async fn enter(&self) -> Result<(), SyncError> {
            let gate = self.gate.lock().unwrap().take();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            match self.fail_with.lock().unwrap().take() {
                Some(status) => Err(SyncError::ServerRejection {
                    status,
                    message: "boom".to_string(),
                }),
                None => Ok(()),
            }
        }
    }

    impl RecordService<Member> for FakeService {
        async fn list(&self) -> Result<Vec<Member>, SyncError> {
            let canned = self.lists.lock().unwrap().pop_front();
            let snapshot = canned.unwrap_or_else(|| self.records.lock().unwrap().clone());
            self.enter().await?;
            Ok(snapshot)
        }

        async fn update(&self, id: &MemberId, patch: &MemberPatch) -> Result<MemberPatch, SyncError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.enter().await?;
            let mut records = self.records.lock().unwrap();
            let record = records
                .iter_mut()
                .find(|m| &m.id == id)
                .ok_or_else(|| SyncError::ServerRejection {
                    status: 404,
                    message: "Member not found".to_string(),
                })?;
            record.apply_patch(patch);
            // The service normalizes names on write.
            record.full_name = record.full_name.to_uppercase();
            Ok(MemberPatch {
                full_name: Some(record.full_name.clone()),
                phone: Some(record.phone.clone()),
                money: Some(record.money),
                role: Some(record.role.clone()),
            })
        }

        async fn delete(&self, id: &MemberId) -> Result<(), SyncError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.enter().await?;
            self.records.lock().unwrap().retain(|m| &m.id != id);
            Ok(())
        }
    }

    fn member(id: &str, name: &str, money: i64) -> Member {
        Member {
            id: MemberId::new(id),
            member_id: format!("NC-{id}"),
            full_name: name.to_string(),
            phone: "9876543210".to_string(),
            money: Money::from_major(money),
            role: "member".to_string(),
        }
    }

    fn id(raw: &str) -> MemberId {
        MemberId::new(raw)
    }

    fn ids(records: &[Member]) -> Vec<&str> {
        records.iter().map(|m| m.id.as_str()).collect()
    }

    async fn loaded_store() -> ListStore<Member, FakeService> {
        let store = ListStore::new(FakeService::with(vec![
            member("1", "A", 10),
            member("2", "B", 20),
        ]));
        store.load().await.unwrap();
        store
    }

    fn yes(_: &str) -> bool {
        true
    }

    #[tokio::test]
    async fn test_load_populates_cache() {
        let store = loaded_store().await;
        assert_eq!(ids(&store.records().unwrap()), vec!["1", "2"]);
        assert_eq!(store.load_status().unwrap(), LoadStatus::Ready);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_contents() {
        let store = loaded_store().await;
        store.service.fail_next(503);

        let err = store.load().await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(ids(&store.records().unwrap()), vec!["1", "2"]);
        assert!(matches!(
            store.load_status().unwrap(),
            LoadStatus::Failed { retryable: true, .. }
        ));
        let notices = store.take_notices().unwrap();
        assert_eq!(notices, vec![Notice::error("Failed to fetch members")]);
    }

    #[tokio::test]
    async fn test_search_and_sort_scenarios() {
        let store = loaded_store().await;

        store.set_search("a").unwrap();
        assert_eq!(ids(&store.visible().unwrap()), vec!["1"]);

        store.set_search("").unwrap();
        store
            .set_sort(Some(SortSpec::descending(SortKey::Money)))
            .unwrap();
        assert_eq!(ids(&store.visible().unwrap()), vec!["2", "1"]);

        let err = store
            .set_sort(Some(SortSpec::ascending(SortKey::CreatedAt)))
            .unwrap_err();
        assert!(matches!(err, SyncError::UnsupportedSort { .. }));
        assert_eq!(ids(&store.visible().unwrap()), vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_commit_applies_server_values() {
        let store = loaded_store().await;
        store.begin_edit(&id("1")).unwrap();
        store
            .update_draft(MemberField::FullName("a2".to_string()))
            .unwrap();

        let committed = store.commit_edit().await.unwrap();
        assert_eq!(committed.full_name.as_deref(), Some("A2"));

        let record = store.get(&id("1")).unwrap().unwrap();
        let server = store.service.records.lock().unwrap()[0].clone();
        assert_eq!(record, server);
        assert_eq!(record.full_name, "A2");
        assert_eq!(record.money, Money::from_major(10));

        assert_eq!(store.edit_state().unwrap(), EditState::Idle);
        assert_eq!(
            store.take_notices().unwrap(),
            vec![Notice::success("Member updated successfully")]
        );
    }

    #[tokio::test]
    async fn test_commit_failure_leaves_cache_and_draft() {
        let store = loaded_store().await;
        let before = store.records().unwrap();

        store.begin_edit(&id("1")).unwrap();
        store
            .update_draft(MemberField::FullName("A2".to_string()))
            .unwrap();
        store.service.fail_next(500);

        let err = store.commit_edit().await.unwrap_err();
        assert!(matches!(err, SyncError::ServerRejection { status: 500, .. }));
        assert_eq!(store.records().unwrap(), before);
        assert_eq!(store.draft().unwrap().unwrap().full_name(), "A2");
        assert!(matches!(store.edit_state().unwrap(), EditState::Failed { .. }));

        let notices = store.take_notices().unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(notices[0].message.starts_with("Failed to update member"));

        // Retry goes through.
        store.commit_edit().await.unwrap();
        assert_eq!(store.get(&id("1")).unwrap().unwrap().full_name, "A2");
    }

    #[tokio::test]
    async fn test_invalid_money_sends_nothing() {
        let store = loaded_store().await;
        store.begin_edit(&id("1")).unwrap();
        store
            .update_draft(MemberField::Money("lots".to_string()))
            .unwrap();

        let err = store.commit_edit().await.unwrap_err();
        assert!(matches!(err, SyncError::ValidationFailure(_)));
        assert_eq!(store.service.updates.load(Ordering::SeqCst), 0);
        assert_eq!(
            store.get(&id("1")).unwrap().unwrap().money,
            Money::from_major(10)
        );
    }

    #[tokio::test]
    async fn test_rename_member_with_legacy_phone() {
        let mut legacy = member("1", "A", 10);
        legacy.phone = "N/A".to_string();
        let store = ListStore::new(FakeService::with(vec![legacy]));
        store.load().await.unwrap();

        store.begin_edit(&id("1")).unwrap();
        store
            .update_draft(MemberField::FullName("a2".to_string()))
            .unwrap();
        store.commit_edit().await.unwrap();

        assert_eq!(store.service.updates.load(Ordering::SeqCst), 1);
        let record = store.get(&id("1")).unwrap().unwrap();
        assert_eq!(record.full_name, "A2");
        assert_eq!(record.phone, "N/A");
    }

    #[tokio::test]
    async fn test_commit_without_draft() {
        let store = loaded_store().await;
        assert!(matches!(store.commit_edit().await, Err(SyncError::NoDraft)));
        assert!(matches!(
            store.begin_edit(&id("9")),
            Err(SyncError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_cancel_edit_discards_draft() {
        let store = loaded_store().await;
        store.begin_edit(&id("1")).unwrap();
        store
            .update_draft(MemberField::FullName("never sent".to_string()))
            .unwrap();
        assert!(store.cancel_edit().unwrap());
        assert!(store.draft().unwrap().is_none());
        assert_eq!(store.get(&id("1")).unwrap().unwrap().full_name, "A");
    }

    #[tokio::test]
    async fn test_double_submit_sends_one_request() {
        let store = loaded_store().await;
        store.begin_edit(&id("1")).unwrap();
        let gate = store.service.hold_next();

        let (first, second) = futures::join!(store.commit_edit(), async {
            let second = store.commit_edit().await;
            gate.notify_one();
            second
        });

        assert!(first.is_ok());
        assert!(matches!(second, Err(SyncError::Busy { .. })));
        assert_eq!(store.service.updates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delete_scenarios() {
        let store = loaded_store().await;

        store.service.fail_next(500);
        assert!(store.delete_record(&id("1"), &yes).await.is_err());
        assert_eq!(ids(&store.records().unwrap()), vec!["1", "2"]);

        let outcome = store.delete_record(&id("1"), &yes).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(ids(&store.records().unwrap()), vec!["2"]);

        let notices = store.take_notices().unwrap();
        assert!(notices[0].is_error());
        assert_eq!(notices[1], Notice::success("Member deleted successfully"));
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let store = loaded_store().await;
        let asked = Mutex::new(String::new());
        let decline = |prompt: &str| {
            *asked.lock().unwrap() = prompt.to_string();
            false
        };

        let outcome = store.delete_record(&id("1"), &decline).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Declined);
        assert_eq!(store.service.deletes.load(Ordering::SeqCst), 0);
        assert_eq!(
            *asked.lock().unwrap(),
            "Are you sure you want to delete this member?"
        );
        assert_eq!(store.records().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_different_ids_are_independent() {
        let store = loaded_store().await;
        let one = id("1");
        let gate = store.service.hold_next();

        let (first, second) = futures::join!(store.delete_record(&one, &yes), async {
            let second = store.delete_record(&id("2"), &yes).await;
            gate.notify_one();
            second
        });

        assert_eq!(first.unwrap(), DeleteOutcome::Deleted);
        assert_eq!(second.unwrap(), DeleteOutcome::Deleted);
        assert!(store.records().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commits_on_different_ids_overlap() {
        let store = loaded_store().await;
        store.begin_edit(&id("1")).unwrap();
        store
            .update_draft(MemberField::FullName("a2".to_string()))
            .unwrap();
        let first_gate = store.service.hold_next();

        let (first, second) = futures::join!(store.commit_edit(), async {
            store.begin_edit(&id("2")).unwrap();
            store
                .update_draft(MemberField::FullName("b2".to_string()))
                .unwrap();
            let second_gate = store.service.hold_next();

            let (second, ()) = futures::join!(store.commit_edit(), async {
                // Both requests are out before either answers.
                assert_eq!(store.service.updates.load(Ordering::SeqCst), 2);
                assert_eq!(
                    store.edit_state().unwrap(),
                    EditState::Submitting { id: id("2") }
                );
                first_gate.notify_one();
                second_gate.notify_one();
            });
            second
        });

        assert_eq!(first.unwrap().full_name.as_deref(), Some("A2"));
        assert_eq!(second.unwrap().full_name.as_deref(), Some("B2"));
        assert_eq!(store.get(&id("1")).unwrap().unwrap().full_name, "A2");
        assert_eq!(store.get(&id("2")).unwrap().unwrap().full_name, "B2");
        assert_eq!(store.edit_state().unwrap(), EditState::Idle);
    }

    #[tokio::test]
    async fn test_delete_while_edit_in_flight_is_busy() {
        let store = loaded_store().await;
        store.begin_edit(&id("1")).unwrap();
        let gate = store.service.hold_next();

        let (commit, delete) = futures::join!(store.commit_edit(), async {
            let delete = store.delete_record(&id("1"), &yes).await;
            gate.notify_one();
            delete
        });

        assert!(commit.is_ok());
        assert!(matches!(delete, Err(SyncError::Busy { .. })));
        assert_eq!(store.service.deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_view_readable_while_load_in_flight() {
        let store = loaded_store().await;
        let gate = store.service.hold_next();

        let (loaded, seen) = futures::join!(store.load(), async {
            let seen = store.visible().unwrap();
            let status = store.load_status().unwrap();
            gate.notify_one();
            (seen, status)
        });

        loaded.unwrap();
        assert_eq!(ids(&seen.0), vec!["1", "2"]);
        assert_eq!(seen.1, LoadStatus::Loading);
    }

    #[tokio::test]
    async fn test_superseded_load_is_dropped() {
        let store = loaded_store().await;
        store
            .service
            .lists
            .lock()
            .unwrap()
            .extend([vec![member("1", "Stale", 1)], vec![member("3", "Fresh", 3)]]);
        let gate = store.service.hold_next();

        let (old, new) = futures::join!(store.load(), async {
            let new = store.load().await;
            gate.notify_one();
            new
        });

        assert_eq!(new.unwrap(), LoadOutcome::Installed { count: 1 });
        assert_eq!(old.unwrap(), LoadOutcome::Superseded);
        assert_eq!(ids(&store.records().unwrap()), vec!["3"]);
    }

    #[tokio::test]
    async fn test_delete_during_load_is_not_undone() {
        let store = loaded_store().await;
        // The load response is produced before the delete lands.
        store
            .service
            .lists
            .lock()
            .unwrap()
            .push_back(vec![member("1", "A", 10), member("2", "B", 20)]);
        let gate = store.service.hold_next();

        let (loaded, deleted) = futures::join!(store.load(), async {
            let deleted = store.delete_record(&id("1"), &yes).await;
            gate.notify_one();
            deleted
        });

        loaded.unwrap();
        assert_eq!(deleted.unwrap(), DeleteOutcome::Deleted);
        assert_eq!(ids(&store.records().unwrap()), vec!["2"]);
    }

    #[tokio::test]
    async fn test_commit_during_load_is_not_reverted() {
        let store = loaded_store().await;
        // The load response still carries the old name.
        store
            .service
            .lists
            .lock()
            .unwrap()
            .push_back(vec![member("1", "A", 10), member("2", "B", 20)]);
        let gate = store.service.hold_next();

        let (loaded, committed) = futures::join!(store.load(), async {
            store.begin_edit(&id("1")).unwrap();
            store
                .update_draft(MemberField::FullName("a2".to_string()))
                .unwrap();
            store
                .update_draft(MemberField::Money("15".to_string()))
                .unwrap();
            let committed = store.commit_edit().await;
            gate.notify_one();
            committed
        });

        assert_eq!(loaded.unwrap(), LoadOutcome::Installed { count: 2 });
        committed.unwrap();
        let record = store.get(&id("1")).unwrap().unwrap();
        assert_eq!(record.full_name, "A2");
        assert_eq!(record.money, Money::from_major(15));
        assert_eq!(store.get(&id("2")).unwrap().unwrap().full_name, "B");
    }
}
