//! Edit drafts and in-flight mutation bookkeeping.
//!
//! The coordinator never touches the network. [`ListStore`](super::ListStore)
//! asks it for permission before sending a request and reports the result
//! back afterwards; the coordinator decides which requests may go out.

use std::collections::HashMap;

use rollcall_core::{Draft, Record};
use tracing::debug;

use crate::error::SyncError;

type FieldOf<R> = <<R as Record>::Draft as Draft>::Field;

/// What an in-flight request is doing to its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Update,
    Delete,
}

/// Presentation-facing state of the edit draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState<Id> {
    /// No draft is open.
    Idle,
    /// A draft is open and accepts field updates.
    Editing { id: Id },
    /// The draft's update request is in flight.
    Submitting { id: Id },
    /// The last commit was rejected; the draft is open again.
    Failed { id: Id, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Editing,
    Submitting,
}

#[derive(Debug)]
struct Session<R: Record> {
    id: R::Id,
    draft: R::Draft,
    phase: Phase,
    last_error: Option<String>,
}

/// An update request the coordinator has approved.
#[derive(Debug, Clone)]
pub struct PendingUpdate<R: Record> {
    pub id: R::Id,
    pub patch: R::Patch,
}

/// Draft lifecycle plus the set of records with a request in flight.
///
/// At most one request per record id is in flight at any time; a second
/// commit or delete for the same id is refused with `Busy`.
#[derive(Debug)]
pub struct MutationCoordinator<R: Record> {
    session: Option<Session<R>>,
    in_flight: HashMap<R::Id, Operation>,
}

impl<R: Record> Default for MutationCoordinator<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> MutationCoordinator<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session: None,
            in_flight: HashMap::new(),
        }
    }

    /// Open a draft from `record`'s current values.
    ///
    /// An open, unsubmitted draft is discarded. A draft of another record
    /// that is being submitted keeps its request in flight; its result still
    /// reaches the cache but no longer reopens a draft.
    ///
    /// # Errors
    ///
    /// Returns `Busy` while any request for `record` is in flight.
    pub fn begin_edit(&mut self, record: &R) -> Result<&R::Draft, SyncError> {
        if self.in_flight.contains_key(record.id()) {
            return Err(busy(record.id()));
        }
        if let Some(session) = &self.session {
            match session.phase {
                Phase::Editing => debug!(id = %session.id, "Discarding uncommitted draft"),
                Phase::Submitting => debug!(id = %session.id, "Detaching submitted draft"),
            }
        }

        let session = self.session.insert(Session {
            id: record.id().clone(),
            draft: record.draft(),
            phase: Phase::Editing,
            last_error: None,
        });
        Ok(&session.draft)
    }

    /// Apply one field update to the open draft.
    ///
    /// # Errors
    ///
    /// Returns `NoDraft` if no draft is open and `Busy` while it is being
    /// submitted.
    pub fn update_draft(&mut self, field: FieldOf<R>) -> Result<&R::Draft, SyncError> {
        let session = self.editable_session()?;
        session.draft.set(field);
        Ok(&session.draft)
    }

    /// Discard the open draft. Returns whether there was one.
    ///
    /// # Errors
    ///
    /// Returns `Busy` while the draft is being submitted.
    pub fn cancel_edit(&mut self) -> Result<bool, SyncError> {
        let Some(session) = &self.session else {
            return Ok(false);
        };
        if session.phase == Phase::Submitting {
            return Err(busy(&session.id));
        }
        self.session = None;
        Ok(true)
    }

    /// Validate the open draft and mark it as submitting.
    ///
    /// # Errors
    ///
    /// Returns `NoDraft`, `Busy` if a request for the record is already in
    /// flight, or `ValidationFailure` if a field is invalid. On error nothing
    /// changes except the draft's last error.
    pub fn start_update(&mut self) -> Result<PendingUpdate<R>, SyncError> {
        let session = self.session.as_mut().ok_or(SyncError::NoDraft)?;
        if session.phase == Phase::Submitting || self.in_flight.contains_key(&session.id) {
            return Err(busy(&session.id));
        }

        let patch = match session.draft.to_patch() {
            Ok(patch) => patch,
            Err(err) => {
                session.last_error = Some(err.to_string());
                return Err(err.into());
            }
        };

        session.phase = Phase::Submitting;
        session.last_error = None;
        self.in_flight.insert(session.id.clone(), Operation::Update);

        Ok(PendingUpdate {
            id: session.id.clone(),
            patch,
        })
    }

    /// Record the result of an approved update.
    ///
    /// Success closes the draft; failure reopens it for editing.
    pub fn finish_update(&mut self, id: &R::Id, result: Result<(), &SyncError>) {
        self.in_flight.remove(id);

        let Some(session) = self.session.as_mut().filter(|s| &s.id == id) else {
            return;
        };
        if let Err(err) = result {
            session.phase = Phase::Editing;
            session.last_error = Some(err.to_string());
        } else {
            self.session = None;
        }
    }

    /// Mark `id` as being deleted.
    ///
    /// # Errors
    ///
    /// Returns `Busy` if any request for `id` is already in flight.
    pub fn start_delete(&mut self, id: &R::Id) -> Result<(), SyncError> {
        if self.in_flight.contains_key(id) {
            return Err(busy(id));
        }
        self.in_flight.insert(id.clone(), Operation::Delete);
        Ok(())
    }

    /// Record the result of an approved delete.
    ///
    /// A successful delete also closes a draft open on the same record.
    pub fn finish_delete(&mut self, id: &R::Id, deleted: bool) {
        self.in_flight.remove(id);
        if deleted && self.session.as_ref().is_some_and(|s| &s.id == id) {
            debug!(%id, "Closing draft for deleted record");
            self.session = None;
        }
    }

    #[must_use]
    pub fn draft(&self) -> Option<&R::Draft> {
        self.session.as_ref().map(|s| &s.draft)
    }

    #[must_use]
    pub fn state(&self) -> EditState<R::Id> {
        match &self.session {
            None => EditState::Idle,
            Some(s) if s.phase == Phase::Submitting => EditState::Submitting { id: s.id.clone() },
            Some(s) => match &s.last_error {
                Some(message) => EditState::Failed {
                    id: s.id.clone(),
                    message: message.clone(),
                },
                None => EditState::Editing { id: s.id.clone() },
            },
        }
    }

    /// The request in flight for `id`, if any.
    #[must_use]
    pub fn in_flight(&self, id: &R::Id) -> Option<Operation> {
        self.in_flight.get(id).copied()
    }

    fn editable_session(&mut self) -> Result<&mut Session<R>, SyncError> {
        let session = self.session.as_mut().ok_or(SyncError::NoDraft)?;
        if session.phase == Phase::Submitting {
            return Err(busy(&session.id));
        }
        Ok(session)
    }
}

fn busy(id: &impl std::fmt::Display) -> SyncError {
    SyncError::Busy { id: id.to_string() }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rollcall_core::{Member, MemberField, MemberId, Money};

    use super::*;

    fn member(id: &str) -> Member {
        Member {
            id: MemberId::new(id),
            member_id: String::new(),
            full_name: "Asha".to_string(),
            phone: "9876543210".to_string(),
            money: Money::from_major(10),
            role: String::new(),
        }
    }

    fn id(raw: &str) -> MemberId {
        MemberId::new(raw)
    }

    #[test]
    fn test_update_requires_draft() {
        let mut coordinator = MutationCoordinator::<Member>::new();
        assert!(matches!(
            coordinator.update_draft(MemberField::FullName("x".to_string())),
            Err(SyncError::NoDraft)
        ));
        assert!(matches!(coordinator.start_update(), Err(SyncError::NoDraft)));
        assert!(!coordinator.cancel_edit().unwrap());
    }

    #[test]
    fn test_edit_commit_lifecycle() {
        let mut coordinator = MutationCoordinator::new();
        coordinator.begin_edit(&member("1")).unwrap();
        let draft = coordinator
            .update_draft(MemberField::FullName("A2".to_string()))
            .unwrap();
        assert_eq!(draft.full_name(), "A2");
        assert_eq!(coordinator.state(), EditState::Editing { id: id("1") });

        let pending = coordinator.start_update().unwrap();
        assert_eq!(pending.patch.full_name.as_deref(), Some("A2"));
        assert_eq!(coordinator.state(), EditState::Submitting { id: id("1") });
        assert_eq!(coordinator.in_flight(&id("1")), Some(Operation::Update));

        coordinator.finish_update(&pending.id, Ok(()));
        assert_eq!(coordinator.state(), EditState::Idle);
        assert!(coordinator.draft().is_none());
        assert_eq!(coordinator.in_flight(&id("1")), None);
    }

    #[test]
    fn test_submitting_draft_refuses_changes() {
        let mut coordinator = MutationCoordinator::new();
        coordinator.begin_edit(&member("1")).unwrap();
        coordinator.start_update().unwrap();

        assert!(matches!(coordinator.start_update(), Err(SyncError::Busy { .. })));
        assert!(matches!(
            coordinator.update_draft(MemberField::Phone("1".to_string())),
            Err(SyncError::Busy { .. })
        ));
        assert!(matches!(coordinator.cancel_edit(), Err(SyncError::Busy { .. })));
        assert!(matches!(
            coordinator.begin_edit(&member("1")),
            Err(SyncError::Busy { .. })
        ));
        assert!(matches!(
            coordinator.start_delete(&id("1")),
            Err(SyncError::Busy { .. })
        ));
    }

    #[test]
    fn test_other_record_editable_while_submitting() {
        let mut coordinator = MutationCoordinator::new();
        coordinator.begin_edit(&member("1")).unwrap();
        let first = coordinator.start_update().unwrap();

        coordinator.begin_edit(&member("2")).unwrap();
        coordinator
            .update_draft(MemberField::FullName("B2".to_string()))
            .unwrap();
        let second = coordinator.start_update().unwrap();
        assert_eq!(coordinator.in_flight(&id("1")), Some(Operation::Update));
        assert_eq!(coordinator.in_flight(&id("2")), Some(Operation::Update));

        // The detached result only clears its in-flight entry.
        let err = SyncError::NetworkFailure("timeout".to_string());
        coordinator.finish_update(&first.id, Err(&err));
        assert_eq!(coordinator.in_flight(&id("1")), None);
        assert_eq!(coordinator.state(), EditState::Submitting { id: id("2") });

        coordinator.finish_update(&second.id, Ok(()));
        assert_eq!(coordinator.state(), EditState::Idle);
    }

    #[test]
    fn test_failed_update_reopens_draft() {
        let mut coordinator = MutationCoordinator::new();
        coordinator.begin_edit(&member("1")).unwrap();
        coordinator
            .update_draft(MemberField::FullName("A2".to_string()))
            .unwrap();
        let pending = coordinator.start_update().unwrap();

        let err = SyncError::NetworkFailure("timeout".to_string());
        coordinator.finish_update(&pending.id, Err(&err));

        assert!(matches!(coordinator.state(), EditState::Failed { .. }));
        assert_eq!(coordinator.draft().unwrap().full_name(), "A2");
        // Editable and committable again.
        coordinator
            .update_draft(MemberField::FullName("A3".to_string()))
            .unwrap();
        assert!(coordinator.start_update().is_ok());
    }

    #[test]
    fn test_invalid_draft_is_not_submitted() {
        let mut coordinator = MutationCoordinator::new();
        coordinator.begin_edit(&member("1")).unwrap();
        coordinator
            .update_draft(MemberField::Money("ten".to_string()))
            .unwrap();

        let err = coordinator.start_update().unwrap_err();
        assert!(matches!(err, SyncError::ValidationFailure(_)));
        assert_eq!(coordinator.in_flight(&id("1")), None);
        assert!(matches!(coordinator.state(), EditState::Failed { .. }));
    }

    #[test]
    fn test_begin_edit_replaces_open_draft() {
        let mut coordinator = MutationCoordinator::new();
        coordinator.begin_edit(&member("1")).unwrap();
        coordinator
            .update_draft(MemberField::FullName("unsaved".to_string()))
            .unwrap();
        coordinator.begin_edit(&member("2")).unwrap();

        assert_eq!(coordinator.state(), EditState::Editing { id: id("2") });
        assert_eq!(coordinator.draft().unwrap().full_name(), "Asha");
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut coordinator = MutationCoordinator::new();
        coordinator.begin_edit(&member("1")).unwrap();
        assert!(coordinator.cancel_edit().unwrap());
        assert_eq!(coordinator.state(), EditState::Idle);
    }

    #[test]
    fn test_deletes_serialize_per_id() {
        let mut coordinator = MutationCoordinator::<Member>::new();
        coordinator.start_delete(&id("1")).unwrap();
        assert!(matches!(
            coordinator.start_delete(&id("1")),
            Err(SyncError::Busy { .. })
        ));
        assert!(matches!(
            coordinator.begin_edit(&member("1")),
            Err(SyncError::Busy { .. })
        ));
        // Other ids are independent.
        coordinator.start_delete(&id("2")).unwrap();

        coordinator.finish_delete(&id("1"), false);
        coordinator.start_delete(&id("1")).unwrap();
    }

    #[test]
    fn test_commit_refused_while_record_is_being_deleted() {
        let mut coordinator = MutationCoordinator::new();
        coordinator.begin_edit(&member("1")).unwrap();
        coordinator.start_delete(&id("1")).unwrap();

        assert!(matches!(coordinator.start_update(), Err(SyncError::Busy { .. })));

        coordinator.finish_delete(&id("1"), true);
        assert_eq!(coordinator.state(), EditState::Idle);
    }
}
