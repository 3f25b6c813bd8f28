//! `edit` command.

use std::io::Write;

use rollcall_admin::RecordService;
use rollcall_admin::components::TableRow;
use rollcall_admin::sync::ListStore;
use rollcall_core::Draft;

use super::CliError;

/// Open a draft for `id`, apply `fields`, commit and print the result.
///
/// # Errors
///
/// Returns `NothingToEdit` if `fields` is empty, otherwise whatever the store
/// refuses or the service rejects. Invalid input is reported before anything
/// is sent.
pub async fn run<R: TableRow, S: RecordService<R>>(
    store: &ListStore<R, S>,
    id: String,
    fields: Vec<<R::Draft as Draft>::Field>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if fields.is_empty() {
        return Err(CliError::NothingToEdit);
    }

    let id: R::Id = id.into();
    store.begin_edit(&id)?;
    for field in fields {
        store.update_draft(field)?;
    }
    store.commit_edit().await?;

    if let Some(record) = store.get(&id)? {
        let table = R::table_config().render(std::slice::from_ref(&record), false);
        out.write_all(table.as_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::Ordering;

    use rollcall_admin::SyncError;
    use rollcall_core::{MemberField, MemberId, Money};

    use super::*;
    use crate::commands::testing::loaded_store;

    #[tokio::test]
    async fn test_edit_commits_and_prints_row() {
        let store = loaded_store().await;
        let mut out = Vec::new();
        run(
            &store,
            "1".to_string(),
            vec![
                MemberField::FullName("A2".to_string()),
                MemberField::Money("12.5".to_string()),
            ],
            &mut out,
        )
        .await
        .unwrap();

        let record = store.get(&MemberId::new("1")).unwrap().unwrap();
        assert_eq!(record.full_name, "A2");
        assert_eq!(record.money, Money::parse("12.5").unwrap());
        assert!(String::from_utf8(out).unwrap().contains("₹12.50"));
    }

    #[tokio::test]
    async fn test_edit_without_fields() {
        let store = loaded_store().await;
        let err = run(&store, "1".to_string(), vec![], &mut Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::NothingToEdit));
    }

    #[tokio::test]
    async fn test_edit_invalid_money() {
        let store = loaded_store().await;
        let err = run(
            &store,
            "1".to_string(),
            vec![MemberField::Money("ten".to_string())],
            &mut Vec::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            CliError::Sync(SyncError::ValidationFailure(_))
        ));
        assert_eq!(
            store.get(&MemberId::new("1")).unwrap().unwrap().money,
            Money::from_major(10)
        );
    }

    #[tokio::test]
    async fn test_edit_unknown_id() {
        let store = loaded_store().await;
        let err = run(
            &store,
            "9".to_string(),
            vec![MemberField::FullName("X".to_string())],
            &mut Vec::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CliError::Sync(SyncError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_edit_rejected_by_service() {
        let store = loaded_store().await;
        store.service().reject.store(true, Ordering::SeqCst);
        let err = run(
            &store,
            "1".to_string(),
            vec![MemberField::FullName("A2".to_string())],
            &mut Vec::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            CliError::Sync(SyncError::ServerRejection { status: 404, .. })
        ));
        assert_eq!(store.get(&MemberId::new("1")).unwrap().unwrap().full_name, "A");
    }
}
