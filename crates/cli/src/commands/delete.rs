//! `delete` command.

use std::io::{self, BufRead, Write};

use rollcall_admin::components::TableRow;
use rollcall_admin::sync::ListStore;
use rollcall_admin::{ConfirmDelete, DeleteOutcome, RecordService};

use super::CliError;
use crate::DeleteArgs;

/// Confirmation prompt on the terminal.
///
/// The prompt goes to stderr and the answer is read from stdin. Anything but
/// `y` or `yes` declines.
#[derive(Debug, Clone, Copy)]
pub struct TerminalConfirm {
    pub assume_yes: bool,
}

impl ConfirmDelete for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        let mut stderr = io::stderr().lock();
        if write!(stderr, "{prompt} [y/N] ")
            .and_then(|()| stderr.flush())
            .is_err()
        {
            return false;
        }

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Confirm and delete one record.
///
/// # Errors
///
/// Returns `NotFound` if the record is not in the list, or the service error.
pub async fn run<R: TableRow, S: RecordService<R>>(
    store: &ListStore<R, S>,
    args: &DeleteArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let id: R::Id = args.id.clone().into();
    let confirm = TerminalConfirm {
        assume_yes: args.yes,
    };

    match store.delete_record(&id, &confirm).await? {
        DeleteOutcome::Deleted => {}
        DeleteOutcome::Declined => writeln!(out, "Cancelled")?,
    }
    Ok(())
}
