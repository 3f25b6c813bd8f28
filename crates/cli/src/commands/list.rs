//! `list` command.

use std::io::Write;

use rollcall_admin::RecordService;
use rollcall_admin::components::TableRow;
use rollcall_admin::sync::ListStore;
use rollcall_core::{SortDirection, SortSpec};

use super::CliError;
use crate::ListArgs;

/// Apply the search and sort options and print the visible rows.
///
/// # Errors
///
/// Returns `UnsupportedSort` if the record type cannot be sorted by the
/// requested key, or an output error.
pub fn run<R: TableRow, S: RecordService<R>>(
    store: &ListStore<R, S>,
    args: &ListArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if let Some(term) = &args.search {
        store.set_search(term)?;
    }
    let direction = if args.desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    store.set_sort(args.sort.map(|key| SortSpec { key, direction }))?;

    let rows = store.visible()?;
    let total = store.records()?.len();
    tracing::debug!(shown = rows.len(), total, "Rendering list");

    out.write_all(R::table_config().render(&rows, args.wide).as_bytes())?;
    if !rows.is_empty() {
        writeln!(out, "\n{} of {} {}", rows.len(), total, R::LIST_FIELD)?;
    }
    Ok(())
}
