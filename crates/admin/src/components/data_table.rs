//! Data table component types.
//!
//! These types describe how a record list is laid out as a plain-text table:
//! which columns exist, which of them map to a sort key, and what to show
//! when the list is empty.

use std::fmt::Write as _;

use rollcall_core::{Member, Record, SortKey, User};

use crate::format;

/// Column definition for a data table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: &'static str,
    /// Display label for the column header.
    pub label: &'static str,
    /// Sort key this column orders by, if sortable.
    pub sort: Option<SortKey>,
    /// Whether the column is visible by default.
    pub default_visible: bool,
}

impl TableColumn {
    /// Create a new sortable column.
    #[must_use]
    pub const fn sortable(key: &'static str, label: &'static str, sort: SortKey) -> Self {
        Self {
            key,
            label,
            sort: Some(sort),
            default_visible: true,
        }
    }

    /// Create a new non-sortable column.
    #[must_use]
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            sort: None,
            default_visible: true,
        }
    }

    /// Set whether the column is visible by default.
    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.default_visible = visible;
        self
    }
}

/// A record that can be shown as one table row.
pub trait TableRow: Record {
    /// Table layout for this record type.
    fn table_config() -> DataTableConfig;

    /// Display text for the column with `key`.
    fn cell(&self, key: &str) -> String;
}

/// Configuration for a data table.
#[derive(Debug, Clone)]
pub struct DataTableConfig {
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Title for empty state.
    pub empty_title: String,
    /// Description for empty state.
    pub empty_description: Option<String>,
}

impl Default for DataTableConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DataTableConfig {
    /// Create an empty table configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: vec![],
            empty_title: "No items found".to_string(),
            empty_description: None,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Set empty state configuration.
    #[must_use]
    pub fn empty_state(mut self, title: &str, description: Option<&str>) -> Self {
        self.empty_title = title.to_string();
        self.empty_description = description.map(ToString::to_string);
        self
    }

    /// Columns shown by default, or all of them when `wide`.
    #[must_use]
    pub fn visible_columns(&self, wide: bool) -> Vec<&TableColumn> {
        self.columns
            .iter()
            .filter(|c| wide || c.default_visible)
            .collect()
    }

    /// Sort keys offered by the sortable columns.
    #[must_use]
    pub fn sort_keys(&self) -> Vec<SortKey> {
        self.columns.iter().filter_map(|c| c.sort).collect()
    }

    /// Render `rows` as an aligned text table.
    #[must_use]
    pub fn render<R: TableRow>(&self, rows: &[R], wide: bool) -> String {
        let mut out = String::new();
        if rows.is_empty() {
            let _ = writeln!(out, "{}", self.empty_title);
            if let Some(description) = &self.empty_description {
                let _ = writeln!(out, "{description}");
            }
            return out;
        }

        let columns = self.visible_columns(wide);
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| columns.iter().map(|c| row.cell(c.key)).collect())
            .collect();
        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                cells
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(column.label.chars().count()))
                    .max()
                    .unwrap_or_default()
            })
            .collect();

        push_line(&mut out, columns.iter().map(|c| c.label), &widths);
        for row in &cells {
            push_line(&mut out, row.iter().map(String::as_str), &widths);
        }
        out
    }
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Build the members table configuration.
#[must_use]
pub fn members_table_config() -> DataTableConfig {
    DataTableConfig::new()
        .column(TableColumn::sortable("name", "Name", SortKey::Name))
        .column(TableColumn::new("member_id", "ID"))
        .column(TableColumn::new("phone", "Phone"))
        .column(TableColumn::sortable("money", "Money", SortKey::Money))
        .column(TableColumn::new("role", "Role"))
        .column(TableColumn::new("record", "Record").visible(false))
        .empty_state("No members found", Some("Try adjusting your search"))
}

/// Build the users table configuration.
#[must_use]
pub fn users_table_config() -> DataTableConfig {
    DataTableConfig::new()
        .column(TableColumn::sortable("name", "Name", SortKey::Name))
        .column(TableColumn::new("id", "ID"))
        .column(TableColumn::new("phone", "Phone"))
        .column(TableColumn::sortable("money", "Money", SortKey::Money))
        .column(TableColumn::sortable("bets", "Bets", SortKey::TotalBets))
        .column(TableColumn::sortable("joined", "Joined", SortKey::CreatedAt))
        .column(TableColumn::new("record", "Record").visible(false))
        .empty_state("No users found", Some("Try adjusting your search"))
}

impl TableRow for Member {
    fn table_config() -> DataTableConfig {
        members_table_config()
    }

    fn cell(&self, key: &str) -> String {
        match key {
            "name" => self.full_name.clone(),
            "member_id" => self.member_id.clone(),
            "phone" => self.phone.clone(),
            "money" => format::money(self.money, format::RUPEE),
            "role" => self.role.clone(),
            "record" => self.id.to_string(),
            _ => String::new(),
        }
    }
}

impl TableRow for User {
    fn table_config() -> DataTableConfig {
        users_table_config()
    }

    fn cell(&self, key: &str) -> String {
        match key {
            "name" => self.full_name.clone(),
            "id" => format::short_id(self.id.as_str()).to_string(),
            "phone" => self.phone.clone(),
            "money" => format::money(self.money, format::DOLLAR),
            "bets" => self.total_bets.to_string(),
            "joined" => format::date(&self.created_at),
            "record" => self.id.to_string(),
            _ => String::new(),
        }
    }
}
