//! Presentation components shared by list front ends.

pub mod data_table;

pub use data_table::{
    DataTableConfig, TableColumn, TableRow, members_table_config, users_table_config,
};
