//! Renderers for the supported export formats.

pub mod csv;
pub mod json;
pub mod sql;

pub use csv::{write_dataset_csv, write_table_csv};
pub use json::render_json;
pub use sql::render_sql;
