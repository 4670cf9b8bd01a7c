//! Result rendering: box-drawn text tables and indented JSON.

pub mod json;
pub mod table;

pub use json::{render_json, render_result_rows, render_rows};
pub use table::{TableWriter, render_table};
