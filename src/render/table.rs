//! Box-drawn text tables.
//!
//! Column width is `max(len(name), len(type))`, measured in characters. Cell
//! contents never widen a column: a longer value overflows its cell and
//! shifts the rest of that line.
//!
//! Widths count `char`s, not UTF-8 bytes, so a non-ASCII header such as
//! `größe` gets a five-character column rather than a seven-byte one.

use crate::database::result::{Column, QueryResult};
use std::fmt::{Display, Write};

/// Incremental table renderer.
///
/// The header is written on construction so rows can be pushed straight from
/// a backend cursor.
pub struct TableWriter {
    widths: Vec<usize>,
    out: String,
    rows: usize,
}

impl TableWriter {
    pub fn new(columns: &[Column]) -> Self {
        let widths: Vec<usize> = columns
            .iter()
            .map(|c| c.name.chars().count().max(c.data_type.chars().count()))
            .collect();

        let mut writer = Self {
            widths,
            out: String::new(),
            rows: 0,
        };
        writer.border('┌', '┬', '┐');
        writer.line(columns.iter().map(|c| &c.name));
        writer.line(columns.iter().map(|c| &c.data_type));
        writer.border('├', '┼', '┤');
        writer
    }

    pub fn push_row<I>(&mut self, cells: I)
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.line(cells);
        self.rows += 1;
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Writes the bottom border and the row count line.
    pub fn finish(mut self) -> String {
        self.border('└', '┴', '┘');
        let suffix = if self.rows == 1 { "" } else { "s" };
        let _ = write!(self.out, "\n({} row{})\n", self.rows, suffix);
        self.out
    }

    fn border(&mut self, left: char, join: char, right: char) {
        self.out.push(left);
        for (i, width) in self.widths.iter().enumerate() {
            if i > 0 {
                self.out.push(join);
            }
            self.out.extend(std::iter::repeat_n('─', width + 2));
        }
        self.out.push(right);
        self.out.push('\n');
    }

    fn line<I>(&mut self, cells: I)
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.out.push('│');
        for (i, (width, cell)) in self.widths.iter().zip(cells).enumerate() {
            if i > 0 {
                self.out.push('│');
            }
            let _ = write!(self.out, " {:<width$} ", cell.to_string(), width = *width);
        }
        self.out.push_str("│\n");
    }
}

/// Renders a materialized result.
pub fn render_table(result: &QueryResult) -> String {
    let mut writer = TableWriter::new(&result.columns);
    for row in &result.rows {
        writer.push_row(row);
    }
    writer.finish()
}
