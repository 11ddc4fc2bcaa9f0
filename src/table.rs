//! In-memory query result table: fixed-width text rendering, CSV output,
//! and numeric column extraction for plotting.

use std::fmt::Write as _;
use std::io::{self, Write};

/// Minimum rendered width of each column in the text view.
const COLUMN_WIDTH: usize = 15;

/// An ordered set of column names and string-valued rows.
///
/// Invariant: every row has exactly `headers.len()` cells. Rows are
/// materialized by the query executor, which pads from the statement's
/// column count, so the invariant holds by construction.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == headers.len()));
        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the table as fixed-width text: a header line, a blank
    /// separator line, then one line per row. Cells longer than the column
    /// width are not truncated.
    pub fn text_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(format_row(&self.headers));
        lines.push(String::from(" "));
        for row in &self.rows {
            lines.push(format_row(row));
        }
        lines
    }

    /// Writes the table as CSV: every cell double-quoted and comma-separated,
    /// one `\n`-terminated line per row, header first.
    ///
    /// Known gap, kept for output parity with the original exporter: embedded
    /// quotes and commas inside cells are not escaped.
    pub fn write_csv<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_csv_line(out, &self.headers)?;
        for row in &self.rows {
            write_csv_line(out, row)?;
        }
        Ok(())
    }

    /// Extracts the values of one column as `f64`, skipping cells that are
    /// empty or do not parse as a number. The returned series may therefore
    /// be shorter than the row count.
    pub fn numeric_column(&self, index: usize) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| row.get(index))
            .filter(|cell| !cell.is_empty())
            .filter_map(|cell| cell.trim().parse::<f64>().ok())
            .collect()
    }
}

fn format_row(cells: &[String]) -> String {
    let mut line = String::new();
    for cell in cells {
        let _ = write!(line, "{:<width$}", cell, width = COLUMN_WIDTH);
    }
    line
}

fn write_csv_line<W: Write>(out: &mut W, cells: &[String]) -> io::Result<()> {
    for (i, cell) in cells.iter().enumerate() {
        write!(out, "\"{}\"", cell)?;
        if i < cells.len() - 1 {
            write!(out, ",")?;
        }
    }
    writeln!(out)
}
