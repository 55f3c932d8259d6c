//! Reading and writing simple tabular `.xlsx` workbooks.
//!
//! A [`Sheet`] is a header row plus data rows of [`Cell`]s. Styling is not supported.

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader, open_workbook_auto};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::fmt;
use std::path::Path;

/// A single spreadsheet value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    #[must_use]
    pub fn text(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl fmt::Display for Cell {
    /// Integral numbers print without a fraction, so an id typed into a sheet as
    /// `1234` reads back as `1234` rather than `1234.0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{s}"),
            #[allow(clippy::cast_possible_truncation)]
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            #[allow(clippy::cast_precision_loss)]
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(n) => Cell::Number(*n),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::Error(e) => Cell::Text(e.to_string()),
        }
    }
}

static EMPTY_CELL: Cell = Cell::Empty;

/// One worksheet of named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    #[must_use]
    pub fn new(name: &str, header: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            header,
            rows: Vec::new(),
        }
    }

    /// Position of a column by exact header name.
    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.header.iter().position(|h| h == column)
    }

    /// The cell at `row`/`col`, treating short rows as padded with empties.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

fn to_worksheet(sheet: &Sheet) -> Result<Worksheet> {
    let mut worksheet = Worksheet::new();
    worksheet.set_name(&sheet.name)?;

    for (col, title) in sheet.header.iter().enumerate() {
        worksheet.write_string(0, column_number(col)?, title)?;
    }
    for (i, row) in sheet.rows.iter().enumerate() {
        let row_num = u32::try_from(i + 1).map_err(|_| anyhow!("Too many rows for one sheet"))?;
        for (col, cell) in row.iter().enumerate() {
            let col_num = column_number(col)?;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) => {
                    worksheet.write_string(row_num, col_num, s)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(row_num, col_num, *n)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(row_num, col_num, *b)?;
                }
            }
        }
    }
    Ok(worksheet)
}

fn column_number(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| anyhow!("Too many columns for one sheet"))
}

/// Write the sheets, in order, to a new workbook at `path`.
///
/// # Errors
/// Returns an error if a sheet name is invalid, a sheet is too large, or the file
/// cannot be written.
pub fn write_workbook(path: &Path, sheets: &[&Sheet]) -> Result<()> {
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let worksheet = to_worksheet(sheet)
            .with_context(|| format!("Failed to build sheet '{}'", sheet.name))?;
        workbook.push_worksheet(worksheet);
    }
    workbook
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Read one sheet from a workbook. The first row is taken as the header.
/// With no `sheet_name` the first sheet is read.
///
/// # Errors
/// Returns an error if the file cannot be opened or the sheet does not exist.
pub fn read_sheet(path: &Path, sheet_name: Option<&str>) -> Result<Sheet> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let name = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("{} has no sheets", path.display()))?,
    };
    let range = workbook
        .worksheet_range(&name)
        .with_context(|| format!("Failed to read sheet '{name}' from {}", path.display()))?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .map(|r| r.iter().map(|d| Cell::from(d).to_string()).collect())
        .unwrap_or_default();
    let rows: Vec<Vec<Cell>> = rows
        .map(|r| r.iter().map(Cell::from).collect::<Vec<Cell>>())
        .collect();

    Ok(Sheet { name, header, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Number(1234.0).to_string(), "1234");
        assert_eq!(Cell::Number(-2.5).to_string(), "-2.5");
        assert_eq!(Cell::text(" pw ").to_string(), " pw ");
        assert_eq!(Cell::Empty.to_string(), "");
        assert_eq!(Cell::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_cell_lookup_pads_short_rows() {
        let mut sheet = Sheet::new("Data", vec!["A".to_string(), "B".to_string()]);
        sheet.rows.push(vec![Cell::text("x")]);
        assert_eq!(sheet.cell(0, 0), &Cell::text("x"));
        assert_eq!(sheet.cell(0, 1), &Cell::Empty);
        assert_eq!(sheet.cell(5, 0), &Cell::Empty);
        assert_eq!(sheet.column_index("B"), Some(1));
        assert_eq!(sheet.column_index("C"), None);
    }

    #[test]
    fn test_workbook_written_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");

        let mut first = Sheet::new("Annotated", vec!["Password".to_string(), "Count".to_string()]);
        first.rows.push(vec![Cell::text("hunter2"), Cell::Number(2.0)]);
        first.rows.push(vec![Cell::text("letmein"), Cell::Number(1.0)]);
        let mut second = Sheet::new("Flags", vec!["Seen".to_string()]);
        second.rows.push(vec![Cell::Bool(false)]);

        write_workbook(&path, &[&first, &second]).unwrap();

        assert_eq!(read_sheet(&path, None).unwrap(), first);
        assert_eq!(read_sheet(&path, Some("Flags")).unwrap(), second);
        assert!(read_sheet(&path, Some("Missing")).is_err());
    }
}
