//! Find repeated values (usually passwords) in an exported sheet.

use crate::sheet::{Cell, Sheet};
use anyhow::{Result, anyhow};
use itertools::Itertools;
use std::collections::HashMap;

pub const DEFAULT_COLUMN: &str = "Password";

pub const STATUS_DUPLICATE: &str = "DUPLICATE";
pub const STATUS_UNIQUE: &str = "UNIQUE";

/// The three sheets of a duplicate report, plus the raw counts.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateReport {
    pub annotated: Sheet,
    pub duplicates_only: Sheet,
    pub counts: Sheet,
    pub value_counts: Vec<(String, usize)>,
}

impl DuplicateReport {
    /// Sheets in the order they go into the workbook.
    #[must_use]
    pub fn sheets(&self) -> [&Sheet; 3] {
        [&self.annotated, &self.duplicates_only, &self.counts]
    }

    /// How many distinct values occur more than once.
    #[must_use]
    pub fn duplicated_values(&self) -> usize {
        self.value_counts.iter().filter(|(_, n)| *n > 1).count()
    }
}

/// Text form of a cell, trimmed.
#[must_use]
pub fn normalize(cell: &Cell) -> String {
    cell.to_string().trim().to_string()
}

/// Count each value. Most frequent first, ties in order of first appearance.
#[must_use]
pub fn count_values(values: &[String]) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in values {
        match index.get(value.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value.clone(), 1));
            }
        }
    }
    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .collect()
}

/// Annotate every row of `sheet` with how often its `column` value occurs.
///
/// If the sheet has no such column the first column is used and renamed to `column`.
///
/// # Errors
/// Returns an error if the sheet has no columns at all.
pub fn find_duplicates(sheet: &Sheet, column: &str) -> Result<DuplicateReport> {
    let mut header = sheet.header.clone();
    let col = match sheet.column_index(column) {
        Some(col) => col,
        None => {
            let first = header
                .first_mut()
                .ok_or_else(|| anyhow!("Sheet '{}' has no columns", sheet.name))?;
            log::warn!("No '{column}' column in sheet '{}', using '{first}' instead.", sheet.name);
            *first = column.to_string();
            0
        }
    };

    let normalized: Vec<String> = (0..sheet.rows.len())
        .map(|row| normalize(sheet.cell(row, col)))
        .collect();
    let value_counts = count_values(&normalized);
    let lookup: HashMap<&str, usize> = value_counts
        .iter()
        .map(|(value, n)| (value.as_str(), *n))
        .collect();

    let mut annotated_header = header.clone();
    annotated_header.push("Count".to_string());
    annotated_header.push("Status".to_string());
    let mut annotated = Sheet::new("Annotated", annotated_header.clone());
    let mut duplicates_only = Sheet::new("Duplicates_only", annotated_header);

    for (row, value) in normalized.iter().enumerate() {
        let n = lookup.get(value.as_str()).copied().unwrap_or(0);
        let status = if n > 1 { STATUS_DUPLICATE } else { STATUS_UNIQUE };

        let mut cells: Vec<Cell> = (0..header.len())
            .map(|c| sheet.cell(row, c).clone())
            .collect();
        #[allow(clippy::cast_precision_loss)]
        let count = n as f64;
        cells.push(Cell::Number(count));
        cells.push(Cell::text(status));

        if n > 1 {
            duplicates_only.rows.push(cells.clone());
        }
        annotated.rows.push(cells);
    }

    let mut counts = Sheet::new(
        "Counts",
        vec![format!("{column}_norm"), "Count".to_string()],
    );
    #[allow(clippy::cast_precision_loss)]
    let count_rows = value_counts
        .iter()
        .map(|(value, n)| vec![Cell::Text(value.clone()), Cell::Number(*n as f64)]);
    counts.rows.extend(count_rows);

    Ok(DuplicateReport {
        annotated,
        duplicates_only,
        counts,
        value_counts,
    })
}
