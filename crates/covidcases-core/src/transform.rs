//! Table transforms: column selection, centred rolling average and
//! min-max normalisation.
//!
//! Each transform takes a table by value and returns a new one. `Pipeline`
//! applies whichever steps are enabled, always in that order.

use thiserror::Error;
use tracing::debug;

use crate::table::{CaseTable, Row};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Cannot normalise: every value is {0}")]
    ConstantData(f64),

    #[error("Cannot normalise: the table has no values")]
    Empty,
}

/// Keep `Date` plus the named area columns, in the table's column order.
/// Names that are not columns are ignored.
pub fn select_columns<S: AsRef<str>>(table: CaseTable, names: &[S]) -> CaseTable {
    let keep: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, column)| names.iter().any(|n| n.as_ref() == column.as_str()))
        .map(|(i, _)| i)
        .collect();

    let columns = keep.iter().map(|&i| table.columns()[i].clone()).collect();
    let rows = table
        .rows()
        .iter()
        .map(|row| Row {
            date: row.date,
            values: keep.iter().map(|&i| row.values[i]).collect(),
        })
        .collect();

    CaseTable::from_parts(columns, rows)
}

/// Replace every cell with the mean of a centred window of `window` rows.
///
/// Row `i` averages rows `i + o + 1 - window ..= i + o` where
/// `o = (window - 1) / 2`, clipped to the table. Empty cells are skipped;
/// a window with no values stays empty. A window of 0 leaves the table as is.
pub fn rolling_average(table: CaseTable, window: usize) -> CaseTable {
    if window == 0 || table.is_empty() {
        return table;
    }

    let source = table.rows();
    let last = source.len() - 1;
    let offset = (window - 1) / 2;

    let rows = (0..source.len())
        .map(|i| {
            let end = (i + offset).min(last);
            let start = (i + offset + 1).saturating_sub(window);
            let values = (0..table.columns().len())
                .map(|column| {
                    let (sum, count) = source[start..=end]
                        .iter()
                        .filter_map(|row| row.values[column])
                        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
                    (count > 0).then(|| sum / count as f64)
                })
                .collect();
            Row {
                date: source[i].date,
                values,
            }
        })
        .collect();

    CaseTable::from_parts(table.columns().to_vec(), rows)
}

/// Rescale every value to `(value - min) / (max - min)` using the minimum and
/// maximum over all area columns together. Empty cells stay empty.
pub fn normalise(table: CaseTable) -> Result<CaseTable, TransformError> {
    let (min, max) = table
        .values()
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .ok_or(TransformError::Empty)?;

    let range = max - min;
    if range == 0.0 {
        return Err(TransformError::ConstantData(min));
    }
    debug!(min, max, "Normalising table");

    let rows = table
        .rows()
        .iter()
        .map(|row| Row {
            date: row.date,
            values: row.values.iter().map(|v| v.map(|v| (v - min) / range)).collect(),
        })
        .collect();

    Ok(CaseTable::from_parts(table.columns().to_vec(), rows))
}

/// The optional transform steps, applied in a fixed order:
/// selection, rolling average, normalisation.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    /// Areas to keep; empty keeps every column
    pub areas: Vec<String>,
    pub rolling_window: Option<usize>,
    pub normalise: bool,
}

impl Pipeline {
    pub fn apply(&self, table: CaseTable) -> Result<CaseTable, TransformError> {
        let mut table = table;
        if !self.areas.is_empty() {
            table = select_columns(table, &self.areas);
        }
        if let Some(window) = self.rolling_window {
            table = rolling_average(table, window);
        }
        if self.normalise {
            table = normalise(table)?;
        }
        Ok(table)
    }
}
