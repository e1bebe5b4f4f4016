//! Date-indexed case table.
//!
//! A `CaseTable` has one `Date` column and one column per area. It is built
//! from the API record list in a single pass through an explicit
//! date -> area -> value mapping, then materialised into rows sorted by
//! date. Transforms never mutate a table in place; they return a new one.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::NaiveDate;

use crate::models::{CaseKind, CaseRecord};
use crate::utils::format_cell;

/// Name of the leading date column
pub const DATE_COLUMN: &str = "Date";

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub date: NaiveDate,
    /// One cell per area column; `None` is an empty cell, never zero
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CaseTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl CaseTable {
    /// Pivot a record list into a table of cumulative or daily counts.
    ///
    /// Columns appear in the order areas are first seen. If the same
    /// (date, area) pair occurs twice the later record wins.
    pub fn from_records(records: &[CaseRecord], kind: CaseKind) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut column_index: HashMap<&str, usize> = HashMap::new();
        let mut by_date: BTreeMap<NaiveDate, BTreeMap<usize, Option<f64>>> = BTreeMap::new();

        for record in records {
            let index = *column_index
                .entry(record.area_name.as_str())
                .or_insert_with(|| {
                    columns.push(record.area_name.clone());
                    columns.len() - 1
                });
            by_date
                .entry(record.date)
                .or_default()
                .insert(index, record.case_count(kind).map(|v| v as f64));
        }

        let width = columns.len();
        let rows = by_date
            .into_iter()
            .map(|(date, cells)| {
                let mut values = vec![None; width];
                for (index, value) in cells {
                    values[index] = value;
                }
                Row { date, values }
            })
            .collect();

        Self { columns, rows }
    }

    /// Assemble a table from already-shaped parts.
    /// Every row must hold exactly one value per column.
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Row>) -> Self {
        debug_assert!(rows.iter().all(|r| r.values.len() == columns.len()));
        Self { columns, rows }
    }

    /// Area column names, without the leading `Date`
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Every column name, `Date` first
    pub fn header(&self) -> impl Iterator<Item = &str> {
        std::iter::once(DATE_COLUMN).chain(self.columns.iter().map(String::as_str))
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().map(|r| r.date)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// The (date, value) pairs of one area column, looked up by exact name
    pub fn series(&self, name: &str) -> Option<Vec<(NaiveDate, Option<f64>)>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|r| (r.date, r.values[index])).collect())
    }

    /// Every present cell across all area columns
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().flat_map(|r| r.values.iter().flatten().copied())
    }

    /// Day-to-day differences of each column. The first row, and any row
    /// next to an empty cell, has no difference.
    pub fn differences(&self) -> CaseTable {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let values = match i.checked_sub(1).map(|p| &self.rows[p]) {
                    None => vec![None; self.columns.len()],
                    Some(prev) => row
                        .values
                        .iter()
                        .zip(&prev.values)
                        .map(|(cur, prev)| match (cur, prev) {
                            (Some(c), Some(p)) => Some(c - p),
                            _ => None,
                        })
                        .collect(),
                };
                Row {
                    date: row.date,
                    values,
                }
            })
            .collect();

        Self {
            columns: self.columns.clone(),
            rows,
        }
    }
}

impl fmt::Display for CaseTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                std::iter::once(row.date.format("%Y-%m-%d").to_string())
                    .chain(row.values.iter().map(|v| format_cell(*v)))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = self
            .header()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .map(|row| row[i].len())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = self
            .header()
            .zip(&widths)
            .map(|(name, width)| format!("{:>width$}", name, width = width))
            .collect();
        writeln!(f, "{}", header.join("  "))?;

        for row in &cells {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:>width$}", cell, width = width))
                .collect();
            writeln!(f, "{}", line.join("  "))?;
        }

        write!(f, "[{} rows x {} columns]", self.rows.len(), self.columns.len() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(d: &str, area: &str, new: Option<i64>, cum: Option<i64>) -> CaseRecord {
        CaseRecord {
            date: date(d),
            area_name: area.to_string(),
            area_code: None,
            new_cases: new,
            cum_cases: cum,
            new_deaths: None,
            cum_deaths: None,
        }
    }

    #[test]
    fn test_two_record_scenario() {
        let records = vec![
            record("2020-01-01", "X", Some(5), Some(5)),
            record("2020-01-02", "X", Some(4), Some(9)),
        ];

        let cumulative = CaseTable::from_records(&records, CaseKind::Cumulative);
        assert_eq!(cumulative.columns(), ["X"]);
        assert_eq!(
            cumulative.series("X").unwrap(),
            vec![(date("2020-01-01"), Some(5.0)), (date("2020-01-02"), Some(9.0))]
        );

        let delta = CaseTable::from_records(&records, CaseKind::Delta);
        assert_eq!(
            delta.series("X").unwrap(),
            vec![(date("2020-01-01"), Some(5.0)), (date("2020-01-02"), Some(4.0))]
        );
    }

    #[test]
    fn test_incremental_field_used_without_rederiving() {
        // Cumulative and incremental disagree; the delta table must use the raw field
        let records = vec![
            record("2020-01-01", "X", None, Some(5)),
            record("2020-01-02", "X", Some(100), Some(9)),
        ];
        let delta = CaseTable::from_records(&records, CaseKind::Delta);
        assert_eq!(delta.rows()[0].values, vec![None]);
        assert_eq!(delta.rows()[1].values, vec![Some(100.0)]);
    }

    #[test]
    fn test_one_row_per_date_one_column_per_area() {
        // API order is newest first
        let records = vec![
            record("2020-01-03", "B", None, Some(30)),
            record("2020-01-03", "A", None, Some(3)),
            record("2020-01-02", "A", None, Some(2)),
            record("2020-01-01", "B", None, Some(10)),
            record("2020-01-01", "C", None, Some(1)),
        ];
        let table = CaseTable::from_records(&records, CaseKind::Cumulative);

        assert_eq!(table.columns(), ["B", "A", "C"]);
        assert_eq!(table.header().collect::<Vec<_>>(), vec!["Date", "B", "A", "C"]);
        assert_eq!(
            table.dates().collect::<Vec<_>>(),
            vec![date("2020-01-01"), date("2020-01-02"), date("2020-01-03")]
        );
        assert!(table.dates().zip(table.dates().skip(1)).all(|(a, b)| a < b));

        // Absent pairs are empty, not zero
        assert_eq!(table.rows()[0].values, vec![Some(10.0), None, Some(1.0)]);
        assert_eq!(table.rows()[1].values, vec![None, Some(2.0), None]);
        assert_eq!(table.rows()[2].values, vec![Some(30.0), Some(3.0), None]);
        assert_eq!(table.values().count(), records.len());
    }

    #[test]
    fn test_duplicate_pair_later_record_wins() {
        let records = vec![
            record("2020-01-01", "X", None, Some(1)),
            record("2020-01-01", "X", None, Some(2)),
        ];
        let table = CaseTable::from_records(&records, CaseKind::Cumulative);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].values, vec![Some(2.0)]);
    }

    #[test]
    fn test_empty_input() {
        let table = CaseTable::from_records(&[], CaseKind::Cumulative);
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
        assert_eq!(table.header().collect::<Vec<_>>(), vec!["Date"]);
    }

    #[test]
    fn test_differences_reproduce_incremental_counts() {
        let records = vec![
            record("2020-01-01", "X", Some(5), Some(5)),
            record("2020-01-02", "X", Some(4), Some(9)),
            record("2020-01-03", "X", Some(0), Some(9)),
            record("2020-01-04", "X", Some(6), Some(15)),
            record("2020-01-02", "Y", Some(2), Some(2)),
            record("2020-01-04", "Y", Some(1), Some(3)),
        ];
        let cumulative = CaseTable::from_records(&records, CaseKind::Cumulative);
        let delta = CaseTable::from_records(&records, CaseKind::Delta);
        let derived = cumulative.differences();

        let mut compared = 0;
        for (derived_row, delta_row) in derived.rows().iter().zip(delta.rows()) {
            for (d, expected) in derived_row.values.iter().zip(&delta_row.values) {
                if let (Some(d), Some(expected)) = (d, expected) {
                    assert_eq!(d, expected);
                    compared += 1;
                }
            }
        }
        assert_eq!(compared, 3);
        assert_eq!(derived.rows()[0].values, vec![None, None]);
    }

    #[test]
    fn test_series_unknown_column() {
        let table = CaseTable::from_records(&[record("2020-01-01", "X", None, Some(1))], CaseKind::Cumulative);
        assert!(table.series("Y").is_none());
        assert!(table.series("Date").is_none());
    }

    #[test]
    fn test_display_layout() {
        let records = vec![
            record("2020-01-01", "London", None, Some(5)),
            record("2020-01-02", "London", None, None),
        ];
        let text = CaseTable::from_records(&records, CaseKind::Cumulative).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "      Date  London");
        assert_eq!(lines[1], "2020-01-01       5");
        assert_eq!(lines[2], "2020-01-02     NaN");
        assert_eq!(lines[3], "[2 rows x 2 columns]");
    }
}
