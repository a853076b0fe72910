// src/dataset/mod.rs
//! The append-only price history table.

pub mod store;

pub use store::DatasetStore;

use crate::reading::PriceReading;

/// Header plus rows, every row as wide as the header.
///
/// Columns only ever grow: a reading with a field the table has not seen
/// adds a column at the end and earlier rows get a blank cell for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw records, padding short rows with blanks.
    ///
    /// Rows wider than the header are kept whole; [`DatasetStore::load`]
    /// refuses such files before they get here.
    pub fn from_parts(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, String::new());
                }
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell value by row index and column name; blanks read as `None`.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Append one reading as the newest row, widening the header if needed.
    pub fn push(&mut self, reading: &PriceReading) {
        for (name, _) in reading.fields() {
            if self.column_index(name).is_none() {
                self.headers.push(name.to_string());
                for row in &mut self.rows {
                    row.push(String::new());
                }
            }
        }

        let mut row = vec![String::new(); self.headers.len()];
        for (name, value) in reading.fields() {
            if let Some(col) = self.column_index(name) {
                row[col] = value.to_string();
            }
        }
        self.rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, day)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn reading(day: u32, prices: &[(&str, &str)]) -> PriceReading {
        let mut r = PriceReading::new(at(day));
        for (k, v) in prices {
            r.insert(*k, *v);
        }
        r
    }

    #[test]
    fn test_push_into_empty() {
        let mut ds = Dataset::new();
        ds.push(&reading(1, &[("RON95", "19870")]));
        assert_eq!(ds.headers(), ["date", "time", "RON95"]);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.value(0, "RON95"), Some("19870"));
    }

    #[test]
    fn test_rows_keep_append_order() {
        let mut ds = Dataset::new();
        for day in 1..=5 {
            ds.push(&reading(day, &[("KO", "18000")]));
        }
        assert_eq!(ds.len(), 5);
        let dates: Vec<_> = (0..5).map(|i| ds.value(i, "date").unwrap()).collect();
        assert_eq!(
            dates,
            ["2025-01-01", "2025-01-02", "2025-01-03", "2025-01-04", "2025-01-05"]
        );
    }

    #[test]
    fn test_novel_column_widens_and_backfills() {
        let mut ds = Dataset::new();
        ds.push(&reading(1, &[("RON95", "19870"), ("E5", "19000")]));
        ds.push(&reading(2, &[("E5", "19100"), ("KO", "18000")]));

        assert_eq!(ds.headers(), ["date", "time", "RON95", "E5", "KO"]);
        assert_eq!(ds.value(0, "KO"), None);
        assert_eq!(ds.value(1, "RON95"), None);
        assert_eq!(ds.value(1, "E5"), Some("19100"));
        assert!(ds.rows().iter().all(|r| r.len() == 5));
    }

    #[test]
    fn test_empty_reading_still_adds_row() {
        let mut ds = Dataset::new();
        ds.push(&reading(1, &[("KO", "18000")]));
        ds.push(&reading(2, &[]));
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.value(1, "KO"), None);
        assert_eq!(ds.value(1, "date"), Some("2025-01-02"));
    }

    #[test]
    fn test_from_parts_pads_short_rows() {
        let ds = Dataset::from_parts(
            vec!["date".into(), "time".into(), "KO".into()],
            vec![vec!["2025-01-01".into(), "08:00:00".into()]],
        );
        assert_eq!(ds.rows()[0].len(), 3);
        assert_eq!(ds.value(0, "KO"), None);
    }

    #[test]
    fn test_from_parts_never_drops_cells() {
        let ds = Dataset::from_parts(
            vec!["date".into(), "time".into()],
            vec![vec!["2025-01-01".into(), "08:00:00".into(), "extra".into()]],
        );
        assert_eq!(ds.rows()[0], ["2025-01-01", "08:00:00", "extra"]);
    }
}
