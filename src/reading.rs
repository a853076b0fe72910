// src/reading.rs

use chrono::NaiveDateTime;

pub const DATE_FIELD: &str = "date";
pub const TIME_FIELD: &str = "time";

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// One timestamped snapshot of fuel-type → price values.
///
/// Fields keep insertion order: `date`, `time`, then fuel labels in the order
/// the page listed them. Re-inserting a field keeps its position and replaces
/// the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceReading {
    fields: Vec<(String, String)>,
}

impl PriceReading {
    /// A reading with only `date` and `time` stamped from `captured_at`.
    pub fn new(captured_at: NaiveDateTime) -> Self {
        Self {
            fields: vec![
                (
                    DATE_FIELD.to_string(),
                    captured_at.format(DATE_FORMAT).to_string(),
                ),
                (
                    TIME_FIELD.to_string(),
                    captured_at.format(TIME_FORMAT).to_string(),
                ),
            ],
        }
    }

    /// Insert or overwrite a field (last write wins).
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn date(&self) -> Option<&str> {
        self.get(DATE_FIELD)
    }

    pub fn time(&self) -> Option<&str> {
        self.get(TIME_FIELD)
    }

    /// Number of fields, `date` and `time` included.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Fuel-type entries only.
    pub fn prices(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields()
            .filter(|(k, _)| *k != DATE_FIELD && *k != TIME_FIELD)
    }
}
