// src/summary.rs
//! Latest price per fuel type, with the change against the reading before it
//! and the high, low and mean over the selected range.

use chrono::{Months, NaiveDate};
use clap::ValueEnum;
use comfy_table::{modifiers, presets, Cell, CellAlignment, Color, Table};

use crate::dataset::Dataset;
use crate::reading::{DATE_FIELD, DATE_FORMAT, TIME_FIELD};

/// How far back from the newest reading to look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DateRange {
    #[value(name = "1M")]
    OneMonth,
    #[value(name = "3M")]
    ThreeMonths,
    #[value(name = "6M")]
    SixMonths,
    #[value(name = "1Y")]
    OneYear,
    #[value(name = "3Y")]
    ThreeYears,
    #[default]
    #[value(name = "ALL")]
    All,
}

impl DateRange {
    fn months(self) -> Option<u32> {
        match self {
            DateRange::OneMonth => Some(1),
            DateRange::ThreeMonths => Some(3),
            DateRange::SixMonths => Some(6),
            DateRange::OneYear => Some(12),
            DateRange::ThreeYears => Some(36),
            DateRange::All => None,
        }
    }

    /// First date kept when the newest reading is on `last`.
    pub fn start(self, last: NaiveDate) -> Option<NaiveDate> {
        self.months()
            .and_then(|m| last.checked_sub_months(Months::new(m)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuelSummary {
    pub fuel: String,
    pub latest: f64,
    pub latest_date: NaiveDate,
    /// The reading before `latest`; `None` if there is only one.
    pub previous: Option<f64>,
    pub change: f64,
    pub change_percent: f64,
    /// Over every reading in the range.
    pub highest: f64,
    pub lowest: f64,
    /// Mean price, rounded to the nearest dong.
    pub average: f64,
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok()
}

/// Prices are stored digits-only, but older files may carry separators.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|p| p.is_finite())
}

/// One entry per fuel column with at least one numeric price in `range`.
pub fn summarize(ds: &Dataset, range: DateRange) -> Vec<FuelSummary> {
    let Some(date_col) = ds.column_index(DATE_FIELD) else {
        return Vec::new();
    };

    let mut dated: Vec<(NaiveDate, &Vec<String>)> = ds
        .rows()
        .iter()
        .filter_map(|row| parse_date(&row[date_col]).map(|d| (d, row)))
        .collect();
    dated.sort_by_key(|(d, _)| *d);

    if let Some(start) = dated.last().and_then(|(last, _)| range.start(*last)) {
        dated.retain(|(d, _)| *d >= start);
    }

    ds.headers()
        .iter()
        .enumerate()
        .filter(|(_, h)| h.as_str() != DATE_FIELD && h.as_str() != TIME_FIELD)
        .filter_map(|(col, fuel)| {
            let prices: Vec<(NaiveDate, f64)> = dated
                .iter()
                .rev()
                .filter_map(|(d, row)| {
                    let price = row.get(col).and_then(|c| parse_price(c))?;
                    Some((*d, price))
                })
                .collect();
            let &(latest_date, latest) = prices.first()?;
            let previous = prices.get(1).map(|(_, p)| *p);

            let values = prices.iter().map(|(_, p)| *p);
            let highest = values.clone().fold(f64::MIN, f64::max);
            let lowest = values.clone().fold(f64::MAX, f64::min);
            let average = (values.sum::<f64>() / prices.len() as f64).round();

            let change = previous.map_or(0.0, |p| latest - p);
            let change_percent = match previous {
                Some(p) if p != 0.0 => change / p * 100.0,
                _ => 0.0,
            };

            Some(FuelSummary {
                fuel: fuel.clone(),
                latest,
                latest_date,
                previous,
                change,
                change_percent,
                highest,
                lowest,
                average,
            })
        })
        .collect()
}

/// Rounded, with `.` as the thousands separator (vi-VN style).
pub fn format_vnd(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    if rounded < 0 {
        out.insert(0, '-');
    }
    out
}

pub fn build_summary_table(summaries: &[FuelSummary]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        "Fuel",
        "Price (VND)",
        "Previous",
        "Change",
        "Change %",
        "Highest",
        "Lowest",
        "Average",
        "Updated",
    ]);

    for s in summaries {
        let (arrow, color) = if s.change > 0.0 {
            ("▲", Color::Red)
        } else if s.change < 0.0 {
            ("▼", Color::Green)
        } else {
            ("→", Color::Reset)
        };
        let sign = if s.change > 0.0 { "+" } else { "" };

        table.add_row(vec![
            Cell::new(&s.fuel),
            Cell::new(format_vnd(s.latest)).set_alignment(CellAlignment::Right),
            Cell::new(s.previous.map(format_vnd).unwrap_or_else(|| "-".to_string()))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{sign}{}", format_vnd(s.change)))
                .set_alignment(CellAlignment::Right)
                .fg(color),
            Cell::new(format!("{arrow} {sign}{:.2}%", s.change_percent))
                .set_alignment(CellAlignment::Right)
                .fg(color),
            Cell::new(format_vnd(s.highest)).set_alignment(CellAlignment::Right),
            Cell::new(format_vnd(s.lowest)).set_alignment(CellAlignment::Right),
            Cell::new(format_vnd(s.average)).set_alignment(CellAlignment::Right),
            Cell::new(s.latest_date.format("%d/%m/%Y")),
        ]);
    }
    table
}
