// src/extract/mod.rs
//! Page markup → [`PriceReading`].
//!
//! The table is found by a [`TableLocator`]; its first `tr` is treated as the
//! header and skipped, every later `tr` is handed to a [`RowMapper`] as the
//! trimmed texts of its `td` cells. A page with no table yields a reading with
//! only `date` and `time`.

pub mod decode;
pub mod locator;
pub mod row;

use chrono::NaiveDateTime;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::reading::PriceReading;

pub use decode::decode_body;
pub use locator::{SelectorChain, TableLocator};
pub use row::{LabelPriceColumns, RowMapper};

/// Turns a fetched page into a reading.
pub trait PageParser: Send + Sync {
    fn parse(&self, body: &[u8], captured_at: NaiveDateTime)
        -> Result<PriceReading, ExtractError>;
}

pub struct Extractor {
    locator: Box<dyn TableLocator>,
    mapper: Box<dyn RowMapper>,
    row_sel: Selector,
    cell_sel: Selector,
}

impl Extractor {
    pub fn new(locator: impl TableLocator + 'static, mapper: impl RowMapper + 'static) -> Self {
        Self {
            locator: Box::new(locator),
            mapper: Box::new(mapper),
            row_sel: Selector::parse("tr").expect("row selector should parse"),
            cell_sel: Selector::parse("td").expect("cell selector should parse"),
        }
    }

    pub fn from_config(cfg: &ExtractConfig) -> Result<Self, ExtractError> {
        let locator = SelectorChain::new(cfg.table_selectors.as_slice())?;
        let mapper = LabelPriceColumns {
            label_column: cfg.label_column,
            price_column: cfg.price_column,
            strip_chars: cfg.strip_chars.chars().collect(),
        };
        Ok(Self::new(locator, mapper))
    }

    /// Decode `body` (see [`decode_body`]) and extract.
    pub fn extract(&self, body: &[u8], captured_at: NaiveDateTime) -> PriceReading {
        self.extract_str(&decode_body(body), captured_at)
    }

    pub fn extract_str(&self, html: &str, captured_at: NaiveDateTime) -> PriceReading {
        let doc = Html::parse_document(html);
        if !doc.errors.is_empty() {
            debug!(count = doc.errors.len(), "markup recovered from parse errors");
        }

        let mut reading = PriceReading::new(captured_at);

        let Some(table) = self.locator.locate(&doc) else {
            warn!("no price table found on page");
            return reading;
        };

        for row in table.select(&self.row_sel).skip(1) {
            let cells = self.cell_texts(row);
            if let Some((label, price)) = self.mapper.map_row(&cells) {
                reading.insert(label, price);
            }
        }

        info!(prices = reading.prices().count(), "extracted price reading");
        reading
    }

    fn cell_texts(&self, row: ElementRef<'_>) -> Vec<String> {
        row.select(&self.cell_sel)
            .map(|cell| cell.text().map(str::trim).collect::<String>())
            .collect()
    }
}

impl PageParser for Extractor {
    fn parse(
        &self,
        body: &[u8],
        captured_at: NaiveDateTime,
    ) -> Result<PriceReading, ExtractError> {
        Ok(self.extract(body, captured_at))
    }
}
