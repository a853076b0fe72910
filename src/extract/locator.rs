// src/extract/locator.rs

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::ExtractError;

/// Finds the element holding the price table.
pub trait TableLocator: Send + Sync {
    fn locate<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>>;
}

/// Tries CSS selectors in order and returns the first match of the first
/// selector that matches anything.
#[derive(Debug, Clone)]
pub struct SelectorChain {
    selectors: Vec<(String, Selector)>,
}

impl SelectorChain {
    pub fn new<S: AsRef<str>>(selectors: &[S]) -> Result<Self, ExtractError> {
        let selectors = selectors
            .iter()
            .map(|raw| {
                let raw = raw.as_ref();
                Selector::parse(raw)
                    .map(|sel| (raw.to_string(), sel))
                    .map_err(|e| ExtractError::Selector {
                        selector: raw.to_string(),
                        message: format!("{e:?}"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { selectors })
    }
}

impl TableLocator for SelectorChain {
    fn locate<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>> {
        self.selectors.iter().find_map(|(raw, sel)| {
            let found = doc.select(sel).next();
            if found.is_some() {
                debug!(selector = %raw, "located price table");
            }
            found
        })
    }
}
