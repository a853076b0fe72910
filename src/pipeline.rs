// src/pipeline.rs
//! fetch → extract → append → publish, strictly in that order.
//!
//! The first failing step ends the run; later steps never start. Nothing is
//! retried and nothing is rolled back: a dataset saved before a failed
//! publish stays on disk and goes out with the next successful run.

use chrono::NaiveDateTime;
use tracing::{error, info, instrument};

use crate::config::Config;
use crate::dataset::DatasetStore;
use crate::error::PipelineError;
use crate::extract::{Extractor, PageParser};
use crate::fetch::{HttpFetcher, PageSource};
use crate::publish::{commit_message, GitPublisher, Publisher};
use crate::reading::PriceReading;

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub reading: PriceReading,
    /// Rows in the dataset after the append.
    pub total_rows: usize,
    pub published: bool,
}

pub struct Pipeline {
    source: Box<dyn PageSource>,
    parser: Box<dyn PageParser>,
    store: DatasetStore,
    publisher: Option<Box<dyn Publisher>>,
    message_template: String,
}

impl Pipeline {
    pub fn new(
        source: Box<dyn PageSource>,
        parser: Box<dyn PageParser>,
        store: DatasetStore,
        publisher: Option<Box<dyn Publisher>>,
        message_template: impl Into<String>,
    ) -> Self {
        Self {
            source,
            parser,
            store,
            publisher,
            message_template: message_template.into(),
        }
    }

    /// Real HTTP source and `git` publisher, as configured.
    pub fn from_config(cfg: &Config) -> Result<Self, PipelineError> {
        let source = HttpFetcher::new(&cfg.source)?;
        let extractor = Extractor::from_config(&cfg.extract)?;
        let publisher: Option<Box<dyn Publisher>> = if cfg.publish.enabled {
            Some(Box::new(GitPublisher::from_config(&cfg.publish)))
        } else {
            None
        };
        Ok(Self::new(
            Box::new(source),
            Box::new(extractor),
            DatasetStore::new(&cfg.dataset.path),
            publisher,
            cfg.publish.message_template.clone(),
        ))
    }

    #[instrument(skip(self), fields(source = %self.source.describe()))]
    pub async fn run(&self, captured_at: NaiveDateTime) -> Result<RunReport, PipelineError> {
        let body = self.source.fetch().await.map_err(|e| {
            error!(error = %e, "error fetching price page");
            PipelineError::from(e)
        })?;

        let reading = self.parser.parse(&body, captured_at).map_err(|e| {
            error!(error = %e, "error extracting prices");
            PipelineError::from(e)
        })?;
        info!(?reading, "successfully extracted price data");

        let dataset = self.store.append(&reading).map_err(|e| {
            error!(error = %e, "failed to update dataset");
            PipelineError::from(e)
        })?;

        let published = match &self.publisher {
            Some(publisher) => {
                let message = commit_message(&self.message_template, captured_at);
                publisher
                    .publish(self.store.path(), &message)
                    .await
                    .map_err(|e| {
                        error!(error = %e, "git operation failed");
                        PipelineError::from(e)
                    })?;
                true
            }
            None => {
                info!("publishing disabled, leaving dataset uncommitted");
                false
            }
        };

        Ok(RunReport {
            reading,
            total_rows: dataset.len(),
            published,
        })
    }
}
