// src/lib.rs
//! Scrape a fuel-price listing, append the reading to a CSV history and
//! publish the file to a git remote.

pub mod config;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod pipeline;
pub mod publish;
pub mod reading;
pub mod summary;

pub use config::Config;
pub use dataset::{Dataset, DatasetStore};
pub use error::{ExtractError, FetchError, PersistError, PipelineError, PublishError};
pub use pipeline::{Pipeline, RunReport};
pub use reading::PriceReading;
