// src/error.rs
//! Error types, one per pipeline step.

use std::path::PathBuf;
use thiserror::Error;

/// Retrieving the listing page failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid source URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("building HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("GET {url} timed out")]
    Timeout { url: String },

    #[error("GET {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("GET {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// The page could not be turned into a reading.
///
/// A page without any table is *not* an error; see [`crate::extract`].
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid table selector `{selector}`: {message}")]
    Selector { selector: String, message: String },
}

/// Loading or saving the dataset failed.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("reading dataset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing dataset {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("dataset {path} line {line} has {found} cells but the header has {expected}")]
    RowTooWide {
        path: PathBuf,
        line: u64,
        found: usize,
        expected: usize,
    },

    #[error("writing dataset {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serializing dataset {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// A version-control step failed.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("could not run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// The first failure of a run. Every variant aborts the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("extract failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("dataset update failed: {0}")]
    Persist(#[from] PersistError),

    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),
}

impl PipelineError {
    /// Short name of the step that failed, for log lines.
    pub fn step(&self) -> &'static str {
        match self {
            PipelineError::Fetch(_) => "fetch",
            PipelineError::Extract(_) => "extract",
            PipelineError::Persist(_) => "dataset",
            PipelineError::Publish(_) => "publish",
        }
    }
}
