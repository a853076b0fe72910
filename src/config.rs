// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_SOURCE_URL: &str = "https://www.pvoil.com.vn/tin-gia-xang-dau";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const DEFAULT_DATASET_PATH: &str = "pvoil_gasoline_prices_full.csv";
pub const DEFAULT_COMMIT_TEMPLATE: &str = "Auto-update PVOIL fuel prices - {date}";

/// Everything a run needs. Sections may be partially given in YAML; missing
/// keys fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub source: SourceConfig,
    pub extract: ExtractConfig,
    pub dataset: DatasetConfig,
    pub publish: PublishConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// How the price table is found and how its rows become fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// CSS selectors tried in order; the first that matches wins.
    pub table_selectors: Vec<String>,
    pub label_column: usize,
    pub price_column: usize,
    /// Characters removed from the price cell (thousand separators).
    pub strip_chars: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            table_selectors: vec!["table.price-table".to_string(), "table".to_string()],
            label_column: 0,
            price_column: 1,
            strip_chars: ".,".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATASET_PATH),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    pub enabled: bool,
    pub repo_dir: PathBuf,
    pub remote: Option<String>,
    pub branch: Option<String>,
    pub committer_name: String,
    pub committer_email: String,
    /// `{date}` is replaced with the capture time as `%Y-%m-%d %H:%M`.
    pub message_template: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            repo_dir: PathBuf::from("."),
            remote: None,
            branch: None,
            committer_name: "PVOIL Auto-Update Bot".to_string(),
            committer_email: "bot@pvoil-update.local".to_string(),
            message_template: DEFAULT_COMMIT_TEMPLATE.to_string(),
        }
    }
}

impl Config {
    /// Parse a YAML config file.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        // an empty document deserializes to unit, not a map
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}
