// src/publish/mod.rs
//! Make the updated dataset durable in a remote version-control history.

pub mod git;
pub mod runner;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::path::Path;

use crate::error::PublishError;

pub use git::GitPublisher;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};

pub const COMMIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[async_trait]
pub trait Publisher: Send + Sync {
    /// Stage `file`, commit it with `message` and push. Steps are strictly
    /// ordered and the first failing one ends the attempt.
    async fn publish(&self, file: &Path, message: &str) -> Result<(), PublishError>;
}

/// Fill `{date}` in `template` with `at` formatted as `%Y-%m-%d %H:%M`.
pub fn commit_message(template: &str, at: NaiveDateTime) -> String {
    template.replace("{date}", &at.format(COMMIT_DATE_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_commit_message() {
        let at = NaiveDate::from_ymd_opt(2025, 2, 3)
            .unwrap()
            .and_hms_opt(7, 4, 59)
            .unwrap();
        assert_eq!(
            commit_message("Auto-update PVOIL fuel prices - {date}", at),
            "Auto-update PVOIL fuel prices - 2025-02-03 07:04"
        );
        assert_eq!(commit_message("no placeholder", at), "no placeholder");
    }
}
