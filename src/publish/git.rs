// src/publish/git.rs

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::runner::{command_line, CommandRunner, SystemRunner};
use super::Publisher;
use crate::config::PublishConfig;
use crate::error::PublishError;

/// Stages, commits and pushes a single file with the `git` CLI.
pub struct GitPublisher<R = SystemRunner> {
    runner: R,
    repo_dir: PathBuf,
    remote: Option<String>,
    branch: Option<String>,
    committer_name: String,
    committer_email: String,
}

impl GitPublisher<SystemRunner> {
    pub fn from_config(cfg: &PublishConfig) -> Self {
        Self::with_runner(cfg, SystemRunner)
    }
}

impl<R: CommandRunner> GitPublisher<R> {
    pub fn with_runner(cfg: &PublishConfig, runner: R) -> Self {
        Self {
            runner,
            repo_dir: cfg.repo_dir.clone(),
            remote: cfg.remote.clone(),
            branch: cfg.branch.clone(),
            committer_name: cfg.committer_name.clone(),
            committer_email: cfg.committer_email.clone(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    async fn git(&self, args: Vec<String>) -> Result<(), PublishError> {
        let out = self.runner.run("git", &args, &self.repo_dir).await?;
        if out.success {
            Ok(())
        } else {
            Err(PublishError::CommandFailed {
                command: command_line("git", &args),
                status: out.status,
                stderr: out.stderr.trim().to_string(),
            })
        }
    }

    /// Identity is best effort: a failure is logged and ignored.
    async fn configure_identity(&self) {
        let settings = [
            ("user.name", &self.committer_name),
            ("user.email", &self.committer_email),
        ];
        for (key, value) in settings {
            let args = vec!["config".to_string(), key.to_string(), value.clone()];
            if let Err(e) = self.git(args).await {
                warn!(error = %e, "could not set git {key}, continuing");
            }
        }
    }

    fn push_args(&self) -> Vec<String> {
        let mut args = vec!["push".to_string()];
        if let Some(remote) = &self.remote {
            args.push(remote.clone());
            if let Some(branch) = &self.branch {
                args.push(branch.clone());
            }
        }
        args
    }
}

#[async_trait]
impl<R: CommandRunner> Publisher for GitPublisher<R> {
    async fn publish(&self, file: &Path, message: &str) -> Result<(), PublishError> {
        self.configure_identity().await;

        let file = file.canonicalize().unwrap_or_else(|_| file.to_path_buf());

        info!(file = %file.display(), "adding changes to git");
        self.git(vec!["add".to_string(), file.to_string_lossy().into_owned()])
            .await?;

        info!(commit_message = message, "committing");
        self.git(vec!["commit".to_string(), "-m".to_string(), message.to_string()])
            .await?;

        info!("pushing to remote repository");
        self.git(self.push_args()).await?;

        info!("successfully pushed to repository");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::runner::CommandOutput;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Records every invocation; fails any call whose subcommand is `fail_on`.
    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<Vec<String>>>,
        fail_on: Option<&'static str>,
    }

    impl RecordingRunner {
        fn failing(sub: &'static str) -> Self {
            Self {
                fail_on: Some(sub),
                ..Self::default()
            }
        }

        fn subcommands(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|c| c[0].clone())
                .collect()
        }
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(
            &self,
            program: &str,
            args: &[String],
            _cwd: &Path,
        ) -> Result<CommandOutput, PublishError> {
            assert_eq!(program, "git");
            self.calls.lock().unwrap().push(args.to_vec());
            if self.fail_on == Some(args[0].as_str()) {
                Ok(CommandOutput::failed(128, "fatal: boom\n"))
            } else {
                Ok(CommandOutput::ok())
            }
        }
    }

    fn cfg() -> PublishConfig {
        PublishConfig::default()
    }

    #[tokio::test]
    async fn test_steps_run_in_order() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("prices.csv");
        std::fs::write(&file, "x").unwrap();

        let publisher = GitPublisher::with_runner(&cfg(), RecordingRunner::default());
        publisher.publish(&file, "Auto-update - 2025-01-01 08:00").await.unwrap();

        let calls = publisher.runner().calls.lock().unwrap().clone();
        assert_eq!(
            publisher.runner().subcommands(),
            ["config", "config", "add", "commit", "push"]
        );
        assert_eq!(calls[0], ["config", "user.name", "PVOIL Auto-Update Bot"]);
        assert_eq!(calls[1], ["config", "user.email", "bot@pvoil-update.local"]);
        assert!(calls[2][1].ends_with("prices.csv"));
        assert_eq!(calls[3], ["commit", "-m", "Auto-update - 2025-01-01 08:00"]);
        assert_eq!(calls[4], ["push"]);
    }

    #[tokio::test]
    async fn test_config_failure_is_ignored() {
        let publisher = GitPublisher::with_runner(&cfg(), RecordingRunner::failing("config"));
        publisher
            .publish(Path::new("prices.csv"), "msg")
            .await
            .unwrap();
        assert_eq!(
            publisher.runner().subcommands(),
            ["config", "config", "add", "commit", "push"]
        );
    }

    #[tokio::test]
    async fn test_add_failure_stops_before_commit() {
        let publisher = GitPublisher::with_runner(&cfg(), RecordingRunner::failing("add"));
        let err = publisher
            .publish(Path::new("prices.csv"), "msg")
            .await
            .unwrap_err();

        match err {
            PublishError::CommandFailed {
                command, stderr, ..
            } => {
                assert_eq!(command, "git add prices.csv");
                assert_eq!(stderr, "fatal: boom");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(publisher.runner().subcommands(), ["config", "config", "add"]);
    }

    #[tokio::test]
    async fn test_commit_failure_skips_push() {
        let publisher = GitPublisher::with_runner(&cfg(), RecordingRunner::failing("commit"));
        assert!(publisher.publish(Path::new("prices.csv"), "msg").await.is_err());
        assert_eq!(
            publisher.runner().subcommands(),
            ["config", "config", "add", "commit"]
        );
    }

    #[tokio::test]
    async fn test_push_to_configured_remote_and_branch() {
        let cfg = PublishConfig {
            remote: Some("origin".to_string()),
            branch: Some("data".to_string()),
            ..PublishConfig::default()
        };
        let publisher = GitPublisher::with_runner(&cfg, RecordingRunner::failing("push"));
        let err = publisher
            .publish(Path::new("prices.csv"), "msg")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("git push origin data"));
    }
}
