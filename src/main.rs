use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, FromArgMatches, Parser, Subcommand};
use fuelscraper::{
    config::Config,
    dataset::DatasetStore,
    logging::{self, LogFormat},
    pipeline::Pipeline,
    summary::{build_summary_table, summarize, DateRange},
};
use std::{path::PathBuf, process::ExitCode};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
struct Cli {
    /// YAML config file; flags below override it.
    #[arg(long, env = "FUELSCRAPER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// CSV file holding the price history.
    #[arg(long, env = "DATASET_PATH", global = true)]
    dataset: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormat,

    /// Defaults to `run`.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch today's prices, append them to the dataset and publish it.
    Run(RunArgs),

    /// Print the latest price per fuel type from the dataset.
    Summary(SummaryArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Listing page to scrape.
    #[arg(long, env = "SOURCE_URL")]
    url: Option<String>,

    #[arg(long, env = "SOURCE_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Working tree the dataset is committed in.
    #[arg(long, env = "REPO_DIR")]
    repo_dir: Option<PathBuf>,

    #[arg(long, env = "GIT_REMOTE")]
    remote: Option<String>,

    /// Only used together with `--remote`.
    #[arg(long, env = "GIT_BRANCH")]
    branch: Option<String>,

    /// Update the dataset but do not commit or push.
    #[arg(long)]
    no_publish: bool,
}

#[derive(Args)]
struct SummaryArgs {
    #[arg(long, value_enum, default_value = "ALL")]
    range: DateRange,
}

#[tokio::main]
async fn main() -> ExitCode {
    let mut cli = Cli::parse();
    logging::init(cli.log_format);

    let command = match cli.command.take().map_or_else(default_command, Ok) {
        Ok(command) => command,
        Err(e) => {
            error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    let cfg = match load_config(&cli, &command) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    let result = match command {
        Command::Run(_) => run(&cfg).await,
        Command::Summary(args) => print_summary(&cfg, args.range),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// `run` with its flags taken from the environment only.
fn default_command() -> Result<Command> {
    let cmd = RunArgs::augment_args(clap::Command::new("run"));
    let matches = cmd.try_get_matches_from(["run"])?;
    Ok(Command::Run(RunArgs::from_arg_matches(&matches)?))
}

fn load_config(cli: &Cli, command: &Command) -> Result<Config> {
    let mut cfg = match &cli.config {
        Some(path) => Config::from_yaml_file(path)?,
        None => Config::default(),
    };

    if let Some(path) = &cli.dataset {
        cfg.dataset.path = path.clone();
    }

    if let Command::Run(args) = command {
        if let Some(url) = &args.url {
            cfg.source.url = url.clone();
        }
        if let Some(secs) = args.timeout_secs {
            cfg.source.timeout_secs = secs;
        }
        if let Some(dir) = &args.repo_dir {
            cfg.publish.repo_dir = dir.clone();
        }
        if args.remote.is_some() {
            cfg.publish.remote = args.remote.clone();
        }
        if args.branch.is_some() {
            cfg.publish.branch = args.branch.clone();
        }
        if args.no_publish {
            cfg.publish.enabled = false;
        }
    }

    if cfg.publish.branch.is_some() && cfg.publish.remote.is_none() {
        warn!("publish branch is set without a remote and will be ignored");
    }
    Ok(cfg)
}

async fn run(cfg: &Config) -> Result<()> {
    let banner = "=".repeat(50);
    let started = Local::now();
    info!("{banner}");
    info!("fuel price auto-update");
    info!("started at {}", started.format("%Y-%m-%d %H:%M:%S"));
    info!("{banner}");

    let pipeline = Pipeline::from_config(cfg).context("setting up pipeline")?;

    match pipeline.run(started.naive_local()).await {
        Ok(report) => {
            info!(
                prices = report.reading.prices().count(),
                total_rows = report.total_rows,
                published = report.published,
                "update completed successfully"
            );
            info!("{banner}");
            Ok(())
        }
        Err(e) => {
            error!(step = e.step(), "run aborted, exiting");
            Err(e.into())
        }
    }
}

fn print_summary(cfg: &Config, range: DateRange) -> Result<()> {
    let store = DatasetStore::new(&cfg.dataset.path);
    let ds = store
        .load()
        .with_context(|| format!("loading {}", store.path().display()))?;

    let summaries = summarize(&ds, range);
    if summaries.is_empty() {
        println!("No price data in {}", store.path().display());
        return Ok(());
    }

    println!("{}", build_summary_table(&summaries));
    Ok(())
}
