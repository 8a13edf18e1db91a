//! chcurate - channel group curation CLI.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chcurate_core::gallery::NO_RESULTS_MESSAGE;
use chcurate_core::{FilterDimension, Gallery, Session, load_dataset};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};
use crate::tui::run_curator;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Curate channel groups interactively via TUI.
    Curate(DatasetArgs),
    /// List the group cards matching the given filters.
    Groups(GroupsArgs),
    /// List the available filter values.
    Options(DatasetArgs),
    /// Store the dataset path in the config file.
    Init(InitArgs),
}

/// Dataset location shared by the subcommands.
#[derive(clap::Args)]
struct DatasetArgs {
    /// Channel CSV file. Falls back to `[dataset] path` in config if omitted.
    #[arg(long)]
    dataset: Option<PathBuf>,
}

/// Arguments for the `groups` subcommand.
#[derive(clap::Args)]
struct GroupsArgs {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Video genre to keep (repeatable).
    #[arg(long)]
    genre: Vec<String>,

    /// Spoken language to keep (repeatable).
    #[arg(long)]
    language: Vec<String>,

    /// Channel country to keep (repeatable).
    #[arg(long)]
    country: Vec<String>,
}

/// Arguments for the `init` subcommand.
#[derive(clap::Args)]
struct InitArgs {
    /// Channel CSV file to remember.
    #[arg(long)]
    dataset: PathBuf,
}

/// Resolves the dataset path from the flag or the config file.
///
/// # Errors
///
/// Returns an error if neither source provides a path or the config cannot be read.
fn resolve_dataset_path(flag: Option<&Path>, dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    match config.dataset.path {
        Some(path) => Ok(path),
        None => bail!(
            "no dataset configured: pass --dataset or run `chcurate init --dataset <PATH>` ({})",
            config_path.display()
        ),
    }
}

/// Loads the dataset and opens a fresh session on it.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the dataset fails to load.
fn open_session(args: &DatasetArgs, dir: Option<&Path>) -> Result<Session> {
    let path = resolve_dataset_path(args.dataset.as_deref(), dir)?;
    let dataset = load_dataset(&path)
        .with_context(|| format!("failed to load dataset {}", path.display()))?;
    Ok(Session::new(Arc::new(dataset)))
}

/// Runs the `curate` subcommand.
///
/// # Errors
///
/// Returns an error if the dataset fails to load or the TUI fails.
#[instrument(skip_all)]
fn run_curate(args: &DatasetArgs, dir: Option<&Path>) -> Result<()> {
    let session = open_session(args, dir)?;
    let session = run_curator(session).context("TUI error")?;

    let output = session.output();
    tracing::info!("Included channels: {}", output.len());
    for row in output.rows() {
        tracing::info!("  {}\t{}\t{}", row.group_name, row.name, row.url);
    }

    Ok(())
}

/// Runs the `groups` subcommand.
///
/// # Errors
///
/// Returns an error if the dataset fails to load.
#[instrument(skip_all)]
fn run_groups(args: &GroupsArgs, dir: Option<&Path>) -> Result<()> {
    let mut session = open_session(&args.dataset, dir)?;
    session.set_filter(FilterDimension::Genre, args.genre.iter().cloned());
    session.set_filter(FilterDimension::Language, args.language.iter().cloned());
    session.set_filter(FilterDimension::Country, args.country.iter().cloned());

    let view = session.render();
    match &view.gallery {
        Gallery::NoResults => tracing::info!("{NO_RESULTS_MESSAGE}"),
        Gallery::Items(_) => {
            tracing::info!("GroupID\tGroup\t\tGenre\tChannels\tStatus");
            for card in view.gallery.cards() {
                tracing::info!(
                    "{}\t{}\t\t{}\t{}\t\t{}",
                    card.group_id,
                    card.name,
                    card.genre,
                    card.channel_count(),
                    card.status.label(),
                );
            }
        }
    }

    Ok(())
}

/// Runs the `options` subcommand.
///
/// # Errors
///
/// Returns an error if the dataset fails to load.
#[instrument(skip_all)]
fn run_options(args: &DatasetArgs, dir: Option<&Path>) -> Result<()> {
    let session = open_session(args, dir)?;
    let options = session.filter_options();
    for dimension in FilterDimension::ALL {
        tracing::info!("{dimension}: {}", options.values(dimension).join(", "));
    }
    Ok(())
}

/// Runs the `init` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be read or written.
#[instrument(skip_all)]
fn run_init(args: &InitArgs, dir: Option<&Path>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let mut config = AppConfig::load(&config_path).context("failed to load config")?;
    config.dataset.path = Some(args.dataset.clone());
    config.save(&config_path).context("failed to save config")?;

    tracing::info!(
        "Saved dataset path {} to {}",
        args.dataset.display(),
        config_path.display()
    );
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_deref();
    match cli.command {
        Commands::Curate(args) => run_curate(&args, dir),
        Commands::Groups(args) => run_groups(&args, dir),
        Commands::Options(args) => run_options(&args, dir),
        Commands::Init(args) => run_init(&args, dir),
    }
}
