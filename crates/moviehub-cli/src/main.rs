//! moviehub - terminal browser for TMDB movies and TV shows.

/// Application configuration (TOML).
mod config;
/// Trailing-edge debounce.
mod debounce;
/// Terminal UI components.
mod tui;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use moviehub_api::tmdb::{ContentItem, MediaKind, TmdbApi, TmdbClient};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use url::Url;

use crate::config::{
    API_KEY_ENV, AppConfig, TmdbConfig, config_file, log_file, resolve_config_dir,
};
use crate::tui::browser::route::Route;
use crate::tui::browser::{BrowserOptions, run_browser};

/// Transport timeout for every TMDB request.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

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
    /// Browse top rated and searched titles in the terminal.
    Browse(BrowseArgs),
    /// Query TMDB API.
    Tmdb(TmdbCommand),
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Content kind accepted on the command line.
#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    /// Movies.
    #[value(alias = "movies")]
    Movie,
    /// TV shows.
    #[value(alias = "tv-shows")]
    Tv,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Movie => Self::Movie,
            KindArg::Tv => Self::Tv,
        }
    }
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Tab shown at startup (default: `ui.default_tab` from config).
    #[arg(long, value_enum)]
    tab: Option<KindArg>,

    /// Location to open at startup: "/", "/movie/<id>" or "/tv/<id>".
    #[arg(long)]
    open: Option<Route>,
}

/// Arguments for the `tmdb` subcommand.
#[derive(clap::Args)]
struct TmdbCommand {
    /// TMDB subcommand to run.
    #[command(subcommand)]
    command: TmdbSubcommands,
}

/// Available TMDB subcommands.
#[derive(Subcommand)]
enum TmdbSubcommands {
    /// List the top 10 rated titles.
    TopRated(TmdbTopRatedArgs),
    /// Search titles by name.
    Search(TmdbSearchArgs),
    /// Show a single title.
    Details(TmdbDetailsArgs),
}

/// Arguments for the `tmdb top-rated` subcommand.
#[derive(clap::Args)]
struct TmdbTopRatedArgs {
    /// Content kind.
    #[arg(long, value_enum, default_value = "movie")]
    kind: KindArg,
}

/// Arguments for the `tmdb search` subcommand.
#[derive(clap::Args)]
struct TmdbSearchArgs {
    /// Content kind.
    #[arg(long, value_enum, default_value = "movie")]
    kind: KindArg,
    /// Search query (e.g. "batman").
    #[arg(long, required = true)]
    query: String,
}

/// Arguments for the `tmdb details` subcommand.
#[derive(clap::Args)]
struct TmdbDetailsArgs {
    /// Content kind.
    #[arg(long, value_enum, default_value = "movie")]
    kind: KindArg,
    /// TMDB identifier (e.g. 550).
    #[arg(long, required = true)]
    id: u64,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a config file with default settings.
    Init(ConfigInitArgs),
}

/// Arguments for the `config init` subcommand.
#[derive(clap::Args)]
struct ConfigInitArgs {
    /// TMDB API key to store.
    #[arg(long)]
    api_key: Option<String>,
    /// Overwrite an existing config file.
    #[arg(long)]
    force: bool,
}

/// Default log filter when `RUST_LOG` is unset.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Logs to stdout.
fn init_stdout_logging() {
    fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .init();
}

/// Logs to `moviehub.log` in the config directory, keeping the terminal free for the TUI.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
fn init_file_logging(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))?;
    let path = log_file(dir);
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// Builds a `TmdbClient` from config, with `TMDB_API_KEY` taking precedence.
///
/// # Errors
///
/// Returns an error if no API key is available, the base URL is invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &TmdbConfig, config_path: &Path) -> Result<TmdbClient> {
    let api_key = config
        .resolve_api_key(std::env::var(API_KEY_ENV).ok())
        .with_context(|| {
            format!(
                "TMDB API key is required: set {API_KEY_ENV} or tmdb.api_key in {}",
                config_path.display()
            )
        })?;

    let mut builder = TmdbClient::builder()
        .api_key(api_key)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(HTTP_TIMEOUT);
    if let Some(base_url) = &config.base_url {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid tmdb.base_url {base_url:?}"))?;
        builder = builder.base_url(url);
    }
    if let Some(language) = &config.language {
        builder = builder.language(language);
    }

    builder.build().context("failed to build TMDB client")
}

/// Loads config and builds the TMDB client for one command.
///
/// # Errors
///
/// Returns an error if config loading or client construction fails.
fn load_client(dir: Option<&PathBuf>) -> Result<(AppConfig, TmdbClient)> {
    let config_dir = resolve_config_dir(dir)?;
    let path = config_file(&config_dir);
    let config = AppConfig::load(&path)?;
    let client = build_tmdb_client(&config.tmdb, &path)?;
    Ok((config, client))
}

/// Logs one item as a table row.
fn log_item_row(item: &ContentItem) {
    tracing::info!(
        "{}\t{:.1}\t{}\t{}",
        item.id(),
        item.vote_average(),
        item.release_date().unwrap_or("-"),
        item.title(),
    );
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if config, client construction or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(args: &BrowseArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (config, client) = load_client(dir)?;
    let options = BrowserOptions {
        initial_tab: args.tab.map_or(config.ui.default_tab, MediaKind::from),
        debounce: config.ui.debounce(),
        open_route: args.open,
    };
    tracing::info!(
        tab = %options.initial_tab,
        debounce_ms = config.ui.debounce_ms,
        "launching browser"
    );
    run_browser(Arc::new(client), options)
        .await
        .context("browser TUI failed")
}

/// Runs the `tmdb top-rated` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_top_rated(args: &TmdbTopRatedArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (_, client) = load_client(dir)?;
    let kind = MediaKind::from(args.kind);

    let items = client
        .top_rated(kind)
        .await
        .with_context(|| format!("TMDB {kind}/top_rated request failed"))?;

    tracing::info!("Top {} {}", items.len(), kind.label());
    tracing::info!("ID\tRating\tDate\t\tTitle");
    for item in &items {
        log_item_row(item);
    }

    Ok(())
}

/// Runs the `tmdb search` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_search(args: &TmdbSearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (_, client) = load_client(dir)?;
    let kind = MediaKind::from(args.kind);

    let items = client
        .search(kind, &args.query)
        .await
        .with_context(|| format!("TMDB search/{kind} request failed"))?;

    tracing::info!("Total results: {}", items.len());
    tracing::info!("ID\tRating\tDate\t\tTitle");
    for item in &items {
        log_item_row(item);
    }

    Ok(())
}

/// Runs the `tmdb details` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_details(args: &TmdbDetailsArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (_, client) = load_client(dir)?;
    let kind = MediaKind::from(args.kind);

    let item = client
        .details(kind, args.id)
        .await
        .with_context(|| format!("TMDB {kind}/{} request failed", args.id))?;

    tracing::info!("ID: {}", item.id());
    tracing::info!("Title: {}", item.title());
    tracing::info!("Date: {}", item.release_date().unwrap_or("-"));
    tracing::info!(
        "Rating: {:.1} ({} votes)",
        item.vote_average(),
        item.vote_count()
    );
    tracing::info!("Overview: {}", item.overview());

    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the file exists without `--force` or cannot be written.
#[instrument(skip_all)]
fn run_config_init(args: &ConfigInitArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config_dir = resolve_config_dir(dir)?;
    let path = config_file(&config_dir);
    if path.exists() && !args.force {
        bail!(
            "{} already exists; pass --force to overwrite",
            path.display()
        );
    }

    let config = AppConfig {
        tmdb: TmdbConfig {
            api_key: args.api_key.clone(),
            ..TmdbConfig::default()
        },
        ..AppConfig::default()
    };
    config.save(&path)?;

    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if matches!(cli.command, Commands::Browse(_)) {
        init_file_logging(&resolve_config_dir(cli.dir.as_ref())?)?;
    } else {
        init_stdout_logging();
    }

    match cli.command {
        Commands::Browse(args) => run_browse(&args, cli.dir.as_ref()).await,
        Commands::Tmdb(tmdb) => match tmdb.command {
            TmdbSubcommands::TopRated(args) => run_tmdb_top_rated(&args, cli.dir.as_ref()).await,
            TmdbSubcommands::Search(args) => run_tmdb_search(&args, cli.dir.as_ref()).await,
            TmdbSubcommands::Details(args) => run_tmdb_details(&args, cli.dir.as_ref()).await,
        },
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Init(args) => run_config_init(&args, cli.dir.as_ref()),
        },
    }
}
