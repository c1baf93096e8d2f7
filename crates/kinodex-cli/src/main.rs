//! kinodex - OMDb movie search and browsing CLI.

/// Application configuration (TOML).
mod config;
/// Search orchestration, pagination, and filtering.
mod session;
/// Terminal UI components.
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;

use crate::config::{AppConfig, resolve_config_path};
use crate::session::filter::RatingBounds;
use crate::session::search::{PageOutcome, SearchQuery, SearchSession, fetch_details};
use crate::tui::run_browser;
use kinodex_api::omdb::{LocalOmdbApi, OmdbClient, Plot, TitleKind};

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
    /// Search OMDb and print one enriched result page.
    Search(SearchArgs),
    /// Print the full record for one title.
    Detail(DetailArgs),
    /// Browse search results interactively.
    Browse,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search text. Falls back to the configured default query if omitted.
    #[arg(long)]
    query: Option<String>,

    /// Filter by release year.
    #[arg(long)]
    year: Option<u16>,

    /// Filter by title kind: movie, series, or episode.
    #[arg(long)]
    kind: Option<String>,

    /// Result page to print.
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Minimum IMDb rating (inclusive).
    #[arg(long)]
    rating_min: Option<String>,

    /// Maximum IMDb rating (inclusive).
    #[arg(long)]
    rating_max: Option<String>,
}

/// Arguments for the `detail` subcommand.
#[derive(clap::Args)]
struct DetailArgs {
    /// IMDb identifier (e.g. "tt0076759").
    #[arg(long, required = true)]
    id: String,
}

/// Builds an `OmdbClient` from the `OMDB_API_KEY` environment variable
/// and the configured base URL.
///
/// # Errors
///
/// Returns an error if `OMDB_API_KEY` is not set or the client fails to build.
#[instrument(skip_all)]
fn build_client(config: &AppConfig) -> Result<OmdbClient> {
    let api_key =
        std::env::var("OMDB_API_KEY").context("OMDB_API_KEY environment variable is required")?;

    OmdbClient::builder()
        .base_url(
            config
                .api
                .base_url
                .parse()
                .context("invalid base_url in config")?,
        )
        .api_key(api_key)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build OMDb client")
}

/// Loads config from the resolved path, falling back to defaults.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Runs the `search` subcommand.
///
/// Fetches one list page, enriches every hit with its detail record,
/// applies the rating filter, and prints the result.
///
/// # Errors
///
/// Returns an error if the client fails to build or the search fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_client(&config)?;

    let kind = args
        .kind
        .as_deref()
        .map(str::parse::<TitleKind>)
        .transpose()?;
    let query = SearchQuery {
        text: args
            .query
            .clone()
            .unwrap_or_else(|| config.search.default_query.clone()),
        year: args.year,
        kind,
    };
    let bounds = RatingBounds::from_inputs(
        args.rating_min.as_deref().unwrap_or(""),
        args.rating_max.as_deref().unwrap_or(""),
    );

    if args.page == 0 {
        bail!("page must be 1 or greater");
    }

    let mut session = SearchSession::new(config.search.items_per_page);
    let epoch = session.begin_search();
    let result = client.search(&query.to_params(args.page)).await;

    match session.accept_page(epoch, result) {
        PageOutcome::NoMatches => {
            tracing::info!("No movies found");
            return Ok(());
        }
        PageOutcome::Failed => bail!("search request failed"),
        PageOutcome::NeedDetails { ids } => {
            let fetched = fetch_details(&client, &ids).await;
            session.accept_details(epoch, fetched);
        }
        // A single search is never superseded.
        PageOutcome::Stale => {}
    }

    // Reconcile page state now that the total is known.
    let delta = i32::try_from(args.page).unwrap_or(i32::MAX).saturating_sub(1);
    if !session.page.change_page(delta) {
        bail!(
            "page {} is out of range (only {} page(s) available)",
            args.page,
            session.page.total_pages()
        );
    }

    let summary = session.page.summary();
    let movies = session.assemble(bounds);
    if movies.is_empty() {
        tracing::info!("No movies found");
        return Ok(());
    }

    tracing::info!("ID\t\tRating\tYear\tType\tTitle");
    for movie in &movies {
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}",
            movie.imdb_id,
            movie.rating().map_or_else(|| String::from("-"), |r| r.to_string()),
            movie.year,
            movie.kind,
            movie.title,
        );
    }
    tracing::info!(
        "Page {} of {} ({} result(s) total, {} shown)",
        summary.current_page,
        summary.total_pages,
        session.page.total_results(),
        movies.len(),
    );

    Ok(())
}

/// Runs the `detail` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the fetch fails.
#[instrument(skip_all)]
async fn run_detail(args: &DetailArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_client(&config)?;

    let detail = client
        .title_detail(&args.id, Plot::Full)
        .await
        .context("detail request failed")?;

    tracing::info!("Title: {}", detail.title);
    tracing::info!("Year: {}", detail.year);
    tracing::info!("Type: {}", detail.kind);
    tracing::info!("Rated: {}", detail.rated);
    tracing::info!(
        "Rating: {} ({} votes)",
        detail.imdb_rating,
        detail.imdb_votes
    );
    tracing::info!("Genre: {}", detail.genre);
    tracing::info!("Director: {}", detail.director);
    tracing::info!("Writer: {}", detail.writer);
    tracing::info!("Actors: {}", detail.actors);
    tracing::info!("Runtime: {}", detail.runtime);
    tracing::info!("Released: {}", detail.released);
    tracing::info!(
        "Box Office: {}",
        detail.box_office.as_deref().unwrap_or("-")
    );
    tracing::info!("Awards: {}", detail.awards);
    tracing::info!("Plot: {}", detail.plot);

    Ok(())
}

/// Runs the `browse` subcommand.
///
/// Writes a default config file on first run, then launches the TUI.
///
/// # Errors
///
/// Returns an error if config, the client, or the TUI fails.
#[instrument(skip_all)]
fn run_browse(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load_or_init(&config_path).context("failed to load config")?;
    let client = build_client(&config)?;

    run_browser(&config, client).context("movie browser TUI failed")
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search(args) => run_search(&args, cli.dir.as_ref()).await,
        Commands::Detail(args) => run_detail(&args, cli.dir.as_ref()).await,
        Commands::Browse => run_browse(cli.dir.as_ref()),
    }
}
