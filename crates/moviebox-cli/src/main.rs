//! moviebox - TMDB movie browser for the terminal.

/// Application configuration (TOML).
mod config;
/// Per-request fetch state machine.
mod fetch;
/// Terminal UI components.
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;

use crate::config::resolve_api_key;
use crate::tui::state::Route;
use moviebox_api::tmdb::{
    DiscoverFilter, LocalMovieDb, MovieListPage, SizeTier, SortBy, TmdbClient, image_url_opt,
};

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
    /// List popular movies.
    Popular(PageArgs),
    /// List top-rated movies.
    TopRated(PageArgs),
    /// List upcoming releases.
    Upcoming(PageArgs),
    /// Search movies by text.
    Search(SearchArgs),
    /// Show details for one movie.
    Details(DetailsArgs),
    /// List movie genres.
    Genres,
    /// Discover movies with filters.
    Discover(DiscoverArgs),
    /// Browse interactively in the terminal.
    Browse(BrowseArgs),
}

/// Page selection shared by the list subcommands.
#[derive(clap::Args)]
struct PageArgs {
    /// Page number (1-based).
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "blade runner").
    #[arg(long, required = true)]
    query: String,

    /// Page number (1-based).
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
}

/// Arguments for the `discover` subcommand.
#[derive(clap::Args)]
struct DiscoverArgs {
    /// Restrict to a genre ID (see `genres`).
    #[arg(long)]
    genre: Option<u32>,

    /// Restrict to a primary release year.
    #[arg(long)]
    year: Option<u32>,

    /// Sort specifier (e.g. "popularity.desc", "vote_average.asc").
    #[arg(long, default_value = "popularity.desc")]
    sort: String,

    /// Page number (1-based).
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Open scoped to a genre ID instead of the home view.
    #[arg(long)]
    genre: Option<u32>,
}

/// Builds a `TmdbClient` from the resolved API key.
///
/// # Errors
///
/// Returns an error if no key is configured or the client fails to build.
#[instrument(skip_all)]
fn build_client(dir: Option<&PathBuf>) -> Result<TmdbClient> {
    let api_key = resolve_api_key(dir)?;

    TmdbClient::builder()
        .api_key(api_key)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build TMDB client")
}

/// Prints a movie list envelope as a table.
fn print_movie_page(page: &MovieListPage) {
    tracing::info!(
        "Page {}/{} ({} results)",
        page.page,
        page.clamped_total_pages(),
        page.total_results,
    );
    tracing::info!("ID\tTitle\t\t\tYear\tRating\tVotes");
    for movie in &page.results {
        tracing::info!(
            "{}\t{}\t{}\t{:.1}\t{}",
            movie.id,
            movie.title,
            movie.release_year().unwrap_or("-"),
            movie.vote_average,
            movie.vote_count,
        );
    }
    if page.results.is_empty() {
        tracing::info!("No movies found");
    }
}

/// Runs the `popular` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_popular(args: &PageArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_client(dir)?;
    let page = client
        .popular(args.page)
        .await
        .context("TMDB popular movies request failed")?;
    print_movie_page(&page);
    Ok(())
}

/// Runs the `top-rated` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_top_rated(args: &PageArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_client(dir)?;
    let page = client
        .top_rated(args.page)
        .await
        .context("TMDB top rated movies request failed")?;
    print_movie_page(&page);
    Ok(())
}

/// Runs the `upcoming` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_upcoming(args: &PageArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_client(dir)?;
    let page = client
        .upcoming(args.page)
        .await
        .context("TMDB upcoming movies request failed")?;
    print_movie_page(&page);
    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_client(dir)?;
    let page = client
        .search(&args.query, args.page)
        .await
        .context("TMDB search request failed")?;

    tracing::info!("Found {} results for \"{}\"", page.total_results, args.query);
    print_movie_page(&page);
    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or an API request fails.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_client(dir)?;
    let details = client
        .movie_details(args.id)
        .await
        .context("TMDB movie details request failed")?;

    tracing::info!("Title: {}", details.title);
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        tracing::info!("Tagline: {tagline}");
    }
    tracing::info!(
        "Released: {}",
        details.release_date.as_deref().unwrap_or("-")
    );
    tracing::info!(
        "Runtime: {}",
        details
            .formatted_runtime()
            .unwrap_or_else(|| String::from("N/A"))
    );
    tracing::info!(
        "Genres: {}",
        details
            .genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    tracing::info!(
        "Rating: {:.1} ({} votes)",
        details.vote_average,
        details.vote_count
    );
    if let Some(overview) = details.overview.as_deref() {
        tracing::info!("Overview: {overview}");
    }
    for member in details.cast().iter().take(5) {
        tracing::info!("  {} as {}", member.name, member.character);
    }
    if let Some(trailer) = details.trailer() {
        tracing::info!("Trailer: https://www.youtube.com/watch?v={}", trailer.key);
    }
    if let Some(poster) = image_url_opt(details.poster_path.as_deref(), SizeTier::Large) {
        tracing::info!("Poster: {poster}");
    }

    let recommendations = client
        .recommendations(args.id, 1)
        .await
        .context("TMDB recommendations request failed")?;
    if !recommendations.results.is_empty() {
        tracing::info!("---");
        tracing::info!("Recommended:");
        for movie in recommendations.results.iter().take(5) {
            tracing::info!(
                "  {}\t{} ({})",
                movie.id,
                movie.title,
                movie.release_year().unwrap_or("-"),
            );
        }
    }

    Ok(())
}

/// Runs the `genres` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_genres(dir: Option<&PathBuf>) -> Result<()> {
    let client = build_client(dir)?;
    let genres = client
        .genres()
        .await
        .context("TMDB genre list request failed")?;

    tracing::info!("ID\tName");
    for genre in &genres {
        tracing::info!("{}\t{}", genre.id, genre.name);
    }
    tracing::info!("Total: {} genres", genres.len());

    Ok(())
}

/// Runs the `discover` subcommand.
///
/// # Errors
///
/// Returns an error if the sort specifier is invalid, the client fails
/// to build, or the API request fails.
#[instrument(skip_all)]
async fn run_discover(args: &DiscoverArgs, dir: Option<&PathBuf>) -> Result<()> {
    // Validate the sort specifier before touching config or network.
    let sort_by: SortBy = args
        .sort
        .parse()
        .with_context(|| format!("invalid --sort value: {}", args.sort))?;

    let client = build_client(dir)?;

    let mut filter = DiscoverFilter::new().sort_by(sort_by);
    if let Some(genre) = args.genre {
        filter = filter.genre(genre);
    }
    if let Some(year) = args.year {
        filter = filter.year(year);
    }

    let page = client
        .discover(&filter, args.page)
        .await
        .context("TMDB discover request failed")?;
    print_movie_page(&page);
    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the TUI fails.
#[instrument(skip_all)]
fn run_browse(args: &BrowseArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_client(dir)?;
    let initial_route = args.genre.map_or(Route::Home, Route::Genre);
    tui::run_browser(client, initial_route).context("movie browser TUI failed")
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Popular(args) => run_popular(&args, cli.dir.as_ref()).await,
        Commands::TopRated(args) => run_top_rated(&args, cli.dir.as_ref()).await,
        Commands::Upcoming(args) => run_upcoming(&args, cli.dir.as_ref()).await,
        Commands::Search(args) => run_search(&args, cli.dir.as_ref()).await,
        Commands::Details(args) => run_details(&args, cli.dir.as_ref()).await,
        Commands::Genres => run_genres(cli.dir.as_ref()).await,
        Commands::Discover(args) => run_discover(&args, cli.dir.as_ref()).await,
        Commands::Browse(args) => run_browse(&args, cli.dir.as_ref()),
    }
}
