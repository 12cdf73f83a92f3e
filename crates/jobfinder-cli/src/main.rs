use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use url::Url;

use jobfinder_client::{DomExtractor, PatternExtractor, RendererClient, RendererConfig};
use jobfinder_core::models::QueryResult;
use jobfinder_core::traits::{CacheStore, Extractor, Renderer};
use jobfinder_core::{NullCache, QueryConfig, QueryService};
use jobfinder_db::{CacheRepository, Database, DatabaseConfig};

#[derive(Parser)]
#[command(name = "jobfinder", version, about = "Search rendered job listings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the listings page and print the result as JSON
    Search {
        /// Search term (defaults to the configured term when blank)
        #[arg(short, long, default_value = "")]
        term: String,

        /// Skip the cache lookup and render again
        #[arg(short, long, default_value_t = false)]
        refresh: bool,

        /// Keep only jobs whose title or location contains the term
        #[arg(long, default_value_t = false)]
        filter: bool,

        /// Use the DOM extractor instead of the pattern extractor
        #[arg(long, default_value_t = false)]
        dom: bool,

        /// Cache results in PostgreSQL (requires DATABASE_URL)
        #[arg(long, default_value_t = false)]
        use_db: bool,
    },

    /// Extract job records from a saved HTML file
    Extract {
        /// Path to the rendered HTML
        #[arg(short, long)]
        file: PathBuf,

        /// Use the DOM extractor instead of the pattern extractor
        #[arg(long, default_value_t = false)]
        dom: bool,

        /// Base URL for resolving relative links
        #[arg(long)]
        base_url: Option<Url>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays pipeable JSON.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("jobfinder=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            term,
            refresh,
            filter,
            dom,
            use_db,
        } => {
            let mut config = QueryConfig::from_env()?;
            config.filter_results |= filter;

            let renderer = RendererClient::new(&RendererConfig::from_env()?)
                .context("Failed to create renderer client")?;
            let repo = if use_db {
                Some(connect_db().await?)
            } else {
                None
            };

            let cancel = CancellationToken::new();
            spawn_ctrl_c(cancel.clone());

            let base_url = config.listing_url.clone();
            let result = if dom {
                let extractor = DomExtractor::default().with_base_url(base_url);
                cmd_search(renderer, extractor, repo, config, &term, refresh, &cancel).await?
            } else {
                let extractor = PatternExtractor::default().with_base_url(base_url);
                cmd_search(renderer, extractor, repo, config, &term, refresh, &cancel).await?
            };

            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Extract {
            file,
            dom,
            base_url,
        } => {
            let jobs = if dom {
                let mut extractor = DomExtractor::default();
                if let Some(base) = base_url {
                    extractor = extractor.with_base_url(base);
                }
                cmd_extract(&file, &extractor)?
            } else {
                let mut extractor = PatternExtractor::default();
                if let Some(base) = base_url {
                    extractor = extractor.with_base_url(base);
                }
                cmd_extract(&file, &extractor)?
            };

            println!("{}", serde_json::to_string_pretty(&jobs)?);
        }
    }

    Ok(())
}

/// Connect to PostgreSQL using DATABASE_URL and apply migrations.
async fn connect_db() -> Result<CacheRepository> {
    let config = DatabaseConfig::from_env()
        .context("DATABASE_URL not set. Required for --use-db.")?;
    let db = Database::connect(&config)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await?;
    Ok(db.cache_repo())
}

fn spawn_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling query");
            cancel.cancel();
        }
    });
}

async fn cmd_search<R, E>(
    renderer: R,
    extractor: E,
    repo: Option<CacheRepository>,
    config: QueryConfig,
    term: &str,
    refresh: bool,
    cancel: &CancellationToken,
) -> Result<QueryResult>
where
    R: Renderer,
    E: Extractor,
{
    match repo {
        Some(repo) => run_query(renderer, extractor, repo, config, term, refresh, cancel).await,
        None => run_query(renderer, extractor, NullCache, config, term, refresh, cancel).await,
    }
}

async fn run_query<R, E, C>(
    renderer: R,
    extractor: E,
    cache: C,
    config: QueryConfig,
    term: &str,
    refresh: bool,
    cancel: &CancellationToken,
) -> Result<QueryResult>
where
    R: Renderer,
    E: Extractor,
    C: CacheStore,
{
    let service = QueryService::new(renderer, extractor, cache, config);
    let result = service.query_with_cancel(term, refresh, cancel).await?;

    tracing::info!(
        term = %result.term(),
        count = result.count(),
        cached = result.is_cached(),
        "Search complete"
    );

    Ok(result)
}

fn cmd_extract<E: Extractor>(
    path: &Path,
    extractor: &E,
) -> Result<Vec<jobfinder_core::JobRecord>> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read HTML file: {}", path.display()))?;

    let jobs = extractor.extract(&html);
    tracing::info!(bytes = html.len(), count = jobs.len(), "Extracted jobs");

    Ok(jobs)
}
