//! One-shot loader for the denormalized movies/genres TSV dataset.
//!
//! ```text
//! moviemania-loader <path/to/movies_genres.tsv>
//! ```
//!
//! Parses and normalizes the whole file up front, then loads it in a
//! single database transaction. Re-running against the same file creates
//! nothing new.

use std::path::PathBuf;

use anyhow::{bail, Context};
use moviemania_core::dataset;
use moviemania_db::repositories::DatasetRepo;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moviemania_loader=info,moviemania_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        bail!("usage: moviemania-loader <path/to/movies_genres.tsv>");
    };

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read dataset file {}", path.display()))?;

    let dataset = dataset::parse_dataset(&contents).context("invalid dataset")?;
    tracing::info!(
        genres = dataset.genre_names.len(),
        movies = dataset.movies.len(),
        "Dataset parsed",
    );

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = moviemania_db::create_pool(&database_url)
        .await
        .context("failed to connect to database")?;
    moviemania_db::run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    let summary = DatasetRepo::load(&pool, &dataset)
        .await
        .context("dataset load failed; no changes were committed")?;

    tracing::info!(
        genres_created = summary.genres_created,
        movies_created = summary.movies_created,
        links_created = summary.links_created,
        "Dataset loaded",
    );

    Ok(())
}
