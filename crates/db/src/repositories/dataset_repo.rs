//! Transactional bulk load of the normalized dataset into the store.

use std::collections::HashMap;

use chrono::NaiveDate;
use moviemania_core::dataset::Dataset;
use moviemania_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

/// Counts of rows actually created by a load. Reloading the same dataset
/// yields all zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub genres_created: u64,
    pub movies_created: u64,
    pub links_created: u64,
}

/// Loads a parsed dataset into the store, all-or-nothing.
pub struct DatasetRepo;

impl DatasetRepo {
    /// Load a normalized dataset in a single transaction.
    ///
    /// Genres are resolved first (movies need their ids for association
    /// rows) and cached in an in-memory name→id map. Genres and movies
    /// already present in the store are reused, association adds are
    /// idempotent, and any failure rolls back the entire load.
    pub async fn load(pool: &PgPool, dataset: &Dataset) -> Result<LoadSummary, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut summary = LoadSummary::default();

        let mut genre_ids: HashMap<&str, DbId> = HashMap::with_capacity(dataset.genre_names.len());
        for name in &dataset.genre_names {
            let (id, created) = Self::get_or_create_genre(&mut tx, name).await?;
            if created {
                summary.genres_created += 1;
            }
            genre_ids.insert(name.as_str(), id);
        }

        for movie in &dataset.movies {
            let (movie_id, created) =
                Self::get_or_create_movie(&mut tx, &movie.title, movie.release_date).await?;
            if created {
                summary.movies_created += 1;
            }

            for genre in &movie.genres {
                let genre_id = match genre_ids.get(genre.as_str()) {
                    Some(&id) => id,
                    None => {
                        let (id, created) = Self::get_or_create_genre(&mut tx, genre).await?;
                        if created {
                            summary.genres_created += 1;
                        }
                        genre_ids.insert(genre.as_str(), id);
                        id
                    }
                };

                let result = sqlx::query(
                    "INSERT INTO movie_genres (movie_id, genre_id) VALUES ($1, $2) \
                     ON CONFLICT (movie_id, genre_id) DO NOTHING",
                )
                .bind(movie_id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
                summary.links_created += result.rows_affected();
            }
        }

        tx.commit().await?;

        tracing::info!(
            genres_created = summary.genres_created,
            movies_created = summary.movies_created,
            links_created = summary.links_created,
            "Dataset load committed",
        );

        Ok(summary)
    }

    /// Look a genre up by name, creating it if absent. Returns the id and
    /// whether a row was created.
    async fn get_or_create_genre(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<(DbId, bool), sqlx::Error> {
        let existing: Option<DbId> = sqlx::query_scalar("SELECT id FROM genres WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut **tx)
            .await?;
        if let Some(id) = existing {
            return Ok((id, false));
        }

        let id: DbId = sqlx::query_scalar("INSERT INTO genres (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(&mut **tx)
            .await?;
        Ok((id, true))
    }

    /// Look a movie up by (title, release_date), creating it if absent.
    ///
    /// The pair carries no unique constraint (duplicate movies are legal
    /// through the API), so when several rows match, the oldest one wins.
    async fn get_or_create_movie(
        tx: &mut Transaction<'_, Postgres>,
        title: &str,
        release_date: NaiveDate,
    ) -> Result<(DbId, bool), sqlx::Error> {
        let existing: Option<DbId> = sqlx::query_scalar(
            "SELECT id FROM movies WHERE title = $1 AND release_date = $2 ORDER BY id LIMIT 1",
        )
        .bind(title)
        .bind(release_date)
        .fetch_optional(&mut **tx)
        .await?;
        if let Some(id) = existing {
            return Ok((id, false));
        }

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO movies (title, release_date) VALUES ($1, $2) RETURNING id",
        )
        .bind(title)
        .bind(release_date)
        .fetch_one(&mut **tx)
        .await?;
        Ok((id, true))
    }
}
