//! Repository for the `movies` table and its genre associations.

use std::collections::HashMap;

use chrono::NaiveDate;
use moviemania_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::movie::Movie;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, release_date, created_at, updated_at";

/// Hard cap on page size regardless of what the caller asks for.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A page of movies plus the total number of matching rows.
#[derive(Debug, Clone)]
pub struct MoviePage {
    pub count: i64,
    pub movies: Vec<Movie>,
}

/// Provides CRUD operations for movies and their genre associations.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a new movie and associate it with the given genres.
    ///
    /// Runs in a transaction: either the movie and all of its association
    /// rows are created, or nothing is. Genre ids must already exist (the
    /// handler verifies this; a concurrent delete surfaces as a foreign-key
    /// error).
    pub async fn create(
        pool: &PgPool,
        title: &str,
        release_date: NaiveDate,
        genre_ids: &[DbId],
    ) -> Result<Movie, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO movies (title, release_date) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let movie = sqlx::query_as::<_, Movie>(&query)
            .bind(title)
            .bind(release_date)
            .fetch_one(&mut *tx)
            .await?;

        if !genre_ids.is_empty() {
            Self::add_genres_inner(&mut tx, movie.id, genre_ids).await?;
        }

        tx.commit().await?;
        Ok(movie)
    }

    /// Find a movie by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace a movie's fields and genre set (PUT semantics).
    ///
    /// The existing genre associations are dropped and rewritten inside the
    /// same transaction. Returns `None` if no row with the given `id`
    /// exists.
    pub async fn replace(
        pool: &PgPool,
        id: DbId,
        title: &str,
        release_date: NaiveDate,
        genre_ids: &[DbId],
    ) -> Result<Option<Movie>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE movies SET title = $2, release_date = $3 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let movie = sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(title)
            .bind(release_date)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(movie) = movie else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM movie_genres WHERE movie_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if !genre_ids.is_empty() {
            Self::add_genres_inner(&mut tx, id, genre_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(movie))
    }

    /// Delete a movie by ID. Cascade removes its genre associations.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a page of movies, newest release first, optionally filtered to
    /// those associated with ANY of the given genres (OR semantics; each
    /// matching movie appears once).
    ///
    /// The model's natural ordering is release date ascending; listings
    /// serve it reversed, with `id` as a deterministic tiebreak.
    pub async fn list(
        pool: &PgPool,
        genre_ids: &[DbId],
        limit: i64,
        offset: i64,
    ) -> Result<MoviePage, sqlx::Error> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let offset = offset.max(0);

        if genre_ids.is_empty() {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
                .fetch_one(pool)
                .await?;
            let query = format!(
                "SELECT {COLUMNS} FROM movies \
                 ORDER BY release_date DESC, id \
                 LIMIT $1 OFFSET $2"
            );
            let movies = sqlx::query_as::<_, Movie>(&query)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?;
            Ok(MoviePage { count, movies })
        } else {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(DISTINCT movie_id) FROM movie_genres WHERE genre_id = ANY($1)",
            )
            .bind(genre_ids)
            .fetch_one(pool)
            .await?;
            let query = format!(
                "SELECT {COLUMNS} FROM movies \
                 WHERE id IN (SELECT movie_id FROM movie_genres WHERE genre_id = ANY($1)) \
                 ORDER BY release_date DESC, id \
                 LIMIT $2 OFFSET $3"
            );
            let movies = sqlx::query_as::<_, Movie>(&query)
                .bind(genre_ids)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?;
            Ok(MoviePage { count, movies })
        }
    }

    /// Genre ids associated with each of the given movies, in one query.
    ///
    /// Movies with no genres are absent from the returned map.
    pub async fn genre_ids_for(
        pool: &PgPool,
        movie_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<DbId>>, sqlx::Error> {
        let rows: Vec<(DbId, DbId)> = sqlx::query_as(
            "SELECT movie_id, genre_id FROM movie_genres \
             WHERE movie_id = ANY($1) \
             ORDER BY movie_id, genre_id",
        )
        .bind(movie_ids)
        .fetch_all(pool)
        .await?;

        let mut map: HashMap<DbId, Vec<DbId>> = HashMap::new();
        for (movie_id, genre_id) in rows {
            map.entry(movie_id).or_default().push(genre_id);
        }
        Ok(map)
    }

    /// Derived sequels counts for the given movies, in one query.
    ///
    /// A "sequel" is any movie whose title literally starts with the
    /// movie's own title (case-sensitive); the movie itself is excluded
    /// from its count. Titles are mutable, so counts are computed fresh on
    /// every call and never cached across requests.
    pub async fn sequels_counts(
        pool: &PgPool,
        movie_ids: &[DbId],
    ) -> Result<HashMap<DbId, i64>, sqlx::Error> {
        let rows: Vec<(DbId, i64)> = sqlx::query_as(
            "SELECT m.id, \
                    (SELECT COUNT(*) FROM movies other \
                     WHERE starts_with(other.title, m.title)) - 1 \
             FROM movies m \
             WHERE m.id = ANY($1)",
        )
        .bind(movie_ids)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Insert association rows for a movie inside an open transaction.
    /// Idempotent: an already-present (movie, genre) pair is a no-op.
    async fn add_genres_inner(
        tx: &mut Transaction<'_, Postgres>,
        movie_id: DbId,
        genre_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        for &genre_id in genre_ids {
            sqlx::query(
                "INSERT INTO movie_genres (movie_id, genre_id) VALUES ($1, $2) \
                 ON CONFLICT (movie_id, genre_id) DO NOTHING",
            )
            .bind(movie_id)
            .bind(genre_id)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}
