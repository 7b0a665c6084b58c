//! Repository for the `genres` table.

use moviemania_core::types::DbId;
use sqlx::PgPool;

use crate::models::genre::{Genre, GenreWithMovieCount};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Columns plus the movie-count annotation used by read queries.
const ANNOTATED_COLUMNS: &str = "id, name, \
    (SELECT COUNT(*) FROM movie_genres mg WHERE mg.genre_id = genres.id) AS movie_count, \
    created_at, updated_at";

/// Hard cap on page size regardless of what the caller asks for.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A page of genres plus the total number of rows.
#[derive(Debug, Clone)]
pub struct GenrePage {
    pub count: i64,
    pub genres: Vec<GenreWithMovieCount>,
}

/// Provides CRUD operations for genres.
pub struct GenreRepo;

impl GenreRepo {
    /// Insert a new genre, returning the created row.
    ///
    /// A duplicate name violates `uq_genres_name` and surfaces as a
    /// database error for the caller to classify.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Genre, sqlx::Error> {
        let query = format!("INSERT INTO genres (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Genre>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Find a genre by ID, annotated with its movie count.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<GenreWithMovieCount>, sqlx::Error> {
        let query = format!("SELECT {ANNOTATED_COLUMNS} FROM genres WHERE id = $1");
        sqlx::query_as::<_, GenreWithMovieCount>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Which of the given ids exist, in one query.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM genres WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List a page of genres ordered by name, annotated with movie counts,
    /// plus the total row count.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<GenrePage, sqlx::Error> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let offset = offset.max(0);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(pool)
            .await?;
        let query = format!(
            "SELECT {ANNOTATED_COLUMNS} FROM genres \
             ORDER BY name \
             LIMIT $1 OFFSET $2"
        );
        let genres = sqlx::query_as::<_, GenreWithMovieCount>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(GenrePage { count, genres })
    }

    /// Replace a genre's name (PUT semantics).
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn replace(
        pool: &PgPool,
        id: DbId,
        name: &str,
    ) -> Result<Option<Genre>, sqlx::Error> {
        let query = format!("UPDATE genres SET name = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Genre>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a genre by ID. Cascade removes its movie associations.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
