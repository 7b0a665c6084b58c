//! Read-only aggregate queries spanning movies and genres.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::genre::GenreWithMovieCount;

/// Provides derived-value queries that never mutate the store.
pub struct StatsRepo;

impl StatsRepo {
    /// The genre with the most movies released strictly inside the open
    /// interval `(after, before)`. Ties resolve alphabetically by name.
    ///
    /// `movie_count` on the returned genre is the count within the window,
    /// not the genre's all-time total. Returns `None` when no movie falls
    /// in the window.
    pub async fn top_genre(
        pool: &PgPool,
        after: NaiveDate,
        before: NaiveDate,
    ) -> Result<Option<GenreWithMovieCount>, sqlx::Error> {
        sqlx::query_as::<_, GenreWithMovieCount>(
            "SELECT g.id, g.name, COUNT(*) AS movie_count, g.created_at, g.updated_at \
             FROM genres g \
             JOIN movie_genres mg ON mg.genre_id = g.id \
             JOIN movies m ON m.id = mg.movie_id \
             WHERE m.release_date > $1 AND m.release_date < $2 \
             GROUP BY g.id, g.name, g.created_at, g.updated_at \
             ORDER BY movie_count DESC, g.name \
             LIMIT 1",
        )
        .bind(after)
        .bind(before)
        .fetch_optional(pool)
        .await
    }
}
