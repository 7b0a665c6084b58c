//! Movie models and DTOs.

use chrono::NaiveDate;
use moviemania_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `movies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub release_date: NaiveDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Full movie representation served by the API: the row plus its genre set
/// and the derived sequels count.
#[derive(Debug, Clone, Serialize)]
pub struct MovieWithDetails {
    pub id: DbId,
    pub title: String,
    pub release_date: NaiveDate,
    /// Ids of the associated genres, sorted ascending for stable output
    /// (the set itself is unordered).
    pub genres: Vec<DbId>,
    /// Count of movies whose title extends this one's, excluding itself.
    pub sequels_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MovieWithDetails {
    pub fn new(movie: Movie, genres: Vec<DbId>, sequels_count: i64) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            release_date: movie.release_date,
            genres,
            sequels_count,
            created_at: movie.created_at,
            updated_at: movie.updated_at,
        }
    }
}

/// DTO for `POST /movies` and `PUT /movies/{id}` (full-replace semantics:
/// every field is required on update and the genre set is rewritten
/// wholesale).
///
/// The release date arrives as a string so the handler can reject
/// unparsable dates with a validation error instead of a bare
/// deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieInput {
    pub title: String,
    pub release_date: String,
    #[serde(default)]
    pub genres: Vec<DbId>,
}
