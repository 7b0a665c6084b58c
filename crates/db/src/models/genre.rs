//! Genre models and DTOs.

use moviemania_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `genres` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Genre {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Genre enriched with its associated-movie count, as served by every read
/// endpoint. The count is annotated into the query itself rather than
/// fetched in a second round trip.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GenreWithMovieCount {
    pub id: DbId,
    pub name: String,
    pub movie_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /genres` and `PUT /genres/{id}` (full replace).
#[derive(Debug, Clone, Deserialize)]
pub struct GenreInput {
    pub name: String,
}
