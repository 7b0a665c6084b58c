//! Handlers for the `/genres` resource.
//!
//! Genre representations always carry `movie_count`, annotated into the
//! read queries. Reads are anonymous; mutations require [`AuthUser`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use moviemania_core::error::CoreError;
use moviemania_core::types::DbId;
use moviemania_db::models::genre::{GenreInput, GenreWithMovieCount};
use moviemania_db::repositories::GenreRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::Page;
use crate::state::AppState;

/// Maximum genre name length in characters, matching the database check.
const MAX_NAME_LENGTH: usize = 255;

/// GET /api/v1/genres
///
/// List genres ordered by name, each with its movie count.
pub async fn list_genres(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.unwrap_or(state.config.page_size);
    let offset = params.offset.unwrap_or(0);

    let page = GenreRepo::list(&state.pool, limit, offset).await?;

    Ok(Json(Page {
        count: page.count,
        results: page.genres,
    }))
}

/// GET /api/v1/genres/{id}
pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let genre = find_annotated(&state, id).await?;

    Ok(Json(genre))
}

/// POST /api/v1/genres
///
/// A duplicate name maps to 409 via the unique-constraint classifier.
pub async fn create_genre(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<GenreInput>,
) -> AppResult<impl IntoResponse> {
    let name = validate_genre_name(&input)?;

    let genre = GenreRepo::create(&state.pool, name).await?;

    tracing::info!(genre_id = genre.id, user_id = auth.user_id, "Genre created");

    // A freshly created genre necessarily has no movies yet.
    let genre = GenreWithMovieCount {
        id: genre.id,
        name: genre.name,
        movie_count: 0,
        created_at: genre.created_at,
        updated_at: genre.updated_at,
    };

    Ok((StatusCode::CREATED, Json(genre)))
}

/// PUT /api/v1/genres/{id}
///
/// Full replace of the single mutable field, `name`.
pub async fn update_genre(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<GenreInput>,
) -> AppResult<impl IntoResponse> {
    let name = validate_genre_name(&input)?;

    GenreRepo::replace(&state.pool, id, name)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Genre",
            id,
        }))?;

    tracing::info!(genre_id = id, user_id = auth.user_id, "Genre updated");

    let genre = find_annotated(&state, id).await?;

    Ok(Json(genre))
}

/// DELETE /api/v1/genres/{id}
///
/// Cascade removes the genre's movie associations.
pub async fn delete_genre(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = GenreRepo::delete(&state.pool, id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Genre",
            id,
        }));
    }

    tracing::info!(genre_id = id, user_id = auth.user_id, "Genre deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_genre_name(input: &GenreInput) -> Result<&str, AppError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name must not be empty".into(),
        )));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::Core(CoreError::Validation(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        ))));
    }
    Ok(name)
}

async fn find_annotated(state: &AppState, id: DbId) -> AppResult<GenreWithMovieCount> {
    GenreRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Genre",
            id,
        }))
}
