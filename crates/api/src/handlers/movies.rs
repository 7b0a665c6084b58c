//! Handlers for the `/movies` resource.
//!
//! Reads are open to anonymous callers; every mutation requires a valid
//! access token via [`AuthUser`]. Movie representations carry the genre id
//! set and the derived `sequels_count`, both assembled fresh per request.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use moviemania_core::error::CoreError;
use moviemania_core::types::DbId;
use moviemania_db::models::movie::{Movie, MovieInput, MovieWithDetails};
use moviemania_db::repositories::{GenreRepo, MovieRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::Page;
use crate::state::AppState;

/// Accepted format for `release_date` fields (ISO 8601 calendar date).
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Maximum title length in characters, matching the database check.
const MAX_TITLE_LENGTH: usize = 255;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/movies
///
/// List movies, newest release first. `?genres=1&genres=2` filters to
/// movies in ANY of the given genres (OR semantics, each match once).
pub async fn list_movies(
    State(state): State<AppState>,
    Query(raw): Query<Vec<(String, String)>>,
) -> AppResult<impl IntoResponse> {
    let params = MovieListParams::from_pairs(&raw)?;
    let limit = params.limit.unwrap_or(state.config.page_size);
    let offset = params.offset.unwrap_or(0);

    let page = MovieRepo::list(&state.pool, &params.genres, limit, offset).await?;
    let results = with_details(&state, page.movies).await?;

    Ok(Json(Page {
        count: page.count,
        results,
    }))
}

/// GET /api/v1/movies/{id}
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let movie = MovieRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id,
        }))?;

    let detail = single_detail(&state, movie).await?;

    Ok(Json(detail))
}

/// POST /api/v1/movies
pub async fn create_movie(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<MovieInput>,
) -> AppResult<impl IntoResponse> {
    let (title, release_date) = validate_movie_input(&input)?;
    check_genres_exist(&state, &input.genres).await?;

    let movie = MovieRepo::create(&state.pool, title, release_date, &input.genres).await?;

    tracing::info!(movie_id = movie.id, user_id = auth.user_id, "Movie created");

    let detail = single_detail(&state, movie).await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// PUT /api/v1/movies/{id}
///
/// Full replace: title, release date, and the complete genre set.
pub async fn update_movie(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<MovieInput>,
) -> AppResult<impl IntoResponse> {
    let (title, release_date) = validate_movie_input(&input)?;
    check_genres_exist(&state, &input.genres).await?;

    let movie = MovieRepo::replace(&state.pool, id, title, release_date, &input.genres)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id,
        }))?;

    tracing::info!(movie_id = id, user_id = auth.user_id, "Movie updated");

    let detail = single_detail(&state, movie).await?;

    Ok(Json(detail))
}

/// DELETE /api/v1/movies/{id}
pub async fn delete_movie(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = MovieRepo::delete(&state.pool, id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id,
        }));
    }

    tracing::info!(movie_id = id, user_id = auth.user_id, "Movie deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Query parameters for `GET /movies`, parsed from the raw pair list
/// because `genres` may repeat. Unknown keys are ignored.
#[derive(Debug, Default, PartialEq)]
struct MovieListParams {
    genres: Vec<DbId>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl MovieListParams {
    fn from_pairs(pairs: &[(String, String)]) -> Result<Self, AppError> {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "genres" => params.genres.push(parse_int_param("genres", value)?),
                "limit" => params.limit = Some(parse_int_param("limit", value)?),
                "offset" => params.offset = Some(parse_int_param("offset", value)?),
                _ => {}
            }
        }
        Ok(params)
    }
}

fn parse_int_param(name: &str, value: &str) -> Result<i64, AppError> {
    value.parse().map_err(|_| {
        AppError::Core(CoreError::InvalidParameter(format!(
            "Unexpected `{name}` value '{value}', must be an integer"
        )))
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate title bounds and parse the release date.
fn validate_movie_input(input: &MovieInput) -> Result<(&str, NaiveDate), AppError> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "title must not be empty".into(),
        )));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::Core(CoreError::Validation(format!(
            "title must be at most {MAX_TITLE_LENGTH} characters"
        ))));
    }

    let release_date =
        NaiveDate::parse_from_str(&input.release_date, DATE_FORMAT).map_err(|_| {
            AppError::Core(CoreError::Validation(format!(
                "Date has wrong format: '{}'. Use this format instead: YYYY-MM-DD",
                input.release_date
            )))
        })?;

    Ok((title, release_date))
}

/// Every referenced genre must exist; report the first missing id.
async fn check_genres_exist(state: &AppState, genre_ids: &[DbId]) -> AppResult<()> {
    if genre_ids.is_empty() {
        return Ok(());
    }
    let existing = GenreRepo::existing_ids(&state.pool, genre_ids).await?;
    if let Some(&missing) = genre_ids.iter().find(|id| !existing.contains(id)) {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Genre",
            id: missing,
        }));
    }
    Ok(())
}

/// Assemble the full representation for a single movie.
async fn single_detail(state: &AppState, movie: Movie) -> AppResult<MovieWithDetails> {
    let ids = [movie.id];
    let genre_ids = MovieRepo::genre_ids_for(&state.pool, &ids)
        .await?
        .remove(&movie.id)
        .unwrap_or_default();
    let sequels_count = MovieRepo::sequels_counts(&state.pool, &ids)
        .await?
        .get(&movie.id)
        .copied()
        .unwrap_or(0);
    Ok(MovieWithDetails::new(movie, genre_ids, sequels_count))
}

/// Assemble full representations for a page of movies: genre ids and
/// sequels counts are fetched in one query each.
async fn with_details(state: &AppState, movies: Vec<Movie>) -> AppResult<Vec<MovieWithDetails>> {
    if movies.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<DbId> = movies.iter().map(|m| m.id).collect();
    let mut genres = MovieRepo::genre_ids_for(&state.pool, &ids).await?;
    let sequels = MovieRepo::sequels_counts(&state.pool, &ids).await?;

    Ok(movies
        .into_iter()
        .map(|movie| {
            let genre_ids = genres.remove(&movie.id).unwrap_or_default();
            let sequels_count = sequels.get(&movie.id).copied().unwrap_or(0);
            MovieWithDetails::new(movie, genre_ids, sequels_count)
        })
        .collect())
}
