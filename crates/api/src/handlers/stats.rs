//! Handler for the top-genre-by-year aggregate.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use moviemania_core::error::CoreError;
use moviemania_db::repositories::StatsRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for `GET /topGenreByYear`.
///
/// `year` stays a string until the handler parses it, so a bad value maps
/// to a parameter error instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct TopGenreParams {
    year: Option<String>,
}

/// GET /api/v1/topGenreByYear?year=YYYY
///
/// The genre with the most movies released in the given calendar year,
/// with its in-window movie count. Ties resolve alphabetically by name.
/// Open to anonymous callers.
pub async fn top_genre_by_year(
    State(state): State<AppState>,
    Query(params): Query<TopGenreParams>,
) -> AppResult<impl IntoResponse> {
    let year = params.year.ok_or_else(|| {
        AppError::Core(CoreError::MissingParameter(
            "Required `year` query parameter".into(),
        ))
    })?;
    let year: i32 = year.parse().map_err(|_| invalid_year())?;

    // Open-interval bounds: strictly after Dec 31 of the previous year and
    // strictly before Jan 1 of the next.
    let after = NaiveDate::from_ymd_opt(year - 1, 12, 31).ok_or_else(invalid_year)?;
    let before = NaiveDate::from_ymd_opt(year + 1, 1, 1).ok_or_else(invalid_year)?;

    let genre = StatsRepo::top_genre(&state.pool, after, before)
        .await?
        .ok_or_else(|| AppError::NotFound("No top genre found".into()))?;

    Ok(Json(genre))
}

fn invalid_year() -> AppError {
    AppError::Core(CoreError::InvalidParameter(
        "Unexpected year, must be 4 digits".into(),
    ))
}
