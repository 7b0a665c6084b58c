//! Route definitions for aggregate queries.

use axum::routing::get;
use axum::Router;

use crate::handlers::stats;
use crate::state::AppState;

/// Aggregate routes merged directly into the `/api/v1` tree.
///
/// ```text
/// GET /topGenreByYear?year=YYYY -> top_genre_by_year (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/topGenreByYear", get(stats::top_genre_by_year))
}
