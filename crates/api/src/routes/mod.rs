pub mod auth;
pub mod genres;
pub mod health;
pub mod movies;
pub mod stats;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register        register (public)
/// /auth/login           login (public)
/// /auth/refresh         refresh (public)
/// /auth/logout          logout (requires auth)
/// /auth/me              current user (requires auth)
///
/// /movies               list (public), create (auth)
/// /movies/{id}          get (public), update, delete (auth)
/// /genres               list (public), create (auth)
/// /genres/{id}          get (public), update, delete (auth)
///
/// /topGenreByYear       top genre for a year (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes.
        .nest("/auth", auth::router())
        // Movie CRUD + genre filtering.
        .nest("/movies", movies::router())
        // Genre CRUD with movie counts.
        .nest("/genres", genres::router())
        // Aggregate queries.
        .merge(stats::router())
}
