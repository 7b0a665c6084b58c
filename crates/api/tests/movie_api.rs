//! HTTP-level integration tests for the `/movies` endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use moviemania_db::repositories::GenreRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_movie_returns_201_with_details(pool: PgPool) {
    let genre = GenreRepo::create(&pool, "Test Movie Genre").await.unwrap();
    let token = common::auth_token(&pool).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/movies",
        Some(&token),
        serde_json::json!({
            "title": "Hydrogen",
            "release_date": "2006-01-01",
            "genres": [genre.id],
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Hydrogen");
    assert_eq!(json["release_date"], "2006-01-01");
    assert_eq!(json["genres"], serde_json::json!([genre.id]));
    assert_eq!(json["sequels_count"], 0);
    assert!(json["id"].is_number());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_anonymous_create_movie_returns_403(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/movies",
        None,
        serde_json::json!({"title": "Hydrogen", "release_date": "2006-01-01"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_movie_with_bad_date_returns_400(pool: PgPool) {
    let token = common::auth_token(&pool).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/movies",
        Some(&token),
        serde_json::json!({"title": "Hydrogen", "release_date": "01/01/2006"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_movie_with_unknown_genre_returns_404(pool: PgPool) {
    let token = common::auth_token(&pool).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/movies",
        Some(&token),
        serde_json::json!({
            "title": "Hydrogen",
            "release_date": "2006-01-01",
            "genres": [999999],
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_anonymous_get_movie(pool: PgPool) {
    let token = common::auth_token(&pool).await;

    let app = common::build_test_app(pool.clone());
    let create_resp = post_json(
        app,
        "/api/v1/movies",
        Some(&token),
        serde_json::json!({"title": "Hydrogen", "release_date": "2006-01-01"}),
    )
    .await;
    let created = body_json(create_resp).await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/movies/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["title"], "Hydrogen");
    assert_eq!(json["release_date"], "2006-01-01");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_nonexistent_movie_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/movies/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sequels_count_for_the_godfather_trilogy(pool: PgPool) {
    let token = common::auth_token(&pool).await;
    let titles = [
        "The Godfather",
        "The Godfather Part II",
        "The Godfather Part III",
    ];

    let mut ids = Vec::new();
    for title in titles {
        let app = common::build_test_app(pool.clone());
        let response = post_json(
            app,
            "/api/v1/movies",
            Some(&token),
            serde_json::json!({"title": title, "release_date": "2006-01-01"}),
        )
        .await;
        let json = body_json(response).await;
        ids.push(json["id"].as_i64().unwrap());
    }

    for (id, expected) in ids.iter().zip([2, 1, 0]) {
        let app = common::build_test_app(pool.clone());
        let response = get(app, &format!("/api/v1/movies/{id}")).await;
        let json = body_json(response).await;
        assert_eq!(json["sequels_count"], expected);
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_put_movie_replaces_fields_and_genres(pool: PgPool) {
    let old_genre = GenreRepo::create(&pool, "Old Genre").await.unwrap();
    let new_genre = GenreRepo::create(&pool, "New Genre").await.unwrap();
    let token = common::auth_token(&pool).await;

    let app = common::build_test_app(pool.clone());
    let create_resp = post_json(
        app,
        "/api/v1/movies",
        Some(&token),
        serde_json::json!({
            "title": "Original Title",
            "release_date": "2006-01-01",
            "genres": [old_genre.id],
        }),
    )
    .await;
    let id = body_json(create_resp).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/movies/{id}"),
        Some(&token),
        serde_json::json!({
            "title": "Updated Title",
            "release_date": "1970-01-01",
            "genres": [new_genre.id],
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Updated Title");
    assert_eq!(json["release_date"], "1970-01-01");
    assert_eq!(json["genres"], serde_json::json!([new_genre.id]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_anonymous_put_movie_returns_403(pool: PgPool) {
    let token = common::auth_token(&pool).await;

    let app = common::build_test_app(pool.clone());
    let create_resp = post_json(
        app,
        "/api/v1/movies",
        Some(&token),
        serde_json::json!({"title": "Hydrogen", "release_date": "2006-01-01"}),
    )
    .await;
    let id = body_json(create_resp).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/movies/{id}"),
        None,
        serde_json::json!({"title": "Updated", "release_date": "1970-01-01"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_movie_returns_204_then_404(pool: PgPool) {
    let token = common::auth_token(&pool).await;

    let app = common::build_test_app(pool.clone());
    let create_resp = post_json(
        app,
        "/api/v1/movies",
        Some(&token),
        serde_json::json!({"title": "Delete Me", "release_date": "2006-01-01"}),
    )
    .await;
    let id = body_json(create_resp).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/movies/{id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/movies/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/v1/movies/{id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_anonymous_delete_movie_returns_403(pool: PgPool) {
    let token = common::auth_token(&pool).await;

    let app = common::build_test_app(pool.clone());
    let create_resp = post_json(
        app,
        "/api/v1/movies",
        Some(&token),
        serde_json::json!({"title": "Hydrogen", "release_date": "2006-01-01"}),
    )
    .await;
    let id = body_json(create_resp).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/v1/movies/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// List & filter
// ---------------------------------------------------------------------------

/// Six movies split 3/3 between two genres. Returns (genre_a, genre_b).
async fn seed_six_movies(pool: &PgPool, token: &str) -> (i64, i64) {
    let a = GenreRepo::create(pool, "Genre A").await.unwrap();
    let b = GenreRepo::create(pool, "Genre B").await.unwrap();

    let titles = ["Helium", "Neon", "Argon", "Krypton", "Xenon", "Radon"];
    for (idx, title) in titles.iter().enumerate() {
        let genre = if idx % 2 > 0 { a.id } else { b.id };
        let app = common::build_test_app(pool.clone());
        post_json(
            app,
            "/api/v1/movies",
            Some(token),
            serde_json::json!({"title": title, "release_date": "2006-01-01", "genres": [genre]}),
        )
        .await;
    }

    (a.id, b.id)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_anonymous_list_movies(pool: PgPool) {
    let token = common::auth_token(&pool).await;
    seed_six_movies(&pool, &token).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/movies").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["count"], 6);
    assert_eq!(json["results"].as_array().unwrap().len(), 6);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_genre_filter_uses_or_semantics(pool: PgPool) {
    let token = common::auth_token(&pool).await;
    let (a, b) = seed_six_movies(&pool, &token).await;

    // Single genre: half the movies.
    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/movies?genres={a}")).await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 3);

    // Both genres: the union, each movie once.
    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/movies?genres={a}&genres={b}")).await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 6);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_numeric_genre_filter_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/movies?genres=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_PARAMETER");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_movies_paginates(pool: PgPool) {
    let token = common::auth_token(&pool).await;
    seed_six_movies(&pool, &token).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/movies?limit=2&offset=4").await;
    let json = body_json(response).await;

    assert_eq!(json["count"], 6);
    assert_eq!(json["results"].as_array().unwrap().len(), 2);
}
