//! HTTP-level integration tests for the `/genres` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_genre_returns_201(pool: PgPool) {
    let token = common::auth_token(&pool).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/genres",
        Some(&token),
        serde_json::json!({"name": "Test Genre"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Test Genre");
    assert_eq!(json["movie_count"], 0);
    assert!(json["id"].is_number());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_anonymous_create_genre_returns_403(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/genres",
        None,
        serde_json::json!({"name": "Test Genre"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_genre_name_returns_409(pool: PgPool) {
    let token = common::auth_token(&pool).await;

    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/genres",
        Some(&token),
        serde_json::json!({"name": "Drama"}),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/genres",
        Some(&token),
        serde_json::json!({"name": "Drama"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_genre_name_returns_400(pool: PgPool) {
    let token = common::auth_token(&pool).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/genres",
        Some(&token),
        serde_json::json!({"name": "   "}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_anonymous_get_genre_includes_movie_count(pool: PgPool) {
    let token = common::auth_token(&pool).await;

    let app = common::build_test_app(pool.clone());
    let create_resp = post_json(
        app,
        "/api/v1/genres",
        Some(&token),
        serde_json::json!({"name": "Test Genre"}),
    )
    .await;
    let genre_id = body_json(create_resp).await["id"].as_i64().unwrap();

    // Three of six movies carry the genre.
    let titles = ["Helium", "Neon", "Argon", "Krypton", "Xenon", "Radon"];
    for (idx, title) in titles.iter().enumerate() {
        let genres = if idx % 2 > 0 {
            serde_json::json!([genre_id])
        } else {
            serde_json::json!([])
        };
        let app = common::build_test_app(pool.clone());
        post_json(
            app,
            "/api/v1/movies",
            Some(&token),
            serde_json::json!({"title": title, "release_date": "2006-01-01", "genres": genres}),
        )
        .await;
    }

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/genres/{genre_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["name"], "Test Genre");
    assert_eq!(json["movie_count"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_nonexistent_genre_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/genres/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_put_genre_replaces_name(pool: PgPool) {
    let token = common::auth_token(&pool).await;

    let app = common::build_test_app(pool.clone());
    let create_resp = post_json(
        app,
        "/api/v1/genres",
        Some(&token),
        serde_json::json!({"name": "Test Genre"}),
    )
    .await;
    let id = body_json(create_resp).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/genres/{id}"),
        Some(&token),
        serde_json::json!({"name": "Updated Genre"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Updated Genre");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_anonymous_put_genre_returns_403(pool: PgPool) {
    let token = common::auth_token(&pool).await;

    let app = common::build_test_app(pool.clone());
    let create_resp = post_json(
        app,
        "/api/v1/genres",
        Some(&token),
        serde_json::json!({"name": "Test Genre"}),
    )
    .await;
    let id = body_json(create_resp).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/genres/{id}"),
        None,
        serde_json::json!({"name": "Updated Genre"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_genre_returns_204_then_404(pool: PgPool) {
    let token = common::auth_token(&pool).await;

    let app = common::build_test_app(pool.clone());
    let create_resp = post_json(
        app,
        "/api/v1/genres",
        Some(&token),
        serde_json::json!({"name": "Test Genre"}),
    )
    .await;
    let id = body_json(create_resp).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/genres/{id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/v1/genres/{id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_anonymous_list_genres_ordered_by_name(pool: PgPool) {
    let token = common::auth_token(&pool).await;

    for name in ["Western", "Comedy", "Noir"] {
        let app = common::build_test_app(pool.clone());
        post_json(
            app,
            "/api/v1/genres",
            Some(&token),
            serde_json::json!({"name": name}),
        )
        .await;
    }

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/genres").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["count"], 3);
    let names: Vec<&str> = json["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Comedy", "Noir", "Western"]);
}
