mod common;

use axum::http::StatusCode;
use common::{
    authed_get, authed_post, body_json, create_test_class, create_test_school, create_test_user,
    generate_unique_email, generate_unique_school_name, get_auth_token, setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

async fn admin_setup(pool: &PgPool, app: axum::Router) -> (Uuid, String) {
    let school_id = create_test_school(pool, &generate_unique_school_name()).await;
    let email = generate_unique_email();
    create_test_user(pool, &email, "password123", "school_admin", Some(school_id)).await;
    let token = get_auth_token(app, &email, "password123").await;
    (school_id, token)
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_class(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let (school_id, token) = admin_setup(&pool, app.clone()).await;

    let response = app
        .oneshot(authed_post(
            "/api/classes",
            &token,
            json!({"name": "Grade 10", "section": "A"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "Grade 10");
    assert_eq!(body["data"]["section"], "A");
    assert_eq!(body["data"]["school_id"], school_id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_class_conflicts_within_school_only(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let (_, token_a) = admin_setup(&pool, app.clone()).await;
    let (_, token_b) = admin_setup(&pool, app.clone()).await;

    let dto = json!({"name": "Grade 10", "section": "A"});

    let first = app
        .clone()
        .oneshot(authed_post("/api/classes", &token_a, dto.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let duplicate = app
        .clone()
        .oneshot(authed_post("/api/classes", &token_a, dto.clone()))
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    // The same name and section is fine in another school.
    let other_school = app
        .oneshot(authed_post("/api/classes", &token_b, dto))
        .await
        .unwrap();
    assert_eq!(other_school.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_classes_scoped_to_tenant(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let (school_a, token_a) = admin_setup(&pool, app.clone()).await;
    let (school_b, _) = admin_setup(&pool, app.clone()).await;

    let class_a = create_test_class(&pool, school_a, "Grade 10", "A").await;
    create_test_class(&pool, school_b, "Grade 10", "A").await;

    let response = app
        .oneshot(authed_get("/api/classes", &token_a))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let classes = body["data"].as_array().unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0]["id"], class_a.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_classes_require_admin(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let school_id = create_test_school(&pool, &generate_unique_school_name()).await;
    let email = generate_unique_email();
    create_test_user(&pool, &email, "password123", "teacher", Some(school_id)).await;
    let token = get_auth_token(app.clone(), &email, "password123").await;

    let response = app
        .oneshot(authed_post(
            "/api/classes",
            &token,
            json!({"name": "Grade 10", "section": "A"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
