mod common;

use axum::http::StatusCode;
use common::{
    authed_delete, authed_get, authed_post, authed_put, body_json, create_test_class,
    create_test_school, create_test_user, generate_unique_email, generate_unique_school_name,
    get_auth_token, setup_test_app,
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
async fn test_create_student_minimal(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let (school_id, token) = admin_setup(&pool, app.clone()).await;

    let response = app
        .oneshot(authed_post(
            "/api/students",
            &token,
            json!({
                "first_name": "Amina",
                "last_name": "Yusuf",
                "class_name": "Grade 10",
                "section": "A"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["school_id"], school_id.to_string());
    assert_eq!(body["data"]["class_name"], "Grade 10");
    assert!(body["data"]["class_id"].is_null());
    assert!(body["data"]["user_id"].is_null());
    assert_eq!(body["data"]["is_active"], true);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_with_login_account(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let (_, token) = admin_setup(&pool, app.clone()).await;

    let student_email = generate_unique_email();
    let response = app
        .clone()
        .oneshot(authed_post(
            "/api/students",
            &token,
            json!({
                "first_name": "Amina",
                "last_name": "Yusuf",
                "email": student_email,
                "login_password": "password123",
                "class_name": "Grade 10",
                "section": "A"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert!(!body["data"]["user_id"].is_null());

    // The account works right away.
    let student_token = get_auth_token(app, &student_email, "password123").await;
    assert!(!student_token.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_password_without_email_rejected(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let (_, token) = admin_setup(&pool, app.clone()).await;

    let response = app
        .oneshot(authed_post(
            "/api/students",
            &token,
            json!({
                "first_name": "Amina",
                "last_name": "Yusuf",
                "login_password": "password123",
                "class_name": "Grade 10",
                "section": "A"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_validation(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let (_, token) = admin_setup(&pool, app.clone()).await;

    let response = app
        .oneshot(authed_post(
            "/api/students",
            &token,
            json!({
                "first_name": "",
                "last_name": "Yusuf",
                "class_name": "Grade 10",
                "section": "A"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_rejects_unknown_class_id(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let (_, token) = admin_setup(&pool, app.clone()).await;

    let response = app
        .oneshot(authed_post(
            "/api/students",
            &token,
            json!({
                "first_name": "Amina",
                "last_name": "Yusuf",
                "class_name": "Grade 10",
                "section": "A",
                "class_id": Uuid::new_v4()
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_populates_class_reference(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let (school_id, token) = admin_setup(&pool, app.clone()).await;
    let class_id = create_test_class(&pool, school_id, "Grade 10", "A").await;

    let response = app
        .clone()
        .oneshot(authed_post(
            "/api/students",
            &token,
            json!({
                "first_name": "Amina",
                "last_name": "Yusuf",
                "class_name": "Grade 10",
                "section": "A"
            }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let student_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(authed_put(
            &format!("/api/students/{}", student_id),
            &token,
            json!({"class_id": class_id}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["class_id"], class_id.to_string());
    // The denormalized strings are untouched by a partial update.
    assert_eq!(body["data"]["class_name"], "Grade 10");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_hides_from_listing(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let (_, token) = admin_setup(&pool, app.clone()).await;

    let student_email = generate_unique_email();
    let response = app
        .clone()
        .oneshot(authed_post(
            "/api/students",
            &token,
            json!({
                "first_name": "Amina",
                "last_name": "Yusuf",
                "email": student_email,
                "login_password": "password123",
                "class_name": "Grade 10",
                "section": "A"
            }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let student_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed_delete(&format!("/api/students/{}", student_id), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Gone from the default listing, but the row still exists.
    let response = app
        .clone()
        .oneshot(authed_get("/api/students", &token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["meta"]["total"], 0);

    let is_active = sqlx::query_scalar::<_, bool>(
        "SELECT is_active FROM students WHERE id = $1",
    )
    .bind(Uuid::parse_str(&student_id).unwrap())
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(!is_active);

    // The linked login account is deactivated with it.
    let login = axum::http::Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(
            serde_json::to_string(&json!({
                "email": student_email,
                "password": "password123"
            }))
            .unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(login).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_pagination_meta(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let (_, token) = admin_setup(&pool, app.clone()).await;

    for i in 0..5 {
        app.clone()
            .oneshot(authed_post(
                "/api/students",
                &token,
                json!({
                    "first_name": format!("Student{}", i),
                    "last_name": "Test",
                    "class_name": "Grade 10",
                    "section": "A"
                }),
            ))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(authed_get("/api/students?page=2&limit=2", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["meta"]["page"], 2);
    assert_eq!(body["data"]["meta"]["limit"], 2);
    assert_eq!(body["data"]["meta"]["total"], 5);
    assert_eq!(body["data"]["meta"]["total_pages"], 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_students_endpoint_requires_admin(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let school_id = create_test_school(&pool, &generate_unique_school_name()).await;
    let email = generate_unique_email();
    create_test_user(&pool, &email, "password123", "teacher", Some(school_id)).await;
    let token = get_auth_token(app.clone(), &email, "password123").await;

    let response = app
        .oneshot(authed_get("/api/students", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
