mod common;

use axum::http::StatusCode;
use common::{
    StudentFixture, authed_get, body_json, create_test_school, create_test_student,
    create_test_user, generate_unique_email, generate_unique_school_name, get_auth_token,
    setup_test_app,
};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

struct FamilyWorld {
    school_id: Uuid,
    child_id: Uuid,
    parent_token: String,
}

async fn family_world(pool: &PgPool, app: axum::Router) -> FamilyWorld {
    let school_id = create_test_school(pool, &generate_unique_school_name()).await;

    let parent_email = generate_unique_email();
    create_test_user(pool, &parent_email, "password123", "parent", Some(school_id)).await;

    let child_id = create_test_student(
        pool,
        school_id,
        StudentFixture {
            parent_email: Some(parent_email.clone()),
            ..Default::default()
        },
    )
    .await;

    FamilyWorld {
        school_id,
        child_id,
        parent_token: get_auth_token(app, &parent_email, "password123").await,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_parent_lists_only_own_children(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let world = family_world(&pool, app.clone()).await;

    // A student belonging to a different parent in the same school.
    create_test_student(
        &pool,
        world.school_id,
        StudentFixture {
            parent_email: Some(generate_unique_email()),
            ..Default::default()
        },
    )
    .await;

    let response = app
        .oneshot(authed_get("/api/children", &world.parent_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let children = body["data"].as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["id"], world.child_id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_child_leave_history(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let world = family_world(&pool, app.clone()).await;

    sqlx::query(
        r#"
        INSERT INTO leave_requests
            (school_id, student_id, reason, start_date, end_date, requested_by, status)
        VALUES ($1, $2, 'Fever', '2026-09-07', '2026-09-09',
                (SELECT id FROM users LIMIT 1), 'approved')
        "#,
    )
    .bind(world.school_id)
    .bind(world.child_id)
    .execute(&pool)
    .await
    .unwrap();

    let response = app
        .oneshot(authed_get(
            &format!("/api/children/{}/leaves", world.child_id),
            &world.parent_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let leaves = body["data"].as_array().unwrap();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0]["status"], "approved");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unrelated_child_history_is_not_found(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let world = family_world(&pool, app.clone()).await;

    let other_child = create_test_student(
        &pool,
        world.school_id,
        StudentFixture {
            parent_email: Some(generate_unique_email()),
            ..Default::default()
        },
    )
    .await;

    let response = app
        .clone()
        .oneshot(authed_get(
            &format!("/api/children/{}/leaves", other_child),
            &world.parent_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(authed_get(
            &format!("/api/children/{}/outpasses", other_child),
            &world.parent_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_children_endpoints_are_parent_only(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let school_id = create_test_school(&pool, &generate_unique_school_name()).await;
    let email = generate_unique_email();
    create_test_user(&pool, &email, "password123", "teacher", Some(school_id)).await;
    let token = get_auth_token(app.clone(), &email, "password123").await;

    let response = app
        .oneshot(authed_get("/api/children", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
