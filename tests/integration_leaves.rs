mod common;

use axum::http::StatusCode;
use common::{
    StudentFixture, authed_get, authed_post, body_json, create_test_school, create_test_student,
    create_test_user, generate_unique_email, generate_unique_school_name, get_auth_token,
    setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

struct LeaveWorld {
    school_id: Uuid,
    student_id: Uuid,
    student_token: String,
    parent_token: String,
    staff_token: String,
}

async fn leave_world(pool: &PgPool, app: axum::Router) -> LeaveWorld {
    let school_id = create_test_school(pool, &generate_unique_school_name()).await;

    let parent_email = generate_unique_email();
    create_test_user(pool, &parent_email, "password123", "parent", Some(school_id)).await;

    let student_email = generate_unique_email();
    let student_user =
        create_test_user(pool, &student_email, "password123", "student", Some(school_id)).await;
    let student_id = create_test_student(
        pool,
        school_id,
        StudentFixture {
            user_id: Some(student_user),
            parent_email: Some(parent_email.clone()),
            ..Default::default()
        },
    )
    .await;

    let staff_email = generate_unique_email();
    create_test_user(pool, &staff_email, "password123", "teacher", Some(school_id)).await;

    LeaveWorld {
        school_id,
        student_id,
        student_token: get_auth_token(app.clone(), &student_email, "password123").await,
        parent_token: get_auth_token(app.clone(), &parent_email, "password123").await,
        staff_token: get_auth_token(app, &staff_email, "password123").await,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_files_own_leave(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let world = leave_world(&pool, app.clone()).await;

    let response = app
        .oneshot(authed_post(
            "/api/leaves",
            &world.student_token,
            json!({
                "reason": "Fever",
                "start_date": "2026-09-07",
                "end_date": "2026-09-09"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["student_id"], world.student_id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_parent_files_for_own_child(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let world = leave_world(&pool, app.clone()).await;

    let response = app
        .oneshot(authed_post(
            "/api/leaves",
            &world.parent_token,
            json!({
                "student_id": world.student_id,
                "reason": "Family function",
                "start_date": "2026-09-14",
                "end_date": "2026-09-15"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["student_id"], world.student_id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_parent_cannot_file_for_unrelated_student(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let world = leave_world(&pool, app.clone()).await;

    // Another student in the same school, with a different parent.
    let other_student = create_test_student(
        &pool,
        world.school_id,
        StudentFixture {
            parent_email: Some(generate_unique_email()),
            ..Default::default()
        },
    )
    .await;

    let response = app
        .oneshot(authed_post(
            "/api/leaves",
            &world.parent_token,
            json!({
                "student_id": other_student,
                "reason": "Not my child",
                "start_date": "2026-09-14",
                "end_date": "2026-09-15"
            }),
        ))
        .await
        .unwrap();
    // Someone else's child looks exactly like a missing record.
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_parent_requires_student_id(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let world = leave_world(&pool, app.clone()).await;

    let response = app
        .oneshot(authed_post(
            "/api/leaves",
            &world.parent_token,
            json!({
                "reason": "Missing child reference",
                "start_date": "2026-09-14",
                "end_date": "2026-09-15"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_staff_cannot_file_leave(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let world = leave_world(&pool, app.clone()).await;

    let response = app
        .oneshot(authed_post(
            "/api/leaves",
            &world.staff_token,
            json!({
                "student_id": world.student_id,
                "reason": "On behalf",
                "start_date": "2026-09-14",
                "end_date": "2026-09-15"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_end_date_before_start_date_rejected(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let world = leave_world(&pool, app.clone()).await;

    let response = app
        .oneshot(authed_post(
            "/api/leaves",
            &world.student_token,
            json!({
                "reason": "Time travel",
                "start_date": "2026-09-09",
                "end_date": "2026-09-07"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_decision_is_single_shot(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let world = leave_world(&pool, app.clone()).await;

    let response = app
        .clone()
        .oneshot(authed_post(
            "/api/leaves",
            &world.student_token,
            json!({
                "reason": "Fever",
                "start_date": "2026-09-07",
                "end_date": "2026-09-09"
            }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let leave_id = body["data"]["id"].as_str().unwrap().to_string();

    let approve = app
        .clone()
        .oneshot(authed_post(
            &format!("/api/leaves/{}/approve", leave_id),
            &world.staff_token,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(approve.status(), StatusCode::OK);
    let body = body_json(approve).await;
    assert_eq!(body["data"]["status"], "approved");
    assert!(!body["data"]["decided_by"].is_null());

    let reject = app
        .oneshot(authed_post(
            &format!("/api/leaves/{}/reject", leave_id),
            &world.staff_token,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(reject.status(), StatusCode::CONFLICT);

    let status = sqlx::query_scalar::<_, String>(
        "SELECT status::TEXT FROM leave_requests WHERE id = $1",
    )
    .bind(Uuid::parse_str(&leave_id).unwrap())
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(status, "approved");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_requester_cancels_own_pending_leave(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let world = leave_world(&pool, app.clone()).await;

    let response = app
        .clone()
        .oneshot(authed_post(
            "/api/leaves",
            &world.parent_token,
            json!({
                "student_id": world.student_id,
                "reason": "Plans changed",
                "start_date": "2026-09-14",
                "end_date": "2026-09-15"
            }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let leave_id = body["data"]["id"].as_str().unwrap().to_string();

    // The student did not file it, so the student cannot cancel it.
    let by_student = app
        .clone()
        .oneshot(authed_post(
            &format!("/api/leaves/{}/cancel", leave_id),
            &world.student_token,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(by_student.status(), StatusCode::NOT_FOUND);

    let by_parent = app
        .oneshot(authed_post(
            &format!("/api/leaves/{}/cancel", leave_id),
            &world.parent_token,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(by_parent.status(), StatusCode::OK);
    let body = body_json(by_parent).await;
    assert_eq!(body["data"]["status"], "cancelled");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_listing_views_per_role(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let world = leave_world(&pool, app.clone()).await;

    // One leave for the shared student, one for an unrelated student.
    app.clone()
        .oneshot(authed_post(
            "/api/leaves",
            &world.student_token,
            json!({
                "reason": "Fever",
                "start_date": "2026-09-07",
                "end_date": "2026-09-09"
            }),
        ))
        .await
        .unwrap();

    let other_email = generate_unique_email();
    let other_user =
        create_test_user(&pool, &other_email, "password123", "student", Some(world.school_id))
            .await;
    create_test_student(
        &pool,
        world.school_id,
        StudentFixture {
            user_id: Some(other_user),
            parent_email: Some(generate_unique_email()),
            ..Default::default()
        },
    )
    .await;
    let other_token = get_auth_token(app.clone(), &other_email, "password123").await;
    app.clone()
        .oneshot(authed_post(
            "/api/leaves",
            &other_token,
            json!({
                "reason": "Travel",
                "start_date": "2026-09-10",
                "end_date": "2026-09-11"
            }),
        ))
        .await
        .unwrap();

    // Staff sees both.
    let response = app
        .clone()
        .oneshot(authed_get("/api/leaves", &world.staff_token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // The student sees only their own.
    let response = app
        .clone()
        .oneshot(authed_get("/api/leaves", &world.student_token))
        .await
        .unwrap();
    let body = body_json(response).await;
    let leaves = body["data"].as_array().unwrap();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0]["student_id"], world.student_id.to_string());

    // The parent sees their children's, keyed by the parent email.
    let response = app
        .oneshot(authed_get("/api/leaves", &world.parent_token))
        .await
        .unwrap();
    let body = body_json(response).await;
    let leaves = body["data"].as_array().unwrap();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0]["student_id"], world.student_id.to_string());
}
