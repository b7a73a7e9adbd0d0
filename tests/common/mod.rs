use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use slateboard::config::cors::CorsConfig;
use slateboard::config::jwt::JwtConfig;
use slateboard::router::init_router;
use slateboard::state::AppState;
use slateboard::utils::password::hash_password;

pub async fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn generate_unique_school_name() -> String {
    format!("Test School {}", Uuid::new_v4())
}

#[allow(dead_code)]
pub async fn create_test_school(pool: &PgPool, name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO schools (name, address) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind("Test Address")
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Create a user with the given role. `role` is one of the `user_role`
/// enum labels: super_admin, school_admin, teacher, staff, parent, student.
#[allow(dead_code)]
pub async fn create_test_user(
    pool: &PgPool,
    email: &str,
    password: &str,
    role: &str,
    school_id: Option<Uuid>,
) -> Uuid {
    let hashed = hash_password(password).unwrap();

    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO users (school_id, first_name, last_name, email, password, role)
        VALUES ($1, $2, $3, $4, $5, $6::user_role)
        RETURNING id
        "#,
    )
    .bind(school_id)
    .bind("Test")
    .bind("User")
    .bind(email)
    .bind(hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub struct StudentFixture {
    pub class_name: String,
    pub section: String,
    pub class_id: Option<Uuid>,
    pub parent_email: Option<String>,
    pub user_id: Option<Uuid>,
}

#[allow(dead_code)]
impl Default for StudentFixture {
    fn default() -> Self {
        Self {
            class_name: "Grade 10".to_string(),
            section: "A".to_string(),
            class_id: None,
            parent_email: None,
            user_id: None,
        }
    }
}

#[allow(dead_code)]
pub async fn create_test_student(pool: &PgPool, school_id: Uuid, fixture: StudentFixture) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO students
            (school_id, user_id, first_name, last_name, class_name, section, class_id, parent_email)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id
        "#,
    )
    .bind(school_id)
    .bind(fixture.user_id)
    .bind("Test")
    .bind("Student")
    .bind(&fixture.class_name)
    .bind(&fixture.section)
    .bind(fixture.class_id)
    .bind(&fixture.parent_email)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_test_class(pool: &PgPool, school_id: Uuid, name: &str, section: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO classes (school_id, name, section) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(school_id)
    .bind(name)
    .bind(section)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn get_auth_token(app: axum::Router, email: &str, password: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "email": email,
                "password": password
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

    body["data"]["access_token"]
        .as_str()
        .expect("login response should carry an access token")
        .to_string()
}

#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub fn authed_post(uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[allow(dead_code)]
pub fn authed_put(uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[allow(dead_code)]
pub fn authed_delete(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}
