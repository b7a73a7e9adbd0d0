use dotenvy::dotenv;

use slateboard::logging::init_tracing;
use slateboard::router::init_router;
use slateboard::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let state = init_app_state().await;
    let app = init_router(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    tracing::info!("Server running on http://localhost:{port}");
    tracing::info!("Swagger UI available at http://localhost:{port}/swagger-ui");
    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
