pub mod error;
pub mod routes;
pub mod state;

use axum::{
    Json, Router,
    routing::{get, post, put},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Meeting lifecycle routes (ingest side of the read models)
    let meeting_routes = Router::new()
        .route("/", post(routes::meeting::create))
        .route("/{meeting_id}/start", post(routes::meeting::start))
        .route("/{meeting_id}/end", post(routes::meeting::end))
        .route("/{meeting_id}/join", post(routes::meeting::join))
        .route("/{meeting_id}/leave", post(routes::meeting::leave))
        .route(
            "/{meeting_id}/participant",
            get(routes::meeting::participants),
        )
        .route(
            "/{meeting_id}/monitoring/{user_id}",
            put(routes::meeting::upsert_monitoring),
        );

    // Analytics routes (read-only)
    let analytics_routes = Router::new()
        .route("/comprehensive", get(routes::analytics::comprehensive))
        .route("/duration", get(routes::analytics::duration))
        .route("/attendance", get(routes::analytics::attendance))
        .route("/host-meetings", get(routes::analytics::host_meetings))
        .route("/host-overview", get(routes::analytics::host_overview));

    Router::new()
        .route("/api/health", get(health))
        .nest("/api/meeting", meeting_routes)
        .nest("/api/analytics", analytics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
