use axum::{
    extract::OriginalUri,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::error::AppError;
use crate::handlers;
use crate::state::AppState;
use crate::ws;

pub mod health;

/// API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: true,
            message: "success".to_string(),
            data: Some(data),
        }
    }
}

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    // View state lives in memory for the lifetime of the process
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_http_only(true);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/status", get(health::data_status))
        // Config routes
        .route("/config", get(handlers::config::get_config))
        // Raw collections
        .route("/organizations", get(handlers::data::get_organizations))
        .route("/divisions", get(handlers::data::get_divisions))
        .route("/staff", get(handlers::data::get_staff))
        .route("/relations", get(handlers::data::get_relations))
        // Derived views
        .route("/hierarchy/:entity", get(handlers::data::get_hierarchy))
        .route("/network", get(handlers::data::get_network))
        .route("/matrix", get(handlers::data::get_matrix))
        .route("/detail", get(handlers::data::get_detail))
        // WebSocket
        .route("/network/ws", get(ws::serve_simulation))
        .fallback(fallback);

    Router::new()
        .route("/", get(handlers::page::index))
        .route("/view", post(handlers::page::update_view))
        .route("/view/select", get(handlers::page::select))
        .route("/view/reset", post(handlers::page::reset))
        .route("/chart.svg", get(handlers::page::chart_svg))
        .nest("/api", api_routes)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Fallback handler for 404
pub async fn fallback(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
