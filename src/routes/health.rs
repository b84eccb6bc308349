use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::state::AppState;
use super::ApiResponse;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct DataStatus {
    pub organizations: usize,
    pub divisions: usize,
    pub staff: usize,
    pub relations: usize,
    /// Sessions with a live simulation
    pub simulations: usize,
}

/// Health check endpoint
pub async fn health_check() -> Json<ApiResponse<HealthStatus>> {
    Json(ApiResponse::success(HealthStatus {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// Size of the loaded snapshot
pub async fn data_status(State(state): State<AppState>) -> Json<ApiResponse<DataStatus>> {
    Json(ApiResponse::success(DataStatus {
        organizations: state.data.organizations.len(),
        divisions: state.data.divisions.len(),
        staff: state.data.staff.len(),
        relations: state.data.relations.len(),
        simulations: state.simulations.len(),
    }))
}
