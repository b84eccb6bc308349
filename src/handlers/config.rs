//! Configuration handlers
//!
//! Returns public configuration settings to the frontend

use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::state::AppState;

/// Public configuration response
#[derive(Debug, Serialize)]
pub struct PublicConfig {
    /// Chart surface width in pixels
    pub width: f64,
    /// Chart surface height in pixels
    pub height: f64,
    /// Milliseconds between live simulation frames
    #[serde(rename = "tickInterval")]
    pub tick_interval_ms: u64,
}

/// GET /api/config
/// Returns public configuration settings
pub async fn get_config(State(state): State<AppState>) -> Json<PublicConfig> {
    Json(PublicConfig {
        width: state.config.chart.width,
        height: state.config.chart.height,
        tick_interval_ms: state.config.simulation.tick_interval_ms,
    })
}
