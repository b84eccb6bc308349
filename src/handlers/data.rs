//! Read-only JSON endpoints over the organization snapshot

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::detail;
use crate::entity::{Division, FunctionalRelation, Organization, Staff};
use crate::error::AppResult;
use crate::network::{AdjacencyMatrix, NetworkView, RelationFilter};
use crate::routes::ApiResponse;
use crate::state::AppState;
use crate::view::{EntityKind, ViewState, VisualizationMode};

/// GET /api/organizations
pub async fn get_organizations(State(state): State<AppState>) -> Json<ApiResponse<Vec<Organization>>> {
    Json(ApiResponse::success(state.data.organizations.clone()))
}

/// GET /api/divisions
pub async fn get_divisions(State(state): State<AppState>) -> Json<ApiResponse<Vec<Division>>> {
    Json(ApiResponse::success(state.data.divisions.clone()))
}

/// GET /api/staff
pub async fn get_staff(State(state): State<AppState>) -> Json<ApiResponse<Vec<Staff>>> {
    Json(ApiResponse::success(state.data.staff.clone()))
}

/// GET /api/relations
pub async fn get_relations(State(state): State<AppState>) -> Json<ApiResponse<Vec<FunctionalRelation>>> {
    Json(ApiResponse::success(state.data.relations.clone()))
}

/// GET /api/hierarchy/:entity
/// Nested forest of the requested structure
pub async fn get_hierarchy(
    State(state): State<AppState>,
    entity: Result<Path<EntityKind>, PathRejection>,
) -> AppResult<Response> {
    let Path(entity) = entity?;
    let tree = entity.hierarchy(&state.data)?;
    Ok(Json(ApiResponse::success(tree.nested())).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct RelationQuery {
    #[serde(default)]
    pub relation: RelationFilter,
}

/// GET /api/network
pub async fn get_network(
    State(state): State<AppState>,
    query: Result<Query<RelationQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<NetworkView>>> {
    let Query(query) = query?;
    let view = state.data.functional_relations_network().filtered(query.relation);
    Ok(Json(ApiResponse::success(view)))
}

#[derive(Debug, Serialize)]
pub struct MatrixResponse {
    /// Staff ids in row/column order
    pub nodes: Vec<i64>,
    pub matrix: AdjacencyMatrix,
}

/// GET /api/matrix
pub async fn get_matrix(
    State(state): State<AppState>,
    query: Result<Query<RelationQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<MatrixResponse>>> {
    let Query(query) = query?;
    let view = state.data.functional_relations_network().filtered(query.relation);
    let matrix = AdjacencyMatrix::build(&view);
    Ok(Json(ApiResponse::success(MatrixResponse {
        nodes: view.nodes.iter().map(|node| node.id).collect(),
        matrix,
    })))
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    #[serde(default)]
    pub mode: VisualizationMode,
    #[serde(default)]
    pub entity: EntityKind,
    pub id: i64,
}

/// GET /api/detail
/// Detail panel content for a node; `data` is null when the id does not resolve
pub async fn get_detail(
    State(state): State<AppState>,
    query: Result<Query<DetailQuery>, QueryRejection>,
) -> AppResult<Response> {
    let Query(query) = query?;
    let view = ViewState {
        mode: query.mode,
        entity: query.entity,
        selected: Some(query.id),
        ..Default::default()
    };
    let detail = detail::lookup(&state.data, &view)?;
    if detail.is_none() {
        tracing::debug!("No {} record with id {}", query.mode.as_str(), query.id);
    }
    Ok(Json(ApiResponse::success(detail)).into_response())
}
