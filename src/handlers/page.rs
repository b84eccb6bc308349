//! Visualization page handlers
//!
//! The view state lives in the session; control submissions update it and
//! redirect back to the page.

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, State,
    },
    http::header,
    response::{Html, IntoResponse, Redirect},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::detail;
use crate::error::AppResult;
use crate::network::RelationFilter;
use crate::render::page::{render_page, PageContext};
use crate::render::render_chart_blocking;
use crate::state::AppState;
use crate::view::{EntityKind, ViewState, ViewUpdate, VisualizationMode};

/// Session key of the page view state
pub const VIEW_KEY: &str = "view";

async fn load_view(session: &Session) -> AppResult<ViewState> {
    Ok(session.get::<ViewState>(VIEW_KEY).await?.unwrap_or_default())
}

async fn store_view(session: &Session, view: &ViewState) -> AppResult<()> {
    session.insert(VIEW_KEY, view).await?;
    Ok(())
}

/// GET /
pub async fn index(State(state): State<AppState>, session: Session) -> AppResult<Html<String>> {
    let view = load_view(&session).await?;
    store_view(&session, &view).await?;

    let chart = render_chart_blocking(state.data.clone(), view, state.config.clone()).await?.map_err(|e| {
        tracing::warn!("Failed to render {} chart: {}", view.mode.as_str(), e);
        e.to_string()
    });
    let detail = detail::lookup(&state.data, &view).unwrap_or_else(|e| {
        tracing::warn!("Failed to resolve selection: {}", e);
        None
    });

    Ok(Html(render_page(&PageContext {
        view: &view,
        chart,
        detail,
    })))
}

/// POST /view
pub async fn update_view(
    session: Session,
    form: Result<Form<ViewUpdate>, FormRejection>,
) -> AppResult<Redirect> {
    let Form(update) = form?;
    let mut view = load_view(&session).await?;
    view.apply(update);
    store_view(&session, &view).await?;
    tracing::debug!(mode = view.mode.as_str(), entity = view.entity.as_str(), relation = %view.relation, "View updated");
    Ok(Redirect::to("/"))
}

#[derive(Debug, Deserialize)]
pub struct SelectQuery {
    pub id: i64,
}

/// GET /view/select?id=N
pub async fn select(session: Session, query: Result<Query<SelectQuery>, QueryRejection>) -> AppResult<Redirect> {
    let Query(query) = query?;
    let mut view = load_view(&session).await?;
    view.select(query.id);
    store_view(&session, &view).await?;
    Ok(Redirect::to("/"))
}

/// POST /view/reset
pub async fn reset(session: Session) -> AppResult<Redirect> {
    let mut view = load_view(&session).await?;
    view.reset_selection();
    store_view(&session, &view).await?;
    Ok(Redirect::to("/"))
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    #[serde(default)]
    pub mode: VisualizationMode,
    #[serde(default)]
    pub entity: EntityKind,
    #[serde(default)]
    pub relation: RelationFilter,
    pub selected: Option<i64>,
}

/// GET /chart.svg
/// Stateless chart rendering driven by the query string
pub async fn chart_svg(
    State(state): State<AppState>,
    query: Result<Query<ChartQuery>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(query) = query?;
    let view = ViewState {
        mode: query.mode,
        entity: query.entity,
        relation: query.relation,
        selected: query.selected,
    };
    let svg = render_chart_blocking(state.data.clone(), view, state.config.clone()).await??;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml; charset=utf-8")], svg))
}
