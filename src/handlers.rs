use crate::api::DashboardApi;
use crate::controller::DashboardView;
use crate::errors::AppError;
use crate::filters::FilterField;
use crate::models::{BadgeView, LoadOutcome};
use crate::state::AppState;
use crate::ui::render_dashboard;
use axum::{extract::State, response::Html, Json};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct FilterChangeRequest {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

pub async fn index<A: DashboardApi>(State(state): State<AppState<A>>) -> Html<String> {
    let view = state.dashboard.snapshot().await;
    Html(render_dashboard(&view))
}

pub async fn get_view<A: DashboardApi>(State(state): State<AppState<A>>) -> Json<DashboardView> {
    Json(state.dashboard.snapshot().await)
}

pub async fn change_filter<A: DashboardApi>(
    State(state): State<AppState<A>>,
    Json(payload): Json<FilterChangeRequest>,
) -> Result<Json<BadgeView>, AppError> {
    let field: FilterField = payload
        .field
        .parse()
        .map_err(|err| AppError::bad_request(format!("field: {err}")))?;

    match state.dashboard.change_filter(field, &payload.value).await {
        Some(badge) => Ok(Json(badge)),
        None => Err(AppError::conflict("filter controls are not wired")),
    }
}

pub async fn apply_filters<A: DashboardApi>(State(state): State<AppState<A>>) -> Json<LoadOutcome> {
    Json(state.dashboard.apply_filters().await)
}

pub async fn reset_filters<A: DashboardApi>(State(state): State<AppState<A>>) -> Json<LoadOutcome> {
    Json(state.dashboard.reset_filters().await)
}
