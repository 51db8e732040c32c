use crate::api::DashboardApi;
use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router<A: DashboardApi>(state: AppState<A>) -> Router {
    Router::new()
        .route("/", get(handlers::index::<A>))
        .route("/api/view", get(handlers::get_view::<A>))
        .route("/api/filters", post(handlers::change_filter::<A>))
        .route("/api/filters/apply", post(handlers::apply_filters::<A>))
        .route("/api/filters/reset", post(handlers::reset_filters::<A>))
        .with_state(state)
}
