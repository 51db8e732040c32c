pub mod api;
pub mod app;
pub mod banner;
pub mod charts;
pub mod config;
pub mod controller;
pub mod errors;
pub mod filters;
pub mod format;
pub mod handlers;
pub mod models;
pub mod page;
pub mod state;
pub mod table;
pub mod ui;
pub mod validate;

pub use api::{DashboardApi, HttpDashboardApi};
pub use app::router;
pub use config::DashboardConfig;
pub use controller::Dashboard;
pub use state::AppState;
