use admin_dashboard::{page::Page, router, AppState, Dashboard, DashboardConfig, HttpDashboardApi};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = DashboardConfig::from_env();
    info!("reading dashboard data from {}", config.api_root);

    let api = HttpDashboardApi::new(&config)?;
    let dashboard = Dashboard::new(api, Page::full(config.banner_ttl), &config);
    let outcome = dashboard.initialize().await;
    info!("initial load: {outcome:?}");

    let app = router(AppState::new(dashboard));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
