use crate::api::DashboardApi;
use crate::controller::Dashboard;
use std::sync::Arc;

pub struct AppState<A> {
    pub dashboard: Arc<Dashboard<A>>,
}

impl<A: DashboardApi> AppState<A> {
    pub fn new(dashboard: Dashboard<A>) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
        }
    }
}

impl<A> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            dashboard: Arc::clone(&self.dashboard),
        }
    }
}
