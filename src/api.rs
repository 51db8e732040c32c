use crate::config::DashboardConfig;
use crate::errors::LoadError;
use reqwest::{header, Client};
use serde::Serialize;
use serde_json::Value;
use std::{fmt, future::Future};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    Stats,
    Revenue,
    Bookings,
    Theaters,
    FilterOptions,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Stats => "stats/",
            Endpoint::Revenue => "revenue/",
            Endpoint::Bookings => "bookings/",
            Endpoint::Theaters => "theaters/",
            Endpoint::FilterOptions => "filter-options/",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Endpoint::Stats => "Stats",
            Endpoint::Revenue => "Revenue",
            Endpoint::Bookings => "Bookings",
            Endpoint::Theaters => "Theaters",
            Endpoint::FilterOptions => "Filter options",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The backend the dashboard reads from. One call is one GET returning JSON.
pub trait DashboardApi: Send + Sync + 'static {
    fn get_json(
        &self,
        endpoint: Endpoint,
        query: &str,
    ) -> impl Future<Output = Result<Value, LoadError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpDashboardApi {
    client: Client,
    root: String,
    session_cookie: Option<String>,
}

impl HttpDashboardApi {
    pub fn new(config: &DashboardConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            root: config.api_root.trim_end_matches('/').to_string(),
            session_cookie: config.session_cookie.clone(),
        })
    }

    pub fn url_for(&self, endpoint: Endpoint, query: &str) -> String {
        if query.is_empty() {
            format!("{}/{}", self.root, endpoint.path())
        } else {
            format!("{}/{}?{}", self.root, endpoint.path(), query)
        }
    }
}

impl DashboardApi for HttpDashboardApi {
    async fn get_json(&self, endpoint: Endpoint, query: &str) -> Result<Value, LoadError> {
        let url = self.url_for(endpoint, query);
        debug!("GET {url}");

        let mut request = self.client.get(&url);
        if let Some(cookie) = &self.session_cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = request.send().await.map_err(|err| LoadError::Transport {
            endpoint,
            message: err.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| LoadError::shape(endpoint, format!("body is not JSON: {err}")))
    }
}
