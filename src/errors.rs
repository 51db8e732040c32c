use axum::http::StatusCode;
use thiserror::Error;

use crate::api::Endpoint;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Everything that can go wrong between issuing a request and drawing the result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("{endpoint} request failed: {message}")]
    Transport { endpoint: Endpoint, message: String },

    #[error("{endpoint} API error: {status}")]
    Status { endpoint: Endpoint, status: u16 },

    #[error("invalid {endpoint} data format: {reason}")]
    Shape { endpoint: Endpoint, reason: String },

    #[error("failed to render {target}: {reason}")]
    Render { target: &'static str, reason: String },
}

impl LoadError {
    pub fn shape(endpoint: Endpoint, reason: impl Into<String>) -> Self {
        Self::Shape {
            endpoint,
            reason: reason.into(),
        }
    }

    pub fn render(target: &'static str, reason: impl Into<String>) -> Self {
        Self::Render {
            target,
            reason: reason.into(),
        }
    }
}
