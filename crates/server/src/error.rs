//! Proxy error taxonomy and its HTTP mapping.
use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Body returned whenever forwarding fails.
pub const PROXY_FAILURE: &str = "Failed to proxy request";

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("upstream websocket failed: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("upstream did not answer within {0:?}")]
    Timeout(Duration),

    #[error("request body rejected: {0}")]
    RequestBody(axum::Error),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Upstream(_) | ProxyError::WebSocket(_) | ProxyError::Timeout(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::RequestBody(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!("Proxy error: {}", self);
        let message = match &self {
            ProxyError::RequestBody(_) => "Request body too large",
            _ => PROXY_FAILURE,
        };
        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
