//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use docgen_content::ContentError;
use docgen_site::SiteError;
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No document at the requested path.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Loading or rendering the site failed.
    #[error(transparent)]
    Site(SiteError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binding or serving failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid listen address {address}: {source}")]
    Address {
        address: String,
        source: std::net::AddrParseError,
    },
}

impl From<SiteError> for ServerError {
    fn from(e: SiteError) -> Self {
        match e {
            SiteError::Content(ContentError::DocumentNotFound(path)) => Self::PageNotFound(path),
            other => Self::Site(other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::PageNotFound(path) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Page not found", "path": format!("/{path}")}),
            ),
            Self::Site(e) => {
                tracing::error!(error = %e, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": e.to_string()}),
                )
            }
            Self::Json(_) | Self::Io(_) | Self::Address { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": self.to_string()}),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
