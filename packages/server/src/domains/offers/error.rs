use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::common::OfferId;

/// Errors an offer operation can produce. Each kind maps to its own HTTP
/// status; messages reach the client verbatim.
#[derive(Error, Debug)]
pub enum OfferError {
    #[error("{0}")]
    Validation(String),

    #[error("offer {0} not found")]
    NotFound(OfferId),

    #[error("only the offer owner may modify it")]
    Forbidden,

    #[error("media service error: {0}")]
    Upstream(#[source] anyhow::Error),

    #[error("{0} timed out")]
    Timeout(&'static str),

    #[error("database error: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl OfferError {
    pub fn status(&self) -> StatusCode {
        match self {
            OfferError::Validation(_) => StatusCode::BAD_REQUEST,
            OfferError::NotFound(_) => StatusCode::NOT_FOUND,
            OfferError::Forbidden => StatusCode::FORBIDDEN,
            OfferError::Upstream(_) => StatusCode::BAD_GATEWAY,
            OfferError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            OfferError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for OfferError {
    fn into_response(self) -> Response {
        match &self {
            OfferError::Validation(_) | OfferError::NotFound(_) | OfferError::Forbidden => {
                tracing::debug!(error = %self, "offer request rejected");
            }
            _ => {
                tracing::error!(error = %self, "offer operation failed");
            }
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
