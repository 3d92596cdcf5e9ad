use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::{error, warn};
use serde_json::json;
use thiserror::Error;

pub const API_KEY_MISSING: &str =
    "API key is not set. Please set your Google API key in settings.";

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("{}", API_KEY_MISSING)]
    Unauthenticated,
    #[error("Request to Gemini API timed out")]
    UpstreamTimeout,
    #[error("Error communicating with Gemini API: {0}")]
    UpstreamUnreachable(String),
    #[error("Gemini API error: {body}")]
    UpstreamRejected { status: u16, body: String },
    #[error("Invalid response format from Gemini API: {0}")]
    UpstreamFormat(String),
    #[error("Unknown model slot: {0}")]
    UnknownSlot(String),
    #[error("Not Found")]
    UnknownRoute,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Error processing request: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::UpstreamTimeout
        } else if err.is_decode() {
            RelayError::UpstreamFormat(err.to_string())
        } else {
            RelayError::UpstreamUnreachable(err.to_string())
        }
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Unauthenticated => StatusCode::UNAUTHORIZED,
            RelayError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            RelayError::UpstreamUnreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
            // Only error statuses are forwarded as-is.
            RelayError::UpstreamRejected { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            RelayError::UpstreamFormat(_) => StatusCode::BAD_GATEWAY,
            RelayError::UnknownSlot(_) | RelayError::UnknownRoute => StatusCode::NOT_FOUND,
            RelayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed ({}): {}", status.as_u16(), self);
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), self);
        }
        HttpResponse::build(status).json(json!({ "detail": self.to_string() }))
    }
}
