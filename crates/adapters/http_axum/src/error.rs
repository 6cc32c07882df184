//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use pumpkinpi_domain::error::PumpkinError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    status: u16,
    message: String,
}

/// Maps service errors to an HTTP response with an appropriate status code.
#[derive(Debug)]
pub enum ApiError {
    Domain(PumpkinError),
    /// The request body could not be understood.
    BadRequest(String),
}

impl From<PumpkinError> for ApiError {
    fn from(err: PumpkinError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Domain(PumpkinError::NotFound(err)) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Domain(PumpkinError::InvalidInput(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(PumpkinError::Device(err)) => {
                // Display is generic; the source chain only goes to the log
                tracing::error!(error = ?err, "device error");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = ErrorBody {
            status: status.as_u16(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
