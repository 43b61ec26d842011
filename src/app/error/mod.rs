use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::{rate::FetchError, store::StoreError};

/// Result alias for handlers whose errors render through [`AppError`].
pub type AppResult<T, E = AppError> = std::result::Result<T, E>;

/// A common error type for the HTTP handlers.
///
/// Every variant maps to a status code and a generic plain text body. The
/// underlying cause is only logged, never returned to the client.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(String),
    #[error("failed to fetch the exchange rate")]
    RateUnavailable(#[from] FetchError),
    #[error("failed to store the subscriber")]
    SubscriptionFailed(#[from] StoreError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::RateUnavailable(_) => StatusCode::BAD_REQUEST,
            Self::SubscriptionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "A valid email is required",
            Self::RateUnavailable(_) => "Failed to fetch the exchange rate",
            Self::SubscriptionFailed(_) => "Email already exists or could not be saved",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::ValidationError(ref s) => tracing::warn!(detail = %s, "rejected request"),
            Self::RateUnavailable(ref e) => {
                tracing::error!(error.cause_chain = ?e, error.message = %e, "rate lookup failed")
            }
            Self::SubscriptionFailed(ref e) => {
                tracing::error!(error.cause_chain = ?e, error.message = %e, "subscription failed")
            }
        }

        (self.status_code(), self.public_message()).into_response()
    }
}
