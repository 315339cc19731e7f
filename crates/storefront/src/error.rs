//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; responses are JSON bodies with a user-facing
//! message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::cafe_api::CafeApiError;
use crate::checkout::CheckoutError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cafe API operation failed.
    #[error("Cafe API error: {0}")]
    CafeApi(#[from] CafeApiError),

    /// Checkout aborted before order creation.
    #[error("Checkout aborted: {0}")]
    Checkout(#[from] CheckoutError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: String,
    /// Whether re-submitting the same request may succeed.
    retryable: bool,
    /// Whether the client should discard its local cart copy.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    reset_local_cart: bool,
}

impl AppError {
    /// Whether this error class should be captured to Sentry.
    ///
    /// Checkout aborts and client mistakes are expected traffic; only
    /// infrastructure-level failures go to error tracking.
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Session(_)
                | Self::Internal(_)
                | Self::CafeApi(
                    CafeApiError::Http(_) | CafeApiError::Parse(_) | CafeApiError::Upstream { .. }
                )
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::CafeApi(err) => match err {
                CafeApiError::NotFound(_) => StatusCode::NOT_FOUND,
                CafeApiError::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                CafeApiError::RateLimited(_) => StatusCode::SERVICE_UNAVAILABLE,
                CafeApiError::Http(_) | CafeApiError::Parse(_) | CafeApiError::Upstream { .. } => {
                    StatusCode::BAD_GATEWAY
                }
            },
            Self::Checkout(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients.
        let body = match &self {
            Self::Checkout(err) => ErrorBody {
                message: err.user_message().to_string(),
                retryable: true,
                reset_local_cart: err.reset_local_cart(),
            },
            Self::CafeApi(err) => ErrorBody {
                message: match err {
                    CafeApiError::NotFound(what) => format!("Not found: {what}"),
                    CafeApiError::Rejected { message, .. } => message.clone(),
                    CafeApiError::RateLimited(_) => {
                        "We're a little busy right now, please try again shortly".to_string()
                    }
                    _ => "External service error".to_string(),
                },
                retryable: !matches!(err, CafeApiError::NotFound(_) | CafeApiError::Rejected { .. }),
                reset_local_cart: false,
            },
            Self::Session(_) | Self::Internal(_) => ErrorBody {
                message: "Internal server error".to_string(),
                retryable: true,
                reset_local_cart: false,
            },
            Self::NotFound(what) => ErrorBody {
                message: format!("Not found: {what}"),
                retryable: false,
                reset_local_cart: false,
            },
            Self::BadRequest(msg) => ErrorBody {
                message: msg.clone(),
                retryable: false,
                reset_local_cart: false,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
