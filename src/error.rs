use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API-wide error taxonomy. Every variant renders as `{"error": "<message>"}`
/// with its mapped status; internal detail is logged server-side only.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No token provided")]
    AuthMissing,
    #[error("Invalid token")]
    AuthInvalid,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Unauthorized")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("Failed to generate letter. Please try again.")]
    Upstream(anyhow::Error),
    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::AuthMissing | Self::AuthInvalid | Self::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(e) => error!(error = %e, "internal error"),
            Self::Upstream(e) => error!(error = %e, "upstream generation failed"),
            _ => {}
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_taxonomy() {
        assert_eq!(ApiError::AuthMissing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::AuthInvalid.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("User not found".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("User already exists".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Validation("Coupon has expired".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_message_leaks_no_detail() {
        let err = ApiError::Internal(anyhow::anyhow!("connection refused to 10.0.0.1"));
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn upstream_message_is_fixed() {
        let err = ApiError::Upstream(anyhow::anyhow!("timeout"));
        assert_eq!(err.to_string(), "Failed to generate letter. Please try again.");
    }
}
