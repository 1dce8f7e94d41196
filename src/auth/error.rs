use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::auth::dto::ApiResponse;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid OTP")]
    InvalidOtp,

    #[error("OTP Expired")]
    ExpiredOtp,

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Validation(msg) | AuthError::Conflict(msg) => {
                (StatusCode::BAD_REQUEST, msg)
            }
            AuthError::InvalidCredentials
            | AuthError::UserNotFound
            | AuthError::InvalidOtp
            | AuthError::ExpiredOtp => (StatusCode::BAD_REQUEST, self.to_string()),
            AuthError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AuthError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ApiResponse::err(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_bad_request() {
        for err in [
            AuthError::Validation("Missing Details".into()),
            AuthError::Conflict("User Already Exists".into()),
            AuthError::InvalidCredentials,
            AuthError::UserNotFound,
            AuthError::InvalidOtp,
            AuthError::ExpiredOtp,
        ] {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn unauthorized_is_401() {
        let err = AuthError::Unauthorized("Unauthorized: No token provided".into());
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_is_500_with_generic_message() {
        let err = AuthError::Internal(anyhow::anyhow!("db exploded"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
