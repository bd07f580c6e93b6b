//! Custom error types for the storefront service
//!
//! Every failure surfaced to a client is one of these variants, mapped to an
//! HTTP status and a short JSON message. Store and library failures are
//! logged at the handler boundary and collapsed into `ServerError` so that
//! internal detail never reaches the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the storefront service
#[derive(Error, Debug, PartialEq)]
pub enum ApiError {
    /// Registration or admin create with an email that is already taken
    #[error("User already exists")]
    DuplicateAccount,

    /// Login failure. One variant for both unknown email and wrong
    /// password, so responses do not leak account existence.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No bearer token on a protected route
    #[error("No token provided")]
    MissingToken,

    /// Token present but signature verification failed or the token expired
    #[error("Invalid token")]
    InvalidToken,

    /// Caller's role does not permit the operation
    #[error("Admin access required")]
    ForbiddenRole,

    /// Role value outside the closed {admin, user} set
    #[error("Invalid role")]
    InvalidRole,

    /// Admin attempted a role change or deletion targeting themselves
    #[error("{0}")]
    CannotModifySelf(&'static str),

    /// Target resource does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Request payload failed validation
    #[error("{0}")]
    Validation(String),

    /// Unexpected store or library failure
    #[error("Server error")]
    ServerError,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::DuplicateAccount
            | ApiError::InvalidCredentials
            | ApiError::InvalidRole
            | ApiError::CannotModifySelf(_)
            | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingToken | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::ForbiddenRole => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::DuplicateAccount.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::MissingToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::ForbiddenRole.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::InvalidRole.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::CannotModifySelf("Cannot change your own role").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("User").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::ServerError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_do_not_distinguish_credential_failures() {
        // Unknown email and wrong password must be indistinguishable.
        assert_eq!(ApiError::InvalidCredentials.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(ApiError::NotFound("Spice").to_string(), "Spice not found");
    }
}
