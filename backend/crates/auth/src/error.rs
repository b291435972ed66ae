//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::docstore::DocStoreError;
use platform::password::PasswordPolicyError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Required request field absent or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Input failed validation
    #[error("{0}")]
    Validation(String),

    /// Password does not meet the policy
    #[error(transparent)]
    PasswordPolicy(#[from] PasswordPolicyError),

    /// No session token presented
    #[error("Authentication required")]
    Unauthenticated,

    /// Token does not match any session
    #[error("Invalid session")]
    SessionInvalid,

    /// Session found but past its expiry
    #[error("Session expired")]
    SessionExpired,

    /// Invalid credentials (wrong password)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Account is not active
    #[error("Account is disabled")]
    AccountDisabled,

    /// Email already registered
    #[error("Email is already registered")]
    EmailTaken,

    /// Document store failure
    #[error("Document store error: {0}")]
    Store(#[from] DocStoreError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingField(_)
            | AuthError::Validation(_)
            | AuthError::PasswordPolicy(_) => ErrorKind::BadRequest,
            AuthError::Unauthenticated
            | AuthError::SessionInvalid
            | AuthError::SessionExpired
            | AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::AccountDisabled => ErrorKind::Forbidden,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::Store(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures carry a generic message; the detail is only logged.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Store(_) | AuthError::Internal(_) => {
                AppError::internal("An unexpected error occurred")
                    .with_action("Please try again later")
            }
            AuthError::Unauthenticated | AuthError::SessionInvalid | AuthError::SessionExpired => {
                AppError::new(self.kind(), self.to_string()).with_action("Please log in again")
            }
            AuthError::PasswordPolicy(PasswordPolicyError::TooShort { .. }) => {
                AppError::new(self.kind(), self.to_string())
                    .with_action("Please choose a longer password")
            }
            AuthError::PasswordPolicy(PasswordPolicyError::TooLong { .. }) => {
                AppError::new(self.kind(), self.to_string())
                    .with_action("Please choose a shorter password")
            }
            AuthError::EmailTaken => AppError::new(self.kind(), self.to_string())
                .with_action("Log in or use a different email"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Store(e) => {
                tracing::error!(error = %e, "Auth document store error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountDisabled => {
                tracing::warn!("Login attempt on disabled account");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::MissingField("email").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::SessionInvalid.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::SessionExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AuthError::AccountDisabled.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let err = AuthError::Internal("pool exhausted at 10.0.0.3".into());
        let app = err.to_app_error();
        assert!(!app.message().contains("10.0.0.3"));
        assert!(app.is_server_error());
    }

    #[test]
    fn test_password_policy_maps_to_bad_request() {
        let err: AuthError = PasswordPolicyError::TooShort { min: 6, actual: 3 }.into();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert!(err.to_app_error().action().is_some());
    }
}
