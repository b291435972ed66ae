//! Page Error Types
//!
//! Page-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::docstore::DocStoreError;
use thiserror::Error;

use crate::domain::value_objects::SlugError;

/// Page-specific result type alias
pub type PageResult<T> = Result<T, PageError>;

/// Page-specific error variants
#[derive(Debug, Error)]
pub enum PageError {
    /// Required request field absent or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Input failed validation
    #[error("{0}")]
    Validation(String),

    /// Slug breaks the slug rules
    #[error(transparent)]
    InvalidSlug(#[from] SlugError),

    /// Slug used by another page
    #[error("Slug is already taken")]
    SlugTaken,

    /// Unknown page id or slug
    #[error("Landing page not found")]
    NotFound,

    /// Page belongs to another user
    #[error("You do not have access to this landing page")]
    Forbidden,

    /// Page changed since the caller read it
    #[error("Landing page was modified (expected revision {expected}, current {actual})")]
    RevisionConflict { expected: u64, actual: u64 },

    /// Document store failure
    #[error("Document store error: {0}")]
    Store(#[from] DocStoreError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PageError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PageError::MissingField(_) | PageError::Validation(_) | PageError::InvalidSlug(_) => {
                ErrorKind::BadRequest
            }
            PageError::SlugTaken | PageError::RevisionConflict { .. } => ErrorKind::Conflict,
            PageError::NotFound => ErrorKind::NotFound,
            PageError::Forbidden => ErrorKind::Forbidden,
            PageError::Store(_) | PageError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            PageError::Store(_) | PageError::Internal(_) => {
                AppError::internal("An unexpected error occurred")
                    .with_action("Please try again later")
            }
            PageError::SlugTaken => AppError::new(self.kind(), self.to_string())
                .with_action("Choose a different slug"),
            PageError::RevisionConflict { .. } => AppError::new(self.kind(), self.to_string())
                .with_action("Reload the page and apply your changes again"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            PageError::Store(e) => {
                tracing::error!(error = %e, "Page document store error");
            }
            PageError::Internal(msg) => {
                tracing::error!(message = %msg, "Page internal error");
            }
            PageError::Forbidden => {
                tracing::warn!("Landing page access denied");
            }
            _ => {
                tracing::debug!(error = %self, "Page error");
            }
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
