use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use starshield_core::error::error_body;

/// Verification service error variants.
///
/// Every rejection a user can cause is a `400 Bad Request`, told apart by its message.
#[derive(Debug, thiserror::Error)]
pub enum VerificationServiceError {
    #[error("no verification code requested")]
    NoCodeRequested,
    #[error("verification code already used")]
    AlreadyUsed,
    #[error("verification code expired")]
    Expired,
    #[error("maximum verification attempts exceeded")]
    MaxAttemptsExceeded,
    #[error("invalid verification code")]
    InvalidCode,
    #[error("invalid verification target")]
    InvalidTarget,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl VerificationServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoCodeRequested => "NO_CODE_REQUESTED",
            Self::AlreadyUsed => "CODE_ALREADY_USED",
            Self::Expired => "CODE_EXPIRED",
            Self::MaxAttemptsExceeded => "MAX_ATTEMPTS_EXCEEDED",
            Self::InvalidCode => "INVALID_CODE",
            Self::InvalidTarget => "INVALID_TARGET",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for VerificationServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        (status, error_body(self.kind(), self.to_string())).into_response()
    }
}
