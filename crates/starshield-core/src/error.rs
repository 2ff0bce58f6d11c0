use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors shared by every StarShield service, independent of its domain.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Render an error as the `{ "kind", "message" }` body every service returns.
pub fn error_body(kind: &str, message: impl Into<String>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "kind": kind,
        "message": message.into(),
    }))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // 4xx are expected client errors and already visible through TraceLayer.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        (self.status(), error_body(self.kind(), self.to_string())).into_response()
    }
}

/// Fallback for unmatched routes.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
