//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use http::request::Parts;

use starshield_core::error::AppError;

/// Header carrying the authenticated user id (admin or affiliate).
pub const X_STARSHIELD_USER_ID: &str = "x-starshield-user-id";

/// User identity injected by the gateway via the `x-starshield-user-id` header.
///
/// Returns 401 if the header is absent, not valid UTF-8, or blank.
#[derive(Debug, Clone)]
pub struct IdentityHeaders {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = AppError;

    // Values are pulled out synchronously so the returned future is 'static.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get(X_STARSHIELD_USER_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        async move {
            let user_id = user_id.ok_or(AppError::Unauthorized)?;
            Ok(Self { user_id })
        }
    }
}
