//! Mock auth helpers for integration tests.
//!
//! Services behind the gateway receive an `x-starshield-user-id` header injected
//! by the gateway. In tests, `MockAuth` produces that header directly so no real
//! gateway is needed.

use http::{HeaderMap, HeaderName, HeaderValue};

use starshield_auth_types::identity::X_STARSHIELD_USER_ID;

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: String,
}

impl MockAuth {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static(X_STARSHIELD_USER_ID),
            HeaderValue::from_str(&self.user_id).expect("user id must be a valid header value"),
        );
        map
    }
}
