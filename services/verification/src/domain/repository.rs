#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{EmailMessage, TargetType, VerificationCode};
use crate::error::VerificationServiceError;

/// Repository for stored verification codes, keyed by (user id, target type).
pub trait VerificationCodeRepository: Send + Sync {
    /// Most recently created code for the key, consumed or not.
    async fn find_latest(
        &self,
        user_id: &str,
        target_type: TargetType,
    ) -> Result<Option<VerificationCode>, VerificationServiceError>;

    /// Delete every code for the new code's key and insert it, atomically.
    async fn replace_for_target(
        &self,
        code: &VerificationCode,
    ) -> Result<(), VerificationServiceError>;

    /// Add one failed attempt if the code is unconsumed and still has
    /// `expected` attempts. Returns `false` when another request changed it first.
    async fn increment_attempts(
        &self,
        id: Uuid,
        expected: i32,
    ) -> Result<bool, VerificationServiceError>;

    /// Set consumed_at if the code is unconsumed and still has `expected`
    /// attempts. Returns `false` when another request changed it first.
    async fn mark_consumed(
        &self,
        id: Uuid,
        expected: i32,
        consumed_at: DateTime<Utc>,
    ) -> Result<bool, VerificationServiceError>;

    async fn delete(&self, id: Uuid) -> Result<(), VerificationServiceError>;
}

/// Port for outbound email.
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), VerificationServiceError>;
}

/// Port for outbound SMS.
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), VerificationServiceError>;
}
