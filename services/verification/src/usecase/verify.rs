use chrono::Utc;

use crate::domain::otp::mask_target;
use crate::domain::repository::VerificationCodeRepository;
use crate::domain::types::{
    OtpPolicy, TargetType, Transition, VerificationCode, VerifiedTarget,
};
use crate::error::VerificationServiceError;

pub struct VerifyCodeInput {
    pub user_id: String,
    pub target_type: TargetType,
    pub code: String,
}

pub struct VerifyCodeUseCase<R>
where
    R: VerificationCodeRepository,
{
    pub codes: R,
    pub policy: OtpPolicy,
}

impl<R> VerifyCodeUseCase<R>
where
    R: VerificationCodeRepository,
{
    /// Every write is conditional on the snapshot it was decided from. When a
    /// concurrent request changed the code first, the record is re-read and the
    /// submission evaluated again, so parallel submissions behave as if serial.
    pub async fn execute(
        &self,
        input: VerifyCodeInput,
    ) -> Result<VerifiedTarget, VerificationServiceError> {
        let mut record = self.latest(&input).await?;

        loop {
            let now = Utc::now();
            let outcome = match record.evaluate(&input.code, now, self.policy.max_attempts) {
                Transition::Consume => {
                    if self
                        .codes
                        .mark_consumed(record.id, record.attempts, now)
                        .await?
                    {
                        tracing::info!(
                            user_id = %record.user_id,
                            target_type = %record.target_type,
                            target = %mask_target(&record.target_value),
                            "verification code consumed"
                        );
                        return Ok(VerifiedTarget {
                            target_type: record.target_type,
                            target_value: record.target_value,
                        });
                    }
                    None
                }
                Transition::Reject(err) => Some(err),
                Transition::Discard(err) => {
                    self.codes.delete(record.id).await?;
                    Some(err)
                }
                Transition::Fail {
                    attempts,
                    exhausted,
                } => {
                    if !self
                        .codes
                        .increment_attempts(record.id, record.attempts)
                        .await?
                    {
                        None
                    } else if exhausted {
                        self.codes.delete(record.id).await?;
                        Some(VerificationServiceError::MaxAttemptsExceeded)
                    } else {
                        tracing::debug!(
                            user_id = %record.user_id,
                            attempts,
                            "failed attempt counted"
                        );
                        Some(VerificationServiceError::InvalidCode)
                    }
                }
            };

            let Some(rejection) = outcome else {
                tracing::debug!(
                    user_id = %record.user_id,
                    target_type = %record.target_type,
                    "verification code changed concurrently, re-evaluating"
                );
                record = self.latest(&input).await?;
                continue;
            };

            tracing::warn!(
                user_id = %record.user_id,
                target_type = %record.target_type,
                kind = rejection.kind(),
                "verification code rejected"
            );
            return Err(rejection);
        }
    }

    async fn latest(
        &self,
        input: &VerifyCodeInput,
    ) -> Result<VerificationCode, VerificationServiceError> {
        self.codes
            .find_latest(&input.user_id, input.target_type)
            .await?
            .ok_or(VerificationServiceError::NoCodeRequested)
    }
}
