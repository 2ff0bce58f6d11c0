use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::otp::{generate_code, hash_code, mask_target};
use crate::domain::repository::{Mailer, SmsSender, VerificationCodeRepository};
use crate::domain::types::{EmailMessage, IssuedCode, OtpPolicy, TargetType, VerificationCode};
use crate::error::VerificationServiceError;

const EMAIL_SUBJECT: &str = "Your StarShield verification code";

fn minutes_label(minutes: i64) -> String {
    if minutes == 1 {
        "1 minute".to_owned()
    } else {
        format!("{minutes} minutes")
    }
}

fn email_message(to: &str, code: &str, minutes: i64) -> EmailMessage {
    let expiry = minutes_label(minutes);
    EmailMessage {
        to: to.to_owned(),
        subject: EMAIL_SUBJECT.to_owned(),
        text: format!("Your StarShield verification code is {code}. It expires in {expiry}."),
        html: Some(format!(
            "<p>Your StarShield verification code is <strong>{code}</strong>.</p>\
             <p>It expires in {expiry}.</p>"
        )),
    }
}

fn sms_body(code: &str, minutes: i64) -> String {
    format!(
        "Your StarShield verification code is {code}. It expires in {}.",
        minutes_label(minutes)
    )
}

pub struct IssueCodeInput {
    pub user_id: String,
    pub target_type: TargetType,
    pub value: String,
}

pub struct IssueCodeUseCase<R, M, S>
where
    R: VerificationCodeRepository,
    M: Mailer,
    S: SmsSender,
{
    pub codes: R,
    pub mailer: M,
    pub sms: S,
    pub policy: OtpPolicy,
}

impl<R, M, S> IssueCodeUseCase<R, M, S>
where
    R: VerificationCodeRepository,
    M: Mailer,
    S: SmsSender,
{
    pub async fn execute(
        &self,
        input: IssueCodeInput,
    ) -> Result<IssuedCode, VerificationServiceError> {
        // 1. Normalize → 400 if nothing is left
        let target_value = input.target_type.normalize(&input.value);
        if target_value.is_empty() {
            return Err(VerificationServiceError::InvalidTarget);
        }

        // 2. Generate code + record (hash only)
        let plain = generate_code();
        let now = Utc::now();
        let code = VerificationCode {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            target_type: input.target_type,
            target_value,
            code_hash: hash_code(&plain),
            expires_at: now + Duration::seconds(self.policy.ttl_secs),
            attempts: 0,
            consumed_at: None,
            channel: input.target_type.channel(),
            created_at: now,
        };

        // 3. Drop prior codes for this key and insert, in one transaction
        self.codes.replace_for_target(&code).await?;

        tracing::info!(
            user_id = %code.user_id,
            target_type = %code.target_type,
            target = %mask_target(&code.target_value),
            expires_at = %code.expires_at,
            "verification code issued"
        );

        // 4. Dispatch. A failure leaves the record in place; re-issuing replaces it.
        let minutes = self.policy.ttl_minutes();
        let dispatched = match code.target_type {
            TargetType::Email => {
                self.mailer
                    .send(&email_message(&code.target_value, &plain, minutes))
                    .await
            }
            TargetType::Phone => {
                self.sms
                    .send(&code.target_value, &sms_body(&plain, minutes))
                    .await
            }
        };
        if let Err(e) = dispatched {
            tracing::warn!(
                user_id = %code.user_id,
                channel = code.channel.as_str(),
                error = ?e,
                "verification code dispatch failed"
            );
            return Err(e);
        }

        Ok(IssuedCode {
            target_type: code.target_type,
            target_value: code.target_value,
            expires_at: code.expires_at,
        })
    }
}
