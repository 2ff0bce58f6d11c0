use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::otp::{codes_match, hash_code, normalize_email, normalize_phone};
use crate::error::VerificationServiceError;

/// Default code lifetime in seconds.
pub const DEFAULT_OTP_TTL_SECS: i64 = 600;

/// Longest accepted code lifetime (one day).
pub const MAX_OTP_TTL_SECS: i64 = 86_400;

/// Default number of failed attempts before a code is discarded.
pub const DEFAULT_OTP_MAX_ATTEMPTS: i32 = 5;

/// Contact channel a code proves control of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Email,
    Phone,
}

impl TargetType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }

    pub fn normalize(self, raw: &str) -> String {
        match self {
            Self::Email => normalize_email(raw),
            Self::Phone => normalize_phone(raw),
        }
    }

    /// Delivery medium used for this target.
    pub fn channel(self) -> Channel {
        match self {
            Self::Email => Channel::Email,
            Self::Phone => Channel::Sms,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = VerificationServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            _ => Err(VerificationServiceError::InvalidTarget),
        }
    }
}

/// Delivery medium label. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
        }
    }
}

impl FromStr for Channel {
    type Err = VerificationServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "sms" => Ok(Self::Sms),
            _ => Err(VerificationServiceError::InvalidTarget),
        }
    }
}

/// Code lifetime and attempt budget.
#[derive(Debug, Clone, Copy)]
pub struct OtpPolicy {
    pub ttl_secs: i64,
    pub max_attempts: i32,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_OTP_TTL_SECS,
            max_attempts: DEFAULT_OTP_MAX_ATTEMPTS,
        }
    }
}

impl OtpPolicy {
    /// Lifetime in whole minutes for user-facing messages, rounded up, at least one.
    pub fn ttl_minutes(&self) -> i64 {
        ((self.ttl_secs + 59) / 60).max(1)
    }
}

/// Stored one-time code. Holds only the hash of the code.
#[derive(Debug, Clone)]
pub struct VerificationCode {
    pub id: Uuid,
    pub user_id: String,
    pub target_type: TargetType,
    pub target_value: String,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: i32,
    pub consumed_at: Option<DateTime<Utc>>,
    pub channel: Channel,
    pub created_at: DateTime<Utc>,
}

/// What a verification attempt does to the stored code.
#[derive(Debug)]
pub enum Transition {
    /// Code matched: mark it consumed.
    Consume,
    /// Leave the record untouched and reject.
    Reject(VerificationServiceError),
    /// Delete the record and reject.
    Discard(VerificationServiceError),
    /// Count a failed attempt. `exhausted` means the new count used up the
    /// budget and the record goes once the count is stored.
    Fail { attempts: i32, exhausted: bool },
}

impl VerificationCode {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.consumed_at.is_none() && now < self.expires_at
    }

    /// Decide the outcome of submitting `submitted` at `now`.
    ///
    /// Checks run in order: consumed, expired, exhausted, then the hash comparison.
    pub fn evaluate(&self, submitted: &str, now: DateTime<Utc>, max_attempts: i32) -> Transition {
        if self.consumed_at.is_some() {
            return Transition::Reject(VerificationServiceError::AlreadyUsed);
        }
        if now >= self.expires_at {
            return Transition::Discard(VerificationServiceError::Expired);
        }
        if self.attempts >= max_attempts {
            return Transition::Discard(VerificationServiceError::MaxAttemptsExceeded);
        }
        if codes_match(&hash_code(submitted), &self.code_hash) {
            return Transition::Consume;
        }
        let attempts = self.attempts + 1;
        Transition::Fail {
            attempts,
            exhausted: attempts >= max_attempts,
        }
    }
}

/// Outbound email handed to a `Mailer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

/// Result of a successful issuance. Never carries the plaintext code.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub target_type: TargetType,
    pub target_value: String,
    pub expires_at: DateTime<Utc>,
}

/// Destination confirmed by a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedTarget {
    pub target_type: TargetType,
    pub target_value: String,
}
