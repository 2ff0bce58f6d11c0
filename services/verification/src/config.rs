use crate::domain::types::{
    DEFAULT_OTP_MAX_ATTEMPTS, DEFAULT_OTP_TTL_SECS, MAX_OTP_TTL_SECS, OtpPolicy,
};
use crate::infra::mail::SendgridConfig;
use crate::infra::sms::{TWILIO_API_BASE, TwilioConfig};

/// Verification service configuration loaded from environment variables.
#[derive(Debug)]
pub struct VerificationConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on (default 3120). Env var: `VERIFICATION_PORT`.
    pub port: u16,
    /// Code lifetime in seconds (default 600). Env var: `OTP_TTL_SECONDS`.
    pub otp_ttl_secs: i64,
    /// Failed attempts before a code is discarded (default 5). Env var: `OTP_MAX_ATTEMPTS`.
    pub otp_max_attempts: i32,
    /// Set when `SENDGRID_API_KEY` is present; emails are only logged otherwise.
    pub sendgrid: Option<SendgridConfig>,
    /// Set when `TWILIO_ACCOUNT_SID` is present; SMS are only logged otherwise.
    pub twilio: Option<TwilioConfig>,
}

fn var_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl VerificationConfig {
    pub fn from_env() -> Self {
        let sendgrid = std::env::var("SENDGRID_API_KEY")
            .ok()
            .map(|api_key| SendgridConfig {
                api_key,
                from_email: std::env::var("MAIL_FROM_EMAIL").expect("MAIL_FROM_EMAIL"),
                from_name: std::env::var("MAIL_FROM_NAME")
                    .unwrap_or_else(|_| "StarShield".to_owned()),
            });
        let twilio = std::env::var("TWILIO_ACCOUNT_SID")
            .ok()
            .map(|account_sid| TwilioConfig {
                account_sid,
                auth_token: std::env::var("TWILIO_AUTH_TOKEN").expect("TWILIO_AUTH_TOKEN"),
                from_number: std::env::var("TWILIO_FROM_NUMBER").expect("TWILIO_FROM_NUMBER"),
                api_base: std::env::var("TWILIO_API_BASE")
                    .unwrap_or_else(|_| TWILIO_API_BASE.to_owned()),
            });

        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            port: var_or("VERIFICATION_PORT", 3120),
            otp_ttl_secs: var_or("OTP_TTL_SECONDS", DEFAULT_OTP_TTL_SECS),
            otp_max_attempts: var_or("OTP_MAX_ATTEMPTS", DEFAULT_OTP_MAX_ATTEMPTS),
            sendgrid,
            twilio,
        }
    }

    /// Usecase-facing policy. Out-of-range values fall back to the defaults:
    /// TTL must be within 1..=MAX_OTP_TTL_SECS, attempts must be positive.
    pub fn otp_policy(&self) -> OtpPolicy {
        let defaults = OtpPolicy::default();
        OtpPolicy {
            ttl_secs: if (1..=MAX_OTP_TTL_SECS).contains(&self.otp_ttl_secs) {
                self.otp_ttl_secs
            } else {
                tracing::warn!(
                    configured = self.otp_ttl_secs,
                    fallback = defaults.ttl_secs,
                    "OTP_TTL_SECONDS out of range, using default"
                );
                defaults.ttl_secs
            },
            max_attempts: if self.otp_max_attempts > 0 {
                self.otp_max_attempts
            } else {
                defaults.max_attempts
            },
        }
    }
}
