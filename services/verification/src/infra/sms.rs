use anyhow::Context as _;
use serde::Deserialize;

use crate::domain::otp::mask_target;
use crate::domain::repository::SmsSender;
use crate::error::VerificationServiceError;

pub const TWILIO_API_BASE: &str = "https://api.twilio.com";

/// Twilio account credentials and sending number.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    /// Scheme and host of the REST API, normally `TWILIO_API_BASE`.
    pub api_base: String,
}

impl TwilioConfig {
    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            self.account_sid
        )
    }
}

/// SMS sender backed by Twilio's Messages API.
#[derive(Clone)]
pub struct TwilioSmsSender {
    http: reqwest::Client,
    config: TwilioConfig,
}

#[derive(Deserialize)]
struct TwilioMessage {
    sid: String,
}

impl TwilioSmsSender {
    pub fn new(http: reqwest::Client, config: TwilioConfig) -> Self {
        Self { http, config }
    }
}

impl SmsSender for TwilioSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), VerificationServiceError> {
        let params = [
            ("To", to),
            ("From", self.config.from_number.as_str()),
            ("Body", body),
        ];
        let res = self
            .http
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .context("twilio request")?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "twilio rejected sms: status={} body={text}",
                status.as_u16()
            )
            .into());
        }
        // 2xx means Twilio accepted the message; the body only carries the sid.
        match res.json::<TwilioMessage>().await {
            Ok(message) => {
                tracing::debug!(to = %mask_target(to), sid = %message.sid, "sms sent");
            }
            Err(e) => {
                tracing::warn!(
                    to = %mask_target(to),
                    error = %e,
                    "sms sent but twilio response could not be decoded"
                );
            }
        }
        Ok(())
    }
}

/// Development SMS sender: logs instead of sending.
#[derive(Clone, Default)]
pub struct LogSmsSender;

impl SmsSender for LogSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), VerificationServiceError> {
        tracing::warn!(
            to = %mask_target(to),
            body = %body,
            "sms provider not configured; message logged instead of sent"
        );
        Ok(())
    }
}

/// SMS transport chosen at startup.
#[derive(Clone)]
pub enum SmsTransport {
    Twilio(TwilioSmsSender),
    Log(LogSmsSender),
}

impl SmsSender for SmsTransport {
    async fn send(&self, to: &str, body: &str) -> Result<(), VerificationServiceError> {
        match self {
            Self::Twilio(sender) => sender.send(to, body).await,
            Self::Log(sender) => sender.send(to, body).await,
        }
    }
}
