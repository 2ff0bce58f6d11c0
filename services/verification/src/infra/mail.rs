use anyhow::Context as _;
use serde::Serialize;

use crate::domain::otp::mask_target;
use crate::domain::repository::Mailer;
use crate::domain::types::EmailMessage;
use crate::error::VerificationServiceError;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// SendGrid credentials and sender identity.
#[derive(Debug, Clone)]
pub struct SendgridConfig {
    pub api_key: String,
    pub from_email: String,
    pub from_name: String,
}

/// Mailer backed by the SendGrid v3 mail API.
#[derive(Clone)]
pub struct SendgridMailer {
    http: reqwest::Client,
    config: SendgridConfig,
}

impl SendgridMailer {
    pub fn new(http: reqwest::Client, config: SendgridConfig) -> Self {
        Self { http, config }
    }

    fn payload<'a>(&'a self, message: &'a EmailMessage) -> SgMail<'a> {
        let mut content = vec![SgContent {
            r#type: "text/plain",
            value: &message.text,
        }];
        if let Some(html) = &message.html {
            content.push(SgContent {
                r#type: "text/html",
                value: html,
            });
        }
        SgMail {
            personalizations: vec![SgPersonalization {
                to: vec![SgEmail {
                    email: &message.to,
                    name: None,
                }],
            }],
            from: SgEmail {
                email: &self.config.from_email,
                name: Some(&self.config.from_name),
            },
            subject: &message.subject,
            content,
        }
    }
}

impl Mailer for SendgridMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), VerificationServiceError> {
        let res = self
            .http
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.config.api_key)
            .json(&self.payload(message))
            .send()
            .await
            .context("sendgrid request")?;

        // SendGrid answers 202 Accepted on success.
        if res.status() == reqwest::StatusCode::ACCEPTED {
            tracing::debug!(to = %mask_target(&message.to), "email sent");
            return Ok(());
        }
        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        Err(anyhow::anyhow!("sendgrid rejected mail: status={status} body={body}").into())
    }
}

/// Development mailer: logs instead of sending.
#[derive(Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), VerificationServiceError> {
        tracing::warn!(
            to = %mask_target(&message.to),
            subject = %message.subject,
            text = %message.text,
            "mail provider not configured; email logged instead of sent"
        );
        Ok(())
    }
}

/// Mail transport chosen at startup.
#[derive(Clone)]
pub enum MailTransport {
    Sendgrid(SendgridMailer),
    Log(LogMailer),
}

impl Mailer for MailTransport {
    async fn send(&self, message: &EmailMessage) -> Result<(), VerificationServiceError> {
        match self {
            Self::Sendgrid(mailer) => mailer.send(message).await,
            Self::Log(mailer) => mailer.send(message).await,
        }
    }
}

#[derive(Serialize)]
struct SgMail<'a> {
    personalizations: Vec<SgPersonalization<'a>>,
    from: SgEmail<'a>,
    subject: &'a str,
    content: Vec<SgContent<'a>>,
}

#[derive(Serialize)]
struct SgPersonalization<'a> {
    to: Vec<SgEmail<'a>>,
}

#[derive(Serialize)]
struct SgEmail<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct SgContent<'a> {
    r#type: &'static str,
    value: &'a str,
}
