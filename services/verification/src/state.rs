use sea_orm::DatabaseConnection;

use crate::domain::types::OtpPolicy;
use crate::infra::db::DbVerificationCodeRepository;
use crate::infra::mail::MailTransport;
use crate::infra::sms::SmsTransport;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub mailer: MailTransport,
    pub sms: SmsTransport,
    pub policy: OtpPolicy,
}

impl AppState {
    pub fn code_repo(&self) -> DbVerificationCodeRepository {
        DbVerificationCodeRepository {
            db: self.db.clone(),
        }
    }
}
