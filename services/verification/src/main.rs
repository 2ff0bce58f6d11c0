use sea_orm::Database;
use tracing::info;

use starshield_core::tracing::init_tracing;
use starshield_verification::config::VerificationConfig;
use starshield_verification::infra::mail::{LogMailer, MailTransport, SendgridMailer};
use starshield_verification::infra::sms::{LogSmsSender, SmsTransport, TwilioSmsSender};
use starshield_verification::router::build_router;
use starshield_verification::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing("info,starshield_verification=debug");

    let config = VerificationConfig::from_env();
    let policy = config.otp_policy();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let http = reqwest::Client::new();
    let mailer = match config.sendgrid.clone() {
        Some(sendgrid) => MailTransport::Sendgrid(SendgridMailer::new(http.clone(), sendgrid)),
        None => {
            tracing::warn!("SENDGRID_API_KEY not set; verification emails will only be logged");
            MailTransport::Log(LogMailer)
        }
    };
    let sms = match config.twilio.clone() {
        Some(twilio) => SmsTransport::Twilio(TwilioSmsSender::new(http, twilio)),
        None => {
            tracing::warn!("TWILIO_ACCOUNT_SID not set; verification SMS will only be logged");
            SmsTransport::Log(LogSmsSender)
        }
    };

    let state = AppState {
        db,
        mailer,
        sms,
        policy,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(
        ttl_secs = policy.ttl_secs,
        max_attempts = policy.max_attempts,
        "verification service listening on {addr}"
    );
    axum::serve(listener, router).await.expect("server error");
}
