use axum::http::StatusCode;
use axum_test::TestServer;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::{Value, json};

use starshield_testing::auth::MockAuth;
use starshield_verification::domain::types::OtpPolicy;
use starshield_verification::infra::mail::{LogMailer, MailTransport};
use starshield_verification::infra::sms::{LogSmsSender, SmsTransport};
use starshield_verification::router::build_router;
use starshield_verification::state::AppState;

fn server_with(db: DatabaseConnection) -> TestServer {
    let state = AppState {
        db,
        mailer: MailTransport::Log(LogMailer),
        sms: SmsTransport::Log(LogSmsSender),
        policy: OtpPolicy::default(),
    };
    TestServer::new(build_router(state)).unwrap()
}

/// Router over a disconnected database: only paths that reject before storage work.
fn server() -> TestServer {
    server_with(DatabaseConnection::Disconnected)
}

fn with_identity(mut request: axum_test::TestRequest, auth: &MockAuth) -> axum_test::TestRequest {
    for (name, value) in auth.headers().iter() {
        request = request.add_header(name.clone(), value.clone());
    }
    request
}

#[tokio::test]
async fn should_answer_liveness_without_database() {
    assert_eq!(server().get("/healthz").await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    assert_eq!(
        server().get("/readyz").await.status_code(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn should_report_ready_when_database_answers() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    assert_eq!(
        server_with(db).get("/readyz").await.status_code(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn should_tag_responses_with_request_id() {
    let response = server().get("/healthz").await;
    let id = response.header("x-request-id");
    assert!(id.to_str().unwrap().parse::<uuid::Uuid>().is_ok());
}

#[tokio::test]
async fn should_reject_send_without_identity() {
    let response = server()
        .post("/verification/email/send")
        .json(&json!({ "value": "user@example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["kind"], "UNAUTHORIZED");
}

#[tokio::test]
async fn should_reject_verify_without_identity() {
    let response = server()
        .post("/verification/phone/verify")
        .json(&json!({ "code": "123456" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_unknown_target_type() {
    let server = server();
    let auth = MockAuth::new("u1");
    let request = server
        .post("/verification/fax/send")
        .json(&json!({ "value": "+14155550100" }));

    let response = with_identity(request, &auth).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_TARGET");
    assert_eq!(body["message"], "invalid verification target");
}

#[tokio::test]
async fn should_reject_blank_target_value() {
    let server = server();
    let auth = MockAuth::new("u1");
    let request = server
        .post("/verification/phone/send")
        .json(&json!({ "value": " \t " }));

    let response = with_identity(request, &auth).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_TARGET");
}

#[tokio::test]
async fn should_return_json_not_found_for_unknown_routes() {
    let response = server().get("/verification").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["kind"], "NOT_FOUND");
}
