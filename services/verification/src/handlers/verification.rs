use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use starshield_auth_types::identity::IdentityHeaders;
use starshield_core::serde::to_rfc3339_ms;

use crate::domain::types::TargetType;
use crate::error::VerificationServiceError;
use crate::state::AppState;
use crate::usecase::issue::{IssueCodeInput, IssueCodeUseCase};
use crate::usecase::verify::{VerifyCodeInput, VerifyCodeUseCase};

// ── POST /verification/{target}/send ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendCodeRequest {
    pub value: String,
}

#[derive(Serialize)]
pub struct SendCodeResponse {
    pub target_type: TargetType,
    pub target_value: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
}

pub async fn send_code(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Path(target): Path<String>,
    Json(body): Json<SendCodeRequest>,
) -> Result<(StatusCode, Json<SendCodeResponse>), VerificationServiceError> {
    let target_type: TargetType = target.parse()?;
    let usecase = IssueCodeUseCase {
        codes: state.code_repo(),
        mailer: state.mailer.clone(),
        sms: state.sms.clone(),
        policy: state.policy,
    };
    let issued = usecase
        .execute(IssueCodeInput {
            user_id: identity.user_id,
            target_type,
            value: body.value,
        })
        .await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(SendCodeResponse {
            target_type: issued.target_type,
            target_value: issued.target_value,
            expires_at: issued.expires_at,
        }),
    ))
}

// ── POST /verification/{target}/verify ───────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    pub code: String,
}

#[derive(Serialize)]
pub struct VerifyCodeResponse {
    pub target_type: TargetType,
    pub target_value: String,
    pub verified: bool,
}

pub async fn verify_code(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Path(target): Path<String>,
    Json(body): Json<VerifyCodeRequest>,
) -> Result<Json<VerifyCodeResponse>, VerificationServiceError> {
    let target_type: TargetType = target.parse()?;
    let usecase = VerifyCodeUseCase {
        codes: state.code_repo(),
        policy: state.policy,
    };
    let verified = usecase
        .execute(VerifyCodeInput {
            user_id: identity.user_id,
            target_type,
            code: body.code,
        })
        .await?;
    Ok(Json(VerifyCodeResponse {
        target_type: verified.target_type,
        target_value: verified.target_value,
        verified: true,
    }))
}
