use axum::{extract::State, http::StatusCode};

use starshield_core::health::readiness;

use crate::state::AppState;

/// `GET /readyz`: ready once Postgres answers a ping.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness("postgres", state.db.ping().await)
}
