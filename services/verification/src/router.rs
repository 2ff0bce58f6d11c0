use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use starshield_core::error::not_found;
use starshield_core::health::healthz;
use starshield_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::health::readyz;
use crate::handlers::verification::{send_code, verify_code};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Contact verification
        .route("/verification/{target}/send", post(send_code))
        .route("/verification/{target}/verify", post(verify_code))
        .fallback(not_found)
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
