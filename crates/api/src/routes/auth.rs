//! Operator login.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use nsgd_core::auth::LoginCheck;
use nsgd_shared::auth::{LoginRequest, LoginResponse};
use serde_json::json;
use tracing::{error, info, warn};

use crate::AppState;

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "msg": "An unexpected error occurred"
        })),
    )
        .into_response()
}

/// POST /auth/login - Check the operator's credentials and issue a token.
///
/// Rejections are reported in the body with HTTP 200.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let check = match state.operator.check(&payload.username, &payload.password) {
        Ok(check) => check,
        Err(e) => {
            error!(error = %e, "Configured operator password hash is unusable");
            return internal_error();
        }
    };

    if let Some(reason) = check.rejection_message() {
        warn!(username = %payload.username, ?check, "Failed login attempt");
        return Json(LoginResponse::denied(reason)).into_response();
    }

    match state.jwt_service.generate_token(state.operator.username()) {
        Ok(token) => {
            info!(username = %payload.username, "Operator logged in");
            Json(LoginResponse::granted(token)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to generate token");
            internal_error()
        }
    }
}
