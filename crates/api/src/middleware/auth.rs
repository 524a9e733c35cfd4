//! Authentication middleware for protected routes.
//!
//! The `Authorization` header may carry `Bearer <token>` or the bare token.
//! A missing credential is a 401; one that fails verification is a 403.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use crate::AppState;
use nsgd_shared::Claims;

/// Extracts the token from an Authorization header value.
///
/// `Bearer <token>` yields the first word after the scheme; anything else is
/// taken as the token itself.
fn extract_token(header: &str) -> &str {
    match header.strip_prefix("Bearer ") {
        Some(rest) => rest.split(' ').next().unwrap_or_default(),
        None => header,
    }
}

fn reject(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "msg": msg }))).into_response()
}

/// Authentication middleware that validates JWT tokens.
///
/// On success the claims are stored in request extensions for handlers.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = match request.headers().get(AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => return reject(StatusCode::UNAUTHORIZED, "No token provided"),
    };

    let Ok(header) = header.to_str() else {
        return reject(StatusCode::FORBIDDEN, "Invalid or expired token");
    };

    let token = extract_token(header);
    if token.is_empty() {
        return reject(StatusCode::UNAUTHORIZED, "Invalid token format");
    }

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "Rejected token");
            reject(StatusCode::FORBIDDEN, "Invalid or expired token")
        }
    }
}

/// Extractor for the authenticated operator's claims.
///
/// ```ignore
/// async fn handler(operator: AuthUser) -> impl IntoResponse {
///     tracing::info!(operator = operator.subject(), "...");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the token subject (operator name).
    #[must_use]
    pub fn subject(&self) -> &str {
        self.0.subject()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "msg": "No token provided" })),
                )
            })
    }
}
