//! Authentication types for JWT and operator login.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JWT claims for operator tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (operator name).
    pub sub: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for the operator.
    #[must_use]
    pub fn new(subject: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the subject from claims.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.sub
    }
}

/// Login request payload.
///
/// Missing fields deserialize as empty strings so they fail the credential
/// check instead of the JSON extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    /// Operator name.
    #[serde(default)]
    pub username: String,
    /// Operator password.
    #[serde(default)]
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Whether the login succeeded.
    pub success: bool,
    /// Issued token on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl LoginResponse {
    /// A successful login carrying the issued token.
    #[must_use]
    pub fn granted(token: String) -> Self {
        Self {
            success: true,
            token: Some(token),
            msg: None,
        }
    }

    /// A rejected login with its reason.
    #[must_use]
    pub fn denied(msg: &str) -> Self {
        Self {
            success: false,
            token: None,
            msg: Some(msg.to_string()),
        }
    }
}
