//! Operator authentication.
//!
//! There is exactly one operator account. Its name and Argon2id hash come from
//! configuration; this module only answers whether a login attempt matches.

mod password;

pub use password::{PasswordError, hash_password, verify_password};

/// Outcome of checking a login attempt against the operator account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginCheck {
    /// Name and password both match.
    Granted,
    /// No account with that name.
    UnknownUser,
    /// Name matches, password does not.
    WrongPassword,
}

impl LoginCheck {
    /// Client-facing reason for a rejected login.
    #[must_use]
    pub const fn rejection_message(self) -> Option<&'static str> {
        match self {
            Self::Granted => None,
            Self::UnknownUser => Some("Invalid username"),
            Self::WrongPassword => Some("Invalid password"),
        }
    }
}

/// The configured operator account.
#[derive(Clone)]
pub struct OperatorAccount {
    username: String,
    password_hash: String,
}

impl std::fmt::Debug for OperatorAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorAccount")
            .field("username", &self.username)
            .field("password_hash", &"[hidden]")
            .finish()
    }
}

impl OperatorAccount {
    /// Creates the account from a name and a PHC-format password hash.
    #[must_use]
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Returns the operator name, used as the token subject.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Checks a login attempt.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError` if the configured hash is unusable.
    pub fn check(&self, username: &str, password: &str) -> Result<LoginCheck, PasswordError> {
        if username != self.username {
            return Ok(LoginCheck::UnknownUser);
        }

        if verify_password(password, &self.password_hash)? {
            Ok(LoginCheck::Granted)
        } else {
            Ok(LoginCheck::WrongPassword)
        }
    }
}
