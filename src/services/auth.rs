//! Credential verification for the token endpoint.
//!
//! A single operator account is configured at startup. Passwords are never
//! stored in clear: the configured secret is a SHA-256 digest and login
//! attempts are compared digest to digest in constant time.

use sha2::{Digest, Sha256};

use super::session::bytes_to_hex;

/// The configured operator account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    password_sha256: [u8; 32],
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password_sha256", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("incorrect username or password")]
    InvalidCredentials,
    #[error("authentication not configured")]
    NotConfigured,
}

impl crate::error::ErrorCode for AuthError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "E_INVALID_CREDENTIALS",
            Self::NotConfigured => "E_AUTH_NOT_CONFIGURED",
        }
    }
}

impl Credentials {
    /// Build from a clear-text password, hashing it immediately.
    #[must_use]
    pub fn from_password(username: impl Into<String>, password: &str) -> Self {
        Self { username: username.into(), password_sha256: sha256(password) }
    }

    /// Build from a hex-encoded SHA-256 digest. Returns `None` if `hex` is
    /// not 64 hex digits.
    #[must_use]
    pub fn from_sha256_hex(username: impl Into<String>, hex: &str) -> Option<Self> {
        let hex = hex.trim();
        if hex.len() != 64 || !hex.is_ascii() {
            return None;
        }
        let mut digest = [0u8; 32];
        for (i, byte) in digest.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self { username: username.into(), password_sha256: digest })
    }

    /// Lowercase hex of the stored password digest.
    #[must_use]
    pub fn password_digest_hex(&self) -> String {
        bytes_to_hex(&self.password_sha256)
    }

    /// Check a login attempt.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on any mismatch.
    pub fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let user_ok = constant_time_eq(self.username.as_bytes(), username.as_bytes());
        let pass_ok = constant_time_eq(&self.password_sha256, &sha256(password));
        if user_ok && pass_ok { Ok(()) } else { Err(AuthError::InvalidCredentials) }
    }
}

fn sha256(input: &str) -> [u8; 32] {
    Sha256::digest(input.as_bytes()).into()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
