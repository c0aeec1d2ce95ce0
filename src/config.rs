//! Server configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::services::auth::Credentials;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_OUTPUT_DIR: &str = "static";
pub const DEFAULT_TOKEN_TTL_MINUTES: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("AUTH_USERNAME is set but neither AUTH_PASSWORD_SHA256 nor AUTH_PASSWORD is")]
    MissingPassword,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Directory the PRISMA diagram is written to and `/static` serves.
    pub output_dir: PathBuf,
    /// `None` disables the token endpoint; protected routes then reject every call.
    pub credentials: Option<Credentials>,
    pub token_ttl: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            credentials: None,
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_MINUTES * 60),
        }
    }
}

impl AppConfig {
    /// Build typed server config from environment variables.
    ///
    /// - `PORT`: default 8000
    /// - `OUTPUT_DIR`: default `static`
    /// - `AUTH_USERNAME` with `AUTH_PASSWORD_SHA256` (hex) or `AUTH_PASSWORD`
    /// - `ACCESS_TOKEN_EXPIRE_MINUTES`: default 30
    ///
    /// # Errors
    ///
    /// Returns an error for unparsable values or a username without password.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns an error for unparsable values or a username without password.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let output_dir = lookup("OUTPUT_DIR")
            .filter(|d| !d.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR), PathBuf::from);

        let ttl_minutes = match lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|m| *m > 0)
                .ok_or(ConfigError::Invalid { key: "ACCESS_TOKEN_EXPIRE_MINUTES", value: raw })?,
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };

        let credentials = match lookup("AUTH_USERNAME").filter(|u| !u.is_empty()) {
            None => None,
            Some(username) => Some(parse_credentials(&lookup, username)?),
        };

        Ok(Self { port, output_dir, credentials, token_ttl: Duration::from_secs(ttl_minutes * 60) })
    }
}

fn parse_credentials(lookup: &impl Fn(&str) -> Option<String>, username: String) -> Result<Credentials, ConfigError> {
    if let Some(hex) = lookup("AUTH_PASSWORD_SHA256") {
        return Credentials::from_sha256_hex(username, &hex)
            .ok_or(ConfigError::Invalid { key: "AUTH_PASSWORD_SHA256", value: "<redacted>".into() });
    }
    lookup("AUTH_PASSWORD")
        .map(|password| Credentials::from_password(username, &password))
        .ok_or(ConfigError::MissingPassword)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
