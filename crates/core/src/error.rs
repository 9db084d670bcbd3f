//! Unified error types for the admin session service.
//!
//! Error codes:
//! - AUTH_001-005: Authentication errors
//! - STORE_001: Session storage errors
//! - CONFIG_001: Configuration errors

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Authentication error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    /// AUTH_001: Username and password are required
    MissingCredentials,
    /// AUTH_002: Username or password did not match
    InvalidCredentials,
    /// AUTH_003: Too many recent failed attempts
    RateLimited,
    /// AUTH_004: No authenticated session
    Unauthorized,
    /// AUTH_005: Session timed out from inactivity
    SessionExpired,
}

impl AuthErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "AUTH_001",
            Self::InvalidCredentials => "AUTH_002",
            Self::RateLimited => "AUTH_003",
            Self::Unauthorized => "AUTH_004",
            Self::SessionExpired => "AUTH_005",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::MissingCredentials => 400,
            Self::InvalidCredentials => 401,
            Self::RateLimited => 429,
            Self::Unauthorized => 401,
            Self::SessionExpired => 401,
        }
    }
}

/// Session storage error code (STORE_001).
pub const STORE_ERROR_CODE: &str = "STORE_001";

/// Configuration error code (CONFIG_001).
pub const CONFIG_ERROR_CODE: &str = "CONFIG_001";

/// Unified error type for the admin session service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// Request is missing a required field or is malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    /// Session has too many recent failed attempts.
    #[error("too many login attempts, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("unauthorized: no admin session")]
    Unauthorized,

    /// Session was idle past the timeout and has been destroyed.
    #[error("session expired")]
    SessionExpired,

    /// The session store could not read or persist state.
    #[error("session storage failure: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Authentication code for this error, if it is an auth failure.
    pub fn auth_code(&self) -> Option<AuthErrorCode> {
        match self {
            Self::InvalidRequest(_) => Some(AuthErrorCode::MissingCredentials),
            Self::InvalidCredentials => Some(AuthErrorCode::InvalidCredentials),
            Self::RateLimited { .. } => Some(AuthErrorCode::RateLimited),
            Self::Unauthorized => Some(AuthErrorCode::Unauthorized),
            Self::SessionExpired => Some(AuthErrorCode::SessionExpired),
            Self::Storage(_) | Self::Config(_) => None,
        }
    }

    /// Get the error code string.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(_) => STORE_ERROR_CODE,
            Self::Config(_) => CONFIG_ERROR_CODE,
            other => other
                .auth_code()
                .map(|code| code.code())
                .unwrap_or(STORE_ERROR_CODE),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self.auth_code() {
            Some(code) => code.http_status(),
            None => 500,
        }
    }

    /// Whether this is an infrastructure failure rather than an auth decision.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Config(_))
    }

    /// Seconds the client should wait before retrying, for throttled logins.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }
}
