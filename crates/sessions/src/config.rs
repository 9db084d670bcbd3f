//! Admin authentication configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use site_core::limits::{
    ATTEMPT_RESET_WINDOW_SECS, MAX_LOGIN_ATTEMPTS, SESSION_TIMEOUT_SECS, SESSION_TTL_SECS,
};
use site_core::{AdminCredentials, AdminSessionGuard, Error, GuardPolicy, Result};

/// Password shipped as the fallback; running with it logs a warning.
pub const DEFAULT_ADMIN_PASSWORD: &str = "NKB#123";

/// Upper bound for every configured window (one year).
pub const MAX_WINDOW_SECS: u64 = 365 * 24 * 60 * 60;

/// Admin auth configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Admin username
    #[serde(default = "default_username")]
    pub username: String,
    /// Admin password
    #[serde(default = "default_password")]
    pub password: String,
    /// Failed attempts before a session is throttled
    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: u32,
    /// Throttle window after the latest failure, in seconds
    #[serde(default = "default_attempt_reset_secs")]
    pub attempt_reset_secs: u64,
    /// Idle timeout for an authenticated session, in seconds
    #[serde(default = "default_session_timeout_secs")]
    pub session_timeout_secs: u64,
    /// Cookie max-age and store idle TTL, in seconds
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// Name of the session cookie
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Mark the session cookie `Secure`
    #[serde(default)]
    pub cookie_secure: bool,
    /// Upper bound on stored session bags
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
}

fn default_username() -> String {
    "tarunpant".to_string()
}

fn default_password() -> String {
    DEFAULT_ADMIN_PASSWORD.to_string()
}

fn default_max_login_attempts() -> u32 {
    MAX_LOGIN_ATTEMPTS
}

fn default_attempt_reset_secs() -> u64 {
    ATTEMPT_RESET_WINDOW_SECS as u64
}

fn default_session_timeout_secs() -> u64 {
    SESSION_TIMEOUT_SECS as u64
}

fn default_session_ttl_secs() -> u64 {
    SESSION_TTL_SECS
}

fn default_cookie_name() -> String {
    "site_admin_session".to_string()
}

fn default_max_sessions() -> u64 {
    10_000
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
            max_login_attempts: default_max_login_attempts(),
            attempt_reset_secs: default_attempt_reset_secs(),
            session_timeout_secs: default_session_timeout_secs(),
            session_ttl_secs: default_session_ttl_secs(),
            cookie_name: default_cookie_name(),
            cookie_secure: false,
            max_sessions: default_max_sessions(),
        }
    }
}

impl AuthConfig {
    /// Rejects settings the guard cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_login_attempts == 0 {
            return Err(Error::config("max_login_attempts must be at least 1"));
        }
        if self.attempt_reset_secs == 0 || self.session_timeout_secs == 0 {
            return Err(Error::config("attempt and session windows must be non-zero"));
        }
        for (name, secs) in [
            ("attempt_reset_secs", self.attempt_reset_secs),
            ("session_timeout_secs", self.session_timeout_secs),
            ("session_ttl_secs", self.session_ttl_secs),
        ] {
            if secs > MAX_WINDOW_SECS {
                return Err(Error::config(format!(
                    "{name} must be at most {MAX_WINDOW_SECS} seconds"
                )));
            }
        }
        if self.session_ttl_secs < self.session_timeout_secs {
            return Err(Error::config(
                "session_ttl_secs must not be shorter than session_timeout_secs",
            ));
        }
        if self.cookie_name.is_empty()
            || !self
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(Error::config(format!(
                "invalid cookie name: {:?}",
                self.cookie_name
            )));
        }
        Ok(())
    }

    pub fn uses_default_password(&self) -> bool {
        self.password == DEFAULT_ADMIN_PASSWORD
    }

    pub fn policy(&self) -> Result<GuardPolicy> {
        Ok(GuardPolicy {
            max_attempts: self.max_login_attempts,
            attempt_reset_window: window("attempt_reset_secs", self.attempt_reset_secs)?,
            session_timeout: window("session_timeout_secs", self.session_timeout_secs)?,
        })
    }

    /// Builds the guard after validating the config.
    pub fn guard(&self) -> Result<AdminSessionGuard> {
        self.validate()?;
        let credentials = AdminCredentials::new(&self.username, &self.password)?;
        Ok(AdminSessionGuard::new(credentials, self.policy()?))
    }

    pub fn session_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.session_ttl_secs)
    }
}

fn window(name: &str, secs: u64) -> Result<Duration> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| Error::config(format!("{name} is out of range: {secs}")))
}
