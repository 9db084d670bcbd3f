//! Login throttling and session lifetime limits.
//!
//! These are the defaults; deployments can override them through
//! `GuardPolicy` (see `sessions::AuthConfig`).

/// Failed attempts allowed before a session is throttled.
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;

/// Window after the most recent failure during which the throttle holds (15 minutes).
pub const ATTEMPT_RESET_WINDOW_SECS: i64 = 15 * 60;

/// Idle time after which an authenticated session expires (30 minutes).
pub const SESSION_TIMEOUT_SECS: i64 = 30 * 60;

/// Lifetime of the session cookie and the stored session bag (1 week).
pub const SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Minimum length accepted for a new admin password.
pub const MIN_PASSWORD_LEN: u64 = 6;

/// Identifier stored in `SessionState::admin_id` for the single admin account.
pub const ADMIN_ID: &str = "admin";
