//! Admin session guard: login throttling and session lifecycle.
//!
//! Every operation is a pure function of `(state, now)`. The guard never
//! reads a clock or touches storage; callers load the state, pass the
//! time in, and persist whatever the guard left behind.
//!
//! Per-session lifecycle:
//!
//! ```text
//! Anonymous --login ok--> Authenticated --logout--> Anonymous
//!     ^  |                     |
//!     |  +--login failed--+    +--idle > timeout, next check--> Anonymous
//!     +-------------------+
//! ```

use chrono::{DateTime, Duration, Utc};

use crate::auth::{AdminCredentials, Authenticated};
use crate::error::{Error, Result};
use crate::limits::{
    ADMIN_ID, ATTEMPT_RESET_WINDOW_SECS, MAX_LOGIN_ATTEMPTS, SESSION_TIMEOUT_SECS,
};
use crate::session::SessionState;

/// Throttle and timeout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardPolicy {
    /// Failed attempts allowed before throttling.
    pub max_attempts: u32,
    /// How long after the latest failure the throttle holds.
    pub attempt_reset_window: Duration,
    /// Idle time before an authenticated session expires.
    pub session_timeout: Duration,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_LOGIN_ATTEMPTS,
            attempt_reset_window: Duration::seconds(ATTEMPT_RESET_WINDOW_SECS),
            session_timeout: Duration::seconds(SESSION_TIMEOUT_SECS),
        }
    }
}

/// Where a session stands at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Anonymous,
    Authenticated,
    /// Logged in but idle past the timeout; becomes `Anonymous` on the next check.
    Expired,
}

/// Mediates every administrative request.
#[derive(Debug, Clone)]
pub struct AdminSessionGuard {
    credentials: AdminCredentials,
    policy: GuardPolicy,
}

impl AdminSessionGuard {
    pub fn new(credentials: AdminCredentials, policy: GuardPolicy) -> Self {
        Self {
            credentials,
            policy,
        }
    }

    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    /// Attempt to log the session in.
    ///
    /// The throttle is evaluated before the credentials, so a throttled
    /// session is rejected even with the right password. A throttled
    /// attempt leaves the state untouched.
    pub fn attempt_login(
        &self,
        state: &mut SessionState,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<Authenticated> {
        if username.is_empty() || password.is_empty() {
            return Err(Error::invalid_request("Username and password required"));
        }

        let since_last = state.since_last_attempt(now);

        if state.login_attempts >= self.policy.max_attempts {
            if let Some(elapsed) = since_last {
                if elapsed < self.policy.attempt_reset_window {
                    return Err(Error::RateLimited {
                        retry_after_secs: retry_after_secs(
                            self.policy.attempt_reset_window - elapsed,
                        ),
                    });
                }
            }
        }

        if since_last.map_or(true, |elapsed| elapsed >= self.policy.attempt_reset_window) {
            state.login_attempts = 0;
        }

        if self.credentials.verify(username, password) {
            state.admin_id = Some(ADMIN_ID.to_string());
            state.login_attempts = 0;
            state.last_activity = Some(now);
            Ok(Authenticated {
                admin_id: ADMIN_ID.to_string(),
                last_activity: now,
            })
        } else {
            state.login_attempts = state.login_attempts.saturating_add(1);
            state.last_attempt = Some(now);
            Err(Error::InvalidCredentials)
        }
    }

    /// Check that the session is logged in and not idle past the timeout.
    ///
    /// On success the activity timestamp is refreshed, so each check
    /// extends the session. An expired session is cleared.
    pub fn is_authenticated(
        &self,
        state: &mut SessionState,
        now: DateTime<Utc>,
    ) -> Result<Authenticated> {
        let Some(admin_id) = state.admin_id.clone() else {
            return Err(Error::Unauthorized);
        };

        if state.is_timed_out(now, self.policy.session_timeout) {
            state.clear();
            return Err(Error::SessionExpired);
        }

        state.last_activity = Some(now);
        Ok(Authenticated {
            admin_id,
            last_activity: now,
        })
    }

    /// Clears the session. Idempotent and never fails.
    pub fn logout(&self, state: &mut SessionState) -> Result<()> {
        state.clear();
        Ok(())
    }

    /// Read-only view of the session's phase.
    pub fn phase(&self, state: &SessionState, now: DateTime<Utc>) -> SessionPhase {
        if !state.is_authenticated() {
            SessionPhase::Anonymous
        } else if state.is_timed_out(now, self.policy.session_timeout) {
            SessionPhase::Expired
        } else {
            SessionPhase::Authenticated
        }
    }

    /// Re-checks the admin password for a logged-in session.
    pub fn verify_current_password(&self, password: &str) -> Result<()> {
        if self.credentials.verify_password(password) {
            Ok(())
        } else {
            Err(Error::InvalidCredentials)
        }
    }
}

/// Whole seconds remaining, rounded up, never zero.
fn retry_after_secs(remaining: Duration) -> u64 {
    let millis = remaining.num_milliseconds().max(0) as u64;
    millis.div_ceil(1000).max(1)
}
