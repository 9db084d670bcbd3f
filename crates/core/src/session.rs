//! Session handling types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque key identifying one browser session.
///
/// Always a UUID; anything else a client presents is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey(Uuid);

impl SessionKey {
    /// Generates a fresh random key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a key presented by a client.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    /// Short prefix safe to put in logs.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-session authentication state.
///
/// Owned by the session store; the guard mutates it in place and the
/// caller writes it back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Set when the session is authenticated.
    pub admin_id: Option<String>,
    /// Consecutive failed attempts since the last reset.
    #[serde(default)]
    pub login_attempts: u32,
    /// Time of the most recent failed attempt.
    pub last_attempt: Option<DateTime<Utc>>,
    /// Time of the last authenticated request.
    pub last_activity: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.admin_id.is_some()
    }

    /// True when nothing has been recorded; such a bag need not be stored.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Checks if the session is idle past `timeout` at `now`.
    pub fn is_timed_out(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        self.last_activity
            .map(|last| now - last > timeout)
            .unwrap_or(false)
    }

    /// Time since the most recent failed attempt, if any.
    pub fn since_last_attempt(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.last_attempt.map(|last| now - last)
    }

    /// Resets every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
