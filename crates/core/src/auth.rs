//! Authentication types and admin credential checks.
//!
//! This module provides:
//! - The configured admin credential and its comparison
//! - Login / change-password request bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;
use validator::Validate;

use crate::error::{Error, Result};

/// The single admin username/password pair.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let password = password.into();

        if username.is_empty() || password.is_empty() {
            return Err(Error::config("admin username and password must be non-empty"));
        }

        Ok(Self { username, password })
    }

    /// Both fields must match. Both are always compared, in constant time.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let pass_ok = self.password.as_bytes().ct_eq(password.as_bytes());
        (user_ok & pass_ok).into()
    }

    /// Checks only the password, for re-authentication of a logged-in admin.
    pub fn verify_password(&self, password: &str) -> bool {
        self.password.as_bytes().ct_eq(password.as_bytes()).into()
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username and password required"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Username and password required"))]
    pub password: String,
}

impl LoginRequest {
    /// Both fields must be present and non-empty.
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|_| Error::invalid_request("Username and password required"))
    }
}

/// Change-password request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Current password and new password required"))]
    pub current_password: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Current password and new password required"))]
    pub new_password: String,
}

impl ChangePasswordRequest {
    /// Validates presence first, then the minimum length of the new password.
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|_| Error::invalid_request("Current password and new password required"))?;

        if (self.new_password.chars().count() as u64) < crate::limits::MIN_PASSWORD_LEN {
            return Err(Error::invalid_request(format!(
                "New password must be at least {} characters",
                crate::limits::MIN_PASSWORD_LEN
            )));
        }

        Ok(())
    }
}

/// Successful authentication outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authenticated {
    pub admin_id: String,
    /// Activity timestamp recorded by this call.
    pub last_activity: DateTime<Utc>,
}
