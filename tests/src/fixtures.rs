//! Test fixtures.

use axum::http::header;
use axum_test::TestResponse;
use chrono::{DateTime, TimeZone, Utc};

pub const ADMIN_USERNAME: &str = "tarunpant";
pub const ADMIN_PASSWORD: &str = "NKB#123";
pub const COOKIE_NAME: &str = "site_admin_session";

/// Fixed starting instant for the manual clock.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
}

pub fn login_body(username: &str, password: &str) -> serde_json::Value {
    serde_json::json!({
        "username": username,
        "password": password,
    })
}

pub fn change_password_body(current: &str, new: &str) -> serde_json::Value {
    serde_json::json!({
        "currentPassword": current,
        "newPassword": new,
    })
}

/// What a `Set-Cookie` header did to the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieUpdate {
    Set(String),
    Cleared,
}

/// Reads the session cookie from a response's `Set-Cookie` headers.
pub fn session_cookie_update(response: &TestResponse) -> Option<CookieUpdate> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .find_map(|raw| {
            let pair = raw.split(';').next()?.trim();
            let (name, value) = pair.split_once('=')?;
            if name != COOKIE_NAME {
                return None;
            }
            if value.is_empty() || raw.contains("Max-Age=0") {
                Some(CookieUpdate::Cleared)
            } else {
                Some(CookieUpdate::Set(value.to_string()))
            }
        })
}
