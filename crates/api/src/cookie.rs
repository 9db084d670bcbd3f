//! Session cookie formatting.

use sessions::AuthConfig;
use site_core::SessionKey;

/// How the session key travels to and from the browser.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
    pub max_age_secs: u64,
}

impl CookieSettings {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            secure: config.cookie_secure,
            max_age_secs: config.session_ttl_secs,
        }
    }

    /// `Set-Cookie` value that hands `key` to the browser.
    pub fn issue(&self, key: &SessionKey) -> String {
        self.render(&key.to_string(), self.max_age_secs)
    }

    /// `Set-Cookie` value that removes the session cookie.
    pub fn clear(&self) -> String {
        self.render("", 0)
    }

    fn render(&self, value: &str, max_age: u64) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.name, value, max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}
