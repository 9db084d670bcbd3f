//! Request extractors.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use site_core::SessionKey;

use crate::state::AppState;

/// Session key from the request's cookie, if it carried a valid one.
///
/// Values that are not session keys are ignored. When the cookie is sent
/// more than once, the last occurrence is used.
#[derive(Debug, Clone)]
pub struct SessionCookie(pub Option<SessionKey>);

#[async_trait]
impl FromRequestParts<AppState> for SessionCookie {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let key = jar
            .get(&state.cookie.name)
            .and_then(|cookie| SessionKey::parse(cookie.value()));

        Ok(SessionCookie(key))
    }
}

/// Client IP address, for login audit logs.
#[derive(Debug, Clone)]
pub struct ClientIp(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("X-Forwarded-For")
            .and_then(|h| h.to_str().ok())
            .and_then(|xff| xff.split(',').next())
            .map(|ip| ip.trim().to_string());

        let ip = forwarded.or_else(|| {
            parts
                .headers
                .get("X-Real-IP")
                .and_then(|h| h.to_str().ok())
                .map(|ip| ip.trim().to_string())
        });

        Ok(ClientIp(ip.filter(|ip| !ip.is_empty())))
    }
}
