//! Admin authentication gate.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use site_core::Error;
use tracing::debug;

use crate::extractors::SessionCookie;
use crate::response::ApiError;
use crate::state::AppState;

/// Rejects the request unless it carries a live admin session.
///
/// On success the session's timeout slides forward and the `Authenticated`
/// record is placed in the request extensions for the handler.
pub async fn require_admin(
    State(state): State<AppState>,
    SessionCookie(key): SessionCookie,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(key) = key else {
        debug!(path = %request.uri().path(), "Admin request without session cookie");
        return Err(Error::Unauthorized.into());
    };

    let auth = state.sessions.is_authenticated(&key).await?;
    request.extensions_mut().insert(auth);

    Ok(next.run(request).await)
}
