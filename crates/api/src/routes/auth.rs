//! Admin auth endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use site_core::{Authenticated, ChangePasswordRequest, Error, LoginRequest, SessionKey};
use tracing::debug;

use crate::extractors::{ClientIp, SessionCookie};
use crate::response::{
    with_cookie, ApiError, LoginResponse, MessageResponse, SessionInfoResponse, StatusResponse,
};
use crate::state::AppState;

/// POST /api/auth/login
///
/// A session key is issued on first contact so failed attempts are
/// counted against it. A successful login always hands out a new key.
pub async fn login(
    State(state): State<AppState>,
    SessionCookie(existing): SessionCookie,
    ClientIp(client_ip): ClientIp,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!(error = %rejection, "Rejected login body");
            return ApiError::bad_request("Username and password required").into_response();
        }
    };

    if let Err(err) = request.check() {
        return ApiError::from(err).into_response();
    }

    let issued = existing.is_none();
    let key = existing.unwrap_or_else(SessionKey::generate);

    let result = state
        .sessions
        .attempt_login(
            &key,
            &request.username,
            &request.password,
            client_ip.as_deref(),
        )
        .await;

    match result {
        Ok(logged_in) => with_cookie(
            Json(LoginResponse {
                message: "Login successful".to_string(),
                authenticated: true,
            })
            .into_response(),
            Some(state.cookie.issue(&logged_in.key)),
        ),
        Err(err @ Error::InvalidCredentials) => with_cookie(
            ApiError::from(err).into_response(),
            issued.then(|| state.cookie.issue(&key)),
        ),
        Err(err) if err.is_internal() => ApiError::internal("Login failed").into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    SessionCookie(key): SessionCookie,
) -> Result<Response, ApiError> {
    if let Some(key) = key {
        state
            .sessions
            .logout(&key)
            .await
            .map_err(|_| ApiError::internal("Logout failed"))?;
    }

    Ok(with_cookie(
        Json(MessageResponse::new("Logout successful")).into_response(),
        Some(state.cookie.clear()),
    ))
}

/// GET /api/auth/status
///
/// Read-only: reports whether the session is logged in and unexpired
/// without extending it.
pub async fn status(
    State(state): State<AppState>,
    SessionCookie(key): SessionCookie,
) -> Result<Json<StatusResponse>, ApiError> {
    let authenticated = match key {
        Some(key) => state.sessions.phase(&key).await? == site_core::SessionPhase::Authenticated,
        None => false,
    };

    Ok(Json(StatusResponse { authenticated }))
}

/// POST /api/auth/change-password (admin only)
///
/// Verifies the request; the credential itself is managed through the
/// deployment environment.
pub async fn change_password(
    State(state): State<AppState>,
    body: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = body.map_err(|_| {
        ApiError::bad_request("Current password and new password required")
    })?;

    match state.sessions.verify_password_change(&request) {
        Ok(()) => Ok(Json(MessageResponse::new(
            "Password change requires manual update in environment variables for security",
        ))),
        Err(Error::InvalidCredentials) => Err(ApiError::unauthorized(
            site_core::AuthErrorCode::InvalidCredentials,
            "Current password is incorrect",
        )),
        Err(err) => Err(err.into()),
    }
}

/// GET /api/admin/session (admin only)
pub async fn session_info(
    State(state): State<AppState>,
    Extension(auth): Extension<Authenticated>,
) -> Json<SessionInfoResponse> {
    let timeout = state.sessions.guard().policy().session_timeout;

    Json(SessionInfoResponse {
        authenticated: true,
        admin_id: auth.admin_id,
        last_activity: auth.last_activity,
        expires_at: auth.last_activity + timeout,
    })
}
