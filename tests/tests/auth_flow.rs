//! End-to-end admin session flows against the real router.
//!
//! Time is driven through the manual clock so lockout and inactivity
//! windows can be crossed without sleeping.

use axum::http::{header, StatusCode};
use integration_tests::fixtures::{ADMIN_PASSWORD, ADMIN_USERNAME};
use integration_tests::setup::TestContext;
use serde_json::Value;

#[tokio::test]
async fn test_login_then_status() {
    let ctx = TestContext::new();
    let mut client = ctx.client();

    let status = client.status().await;
    status.assert_status_ok();
    assert_eq!(status.json::<Value>()["authenticated"], false);

    let response = client.login_admin().await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["authenticated"], true);
    assert!(client.cookie.is_some(), "login must set the session cookie");

    let status = client.status().await;
    assert_eq!(status.json::<Value>()["authenticated"], true);
}

#[tokio::test]
async fn test_session_cookie_attributes() {
    let ctx = TestContext::new();
    let mut client = ctx.client();

    let response = client.login_admin().await;
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("missing Set-Cookie")
        .to_string();

    assert!(cookie.starts_with("site_admin_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
}

#[tokio::test]
async fn test_admin_route_after_login() {
    let ctx = TestContext::new();
    let mut client = ctx.client();
    client.login_admin().await.assert_status_ok();

    let response = client.session_info().await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["adminId"], "admin");
    assert!(body["lastActivity"].is_string());
    assert!(body["expiresAt"].is_string());
}

#[tokio::test]
async fn test_wrong_password_counts_against_session() {
    let ctx = TestContext::new();
    let mut client = ctx.client();

    let response = client.login(ADMIN_USERNAME, "wrong").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["code"], "AUTH_002");
    assert_eq!(body["message"], "Invalid username or password");

    // First contact issues a cookie so later failures are counted together
    let cookie = client.cookie.clone().expect("failed login should issue a cookie");
    client.login(ADMIN_USERNAME, "wrong").await;

    let stored = ctx.stored_session(&cookie).await;
    assert_eq!(stored.login_attempts, 2);
    assert!(!stored.is_authenticated());
}

#[tokio::test]
async fn test_login_issues_a_new_session_key() {
    let ctx = TestContext::new();
    let mut client = ctx.client();

    client.login(ADMIN_USERNAME, "wrong").await;
    let before = client.cookie.clone().expect("failed login should issue a cookie");

    client.login_admin().await.assert_status_ok();
    let after = client.cookie.clone().unwrap();
    assert_ne!(before, after);
    assert!(ctx.stored_session(&after).await.is_authenticated());
    assert!(ctx.stored_session(&before).await.is_empty());

    // Someone holding the pre-login key gets nothing
    client.cookie = Some(before);
    client
        .session_info()
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_stale_duplicate_cookie_does_not_hide_session() {
    let ctx = TestContext::new();
    let mut client = ctx.client();
    client.login_admin().await.assert_status_ok();
    let key = client.cookie.take().unwrap();

    let request = client.server.get("/api/admin/session").add_header(
        "Cookie",
        format!("site_admin_session=junk; site_admin_session={key}"),
    );
    client.send(request).await.assert_status_ok();
}

#[tokio::test]
async fn test_lockout_after_five_failures() {
    let ctx = TestContext::new();
    let mut client = ctx.client();

    for i in 0..5 {
        let response = client.login(ADMIN_USERNAME, "wrong").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        ctx.advance_secs(1);
        assert!(client.cookie.is_some(), "attempt {i} lost the cookie");
    }

    // Locked out even with the right password
    let response = client.login_admin().await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: Value = response.json();
    assert_eq!(body["code"], "AUTH_003");
    assert_eq!(
        body["message"],
        "Too many login attempts. Please try again later."
    );

    let retry_after: u64 = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .expect("missing Retry-After");
    assert_eq!(retry_after, 899);
}

#[tokio::test]
async fn test_lockout_window_measured_from_last_failure() {
    let ctx = TestContext::new();
    let mut client = ctx.client();

    // Failures at t=0..4
    for _ in 0..5 {
        client.login(ADMIN_USERNAME, "wrong").await;
        ctx.advance_secs(1);
    }

    // t=901: only 897s since the last failure
    ctx.advance_secs(896);
    client
        .login_admin()
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    // t=904: a full window has passed
    ctx.advance_secs(3);
    client.login_admin().await.assert_status_ok();

    let stored = ctx.stored_session(client.cookie.as_deref().unwrap()).await;
    assert_eq!(stored.login_attempts, 0);
    assert!(stored.is_authenticated());
}

#[tokio::test]
async fn test_lockout_is_per_session() {
    let ctx = TestContext::new();
    let mut locked = ctx.client();
    let mut fresh = ctx.client();

    for _ in 0..5 {
        locked.login(ADMIN_USERNAME, "wrong").await;
    }
    locked
        .login_admin()
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    fresh.login_admin().await.assert_status_ok();
}

#[tokio::test]
async fn test_success_resets_failed_attempts() {
    let ctx = TestContext::new();
    let mut client = ctx.client();

    for _ in 0..4 {
        client.login(ADMIN_USERNAME, "wrong").await;
    }
    client.login_admin().await.assert_status_ok();

    let stored = ctx.stored_session(client.cookie.as_deref().unwrap()).await;
    assert_eq!(stored.login_attempts, 0);
    assert!(stored.is_authenticated());

    // Counting starts over: four more failures still do not throttle
    for _ in 0..4 {
        client
            .login(ADMIN_USERNAME, "wrong")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
    client.login_admin().await.assert_status_ok();
}

#[tokio::test]
async fn test_activity_slides_expiration() {
    let ctx = TestContext::new();
    let mut client = ctx.client();
    client.login_admin().await.assert_status_ok();

    // 10 minutes idle
    ctx.advance_secs(10 * 60);
    client.session_info().await.assert_status_ok();

    // 35 minutes after login but only 25 since the last request
    ctx.advance_secs(25 * 60);
    client.session_info().await.assert_status_ok();
}

#[tokio::test]
async fn test_session_expires_after_inactivity() {
    let ctx = TestContext::new();
    let mut client = ctx.client();
    client.login_admin().await.assert_status_ok();

    ctx.advance_secs(31 * 60);
    let response = client.session_info().await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["code"], "AUTH_005");
    assert_eq!(body["message"], "Session expired: Please login again");

    // The expired session was destroyed; the same cookie is now anonymous
    let response = client.session_info().await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["code"], "AUTH_004");
}

#[tokio::test]
async fn test_session_at_exact_timeout_is_still_valid() {
    let ctx = TestContext::new();
    let mut client = ctx.client();
    client.login_admin().await.assert_status_ok();

    ctx.advance_secs(30 * 60);
    client.session_info().await.assert_status_ok();
}

#[tokio::test]
async fn test_status_does_not_extend_session() {
    let ctx = TestContext::new();
    let mut client = ctx.client();
    client.login_admin().await.assert_status_ok();

    ctx.advance_secs(20 * 60);
    assert_eq!(client.status().await.json::<Value>()["authenticated"], true);

    // 35 minutes since the login, which was the last authenticated request
    ctx.advance_secs(15 * 60);
    assert_eq!(client.status().await.json::<Value>()["authenticated"], false);
    client
        .session_info()
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let ctx = TestContext::new();
    let mut client = ctx.client();
    client.login_admin().await.assert_status_ok();
    let cookie = client.cookie.clone().unwrap();

    let response = client.logout().await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["message"], "Logout successful");
    assert!(client.cookie.is_none(), "logout must clear the cookie");
    assert!(ctx.stored_session(&cookie).await.is_empty());

    // Replaying the old cookie does not help
    client.cookie = Some(cookie);
    let response = client.session_info().await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["code"], "AUTH_004");
}

#[tokio::test]
async fn test_logout_without_session_succeeds() {
    let ctx = TestContext::new();
    let mut client = ctx.client();

    client.logout().await.assert_status_ok();
}

#[tokio::test]
async fn test_login_again_after_expiry() {
    let ctx = TestContext::new();
    let mut client = ctx.client();
    client.login_admin().await.assert_status_ok();

    ctx.advance_secs(45 * 60);
    client
        .session_info()
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    client.login_admin().await.assert_status_ok();
    client.session_info().await.assert_status_ok();
}

#[tokio::test]
async fn test_change_password_requires_login() {
    let ctx = TestContext::new();
    let mut client = ctx.client();

    let response = client.change_password(ADMIN_PASSWORD, "newsecret").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["code"], "AUTH_004");
}

#[tokio::test]
async fn test_change_password_checks_current_password() {
    let ctx = TestContext::new();
    let mut client = ctx.client();
    client.login_admin().await.assert_status_ok();

    let response = client.change_password("not-it", "newsecret").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["code"], "AUTH_002");
    assert_eq!(body["message"], "Current password is incorrect");

    // A wrong current password does not end the session
    client.session_info().await.assert_status_ok();
}

#[tokio::test]
async fn test_change_password_rejects_short_password() {
    let ctx = TestContext::new();
    let mut client = ctx.client();
    client.login_admin().await.assert_status_ok();

    let response = client.change_password(ADMIN_PASSWORD, "abc").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "New password must be at least 6 characters"
    );

    let response = client.change_password("", "").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "Current password and new password required"
    );
}

#[tokio::test]
async fn test_change_password_accepted() {
    let ctx = TestContext::new();
    let mut client = ctx.client();
    client.login_admin().await.assert_status_ok();

    let response = client.change_password(ADMIN_PASSWORD, "newsecret").await;
    response.assert_status_ok();
    assert!(response.json::<Value>()["message"]
        .as_str()
        .unwrap()
        .contains("environment variables"));

    // The configured credential is unchanged
    client.logout().await;
    client.login_admin().await.assert_status_ok();
}

#[tokio::test]
async fn test_security_headers() {
    let ctx = TestContext::new();
    let mut client = ctx.client();

    let response = client.status().await;
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "SAMEORIGIN");
}
