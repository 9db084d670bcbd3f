//! Async admin session service.
//!
//! Wraps the pure guard with a session store and a clock: load the bag,
//! run the guard, write back what changed.

use site_core::{
    AdminSessionGuard, Authenticated, ChangePasswordRequest, Clock, Error, Result, SessionKey,
    SessionPhase, SessionState,
};
use std::sync::Arc;
use telemetry::{health, metrics};
use tracing::{error, info, warn};

use crate::store::SessionStore;

/// A successful login and the key the session now lives under.
#[derive(Debug, Clone)]
pub struct LoggedIn {
    pub key: SessionKey,
    pub auth: Authenticated,
}

/// Admin authentication backed by a session store.
#[derive(Clone)]
pub struct AdminSessions {
    guard: Arc<AdminSessionGuard>,
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
}

impl AdminSessions {
    pub fn new(
        guard: AdminSessionGuard,
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            guard: Arc::new(guard),
            store,
            clock,
        }
    }

    pub fn guard(&self) -> &AdminSessionGuard {
        &self.guard
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Attempt to log `key` in with the supplied credentials.
    ///
    /// On success the session moves to a freshly generated key and the
    /// old key is destroyed, so a key handed out before login never
    /// becomes an admin session.
    pub async fn attempt_login(
        &self,
        key: &SessionKey,
        username: &str,
        password: &str,
        client_ip: Option<&str>,
    ) -> Result<LoggedIn> {
        metrics().login_attempts.inc();

        let mut state = self.load(key).await?;
        let now = self.clock.now();

        match self.guard.attempt_login(&mut state, username, password, now) {
            Ok(auth) => {
                let fresh = SessionKey::generate();
                self.save(&fresh, &state).await?;
                self.destroy(key).await?;
                metrics().logins_succeeded.inc();
                info!(
                    session = %fresh.short(),
                    previous = %key.short(),
                    client_ip = client_ip.unwrap_or("-"),
                    "Admin login succeeded"
                );
                Ok(LoggedIn { key: fresh, auth })
            }
            Err(Error::InvalidCredentials) => {
                self.save(key, &state).await?;
                metrics().logins_failed.inc();
                warn!(
                    session = %key.short(),
                    client_ip = client_ip.unwrap_or("-"),
                    attempts = state.login_attempts,
                    "Admin login failed"
                );
                Err(Error::InvalidCredentials)
            }
            Err(Error::RateLimited { retry_after_secs }) => {
                metrics().logins_rate_limited.inc();
                warn!(
                    session = %key.short(),
                    client_ip = client_ip.unwrap_or("-"),
                    retry_after_secs,
                    "Admin login throttled"
                );
                Err(Error::RateLimited { retry_after_secs })
            }
            // Rejected before the guard touched the state
            Err(err) => Err(err),
        }
    }

    /// Check that `key` holds a live admin session, sliding its timeout.
    pub async fn is_authenticated(&self, key: &SessionKey) -> Result<Authenticated> {
        let mut state = self.load(key).await?;
        let now = self.clock.now();

        match self.guard.is_authenticated(&mut state, now) {
            Ok(auth) => {
                self.save(key, &state).await?;
                Ok(auth)
            }
            Err(Error::SessionExpired) => {
                self.destroy(key).await?;
                metrics().sessions_expired.inc();
                info!(session = %key.short(), "Admin session expired");
                Err(Error::SessionExpired)
            }
            Err(err) => Err(err),
        }
    }

    /// Log `key` out. Succeeds whether or not it was logged in.
    pub async fn logout(&self, key: &SessionKey) -> Result<()> {
        let mut state = self.load(key).await?;
        let was_authenticated = state.is_authenticated();
        self.guard.logout(&mut state)?;
        self.destroy(key).await?;

        if was_authenticated {
            metrics().logouts.inc();
            info!(session = %key.short(), "Admin logged out");
        }
        Ok(())
    }

    /// Current phase of `key` without refreshing its activity.
    pub async fn phase(&self, key: &SessionKey) -> Result<SessionPhase> {
        let state = self.load(key).await?;
        Ok(self.guard.phase(&state, self.clock.now()))
    }

    /// Validate a password change for an already-authenticated session.
    ///
    /// The credential lives in the deployment environment, so nothing is
    /// rotated here; the caller reports that the change must be applied there.
    pub fn verify_password_change(&self, request: &ChangePasswordRequest) -> Result<()> {
        request.check()?;
        self.guard
            .verify_current_password(&request.current_password)
            .inspect_err(|_| warn!("Password change rejected: current password incorrect"))?;

        warn!("[SECURITY] Admin password change requested; update ADMIN_PASSWORD in the environment");
        Ok(())
    }

    async fn load(&self, key: &SessionKey) -> Result<SessionState> {
        let loaded = self.store.load(key).await;
        self.track(loaded)
    }

    async fn save(&self, key: &SessionKey, state: &SessionState) -> Result<()> {
        let saved = self.store.save(key, state).await;
        self.track(saved)
    }

    async fn destroy(&self, key: &SessionKey) -> Result<()> {
        let destroyed = self.store.destroy(key).await;
        self.track(destroyed)
    }

    /// Records storage outcomes in health and metrics.
    fn track<T>(&self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => health().session_store.set_healthy(),
            Err(err) => {
                metrics().storage_failures.inc();
                health().session_store.set_unhealthy(err.to_string());
                error!(error = %err, "Session store operation failed");
            }
        }
        result
    }
}
