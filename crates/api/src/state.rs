//! Application state shared across handlers.

use sessions::{AdminSessions, AuthConfig, MemorySessionStore, SessionStore};
use site_core::{Clock, Result, SystemClock};
use std::sync::Arc;
use std::time::Duration;

use crate::cookie::CookieSettings;

/// How often idle sessions are swept from the store.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Admin session guard plus its store and clock
    pub sessions: AdminSessions,
    /// Session cookie settings
    pub cookie: CookieSettings,
    /// Deployment environment name reported by the health endpoint
    pub environment: Arc<str>,
}

impl AppState {
    pub fn new(sessions: AdminSessions, cookie: CookieSettings, environment: &str) -> Self {
        Self {
            sessions,
            cookie,
            environment: Arc::from(environment),
        }
    }

    /// Build state from config with an explicit store and clock.
    pub fn with_store(
        config: &AuthConfig,
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        environment: &str,
    ) -> Result<Self> {
        let guard = config.guard()?;
        Ok(Self::new(
            AdminSessions::new(guard, store, clock),
            CookieSettings::from_config(config),
            environment,
        ))
    }

    /// Production state: in-memory store and wall clock.
    pub fn from_config(config: &AuthConfig, environment: &str) -> Result<Self> {
        let store = Arc::new(MemorySessionStore::new(
            config.session_ttl(),
            config.max_sessions,
        ));
        Self::with_store(config, store, Arc::new(SystemClock), environment)
    }

    /// Start the session sweep background task.
    /// Returns a handle that can be used to cancel the task.
    pub fn start_session_sweep(&self) -> tokio::task::JoinHandle<()> {
        let store = self.sessions.store().clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                store.sweep().await;
            }
        })
    }
}
