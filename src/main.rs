//! Coaching Institute Site Admin Service
//!
//! Back end for the admin dashboard:
//! - Single shared admin credential with per-session login throttling
//! - Cookie-keyed sessions with sliding inactivity timeout
//! - Auth gate in front of every administrative route
//!
//! Sessions live in process memory and do not survive a restart.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};

use api::{router, AppState};
use sessions::AuthConfig;
use telemetry::{health, init_tracing_from_env};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Deployment environment name, reported by /api/health
    #[serde(default = "default_environment")]
    environment: String,

    #[serde(default)]
    auth: AuthConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_environment() -> String {
    "production".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            auth: AuthConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting site admin service v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    info!(
        environment = %config.environment,
        admin_username = %config.auth.username,
        session_timeout_secs = config.auth.session_timeout_secs,
        max_login_attempts = config.auth.max_login_attempts,
        "Loaded configuration"
    );
    if config.auth.uses_default_password() {
        warn!("ADMIN_PASSWORD is not set; running with the built-in default password");
    }
    if !config.auth.cookie_secure {
        warn!("Session cookie is not marked Secure; serve behind HTTPS in production");
    }

    let state = AppState::from_config(&config.auth, &config.environment)
        .context("Invalid auth configuration")?;
    health().session_store.set_healthy();
    warn!("Session store is in-memory; all admin sessions are lost on restart");

    let _sweep_handle = state.start_session_sweep();
    info!("Started session sweep task (every 5 minutes)");

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables, e.g. SITE__AUTH__SESSION_TIMEOUT_SECS
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("SITE")
                .prefix_separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Deployment variables shared with the rest of the site
    if let Ok(username) = std::env::var("ADMIN_USERNAME") {
        config.auth.username = username;
    }
    if let Ok(password) = std::env::var("ADMIN_PASSWORD") {
        config.auth.password = password;
    }
    if let Ok(environment) = std::env::var("ENVIRONMENT") {
        config.environment = environment;
    }
    if let Ok(port) = std::env::var("PORT") {
        config.port = port.parse().context("PORT must be a valid port number")?;
    }

    config
        .auth
        .validate()
        .context("Invalid auth configuration")?;

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
