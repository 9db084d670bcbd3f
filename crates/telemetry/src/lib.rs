//! Internal telemetry for the site admin service.
//!
//! Structured logging setup, component health, and in-process auth counters.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
