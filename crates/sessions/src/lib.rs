//! Session storage and the async admin session service.

pub mod config;
pub mod service;
pub mod store;

pub use config::*;
pub use service::*;
pub use store::*;
