//! Core types and the admin session policy for the site back end.

pub mod auth;
pub mod clock;
pub mod error;
pub mod guard;
pub mod limits;
pub mod session;

pub use auth::*;
pub use clock::*;
pub use error::{AuthErrorCode, Error, Result, CONFIG_ERROR_CODE, STORE_ERROR_CODE};
pub use guard::*;
pub use session::*;
