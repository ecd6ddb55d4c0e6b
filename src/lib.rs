//! Bearer-token authorization gate for axum services.
//!
//! Every request is first classified against the configured public routes. Protected
//! requests must carry `Authorization: Bearer <jwt>`; the token is verified (signature +
//! expiry) and the caller's identity is attached to the request as [`AuthCtx`].
//! Failures are expressed through [`AppError`] and rendered as
//! `{ "error": { "name", "message", "errors"? } }`.
//!
//! [`AuthCtx`]: api::v1::extractors::AuthCtx

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

pub use app::build_router;
pub use config::Config;
pub use error::{AppError, FieldError, StatusRangeError};
pub use services::auth::{Access, AuthError, AuthGate, PublicRoutes, TokenVerifier};
pub use state::AppState;
