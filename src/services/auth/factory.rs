/// Factory: build `AuthGate` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AuthGate, PublicRoutes, TokenVerifier};

pub fn build_auth_gate(config: &Config) -> Arc<AuthGate> {
    let public_routes = PublicRoutes::compile(&config.public_routes);
    tracing::debug!(matchers = ?public_routes.matchers(), "public routes compiled");

    let verifier = TokenVerifier::new(
        config.access_token_secret.as_bytes(),
        config.auth_issuer.as_deref(),
        config.auth_audience.as_deref(),
        config.access_token_leeway_seconds,
    );

    Arc::new(AuthGate::new(public_routes, verifier))
}
