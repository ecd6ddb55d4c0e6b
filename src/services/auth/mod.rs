pub mod access_jwt;
pub mod factory;
pub mod gate;
pub mod public_routes;

pub use access_jwt::{AuthError, TokenVerifier, VerifiedAccessToken};
pub use factory::build_auth_gate;
pub use gate::{Access, AuthGate};
pub use public_routes::{PublicRoutes, RouteMatcher};
