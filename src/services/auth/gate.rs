//! Authorization gate: public route check, then bearer token verification.
//!
//! Stateless across requests. Per request the decision is linear:
//! public -> allow, no header -> deny (403), header -> verify -> allow / deny.

use axum::http::{HeaderMap, header};
use chrono::Utc;

use super::access_jwt::{AuthError, TokenVerifier, VerifiedAccessToken};
use super::public_routes::PublicRoutes;

const BEARER_PREFIX: &str = "Bearer ";

/// Successful gate outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated(VerifiedAccessToken),
}

#[derive(Debug, Clone)]
pub struct AuthGate {
    public_routes: PublicRoutes,
    verifier: TokenVerifier,
}

impl AuthGate {
    pub fn new(public_routes: PublicRoutes, verifier: TokenVerifier) -> Self {
        Self {
            public_routes,
            verifier,
        }
    }

    pub fn public_routes(&self) -> &PublicRoutes {
        &self.public_routes
    }

    pub fn authorize(&self, path: &str, headers: &HeaderMap) -> Result<Access, AuthError> {
        if self.public_routes.is_public(path) {
            return Ok(Access::Public);
        }

        match self.authenticate(headers) {
            Ok(token) => {
                tracing::info!(
                    subject = %token.subject,
                    at = %Utc::now().to_rfc3339(),
                    "user authenticated"
                );
                Ok(Access::Authenticated(token))
            }
            Err(err) => {
                match &err {
                    AuthError::Internal(source) => {
                        tracing::error!(path, error = ?source, "token verification failed internally")
                    }
                    AuthError::ExpiredCredential { claims } => tracing::warn!(
                        path,
                        subject = %claims.sub,
                        reason = %err,
                        "request denied"
                    ),
                    _ => tracing::warn!(path, reason = %err, "request denied"),
                }
                Err(err)
            }
        }
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<VerifiedAccessToken, AuthError> {
        // absence is checked before anything is parsed
        let value = match headers.get(header::AUTHORIZATION) {
            Some(v) if !v.as_bytes().iter().all(u8::is_ascii_whitespace) => v,
            _ => return Err(AuthError::MissingCredential),
        };

        let value = value.to_str().map_err(|_| {
            AuthError::invalid(
                "Invalid Authorization Header",
                "authorization header is not valid ASCII",
            )
        })?;

        let token = value.strip_prefix(BEARER_PREFIX).ok_or_else(|| {
            AuthError::invalid(
                "Invalid Authorization Header",
                "authorization header must use the Bearer scheme",
            )
        })?;

        self.verifier.verify(token.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    use serde_json::json;

    const SECRET: &[u8] = b"gate-test-secret";

    fn gate() -> AuthGate {
        AuthGate::new(
            PublicRoutes::compile(["/", "/docs"]),
            TokenVerifier::new(SECRET, None, None, 0),
        )
    }

    fn token(sub: &str, exp_offset: i64) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &json!({ "sub": sub, "exp": Utc::now().timestamp() + exp_offset }),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    fn headers(authorization: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(authorization).unwrap(),
        );
        headers
    }

    #[test]
    fn public_path_skips_credential_work() {
        // even a broken header is ignored on a public path
        let access = gate().authorize("/docs/v2", &headers("Bearer garbage")).unwrap();
        assert_eq!(access, Access::Public);
        assert_eq!(gate().authorize("/", &HeaderMap::new()).unwrap(), Access::Public);
    }

    #[test]
    fn missing_header_is_denied() {
        let err = gate().authorize("/users/1", &HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AuthError::MissingCredential));
    }

    #[test]
    fn empty_header_counts_as_missing() {
        let err = gate().authorize("/users/1", &headers("")).unwrap_err();
        assert!(matches!(err, AuthError::MissingCredential));
    }

    #[test]
    fn valid_token_is_authenticated() {
        let access = gate()
            .authorize("/users/1", &headers(&format!("Bearer {}", token("alice", 600))))
            .unwrap();

        match access {
            Access::Authenticated(t) => assert_eq!(t.subject, "alice"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn wrong_scheme_is_invalid() {
        for value in [
            format!("Basic {}", token("alice", 600)),
            format!("bearer {}", token("alice", 600)),
            token("alice", 600),
        ] {
            let err = gate().authorize("/users/1", &headers(&value)).unwrap_err();
            assert!(
                matches!(err, AuthError::InvalidCredential { name: "Invalid Authorization Header", .. }),
                "{value}: {err:?}"
            );
        }
    }

    #[test]
    fn non_ascii_header_is_invalid() {
        let mut map = HeaderMap::new();
        map.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );
        let err = gate().authorize("/users/1", &map).unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredential { .. }));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let err = gate()
            .authorize("/users/1", &headers(&format!("Bearer {}", token("alice", -3600))))
            .unwrap_err();
        assert!(matches!(err, AuthError::ExpiredCredential { .. }));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = gate()
            .authorize("/users/1", &headers("Bearer garbage"))
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredential { .. }));
    }

    #[test]
    fn gate_exposes_its_compiled_routes() {
        let gate = gate();
        assert_eq!(gate.public_routes().matchers().len(), 2);
        assert!(gate.public_routes().is_public("/docs/v2"));
    }

    #[test]
    fn docsx_is_protected() {
        let err = gate().authorize("/docsx", &HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AuthError::MissingCredential));
    }
}
