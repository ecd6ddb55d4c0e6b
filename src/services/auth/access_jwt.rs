use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use thiserror::Error;

use crate::error::AppError;

/// Why a request was not allowed through the gate.
///
/// Each variant maps to exactly one client-facing error (see `From<AuthError> for AppError`).
#[derive(Debug, Error)]
pub enum AuthError {
    /// Protected route, no `Authorization` header.
    #[error("missing authorization header")]
    MissingCredential,

    /// Header present, credential unusable. Caller's fault.
    #[error("{name}: {detail}")]
    InvalidCredential { name: &'static str, detail: String },

    /// Signature is valid but the token has expired.
    #[error("access token expired")]
    ExpiredCredential { claims: AccessTokenClaims },

    /// Verification could not run (key material / crypto provider). System's fault.
    #[error("token verification failed internally: {0}")]
    Internal(jsonwebtoken::errors::Error),
}

impl AuthError {
    pub(crate) fn invalid(name: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidCredential {
            name,
            detail: detail.into(),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingCredential => AppError::access_denied(),
            AuthError::InvalidCredential { name, detail } => {
                AppError::invalid_credential(name, detail)
            }
            AuthError::ExpiredCredential { claims } => {
                AppError::token_expired(timestamp(claims.exp))
            }
            AuthError::Internal(_) => AppError::internal(),
        }
    }
}

/// Access token (JWT) claims.
///
/// `sub` is also accepted under the legacy `username` key.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    #[serde(alias = "username")]
    pub sub: String,
    pub exp: u64,

    #[serde(default)]
    pub iat: Option<u64>,
    #[serde(default)]
    pub nbf: Option<u64>,
    #[serde(default)]
    pub iss: Option<String>,
}

/// 検証済みのトークンから作るアプリ側の型 (Identity)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccessToken {
    pub subject: String,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
}

fn timestamp(secs: u64) -> Option<DateTime<Utc>> {
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::from_timestamp(s, 0))
}

/// Sort a jsonwebtoken failure into caller-attributable vs system-attributable.
fn classify(err: jsonwebtoken::errors::Error) -> AuthError {
    let name = match err.kind() {
        ErrorKind::InvalidSignature => "Invalid Signature",
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => "Malformed Token",
        ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingAlgorithm => "Invalid Algorithm",
        ErrorKind::ImmatureSignature => "Token Not Active",
        ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::InvalidSubject
        | ErrorKind::InvalidClaimFormat(_) => "Invalid Claims",
        // key material, crypto provider, anything added later
        _ => return AuthError::Internal(err),
    };

    AuthError::invalid(name, err.to_string())
}

/// HS256 access-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    // same checks minus `exp`; used to recover claims of an expired token
    expired_validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(
        secret: &[u8],
        issuer: Option<&str>,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Self {
        let decoding_key = DecodingKey::from_secret(secret);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;
        validation.validate_nbf = true;
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        let mut expired_validation = validation.clone();
        expired_validation.validate_exp = false;

        Self {
            decoding_key,
            validation,
            expired_validation,
        }
    }

    /// Verify signature + expiry (and iss/aud/nbf when configured) and return the identity.
    pub fn verify(&self, token: &str) -> Result<VerifiedAccessToken, AuthError> {
        let claims =
            match jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
            {
                Ok(data) => data.claims,
                Err(err) if matches!(err.kind(), ErrorKind::ExpiredSignature) => {
                    return Err(self.expired(token));
                }
                Err(err) => return Err(classify(err)),
            };

        if claims.sub.trim().is_empty() {
            return Err(AuthError::invalid("Invalid Claims", "empty 'sub' claim"));
        }

        let expires_at = timestamp(claims.exp)
            .ok_or_else(|| AuthError::invalid("Invalid Claims", "'exp' is out of range"))?;
        let issued_at = match claims.iat {
            Some(iat) => Some(
                timestamp(iat)
                    .ok_or_else(|| AuthError::invalid("Invalid Claims", "'iat' is out of range"))?,
            ),
            None => None,
        };

        Ok(VerifiedAccessToken {
            subject: claims.sub,
            issued_at,
            expires_at,
        })
    }

    // jsonwebtoken stops at `exp` before iss/aud/nbf; re-run every other check so that
    // "expired" is only reported when expiry is the sole defect.
    fn expired(&self, token: &str) -> AuthError {
        match jsonwebtoken::decode::<AccessTokenClaims>(
            token,
            &self.decoding_key,
            &self.expired_validation,
        ) {
            Ok(data) => AuthError::ExpiredCredential {
                claims: data.claims,
            },
            Err(err) => classify(err),
        }
    }
}
