//! Identity verification.
//!
//! Callers identify themselves with an ID token in the `Authorization:
//! Bearer` header. A verifier turns the token into a `VerifiedIdentity`;
//! routes that accept anonymous callers treat any failure as "no identity".

mod firebase;
mod local;
mod middleware;

use async_trait::async_trait;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use forum_shared::VerifiedIdentity;

use crate::errors::AuthError;

pub use firebase::{FirebaseVerifier, GOOGLE_JWKS_URL};
pub use local::{DisabledVerifier, StaticVerifier};
pub use middleware::{identity_middleware, Caller};

/// Verifies ID tokens.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify `id_token` and return the identity it asserts.
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, AuthError>;
}

/// Extract the bearer token from the `Authorization` header.
///
/// The scheme is matched case-insensitively (RFC 6750). Blank tokens count as
/// absent.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            if v.len() >= 7 && v[..7].eq_ignore_ascii_case("bearer ") {
                Some(v[7..].trim())
            } else {
                None
            }
        })
        .filter(|token| !token.is_empty())
}
