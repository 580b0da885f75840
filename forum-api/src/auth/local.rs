//! Verifiers that do not talk to an identity provider.

use std::collections::HashMap;

use async_trait::async_trait;
use forum_shared::VerifiedIdentity;

use super::IdentityVerifier;
use crate::errors::AuthError;

/// Rejects every token. Used when no identity provider is configured, which
/// makes every caller anonymous.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledVerifier;

#[async_trait]
impl IdentityVerifier for DisabledVerifier {
    async fn verify(&self, _id_token: &str) -> Result<VerifiedIdentity, AuthError> {
        Err(AuthError::NotConfigured)
    }
}

/// Accepts a fixed set of tokens. Intended for tests and local development.
///
/// # Example
///
/// ```ignore
/// let verifier = StaticVerifier::new()
///     .with_token("token-alice", VerifiedIdentity::new("alice").with_name("Alice"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct StaticVerifier {
    identities: HashMap<String, VerifiedIdentity>,
}

impl StaticVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token and the identity it maps to.
    pub fn with_token(mut self, token: impl Into<String>, identity: VerifiedIdentity) -> Self {
        self.identities.insert(token.into(), identity);
        self
    }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, AuthError> {
        self.identities
            .get(id_token)
            .cloned()
            .ok_or_else(|| AuthError::invalid("unknown token"))
    }
}
