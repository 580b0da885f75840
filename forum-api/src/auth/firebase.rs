//! Firebase ID token verification.
//!
//! Firebase ID tokens are RS256 JWTs signed with Google's rotating
//! secure-token keys. The public keys are published as a JWK set whose
//! `Cache-Control: max-age` says how long they stay valid; the verifier
//! caches them for that long. A token naming a key it has not seen triggers
//! an early refetch, at most once per refresh cooldown, since the key id is
//! read before any signature is checked.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use forum_shared::VerifiedIdentity;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::header::{HeaderMap, CACHE_CONTROL};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::info;

use super::IdentityVerifier;
use crate::errors::AuthError;

/// Google's JWK set for Firebase ID tokens.
pub const GOOGLE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

const ISSUER_PREFIX: &str = "https://securetoken.google.com/";

/// Key lifetime when the key endpoint sends no usable `max-age`.
const DEFAULT_KEYS_MAX_AGE: Duration = Duration::from_secs(3600);

const KEY_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimum time between two key fetches while the cached keys are still valid.
pub const DEFAULT_REFRESH_COOLDOWN: Duration = Duration::from_secs(60);

/// Clock skew tolerated on time-based claims.
const LEEWAY_SECS: u64 = 60;

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    #[serde(default)]
    iat: Option<u64>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
    expires_at: Instant,
}

impl CachedKeys {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Verifies Firebase ID tokens for one project.
///
/// Checks the signature against the published keys, `exp`, `aud` (the
/// project id), `iss` (`https://securetoken.google.com/<project id>`) and a
/// non-empty `sub`, which becomes the uid.
pub struct FirebaseVerifier {
    project_id: String,
    issuer: String,
    jwks_url: String,
    client: Client,
    refresh_cooldown: Duration,
    keys: RwLock<Option<CachedKeys>>,
}

impl FirebaseVerifier {
    /// Create a verifier that fetches keys from Google.
    pub fn new(project_id: impl Into<String>) -> Result<Self, AuthError> {
        Self::with_jwks_url(project_id, GOOGLE_JWKS_URL)
    }

    /// Create a verifier that fetches keys from `jwks_url`.
    pub fn with_jwks_url(
        project_id: impl Into<String>,
        jwks_url: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let project_id = project_id.into();
        let client = Client::builder().timeout(KEY_FETCH_TIMEOUT).build()?;

        Ok(Self {
            issuer: format!("{}{}", ISSUER_PREFIX, project_id),
            project_id,
            jwks_url: jwks_url.into(),
            client,
            refresh_cooldown: DEFAULT_REFRESH_COOLDOWN,
            keys: RwLock::new(None),
        })
    }

    /// Set the minimum time between key fetches triggered by unknown key ids.
    pub fn with_refresh_cooldown(mut self, cooldown: Duration) -> Self {
        self.refresh_cooldown = cooldown;
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(key) = self.cached_key(kid).await? {
            return Ok(key);
        }

        // Expired cache or a key we have not seen yet (rotation). Concurrent
        // misses queue on the write lock and share one fetch.
        let mut cache = self.keys.write().await;
        let now = Instant::now();
        let recently_fetched = cache.as_ref().is_some_and(|cached| {
            cached.is_fresh(now) && now.duration_since(cached.fetched_at) < self.refresh_cooldown
        });

        if !recently_fetched {
            *cache = Some(self.fetch_keys().await?);
        }

        let jwk = cache
            .as_ref()
            .and_then(|cached| cached.keys.find(kid))
            .ok_or_else(|| AuthError::invalid(format!("unknown signing key '{}'", kid)))?;
        Ok(DecodingKey::from_jwk(jwk)?)
    }

    async fn cached_key(&self, kid: &str) -> Result<Option<DecodingKey>, AuthError> {
        let cache = self.keys.read().await;
        match cache.as_ref() {
            Some(cached) if cached.is_fresh(Instant::now()) => match cached.keys.find(kid) {
                Some(jwk) => Ok(Some(DecodingKey::from_jwk(jwk)?)),
                None => Ok(None),
            },
            _ => Ok(None),
        }
    }

    async fn fetch_keys(&self) -> Result<CachedKeys, AuthError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await?
            .error_for_status()?;

        let max_age = max_age(response.headers()).unwrap_or(DEFAULT_KEYS_MAX_AGE);
        let keys: JwkSet = response.json().await?;

        info!(
            keys = keys.keys.len(),
            max_age_secs = max_age.as_secs(),
            "Fetched ID token signing keys"
        );

        let fetched_at = Instant::now();
        Ok(CachedKeys {
            keys,
            fetched_at,
            expires_at: fetched_at + max_age,
        })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "aud", "iss"]);
        validation.leeway = LEEWAY_SECS;
        validation
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseVerifier {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, AuthError> {
        let header = decode_header(id_token)?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::invalid(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| AuthError::invalid("token has no key id"))?;

        let key = self.decoding_key(&kid).await?;
        let claims = decode::<FirebaseClaims>(id_token, &key, &self.validation())?.claims;

        if claims.sub.trim().is_empty() {
            return Err(AuthError::invalid("token has an empty subject"));
        }
        if let Some(iat) = claims.iat {
            if iat > unix_now().saturating_add(LEEWAY_SECS) {
                return Err(AuthError::invalid("token was issued in the future"));
            }
        }

        Ok(VerifiedIdentity {
            uid: claims.sub,
            email: claims.email,
            name: claims.name,
        })
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// `max-age` directive of a `Cache-Control` header.
fn max_age(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(CACHE_CONTROL)?
        .to_str()
        .ok()?
        .split(',')
        .find_map(|directive| {
            directive
                .trim()
                .strip_prefix("max-age=")?
                .parse::<u64>()
                .ok()
        })
        .map(Duration::from_secs)
}
