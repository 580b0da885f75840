//! Firebase ID token verification against a mocked key endpoint.

use std::net::TcpListener;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use forum_api::{AuthError, FirebaseVerifier, IdentityVerifier};
use httpmock::Method::GET;
use httpmock::{Mock, MockServer};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

const PROJECT_ID: &str = "forum-test";
const KEY_ID: &str = "test-key-1";
const SIGNING_KEY: &[u8] = include_bytes!("fixtures/signing_key.pem");
const FOREIGN_KEY: &[u8] = include_bytes!("fixtures/foreign_key.pem");
const JWKS: &str = include_str!("fixtures/jwks.json");

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn claims(sub: &str) -> Value {
    json!({
        "sub": sub,
        "aud": PROJECT_ID,
        "iss": format!("https://securetoken.google.com/{}", PROJECT_ID),
        "iat": now() - 10,
        "exp": now() + 3600,
        "email": "grace@example.com",
        "name": "Grace"
    })
}

fn sign(key: &[u8], kid: &str, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    encode(&header, claims, &EncodingKey::from_rsa_pem(key).unwrap()).unwrap()
}

async fn key_endpoint(server: &MockServer) -> Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/jwks");
            then.status(200)
                .header("content-type", "application/json")
                .header("cache-control", "public, max-age=3600, must-revalidate")
                .body(JWKS);
        })
        .await
}

fn verifier_for(server: &MockServer) -> FirebaseVerifier {
    FirebaseVerifier::with_jwks_url(PROJECT_ID, server.url("/jwks")).unwrap()
}

#[tokio::test]
async fn test_valid_token_yields_identity() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start_async().await;
    key_endpoint(&server).await;
    let verifier = verifier_for(&server);

    let identity = verifier
        .verify(&sign(SIGNING_KEY, KEY_ID, &claims("uid-grace")))
        .await
        .unwrap();

    assert_eq!(identity.uid, "uid-grace");
    assert_eq!(identity.email.as_deref(), Some("grace@example.com"));
    assert_eq!(identity.name.as_deref(), Some("Grace"));
}

#[tokio::test]
async fn test_keys_are_cached_between_verifications() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start_async().await;
    let keys = key_endpoint(&server).await;
    let verifier = verifier_for(&server);

    for uid in ["uid-1", "uid-2", "uid-3"] {
        let token = sign(SIGNING_KEY, KEY_ID, &claims(uid));
        assert_eq!(verifier.verify(&token).await.unwrap().uid, uid);
    }

    keys.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_unknown_key_ids_refetch_at_most_once_per_cooldown() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start_async().await;
    let keys = key_endpoint(&server).await;
    let verifier = verifier_for(&server);

    verifier
        .verify(&sign(SIGNING_KEY, KEY_ID, &claims("uid-1")))
        .await
        .unwrap();

    for i in 0..20 {
        let token = sign(FOREIGN_KEY, &format!("bogus-{i}"), &claims("uid-1"));
        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::Invalid(_)), "{err:?}");
    }

    keys.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_unknown_key_id_refetches_after_cooldown() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start_async().await;
    let keys = key_endpoint(&server).await;
    let verifier = verifier_for(&server).with_refresh_cooldown(Duration::ZERO);

    verifier
        .verify(&sign(SIGNING_KEY, KEY_ID, &claims("uid-1")))
        .await
        .unwrap();
    let err = verifier
        .verify(&sign(SIGNING_KEY, "rotated-key", &claims("uid-1")))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Invalid(_)));
    keys.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_claims_are_validated() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start_async().await;
    key_endpoint(&server).await;
    let verifier = verifier_for(&server);

    let mut wrong_audience = claims("uid-1");
    wrong_audience["aud"] = json!("another-project");

    let mut wrong_issuer = claims("uid-1");
    wrong_issuer["iss"] = json!("https://accounts.example.com");

    let mut expired = claims("uid-1");
    expired["exp"] = json!(now() - 3600);

    let mut future = claims("uid-1");
    future["iat"] = json!(now() + 3600);

    let empty_subject = claims("");

    for (case, claims) in [
        ("audience", wrong_audience),
        ("issuer", wrong_issuer),
        ("expiry", expired),
        ("issued at", future),
        ("subject", empty_subject),
    ] {
        let err = verifier
            .verify(&sign(SIGNING_KEY, KEY_ID, &claims))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Invalid(_)), "{case}: {err:?}");
    }
}

#[tokio::test]
async fn test_signature_from_another_key_is_rejected() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start_async().await;
    key_endpoint(&server).await;
    let verifier = verifier_for(&server);

    let err = verifier
        .verify(&sign(FOREIGN_KEY, KEY_ID, &claims("uid-1")))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Invalid(_)));
}

#[tokio::test]
async fn test_symmetric_tokens_are_rejected_before_fetching_keys() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start_async().await;
    let keys = key_endpoint(&server).await;
    let verifier = verifier_for(&server);

    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(KEY_ID.to_string());
    let token = encode(&header, &claims("uid-1"), &EncodingKey::from_secret(b"shared")).unwrap();

    let err = verifier.verify(&token).await.unwrap_err();

    assert!(matches!(err, AuthError::Invalid(_)));
    keys.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_key_endpoint_failure_is_reported() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/jwks");
            then.status(503);
        })
        .await;
    let verifier = verifier_for(&server);

    let err = verifier
        .verify(&sign(SIGNING_KEY, KEY_ID, &claims("uid-1")))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::KeyFetch(_)));
}
