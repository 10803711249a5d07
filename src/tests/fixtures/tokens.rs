// Tokens signed with a shared HMAC secret published as an `oct` JWK, so
// verification runs the same path as for a discovered key set.

use crate::modules::identity::adapters::outbound::oidc_verifier::OidcVerifier;
use crate::modules::identity::use_cases::authenticate_request::verifier::{
    IssuerRegistry, TokenVerifier,
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{TimeDelta, Utc};
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};
use std::sync::Arc;

pub const TEST_ISSUER: &str = "https://issuer.timelapse.test";
pub const TEST_KID: &str = "test-key-1";
const TEST_SECRET: &[u8] = b"timelapse-test-signing-secret-0123456789";

pub fn issue_token_with_claims(kid: &str, claims: Value) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(kid.to_string());
    encode(&header, &claims, &EncodingKey::from_secret(TEST_SECRET)).unwrap()
}

/// A token valid for the next hour.
pub fn issue_token(issuer: &str, subject: &str, email: &str) -> String {
    let expires = Utc::now() + TimeDelta::hours(1);
    issue_token_with_claims(
        TEST_KID,
        json!({
            "iss": issuer,
            "sub": subject,
            "email": email,
            "iat": Utc::now().timestamp(),
            "exp": expires.timestamp(),
        }),
    )
}

pub fn test_key_set() -> JwkSet {
    serde_json::from_value(json!({
        "keys": [{
            "kty": "oct",
            "kid": TEST_KID,
            "alg": "HS256",
            "use": "sig",
            "k": URL_SAFE_NO_PAD.encode(TEST_SECRET),
        }]
    }))
    .unwrap()
}

pub fn test_verifier() -> OidcVerifier {
    OidcVerifier::new(TEST_ISSUER, test_key_set())
}

pub fn test_registry() -> IssuerRegistry {
    IssuerRegistry::new([Arc::new(test_verifier()) as Arc<dyn TokenVerifier>])
}
