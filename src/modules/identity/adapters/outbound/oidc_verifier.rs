// OpenID Connect verification: discovery document -> JWKS -> signature and
// claim checks with `jsonwebtoken`.

use crate::modules::identity::use_cases::authenticate_request::issuer::normalize_issuer;
use crate::modules::identity::use_cases::authenticate_request::verifier::{
    IssuerRegistry, RegistryLoader, TokenVerifier, VerificationError, VerifiedClaims,
};
use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::{Jwk, JwkSet, KeyAlgorithm};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("discovery document of {0} names issuer {1}")]
    IssuerMismatch(String, String),
}

#[derive(Deserialize)]
struct DiscoveryDocument {
    issuer: String,
    jwks_uri: String,
}

#[derive(Deserialize)]
struct IdTokenClaims {
    #[serde(default)]
    sub: String,
    #[serde(default)]
    email: String,
}

pub struct OidcVerifier {
    issuer: String,
    keys: JwkSet,
}

impl OidcVerifier {
    pub fn new(issuer: impl Into<String>, keys: JwkSet) -> Self {
        Self {
            issuer: normalize_issuer(&issuer.into()),
            keys,
        }
    }

    /// Fetches `<issuer>/.well-known/openid-configuration` and the key set it names.
    pub async fn discover(client: &reqwest::Client, issuer: &str) -> Result<Self, DiscoveryError> {
        let issuer = normalize_issuer(issuer);
        let discovery_url = format!("{issuer}/.well-known/openid-configuration");
        let document: DiscoveryDocument = fetch_json(client, &discovery_url).await?;
        if normalize_issuer(&document.issuer) != issuer {
            return Err(DiscoveryError::IssuerMismatch(issuer, document.issuer));
        }
        let keys: JwkSet = fetch_json(client, &document.jwks_uri).await?;
        Ok(Self::new(issuer, keys))
    }

    fn key_for(&self, kid: Option<&str>) -> Result<&Jwk, VerificationError> {
        match kid {
            Some(kid) => self.keys.find(kid).ok_or(VerificationError::NoMatchingKey),
            None if self.keys.keys.len() == 1 => Ok(&self.keys.keys[0]),
            None => Err(VerificationError::NoMatchingKey),
        }
    }
}

async fn fetch_json<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, DiscoveryError> {
    let failed = |source| DiscoveryError::Request {
        url: url.to_string(),
        source,
    };
    client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(failed)?
        .json()
        .await
        .map_err(failed)
}

fn signing_algorithm(key: KeyAlgorithm) -> Result<Algorithm, VerificationError> {
    match key {
        KeyAlgorithm::HS256 => Ok(Algorithm::HS256),
        KeyAlgorithm::HS384 => Ok(Algorithm::HS384),
        KeyAlgorithm::HS512 => Ok(Algorithm::HS512),
        KeyAlgorithm::RS256 => Ok(Algorithm::RS256),
        KeyAlgorithm::RS384 => Ok(Algorithm::RS384),
        KeyAlgorithm::RS512 => Ok(Algorithm::RS512),
        KeyAlgorithm::PS256 => Ok(Algorithm::PS256),
        KeyAlgorithm::PS384 => Ok(Algorithm::PS384),
        KeyAlgorithm::PS512 => Ok(Algorithm::PS512),
        KeyAlgorithm::ES256 => Ok(Algorithm::ES256),
        KeyAlgorithm::ES384 => Ok(Algorithm::ES384),
        KeyAlgorithm::EdDSA => Ok(Algorithm::EdDSA),
        other => Err(VerificationError::UnsupportedAlgorithm(format!("{other:?}"))),
    }
}

fn rejection(kind: &ErrorKind) -> VerificationError {
    let reason = match kind {
        ErrorKind::ExpiredSignature => "expired",
        ErrorKind::ImmatureSignature => "not yet valid",
        ErrorKind::InvalidSignature => "bad signature",
        ErrorKind::InvalidIssuer => "wrong issuer",
        ErrorKind::InvalidAlgorithm => "algorithm mismatch",
        ErrorKind::MissingRequiredClaim(_) => "missing required claim",
        _ => "undecodable",
    };
    VerificationError::Rejected(reason.to_string())
}

#[async_trait]
impl TokenVerifier for OidcVerifier {
    fn issuer(&self) -> &str {
        &self.issuer
    }

    async fn verify(&self, token: &str) -> Result<VerifiedClaims, VerificationError> {
        let header = decode_header(token).map_err(|error| rejection(error.kind()))?;
        let key = self.key_for(header.kid.as_deref())?;
        let algorithm = match key.common.key_algorithm {
            Some(declared) => signing_algorithm(declared)?,
            None => header.alg,
        };
        let decoding_key =
            DecodingKey::from_jwk(key).map_err(|_| VerificationError::NoMatchingKey)?;

        let mut validation = Validation::new(algorithm);
        // Some providers issue `accounts.google.com` without a scheme.
        let bare = self.issuer.split_once("://").map_or(self.issuer.as_str(), |(_, rest)| rest);
        validation.set_issuer(&[self.issuer.as_str(), bare]);
        validation.validate_aud = false;

        let data = decode::<IdTokenClaims>(token, &decoding_key, &validation)
            .map_err(|error| rejection(error.kind()))?;
        if data.claims.sub.is_empty() {
            return Err(VerificationError::MissingClaim("sub"));
        }
        Ok(VerifiedClaims {
            issuer: self.issuer.clone(),
            subject: data.claims.sub,
            email: data.claims.email,
        })
    }
}

/// Discovers every trusted issuer. Issuers whose discovery fails are logged
/// and left out, so their tokens are rejected as untrusted.
pub async fn discover_registry(client: &reqwest::Client, issuers: &[String]) -> IssuerRegistry {
    let mut verifiers: Vec<Arc<dyn TokenVerifier>> = Vec::with_capacity(issuers.len());
    for issuer in issuers {
        match OidcVerifier::discover(client, issuer).await {
            Ok(verifier) => {
                info!(issuer = %verifier.issuer(), keys = verifier.keys.keys.len(), "Trusting issuer");
                verifiers.push(Arc::new(verifier));
            }
            Err(discovery_error) => {
                error!(issuer = %issuer, error = %discovery_error, "Issuer discovery failed");
            }
        }
    }
    IssuerRegistry::new(verifiers)
}

/// Discovers the configured issuers when the registry is first needed.
pub struct OidcDiscovery {
    client: reqwest::Client,
    issuers: Vec<String>,
}

impl OidcDiscovery {
    pub fn new(client: reqwest::Client, issuers: Vec<String>) -> Self {
        Self { client, issuers }
    }
}

#[async_trait]
impl RegistryLoader for OidcDiscovery {
    async fn load(&self) -> IssuerRegistry {
        discover_registry(&self.client, &self.issuers).await
    }
}

#[cfg(test)]
mod oidc_verifier_tests {
    use super::*;
    use crate::tests::fixtures::tokens::{
        TEST_ISSUER, TEST_KID, issue_token, issue_token_with_claims, test_verifier,
    };
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[tokio::test]
    async fn it_should_verify_tokens_signed_with_a_published_key() {
        let token = issue_token(TEST_ISSUER, "subject-1", "a@example.com");

        let claims = test_verifier().verify(&token).await.unwrap();

        assert_eq!(
            claims,
            VerifiedClaims {
                issuer: TEST_ISSUER.into(),
                subject: "subject-1".into(),
                email: "a@example.com".into(),
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_expired_tokens() {
        let token = issue_token_with_claims(
            TEST_KID,
            json!({ "iss": TEST_ISSUER, "sub": "subject-1", "exp": 1_000_000_000 }),
        );

        assert_eq!(
            test_verifier().verify(&token).await,
            Err(VerificationError::Rejected("expired".into()))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_tokens_for_another_issuer() {
        let token = issue_token("https://rogue.example.com", "subject-1", "a@example.com");

        assert_eq!(
            test_verifier().verify(&token).await,
            Err(VerificationError::Rejected("wrong issuer".into()))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_unknown_key_ids() {
        let token = issue_token_with_claims(
            "other-key",
            json!({ "iss": TEST_ISSUER, "sub": "subject-1", "exp": 4_000_000_000_u64 }),
        );

        assert_eq!(
            test_verifier().verify(&token).await,
            Err(VerificationError::NoMatchingKey)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_require_a_subject() {
        let token = issue_token_with_claims(
            TEST_KID,
            json!({ "iss": TEST_ISSUER, "exp": 4_000_000_000_u64 }),
        );

        assert_eq!(
            test_verifier().verify(&token).await,
            Err(VerificationError::MissingClaim("sub"))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_issuers_are_left_out_of_the_registry() {
        let client = reqwest::Client::new();

        let registry = discover_registry(&client, &["http://127.0.0.1:9".to_string()]).await;

        assert!(registry.is_empty());
    }
}
