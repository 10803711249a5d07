use crate::modules::identity::use_cases::authenticate_request::issuer::normalize_issuer;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    pub issuer: String,
    pub subject: String,
    pub email: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("no signing key matches the token")]
    NoMatchingKey,

    #[error("unsupported signing algorithm {0}")]
    UnsupportedAlgorithm(String),

    #[error("token rejected: {0}")]
    Rejected(String),

    #[error("token lacks the {0} claim")]
    MissingClaim(&'static str),
}

/// Verifies tokens of exactly one issuer.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    fn issuer(&self) -> &str;

    async fn verify(&self, token: &str) -> Result<VerifiedClaims, VerificationError>;
}

/// Trusted issuers and their verifiers.
#[derive(Clone, Default)]
pub struct IssuerRegistry {
    verifiers: HashMap<String, Arc<dyn TokenVerifier>>,
}

impl IssuerRegistry {
    pub fn new(verifiers: impl IntoIterator<Item = Arc<dyn TokenVerifier>>) -> Self {
        Self {
            verifiers: verifiers
                .into_iter()
                .map(|verifier| (normalize_issuer(verifier.issuer()), verifier))
                .collect(),
        }
    }

    pub fn verifier_for(&self, issuer: &str) -> Option<&Arc<dyn TokenVerifier>> {
        self.verifiers.get(issuer)
    }

    pub fn issuers(&self) -> impl Iterator<Item = &str> {
        self.verifiers.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.verifiers.is_empty()
    }
}

/// Produces the issuer registry. The gate asks for it once, on the first
/// authenticated request, and keeps the result for the process lifetime.
#[async_trait]
pub trait RegistryLoader: Send + Sync {
    async fn load(&self) -> IssuerRegistry;
}

#[async_trait]
impl RegistryLoader for IssuerRegistry {
    async fn load(&self) -> IssuerRegistry {
        self.clone()
    }
}
