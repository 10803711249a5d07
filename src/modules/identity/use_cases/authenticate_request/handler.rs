// Bearer token -> issuer -> trusted verifier -> claims -> user.
//
// Failures caused by the presented credential are `is_credential_failure`
// and answer 401; a failing repository is the only internal error.

use crate::modules::identity::core::user::{Identity, User};
use crate::modules::identity::use_cases::authenticate_request::issuer::{
    IssuerError, extract_issuer,
};
use crate::modules::identity::use_cases::authenticate_request::verifier::{
    IssuerRegistry, RegistryLoader, VerificationError,
};
use crate::shared::infrastructure::repository::{RepositoryError, TimelapseRepository};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("no authorization header")]
    MissingCredentials,

    #[error("authorization header is not a bearer token")]
    NotBearer,

    #[error(transparent)]
    MalformedToken(#[from] IssuerError),

    #[error("issuer {0} is not trusted")]
    UntrustedIssuer(String),

    #[error(transparent)]
    InvalidToken(#[from] VerificationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AuthenticationError {
    pub fn is_credential_failure(&self) -> bool {
        !matches!(self, AuthenticationError::Repository(_))
    }
}

/// Extracts the token from `Bearer <token>`; the scheme is case-insensitive.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, AuthenticationError> {
    let header = authorization.ok_or(AuthenticationError::MissingCredentials)?;
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or(AuthenticationError::NotBearer)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthenticationError::NotBearer);
    }
    Ok(token)
}

pub struct AuthenticationGate {
    loader: Box<dyn RegistryLoader>,
    registry: OnceCell<IssuerRegistry>,
    repository: Arc<dyn TimelapseRepository>,
}

impl AuthenticationGate {
    pub fn new(
        loader: impl RegistryLoader + 'static,
        repository: Arc<dyn TimelapseRepository>,
    ) -> Self {
        Self {
            loader: Box::new(loader),
            registry: OnceCell::new(),
            repository,
        }
    }

    /// Concurrent first callers wait on a single load.
    async fn registry(&self) -> &IssuerRegistry {
        self.registry
            .get_or_init(|| async {
                let registry = self.loader.load().await;
                info!(issuers = ?registry.issuers().collect::<Vec<_>>(), "Issuer registry ready");
                registry
            })
            .await
    }

    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<User, AuthenticationError> {
        let token = bearer_token(authorization)?;
        let issuer = extract_issuer(token)?;
        let verifier = self
            .registry()
            .await
            .verifier_for(&issuer)
            .ok_or_else(|| AuthenticationError::UntrustedIssuer(issuer.clone()))?;

        let claims = verifier.verify(token).await?;
        debug!(issuer = %issuer, subject = %claims.subject, "Verified bearer token");

        let identity = Identity {
            issuer,
            subject_id: claims.subject,
            email: claims.email,
        };
        Ok(self.repository.find_or_create_user(&identity).await?)
    }
}
