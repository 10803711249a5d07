// Reads the `iss` claim of a compact JWT without checking its signature. The
// value only selects which verifier to run; trust is decided by that verifier.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IssuerError {
    #[error("token is not a compact JWT")]
    NotCompact,

    #[error("token payload is not base64url")]
    PayloadEncoding,

    #[error("token payload is not a JSON object with an issuer")]
    PayloadClaims,
}

#[derive(Deserialize)]
struct UnverifiedClaims {
    iss: String,
}

pub fn extract_issuer(token: &str) -> Result<String, IssuerError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(IssuerError::NotCompact);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| IssuerError::PayloadEncoding)?;
    let claims: UnverifiedClaims =
        serde_json::from_slice(&bytes).map_err(|_| IssuerError::PayloadClaims)?;
    Ok(normalize_issuer(&claims.iss))
}

/// `accounts.google.com` and `https://accounts.google.com/` name the same issuer.
pub fn normalize_issuer(issuer: &str) -> String {
    let issuer = issuer.trim().trim_end_matches('/');
    if issuer.contains("://") {
        issuer.to_string()
    } else {
        format!("https://{issuer}")
    }
}
