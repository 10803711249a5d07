// OAuth 2.0 authorization-code login with PKCE (S256) through the `oauth2`
// crate. A loopback HTTP server on 127.0.0.1 hands the browser to the
// provider and receives the callback.

use crate::cli::config::{ConfigError, ConfigStore, OAuthSettings, ProviderCredentials};
use axum::Router;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use oauth2::basic::{
    BasicErrorResponse, BasicRevocationErrorResponse, BasicTokenIntrospectionResponse,
    BasicTokenType,
};
use oauth2::reqwest::async_http_client;
use oauth2::url::Url;
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, ExtraTokenFields,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, RefreshToken, RequestTokenError, Scope,
    StandardRevocableToken, StandardTokenResponse, TokenResponse, TokenUrl,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("no OAuth client id configured; set oauth.client_id in config.json or TIMELAPSE_OAUTH_CLIENT_ID")]
    MissingClientId,

    #[error("invalid OAuth endpoint {url}: {reason}")]
    Endpoint { url: String, reason: String },

    #[error("token request failed: {0}")]
    TokenRequest(String),

    #[error("token endpoint refused the request: {0}")]
    Rejected(String),

    #[error("login callback rejected: {0}")]
    Callback(String),

    #[error("no refresh token stored; please login again")]
    NoRefreshToken,

    #[error("login server failed: {0}")]
    Server(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The OpenID Connect `id_token` returned next to the OAuth tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdTokenFields {
    #[serde(default)]
    pub id_token: Option<String>,
}

impl ExtraTokenFields for IdTokenFields {}

pub type LoginTokens = StandardTokenResponse<IdTokenFields, BasicTokenType>;

pub type LoginClient = oauth2::Client<
    BasicErrorResponse,
    LoginTokens,
    BasicTokenType,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
>;

impl From<&LoginTokens> for ProviderCredentials {
    fn from(tokens: &LoginTokens) -> Self {
        Self {
            access_token: tokens.access_token().secret().clone(),
            refresh_token: tokens
                .refresh_token()
                .map(|token| token.secret().clone())
                .unwrap_or_default(),
            id_token: tokens.extra_fields().id_token.clone().unwrap_or_default(),
        }
    }
}

fn endpoint_error(url: &str, error: impl std::fmt::Display) -> LoginError {
    LoginError::Endpoint {
        url: url.to_string(),
        reason: error.to_string(),
    }
}

/// Builds the OAuth client for the configured provider. Credentials travel in
/// the request body so public clients without a secret work too.
pub fn oauth_client(
    oauth: &OAuthSettings,
    redirect_uri: Option<&str>,
) -> Result<LoginClient, LoginError> {
    let client_id = oauth
        .client_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(LoginError::MissingClientId)?;
    let client_secret = oauth
        .client_secret
        .as_ref()
        .filter(|secret| !secret.is_empty())
        .map(|secret| ClientSecret::new(secret.clone()));

    let mut client = LoginClient::new(
        ClientId::new(client_id.to_string()),
        client_secret,
        AuthUrl::new(oauth.auth_url.clone()).map_err(|error| endpoint_error(&oauth.auth_url, error))?,
        Some(
            TokenUrl::new(oauth.token_url.clone())
                .map_err(|error| endpoint_error(&oauth.token_url, error))?,
        ),
    )
    .set_auth_type(AuthType::RequestBody);
    if let Some(redirect_uri) = redirect_uri {
        client = client.set_redirect_uri(
            RedirectUrl::new(redirect_uri.to_string())
                .map_err(|error| endpoint_error(redirect_uri, error))?,
        );
    }
    Ok(client)
}

/// Authorization endpoint URL asking for `openid email` with the S256 challenge,
/// plus the CSRF state the callback must echo.
pub fn authorization_url(client: &LoginClient, challenge: PkceCodeChallenge) -> (Url, CsrfToken) {
    client
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::new("openid".into()))
        .add_scope(Scope::new("email".into()))
        .set_pkce_challenge(challenge)
        .url()
}

fn token_failure<RE: std::error::Error + 'static>(
    error: RequestTokenError<RE, BasicErrorResponse>,
) -> LoginError {
    match error {
        RequestTokenError::ServerResponse(response) => LoginError::Rejected(response.to_string()),
        RequestTokenError::Request(error) => LoginError::TokenRequest(error.to_string()),
        RequestTokenError::Parse(error, _) => {
            LoginError::TokenRequest(format!("malformed token response: {error}"))
        }
        RequestTokenError::Other(message) => LoginError::TokenRequest(message),
    }
}

pub async fn exchange_code(
    client: &LoginClient,
    code: &str,
    verifier: PkceCodeVerifier,
) -> Result<LoginTokens, LoginError> {
    client
        .exchange_code(AuthorizationCode::new(code.to_string()))
        .set_pkce_verifier(verifier)
        .request_async(async_http_client)
        .await
        .map_err(token_failure)
}

/// Trades the stored refresh token of the default provider for fresh tokens
/// and stores them. Providers may omit a new refresh token; the old one is
/// kept then.
pub async fn refresh_tokens(
    oauth: &OAuthSettings,
    store: &ConfigStore,
) -> Result<ProviderCredentials, LoginError> {
    let client = oauth_client(oauth, None)?;
    let mut credentials = store.load_credentials().await?;
    let refresh_token = credentials
        .current()
        .map(|current| current.refresh_token.clone())
        .filter(|token| !token.is_empty())
        .ok_or(LoginError::NoRefreshToken)?;

    let tokens = client
        .exchange_refresh_token(&RefreshToken::new(refresh_token.clone()))
        .request_async(async_http_client)
        .await
        .map_err(token_failure)?;
    let mut refreshed = ProviderCredentials::from(&tokens);
    if refreshed.refresh_token.is_empty() {
        refreshed.refresh_token = refresh_token;
    }

    let provider = credentials.default_provider.clone();
    credentials.set_provider(&provider, refreshed.clone());
    store.store_credentials(&credentials).await?;
    debug!(provider = %provider, "Refreshed tokens");
    Ok(refreshed)
}

struct LoginFlow {
    client: LoginClient,
    provider: String,
    store: ConfigStore,
    authorization_url: Url,
    verifier: Mutex<Option<PkceCodeVerifier>>,
    state: CsrfToken,
    done: Mutex<Option<oneshot::Sender<Result<(), LoginError>>>>,
}

impl LoginFlow {
    async fn finish(&self, outcome: Result<(), LoginError>) {
        if let Some(done) = self.done.lock().await.take() {
            let _ = done.send(outcome);
        }
    }

    async fn complete(&self, params: &HashMap<String, String>) -> Result<(), LoginError> {
        if let Some(error) = params.get("error") {
            return Err(LoginError::Callback(error.clone()));
        }
        if params.get("state") != Some(self.state.secret()) {
            return Err(LoginError::Callback("state mismatch".into()));
        }
        let code = params
            .get("code")
            .ok_or_else(|| LoginError::Callback("no authorization code".into()))?;
        let verifier = self
            .verifier
            .lock()
            .await
            .take()
            .ok_or_else(|| LoginError::Callback("authorization code already used".into()))?;

        let tokens = exchange_code(&self.client, code, verifier).await?;
        let mut credentials = self.store.load_credentials().await?;
        credentials.set_provider(&self.provider, ProviderCredentials::from(&tokens));
        credentials.default_provider = self.provider.clone();
        self.store.store_credentials(&credentials).await?;
        Ok(())
    }
}

fn page(message: &str) -> Html<String> {
    Html(format!(
        "<html><head></head><body><p>{message}</p></body></html>\n"
    ))
}

async fn start_login(State(flow): State<Arc<LoginFlow>>) -> Redirect {
    Redirect::to(flow.authorization_url.as_str())
}

async fn post_login(
    State(flow): State<Arc<LoginFlow>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match flow.complete(&params).await {
        Ok(()) => {
            flow.finish(Ok(())).await;
            page("You have successfully logged in to Timelapse. This browser window can now be closed.")
                .into_response()
        }
        Err(error) => {
            let message = format!("Login failed: {error}");
            flow.finish(Err(error)).await;
            page(&message).into_response()
        }
    }
}

/// Runs the interactive login and stores the tokens under the configured
/// provider, which becomes the default provider.
pub async fn login(oauth: OAuthSettings, store: ConfigStore) -> Result<(), LoginError> {
    oauth_client(&oauth, None)?;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    let client = oauth_client(&oauth, Some(&format!("http://{address}/post_login")))?;
    let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();
    let (authorization_url, state) = authorization_url(&client, challenge);

    let (done, finished) = oneshot::channel();
    let flow = Arc::new(LoginFlow {
        client,
        provider: oauth.provider,
        store,
        authorization_url,
        verifier: Mutex::new(Some(verifier)),
        state,
        done: Mutex::new(Some(done)),
    });
    let app = Router::new()
        .route("/login", get(start_login))
        .route("/post_login", get(post_login))
        .with_state(flow);

    eprintln!("Please open http://{address}/login in a web browser to log in.");
    info!(%address, "Waiting for the login callback");

    let (stop, stopped) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = stopped.await;
            })
            .await
    });

    let outcome = finished
        .await
        .unwrap_or_else(|_| Err(LoginError::Callback("login server stopped".into())));
    let _ = stop.send(());
    if let Ok(Err(error)) = server.await {
        debug!(%error, "Login server ended with an error");
    }
    outcome
}
