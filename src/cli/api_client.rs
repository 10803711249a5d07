// HTTP client for the timelapse API. Requests carry the default provider's
// ID token; a 401 triggers one token refresh and one retry.

use crate::cli::config::{CliContext, ConfigError, ConfigStore, Credentials, OAuthSettings};
use crate::cli::login::{LoginError, refresh_tokens};
use crate::contracts::project::ProjectResource;
use crate::contracts::time_entry::{StartRequest, StopRequest, TimeEntryResource};
use crate::shared::infrastructure::http::error::ErrorBody;
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("No credentials found. Please login first.")]
    NotLoggedIn,

    #[error("invalid server URL {0}")]
    BaseUrl(String),

    #[error("{0}")]
    Remote(String),

    #[error("{status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    Refresh(#[from] LoginError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    store: ConfigStore,
    oauth: OAuthSettings,
    credentials: Credentials,
}

impl ApiClient {
    pub async fn new(http: reqwest::Client, context: &CliContext) -> Result<Self, ClientError> {
        let base_url = Url::parse(&context.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ClientError::BaseUrl(context.base_url.clone()))?;
        Ok(Self {
            http,
            base_url,
            store: context.store.clone(),
            oauth: context.oauth.clone(),
            credentials: context.store.load_credentials().await?,
        })
    }

    /// Appends percent-encoded `segments` to the base URL's path.
    pub fn url_for(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn id_token(&self) -> Result<&str, ClientError> {
        self.credentials
            .current()
            .map(|current| current.id_token.as_str())
            .filter(|token| !token.is_empty())
            .ok_or(ClientError::NotLoggedIn)
    }

    async fn dispatch<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ClientError> {
        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(self.id_token()?);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(
        &mut self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, ClientError> {
        let url = self.url_for(segments)?;
        debug!(%method, %url, "Calling timelapse API");

        let mut response = self.dispatch(method.clone(), url.clone(), body).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("Token rejected, refreshing");
            refresh_tokens(&self.oauth, &self.store).await?;
            self.credentials = self.store.load_credentials().await?;
            response = self.dispatch(method, url, body).await?;
        }

        let status = response.status();
        let bytes = response.bytes().await?;
        trace!(%status, body = %String::from_utf8_lossy(&bytes), "API response");
        if !status.is_success() {
            return Err(match serde_json::from_slice::<ErrorBody>(&bytes) {
                Ok(error) if !error.message.is_empty() => ClientError::Remote(error.message),
                _ => ClientError::Status {
                    status,
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                },
            });
        }
        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }

    async fn get<T: DeserializeOwned>(&mut self, segments: &[&str]) -> Result<T, ClientError> {
        self.send::<(), T>(Method::GET, segments, None).await
    }

    pub async fn create_project(
        &mut self,
        project: &ProjectResource,
    ) -> Result<ProjectResource, ClientError> {
        self.send(Method::POST, &["projects"], Some(project)).await
    }

    pub async fn get_project(&mut self, name: &str) -> Result<ProjectResource, ClientError> {
        self.get(&["projects", name]).await
    }

    pub async fn update_project(
        &mut self,
        name: &str,
        project: &ProjectResource,
    ) -> Result<ProjectResource, ClientError> {
        self.send(Method::PUT, &["projects", name], Some(project)).await
    }

    pub async fn list_projects(&mut self) -> Result<Vec<ProjectResource>, ClientError> {
        self.get(&["projects"]).await
    }

    /// Entries of one project, or of every project when `project` is `None`.
    pub async fn get_time_entries(
        &mut self,
        project: Option<&str>,
    ) -> Result<Vec<TimeEntryResource>, ClientError> {
        match project {
            Some(project) => self.get(&["projects", project, "entries"]).await,
            None => self.get(&["entries"]).await,
        }
    }

    pub async fn get_time_entry(
        &mut self,
        project: &str,
        id: &str,
    ) -> Result<TimeEntryResource, ClientError> {
        self.get(&["projects", project, "entries", id]).await
    }

    pub async fn add_time_entry(
        &mut self,
        project: &str,
        entry: &TimeEntryResource,
    ) -> Result<TimeEntryResource, ClientError> {
        self.send(Method::POST, &["projects", project, "entries"], Some(entry))
            .await
    }

    pub async fn update_time_entry(
        &mut self,
        project: &str,
        entry: &TimeEntryResource,
    ) -> Result<TimeEntryResource, ClientError> {
        self.send(
            Method::PUT,
            &["projects", project, "entries", entry.id.as_str()],
            Some(entry),
        )
        .await
    }

    pub async fn start(
        &mut self,
        project: &str,
        request: &StartRequest,
    ) -> Result<TimeEntryResource, ClientError> {
        self.send(Method::POST, &["projects", project, "start"], Some(request))
            .await
    }

    pub async fn stop(
        &mut self,
        project: &str,
        request: &StopRequest,
    ) -> Result<TimeEntryResource, ClientError> {
        self.send(Method::POST, &["projects", project, "stop"], Some(request))
            .await
    }
}
