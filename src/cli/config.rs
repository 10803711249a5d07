// Client-side configuration: `config.json` (server and OAuth settings) and
// `credentials.json` (tokens per identity provider) in the configuration
// directory. Missing files read as defaults.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_FILE: &str = "config.json";
pub const CREDENTIALS_FILE: &str = "credentials.json";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

const DEFAULT_PROVIDER: &str = "google";
const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot locate the configuration directory: neither XDG_CONFIG_HOME nor HOME is set")]
    NoConfigDir,

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid JSON: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode {0}: {1}")]
    Encode(&'static str, #[source] serde_json::Error),
}

/// `$XDG_CONFIG_HOME/timelapse`, else `$HOME/.config/timelapse`, else
/// `%APPDATA%\timelapse`.
pub fn default_config_dir(lookup: impl Fn(&str) -> Option<String>) -> Result<PathBuf, ConfigError> {
    let set = |name: &str| lookup(name).filter(|value| !value.is_empty());
    let base = set("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| set("HOME").map(|home| Path::new(&home).join(".config")))
        .or_else(|| set("APPDATA").map(PathBuf::from))
        .ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("timelapse"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthSettings {
    pub provider: String,
    pub auth_url: String,
    pub token_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            client_id: None,
            client_secret: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub oauth: OAuthSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderCredentials {
    pub access_token: String,
    pub refresh_token: String,
    pub id_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub credentials: BTreeMap<String, ProviderCredentials>,
    pub default_provider: String,
}

impl Credentials {
    pub fn current(&self) -> Option<&ProviderCredentials> {
        self.credentials.get(&self.default_provider)
    }

    /// Stores the tokens of `provider`; the first provider to log in becomes
    /// the default.
    pub fn set_provider(&mut self, provider: &str, tokens: ProviderCredentials) {
        self.credentials.insert(provider.to_string(), tokens);
        if self.default_provider.is_empty() {
            self.default_provider = provider.to_string();
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn load_configuration(&self) -> Result<Configuration, ConfigError> {
        self.load(CONFIG_FILE).await
    }

    pub async fn load_credentials(&self) -> Result<Credentials, ConfigError> {
        self.load(CREDENTIALS_FILE).await
    }

    /// Writes `credentials.json` readable by the owner only.
    pub async fn store_credentials(&self, credentials: &Credentials) -> Result<(), ConfigError> {
        let bytes = serde_json::to_vec_pretty(credentials)
            .map_err(|error| ConfigError::Encode(CREDENTIALS_FILE, error))?;
        let path = self.dir.join(CREDENTIALS_FILE);
        let failed = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };

        tokio::fs::create_dir_all(&self.dir).await.map_err(failed)?;
        write_private(&path, &bytes).await.map_err(failed)?;
        debug!(path = %path.display(), "Stored credentials");
        Ok(())
    }

    async fn load<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T, ConfigError> {
        let path = self.dir.join(file);
        let read = tokio::fs::read(&path).await;
        match read {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|source| ConfigError::Decode { path, source })
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }
}

#[cfg(unix)]
async fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;
    use tokio::io::AsyncWriteExt;

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    // `mode` only applies to newly created files.
    tokio::fs::set_permissions(path, Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(path, bytes).await
}

/// Values resolved once per invocation from flags, environment and
/// `config.json`.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub store: ConfigStore,
    pub base_url: String,
    pub oauth: OAuthSettings,
}

impl CliContext {
    pub async fn resolve(
        server_url: Option<String>,
        config_dir: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let dir = match config_dir {
            Some(dir) => dir,
            None => default_config_dir(&lookup)?,
        };
        let store = ConfigStore::new(dir);
        let configuration = store.load_configuration().await?;

        let base_url = server_url
            .or(configuration.base_url)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let mut oauth = configuration.oauth;
        if let Some(client_id) = lookup("TIMELAPSE_OAUTH_CLIENT_ID") {
            oauth.client_id = Some(client_id);
        }
        if let Some(client_secret) = lookup("TIMELAPSE_OAUTH_CLIENT_SECRET") {
            oauth.client_secret = Some(client_secret);
        }

        Ok(Self {
            store,
            base_url,
            oauth,
        })
    }
}
