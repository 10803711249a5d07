use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_TRUSTED_ISSUERS: &str = "https://accounts.google.com";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DISCOVERY_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is not a valid {expected}: {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("TIMELAPSE_TRUSTED_ISSUERS names no issuer")]
    NoIssuers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub data_file: Option<PathBuf>,
    pub trusted_issuers: Vec<String>,
    pub request_timeout: Duration,
    pub discovery_timeout: Duration,
}

impl ServerConfig {
    /// Reads the `TIMELAPSE_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let listen_addr = value("TIMELAPSE_LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr: SocketAddr = listen_addr
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: "TIMELAPSE_LISTEN_ADDR",
                expected: "socket address",
                value: listen_addr.clone(),
            })?;

        let trusted_issuers: Vec<String> = value("TIMELAPSE_TRUSTED_ISSUERS")
            .unwrap_or_else(|| DEFAULT_TRUSTED_ISSUERS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|issuer| !issuer.is_empty())
            .map(String::from)
            .collect();
        if trusted_issuers.is_empty() {
            return Err(ConfigError::NoIssuers);
        }

        Ok(Self {
            listen_addr,
            data_file: value("TIMELAPSE_DATA_FILE").map(PathBuf::from),
            trusted_issuers,
            request_timeout: seconds(
                "TIMELAPSE_REQUEST_TIMEOUT_SECS",
                value("TIMELAPSE_REQUEST_TIMEOUT_SECS"),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
            discovery_timeout: seconds(
                "TIMELAPSE_DISCOVERY_TIMEOUT_SECS",
                value("TIMELAPSE_DISCOVERY_TIMEOUT_SECS"),
                DEFAULT_DISCOVERY_TIMEOUT_SECS,
            )?,
        })
    }
}

fn seconds(name: &'static str, value: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    let Some(value) = value else {
        return Ok(Duration::from_secs(default));
    };
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            name,
            expected: "positive number of seconds",
            value,
        }),
    }
}
