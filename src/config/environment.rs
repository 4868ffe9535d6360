// ABOUTME: Environment configuration for the console: collaborator URL, HTTP timeouts, credential store
// ABOUTME: Parses environment variables into strongly typed configuration values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration
//!
//! The console is configured from environment variables only. The
//! collaborator URL is the single required value; everything else has a
//! default.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::constants::{defaults, env_config};
use crate::errors::{ApiError, ApiResult};
use crate::session::store::FileCredentialStore;

/// Environment type for logging and other deployment-specific behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    /// Local development
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Outbound HTTP settings
///
/// Both timeouts are unset by default: a call to a hung collaborator stays
/// pending until the caller drops it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Whole-request timeout
    pub request_timeout: Option<Duration>,
    /// TCP/TLS connect timeout
    pub connect_timeout: Option<Duration>,
}

/// Where the session credential is persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialStoreConfig {
    /// Process-local slot, lost when the process exits
    Memory,
    /// One file per key under `dir`
    File {
        /// Directory holding credential files
        dir: PathBuf,
        /// Key (file name) of the credential
        key: String,
    },
}

impl CredentialStoreConfig {
    /// File store in the platform config directory under the default key
    #[must_use]
    pub fn default_file() -> Self {
        Self::File {
            dir: FileCredentialStore::default_dir(),
            key: defaults::CREDENTIAL_KEY.to_owned(),
        }
    }
}

/// Complete console configuration
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Collaborator base URL, always ending in `/`
    pub api_url: Url,
    /// Deployment environment
    pub environment: Environment,
    /// Outbound HTTP settings
    pub http: HttpClientConfig,
    /// Credential persistence
    pub credential_store: CredentialStoreConfig,
}

impl ConsoleConfig {
    /// Configuration for `api_url` with an in-memory credential store and no timeouts
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if `api_url` is not an absolute http(s) URL
    pub fn new(api_url: &str) -> ApiResult<Self> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            environment: Environment::default(),
            http: HttpClientConfig::default(),
            credential_store: CredentialStoreConfig::Memory,
        })
    }

    /// Replace the credential store configuration
    #[must_use]
    pub fn with_credential_store(mut self, store: CredentialStoreConfig) -> Self {
        self.credential_store = store;
        self
    }

    /// Replace the HTTP settings
    #[must_use]
    pub const fn with_http(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the collaborator URL is missing or malformed, or
    /// if any optional variable holds an unparsable value
    pub fn from_env() -> Result<Self> {
        info!("Loading console configuration from environment variables");

        let raw_url = env::var(env_config::API_URL)
            .with_context(|| format!("{} must be set", env_config::API_URL))?;
        let api_url = parse_api_url(&raw_url).map_err(|e| anyhow!(e.message))?;

        let environment = env::var(env_config::ENVIRONMENT)
            .map(|value| Environment::from_str_or_default(&value))
            .unwrap_or_default();

        let http = HttpClientConfig {
            request_timeout: optional_secs(env_config::REQUEST_TIMEOUT_SECS)?,
            connect_timeout: optional_secs(env_config::CONNECT_TIMEOUT_SECS)?,
        };

        let credential_store = credential_store_from_env()?;

        let config = Self {
            api_url,
            environment,
            http,
            credential_store,
        };
        config.log_summary();
        Ok(config)
    }

    fn log_summary(&self) {
        let store = match &self.credential_store {
            CredentialStoreConfig::Memory => "memory".to_owned(),
            CredentialStoreConfig::File { dir, key } => {
                format!("file:{}", dir.join(key).display())
            }
        };
        info!(
            api_url = %self.api_url,
            environment = %self.environment,
            credential_store = %store,
            request_timeout = ?self.http.request_timeout,
            connect_timeout = ?self.http.connect_timeout,
            "Console configuration loaded"
        );
    }
}

/// Parse and normalize the collaborator base URL
///
/// The path is given a trailing `/` so relative endpoint paths join
/// beneath it instead of replacing its last segment.
///
/// # Errors
///
/// Returns `ConfigInvalid` for unparsable or non-http(s) URLs
pub fn parse_api_url(raw: &str) -> ApiResult<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ApiError::config(format!("invalid collaborator URL {raw:?}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::config(format!(
            "collaborator URL must use http or https, got {}",
            url.scheme()
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn optional_secs(key: &str) -> Result<Option<Duration>> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => {
            let secs: u64 = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid {key} value"))?;
            Ok(Some(Duration::from_secs(secs)))
        }
        _ => Ok(None),
    }
}

fn credential_store_from_env() -> Result<CredentialStoreConfig> {
    let kind = env::var(env_config::CREDENTIAL_STORE).unwrap_or_else(|_| "file".to_owned());

    match kind.trim().to_lowercase().as_str() {
        "memory" => Ok(CredentialStoreConfig::Memory),
        "file" => {
            let dir = env::var(env_config::CREDENTIAL_DIR)
                .map_or_else(|_| FileCredentialStore::default_dir(), PathBuf::from);
            let key = env::var(env_config::CREDENTIAL_KEY)
                .unwrap_or_else(|_| defaults::CREDENTIAL_KEY.to_owned());
            Ok(CredentialStoreConfig::File { dir, key })
        }
        other => Err(anyhow!(
            "Invalid {} value: {other} (expected memory or file)",
            env_config::CREDENTIAL_STORE
        )),
    }
}
