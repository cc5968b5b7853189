//! Connection configuration for vManage clients.
//!
//! [`VmanageClientConfig`] carries everything needed to reach and log in to a
//! controller. It can be loaded from JSON (the password is never read from or
//! written to the serialized form) and is validated before use.

use crate::version::ApiVersion;
use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Configuration for a vManage client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VmanageClientConfig {
    /// Controller base URL, e.g. `https://vmanage.example.com:8443`
    #[validate(url)]
    pub url: String,

    /// Login user name
    #[validate(length(min = 1))]
    pub username: String,

    /// Login password
    #[serde(skip)]
    pub password: Option<Arc<SecretString>>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Optional path to custom CA certificate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_ca_cert: Option<PathBuf>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of retry attempts
    #[validate(range(min = 0, max = 10))]
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Pin the API version instead of asking the controller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<ApiVersion>,

    /// Provider-as-tenant session id sent as the `VSessionId` header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vsession_id: Option<String>,
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_max_retries() -> u32 {
    3
}

impl VmanageClientConfig {
    /// Create a new client configuration with required parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, Error> {
        let config = Self {
            url: url.into(),
            username: username.into(),
            password: Some(Arc::new(SecretString::from(password.into()))),
            tls_verify: default_tls_verify(),
            tls_ca_cert: None,
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            api_version: None,
            vsession_id: None,
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Set the login password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(Arc::new(SecretString::from(password.into())));
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set custom CA certificate path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set maximum retry attempts.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Pin the controller API version.
    #[must_use]
    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Act on behalf of a tenant using a provider session id.
    #[must_use]
    pub fn with_vsession_id(mut self, vsession_id: impl Into<String>) -> Self {
        self.vsession_id = Some(vsession_id.into());
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Borrow the password.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] when no password has been provided.
    pub fn password(&self) -> Result<&str, Error> {
        self.password
            .as_deref()
            .map(|secret| secret.expose_secret())
            .ok_or_else(|| Error::ConfigError("password is not set".to_string()))
    }

    /// Parse and validate the controller URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_url(&self) -> Result<Url, Error> {
        Url::parse(&self.url).map_err(|e| Error::ConfigError(format!("Invalid vManage URL: {e}")))
    }
}
