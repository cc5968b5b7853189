//! HTTP client utilities and retry logic.
//!
//! [`ServiceClient`] owns the connection to a single vManage controller: the
//! cookie-carrying `reqwest` client, the session context and the retry
//! policy. API crates describe their operations with
//! [`Endpoint`](crate::endpoint::Endpoint) and execute them through the
//! `call_*` helpers.

use bytes::Bytes;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use crate::config::VmanageClientConfig;
use crate::endpoint::Endpoint;
use crate::error::{Error, Result, VmanageErrorEnvelope};
use crate::session::{FormLoginAuthenticator, SessionAuthenticator, SessionContext};
use crate::version::ApiVersion;

/// Default timeout for vManage requests (seconds)
pub const VMANAGE_DEFAULT_TIMEOUT: u64 = 30;

/// Default timeout for tenant migration transfers (seconds)
pub const TENANT_MIGRATION_DEFAULT_TIMEOUT: u64 = 300;

/// Default connect timeout (seconds)
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

// Retry settings

/// Default maximum number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default initial retry delay in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Default maximum retry delay in milliseconds (for exponential backoff)
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 5000;

/// Path segment under which the REST API lives.
pub const API_PREFIX: &str = "dataservice/";

const USER_AGENT: &str = concat!("vmanage-rust/", env!("CARGO_PKG_VERSION"));

/// Retry policy with exponential backoff.
///
/// Configures how HTTP requests should be retried on failure, using exponential
/// backoff to avoid overwhelming a struggling controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,

    /// Initial delay before first retry
    pub initial_delay: Duration,

    /// Maximum delay between retries (cap for exponential backoff)
    pub max_delay: Duration,

    /// Backoff multiplier (typically 2 for exponential backoff)
    pub backoff_multiplier: u32,
}

impl RetryPolicy {
    /// Create a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS),
            backoff_multiplier: 2,
        }
    }

    /// Create a retry policy with no retries.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            backoff_multiplier: 1,
        }
    }

    /// Set the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the initial delay.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff multiplier.
    #[must_use]
    pub const fn with_backoff_multiplier(mut self, multiplier: u32) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Calculate delay for a given attempt number.
    ///
    /// Uses exponential backoff: delay = min(initial_delay * multiplier^(attempt-1), max_delay)
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_secs(0);
        }

        let multiplier = self.backoff_multiplier.saturating_pow(attempt - 1);
        let initial_ms = u64::try_from(self.initial_delay.as_millis()).unwrap_or(u64::MAX);
        let delay = Duration::from_millis(initial_ms.saturating_mul(u64::from(multiplier)));

        std::cmp::min(delay, self.max_delay)
    }

    /// Check if retries are enabled.
    #[must_use]
    pub const fn has_retries(&self) -> bool {
        self.max_retries > 0
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client configuration.
///
/// Configures HTTP client behavior including timeouts, retries, and connection pooling.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Retry policy
    pub retry_policy: RetryPolicy,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable request/response logging
    pub enable_logging: bool,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(VMANAGE_DEFAULT_TIMEOUT),
            retry_policy: RetryPolicy::new(),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_logging: true,
            enable_compression: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Disable retries.
    #[must_use]
    pub const fn without_retries(mut self) -> Self {
        self.retry_policy = RetryPolicy::no_retry();
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable logging.
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    host_url: Url,
    http_config: ClientConfig,
    user_agent: String,
    tls_verify: bool,
    tls_ca_cert: Option<PathBuf>,
    pinned_version: Option<ApiVersion>,
    session: SessionContext,
}

impl ServiceClientBuilder {
    /// Create a builder for the controller at `host_url` (e.g. `https://vmanage:8443`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] when the URL cannot be parsed or is not http(s).
    pub fn new(host_url: impl AsRef<str>) -> Result<Self> {
        let raw = host_url.as_ref();
        let mut url = Url::parse(raw)
            .map_err(|e| Error::ConfigError(format!("Invalid vManage URL `{raw}`: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::ConfigError(format!(
                "Unsupported scheme `{}` for vManage URL",
                url.scheme()
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            host_url: url,
            http_config: ClientConfig::new(),
            user_agent: USER_AGENT.to_string(),
            tls_verify: true,
            tls_ca_cert: None,
            pinned_version: None,
            session: SessionContext::new(),
        })
    }

    /// Create a builder from a validated [`VmanageClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] when the URL is invalid.
    pub fn from_config(config: &VmanageClientConfig) -> Result<Self> {
        let http_config = ClientConfig::new()
            .with_timeout(config.timeout())
            .with_retry_policy(RetryPolicy::new().with_max_retries(config.max_retries));

        let mut builder = Self::new(&config.url)?
            .with_http_config(http_config)
            .with_tls_verify(config.tls_verify);
        if let Some(ca) = &config.tls_ca_cert {
            builder = builder.with_ca_cert(ca.clone());
        }
        if let Some(version) = &config.api_version {
            builder = builder.with_api_version(version.clone());
        }
        if let Some(vsession_id) = &config.vsession_id {
            builder = builder.with_vsession_id(vsession_id.clone());
        }
        Ok(builder)
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.http_config.retry_policy = retry;
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Override the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Trust an additional PEM encoded CA certificate.
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Pin the controller version; takes precedence over the version reported at login.
    #[must_use]
    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.pinned_version = Some(version);
        self
    }

    /// Start with a known CSRF token.
    #[must_use]
    pub fn with_xsrf_token(mut self, token: impl Into<String>) -> Self {
        self.session.xsrf_token = Some(token.into());
        self
    }

    /// Send `VSessionId` with every request (provider acting as tenant).
    #[must_use]
    pub fn with_vsession_id(mut self, vsession_id: impl Into<String>) -> Self {
        self.session.vsession_id = Some(vsession_id.into());
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the CA certificate cannot be loaded or
    /// the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ServiceClient> {
        let http_config = self.http_config;
        let mut builder = ClientBuilder::new()
            .user_agent(self.user_agent.as_str())
            .cookie_store(true)
            .gzip(http_config.enable_compression)
            .timeout(http_config.timeout)
            .pool_idle_timeout(http_config.pool_idle_timeout)
            .pool_max_idle_per_host(http_config.pool_max_idle_per_host)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT));

        if !self.tls_verify {
            warn!(host = %self.host_url, "TLS verification disabled for vManage client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_cert) = &self.tls_ca_cert {
            debug!("loading vManage CA certificate from {}", ca_cert.display());
            let bytes = std::fs::read(ca_cert).map_err(|err| {
                Error::ConfigError(format!(
                    "Failed to read CA certificate {}: {err}",
                    ca_cert.display()
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&bytes)
                .map_err(|err| Error::ConfigError(format!("Invalid CA certificate: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        let api_url = self.host_url.join(API_PREFIX)?;

        Ok(ServiceClient {
            http,
            host_url: self.host_url,
            api_url,
            retry_policy: http_config.retry_policy,
            enable_logging: http_config.enable_logging,
            pinned_version: self.pinned_version,
            session: Arc::new(RwLock::new(self.session)),
        })
    }
}

/// Connection to a single vManage controller.
///
/// Cloning is cheap; clones share the cookie jar and session context.
#[derive(Clone)]
pub struct ServiceClient {
    http: Client,
    host_url: Url,
    api_url: Url,
    retry_policy: RetryPolicy,
    enable_logging: bool,
    pinned_version: Option<ApiVersion>,
    session: Arc<RwLock<SessionContext>>,
}

impl ServiceClient {
    /// Start a builder for the controller at `host_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] when the URL is invalid.
    pub fn builder(host_url: impl AsRef<str>) -> Result<ServiceClientBuilder> {
        ServiceClientBuilder::new(host_url)
    }

    /// Build a client from `config` and log in with its credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, no password is set,
    /// or the controller rejects the login.
    pub async fn connect(config: &VmanageClientConfig) -> Result<Self> {
        let client = ServiceClientBuilder::from_config(config)?.build()?;
        let authenticator = client.form_login(&config.username, config.password()?);
        client.establish_session(&authenticator).await?;
        Ok(client)
    }

    /// Controller URL (with trailing slash).
    #[must_use]
    pub fn host_url(&self) -> &Url {
        &self.host_url
    }

    /// REST API base URL (`<host>/dataservice/`).
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.api_url
    }

    /// Create a form-login authenticator sharing this client's cookie jar.
    #[must_use]
    pub fn form_login(&self, username: &str, password: &str) -> FormLoginAuthenticator {
        FormLoginAuthenticator::new(
            self.http.clone(),
            self.host_url.clone(),
            self.api_url.clone(),
            username.to_string(),
            Arc::new(password.to_string().into()),
        )
    }

    /// Authenticate and store the resulting session context.
    ///
    /// A `VSessionId` configured on the builder is kept when the
    /// authenticator does not supply one.
    ///
    /// # Errors
    ///
    /// Propagates the authenticator's error.
    pub async fn establish_session(&self, authenticator: &dyn SessionAuthenticator) -> Result<()> {
        let mut context = authenticator.authenticate().await?;
        let mut guard = self
            .session
            .write()
            .map_err(|_| Error::InternalError("session lock poisoned".to_string()))?;
        if context.vsession_id.is_none() {
            context.vsession_id = guard.vsession_id.take();
        }
        *guard = context;
        Ok(())
    }

    /// Snapshot of the current session context.
    #[must_use]
    pub fn session(&self) -> SessionContext {
        self.session
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Effective controller version: pinned version first, then the one reported at login.
    #[must_use]
    pub fn api_version(&self) -> Option<ApiVersion> {
        self.pinned_version
            .clone()
            .or_else(|| self.session().api_version)
    }

    /// Fail fast when `endpoint` is not available on the connected controller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVersion`] when the declared constraint does not
    /// match, or [`Error::InvalidEndpoint`] when the constraint is malformed.
    pub fn ensure_supported(&self, endpoint: &Endpoint) -> Result<()> {
        let Some(constraint) = endpoint.version_constraint()? else {
            return Ok(());
        };
        match self.api_version() {
            Some(version) if !constraint.matches(&version) => Err(Error::UnsupportedVersion {
                endpoint: endpoint.path.to_string(),
                required: constraint.to_string(),
                actual: version.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                debug!(endpoint = %endpoint, %constraint, "API version unknown, skipping version check");
                Ok(())
            }
        }
    }

    /// Execute `endpoint` and decode a JSON response.
    ///
    /// # Errors
    ///
    /// Returns transport, status, version and decoding errors.
    pub async fn call_json<B, R>(
        &self,
        endpoint: &Endpoint,
        args: &[(&str, &str)],
        params: &[(String, String)],
        body: Option<&B>,
    ) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .call_with(endpoint, args, params, |request| json_request(request, body))
            .await?;
        let bytes = response.bytes().await?;
        endpoint.decode(&bytes)
    }

    /// Execute `endpoint`, discarding the response body.
    ///
    /// # Errors
    ///
    /// Returns transport, status and version errors.
    pub async fn call_empty<B>(
        &self,
        endpoint: &Endpoint,
        args: &[(&str, &str)],
        params: &[(String, String)],
        body: Option<&B>,
    ) -> Result<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.call_with(endpoint, args, params, |request| json_request(request, body))
            .await
            .map(|_| ())
    }

    /// Execute `endpoint` and return the response body as text.
    ///
    /// # Errors
    ///
    /// Returns transport, status and version errors.
    pub async fn call_text(
        &self,
        endpoint: &Endpoint,
        args: &[(&str, &str)],
        params: &[(String, String)],
    ) -> Result<String> {
        let response = self
            .call_with(endpoint, args, params, |request| request)
            .await?;
        response.text().await.map_err(Error::from)
    }

    /// Execute `endpoint` and return the raw response body.
    ///
    /// # Errors
    ///
    /// Returns transport, status and version errors.
    pub async fn call_bytes(
        &self,
        endpoint: &Endpoint,
        args: &[(&str, &str)],
        params: &[(String, String)],
    ) -> Result<Bytes> {
        let response = self
            .call_with(endpoint, args, params, |request| {
                request.header("Accept", "application/octet-stream")
            })
            .await?;
        response.bytes().await.map_err(Error::from)
    }

    /// Execute `endpoint` with a custom request body.
    ///
    /// `customize` is invoked once per attempt and must rebuild the body each time.
    ///
    /// # Errors
    ///
    /// Returns transport, status and version errors.
    pub async fn call_with<F>(
        &self,
        endpoint: &Endpoint,
        args: &[(&str, &str)],
        params: &[(String, String)],
        customize: F,
    ) -> Result<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        self.ensure_supported(endpoint)?;
        let path = endpoint.render_path(args)?;
        self.execute_with_retry(endpoint.verb.as_method(), &path, params, customize)
            .await
    }

    /// Send a request relative to the API base, retrying transient failures.
    ///
    /// POST and PATCH are only retried on a refused connection, 429 or 503.
    ///
    /// # Errors
    ///
    /// Returns the mapped status error for non-retryable responses, or the last
    /// error once retries are exhausted.
    pub async fn execute_with_retry<F>(
        &self,
        method: reqwest::Method,
        path: &str,
        params: &[(String, String)],
        customize: F,
    ) -> Result<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let url = self.build_url(path)?;
        let idempotent = is_idempotent(&method);
        let mut attempt = 0;

        loop {
            let request = self.decorate(self.http.request(method.clone(), url.clone()).query(params));
            let request = customize(request);

            if self.enable_logging {
                debug!(method = %method, path = %path, attempt, "Sending vManage request");
            }

            let error = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    let message = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    let error = map_status_to_error(status, message);
                    if !is_retryable_status(status, idempotent) {
                        return Err(error);
                    }
                    error
                }
                Err(err) => {
                    // Only a refused connection proves the request never reached vManage.
                    let unsent = err.is_connect();
                    let error = Error::from(err);
                    if !error.is_transient() || !(idempotent || unsent) {
                        return Err(error);
                    }
                    error
                }
            };

            attempt += 1;
            if attempt > self.retry_policy.max_retries {
                warn!(method = %method, path = %path, error = %error, "vManage request failed after retries");
                return Err(error);
            }

            let delay = self.retry_policy.delay_for_attempt(attempt);
            debug!(path = %path, ?delay, error = %error, "Retrying vManage request");
            if delay > Duration::from_millis(0) {
                sleep(delay).await;
            }
        }
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid path `{path}`: {err}")))
    }

    fn decorate(&self, mut request: RequestBuilder) -> RequestBuilder {
        let session = self.session();
        if let Some(token) = session.xsrf_token {
            request = request.header("X-XSRF-TOKEN", token);
        }
        if let Some(vsession_id) = session.vsession_id {
            request = request.header("VSessionId", vsession_id);
        }
        request
    }
}

fn json_request<B>(mut request: RequestBuilder, body: Option<&B>) -> RequestBuilder
where
    B: Serialize + ?Sized,
{
    request = request.header("Accept", "application/json");
    if let Some(payload) = body {
        request = request.json(payload);
    }
    request
}

fn is_idempotent(method: &reqwest::Method) -> bool {
    *method != reqwest::Method::POST && *method != reqwest::Method::PATCH
}

/// Statuses worth another attempt. A POST is only replayed on 429 and 503,
/// where vManage rejected it before doing any work.
const fn is_retryable_status(status: StatusCode, idempotent: bool) -> bool {
    if idempotent {
        matches!(status.as_u16(), 429 | 500..=599)
    } else {
        matches!(status.as_u16(), 429 | 503)
    }
}

/// Map an unsuccessful HTTP status and body to an [`Error`].
///
/// vManage error envelopes are condensed into a one-line message.
#[must_use]
pub fn map_status_to_error(status: StatusCode, text: String) -> Error {
    let text = VmanageErrorEnvelope::parse(&text).map_or(text, |envelope| envelope.describe());
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST => Error::BadRequest(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Authentication(text),
        StatusCode::CONFLICT => Error::Conflict(text),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("vManage temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("vManage server error {status}: {text}"))
        }
        _ => Error::HttpError(format!("vManage error {status}: {text}")),
    }
}
