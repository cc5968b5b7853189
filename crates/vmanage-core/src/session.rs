//! Session establishment.
//!
//! vManage uses cookie based sessions: a form POST to `/j_security_check`
//! sets `JSESSIONID`, after which `/dataservice/client/token` hands out the
//! CSRF token that every mutating request must echo in `X-XSRF-TOKEN`.
//! `/dataservice/client/server` reports the platform version used to gate
//! version-specific endpoints.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::version::ApiVersion;

/// Per-session state attached to every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    /// CSRF token sent as `X-XSRF-TOKEN`
    pub xsrf_token: Option<String>,
    /// Controller version reported at login
    pub api_version: Option<ApiVersion>,
    /// Provider-as-tenant session id sent as `VSessionId`
    pub vsession_id: Option<String>,
}

impl SessionContext {
    /// Empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the CSRF token.
    #[must_use]
    pub fn with_xsrf_token(mut self, token: impl Into<String>) -> Self {
        self.xsrf_token = Some(token.into());
        self
    }

    /// Set the controller version.
    #[must_use]
    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Set the tenant session id.
    #[must_use]
    pub fn with_vsession_id(mut self, vsession_id: impl Into<String>) -> Self {
        self.vsession_id = Some(vsession_id.into());
        self
    }
}

/// Produces a [`SessionContext`] for a [`ServiceClient`](crate::client::ServiceClient).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionAuthenticator: Send + Sync {
    /// Log in and return the resulting session context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] when the controller rejects the credentials.
    async fn authenticate(&self) -> Result<SessionContext>;
}

/// Subset of `/client/server` that the SDK relies on.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerInfo {
    /// Controller release, e.g. `20.12.1`
    #[serde(rename = "platformVersion", default)]
    pub platform_version: Option<String>,
    /// `SingleTenant` / `MultiTenant`
    #[serde(rename = "tenancyMode", default)]
    pub tenancy_mode: Option<String>,
    /// Logged in user
    #[serde(default)]
    pub user: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerInfoEnvelope {
    data: ServerInfo,
}

/// Username/password login against `/j_security_check`.
///
/// Shares the HTTP client (and therefore the cookie jar) of the
/// [`ServiceClient`](crate::client::ServiceClient) that created it.
pub struct FormLoginAuthenticator {
    http: Client,
    host_url: Url,
    api_url: Url,
    username: String,
    password: Arc<SecretString>,
}

impl FormLoginAuthenticator {
    pub(crate) fn new(
        http: Client,
        host_url: Url,
        api_url: Url,
        username: String,
        password: Arc<SecretString>,
    ) -> Self {
        Self {
            http,
            host_url,
            api_url,
            username,
            password,
        }
    }

    async fn submit_credentials(&self) -> Result<()> {
        let url = self.host_url.join("j_security_check")?;
        let form = [
            ("j_username", self.username.as_str()),
            ("j_password", self.password.expose_secret()),
        ];

        info!(user = %self.username, "Logging in to vManage");
        let response = self.http.post(url).form(&form).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        // vManage answers a failed login with the HTML login page and 200
        if !status.is_success() || looks_like_html(&body) {
            warn!(user = %self.username, %status, "vManage rejected credentials");
            return Err(Error::Authentication(format!(
                "login rejected for user `{}`",
                self.username
            )));
        }
        Ok(())
    }

    async fn fetch_token(&self) -> Result<Option<String>> {
        let url = self.api_url.join("client/token")?;
        let response = self.http.get(url).send().await?;
        let status = response.status();

        // Pre-19.2 controllers have no token endpoint
        if status == StatusCode::NOT_FOUND {
            debug!("vManage does not issue XSRF tokens");
            return Ok(None);
        }
        let body = response.text().await?;
        if !status.is_success() || looks_like_html(&body) {
            return Err(Error::Authentication(format!(
                "failed to obtain XSRF token ({status})"
            )));
        }
        Ok(Some(body.trim().to_string()))
    }

    async fn fetch_server_info(&self, token: Option<&str>) -> Result<ServerInfo> {
        let url = self.api_url.join("client/server")?;
        let mut request = self.http.get(url).header("Accept", "application/json");
        if let Some(token) = token {
            request = request.header("X-XSRF-TOKEN", token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(crate::client::map_status_to_error(status, text));
        }
        let envelope: ServerInfoEnvelope = response
            .json()
            .await
            .map_err(|e| Error::ParseError(format!("invalid /client/server response: {e}")))?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl SessionAuthenticator for FormLoginAuthenticator {
    async fn authenticate(&self) -> Result<SessionContext> {
        self.submit_credentials().await?;
        let token = self.fetch_token().await?;
        let info = self.fetch_server_info(token.as_deref()).await?;

        let api_version = match info.platform_version.as_deref() {
            Some(raw) => match raw.parse::<ApiVersion>() {
                Ok(version) => Some(version),
                Err(err) => {
                    warn!(version = raw, error = %err, "Unparseable vManage version");
                    None
                }
            },
            None => None,
        };

        info!(
            user = %self.username,
            version = ?api_version.as_ref().map(ToString::to_string),
            "vManage session established"
        );

        Ok(SessionContext {
            xsrf_token: token,
            api_version,
            vsession_id: None,
        })
    }
}

fn looks_like_html(body: &str) -> bool {
    let head = body.trim_start();
    let starts_with = |prefix: &str| {
        head.get(..prefix.len())
            .is_some_and(|start| start.eq_ignore_ascii_case(prefix))
    };
    starts_with("<html") || starts_with("<!doctype")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_login_page() {
        assert!(looks_like_html("<html><body>login</body></html>"));
        assert!(looks_like_html("  <!DOCTYPE html><html>"));
        assert!(!looks_like_html(""));
        assert!(!looks_like_html("8C1F3A2B"));
    }

    #[test]
    fn session_context_builder() {
        let ctx = SessionContext::new()
            .with_xsrf_token("tok")
            .with_api_version("20.12".parse().unwrap())
            .with_vsession_id("vs");
        assert_eq!(ctx.xsrf_token.as_deref(), Some("tok"));
        assert_eq!(ctx.api_version.unwrap().minor(), 12);
        assert_eq!(ctx.vsession_id.as_deref(), Some("vs"));
    }

    #[test]
    fn server_info_parses() {
        let envelope: ServerInfoEnvelope = serde_json::from_str(
            r#"{"data": {"platformVersion": "20.12.1", "tenancyMode": "SingleTenant", "user": "admin"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.data.platform_version.as_deref(), Some("20.12.1"));
    }
}
