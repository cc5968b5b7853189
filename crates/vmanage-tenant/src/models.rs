//! Tenant and tenant migration data models.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;
use validator::Validate;
use vmanage_core::Error;

use crate::Result;

/// Multi-tenant overlay tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    /// Organisation name
    #[validate(length(min = 1))]
    pub org_name: String,
    /// Tenant sub-domain
    #[validate(length(min = 1))]
    pub sub_domain: String,
    /// Description
    pub desc: String,
    /// Tenant name
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    /// Tenant id assigned by the controller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// Internal numeric id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flake_id: Option<u64>,
    /// vBond address
    #[serde(
        default,
        rename = "vBondAddress",
        skip_serializing_if = "Option::is_none"
    )]
    pub vbond_address: Option<String>,
    /// vSmart controllers serving the tenant
    #[serde(default, rename = "vSmarts", skip_serializing_if = "Option::is_none")]
    pub vsmarts: Option<Vec<String>>,
    /// Whether the edge connector is enabled
    #[serde(default)]
    pub edge_connector_enable: bool,
    /// Edge connector system IP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_connector_system_ip: Option<String>,
    /// Edge connector tunnel interface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_connector_tunnel_interface_name: Option<String>,
    /// Forecast number of WAN edges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wan_edge_forecast: Option<u32>,
    /// Number of WAN edges present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wan_edge_present: Option<u32>,
    /// Lifecycle state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Tenancy mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Whether the destination overlay is multi-tenant
    #[serde(
        default,
        rename = "isDestinationOverlayMT",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_destination_overlay_mt: Option<bool>,
    /// Key protecting the exported archive (20.13 and later)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_key: Option<String>,
}

impl Tenant {
    /// Create a tenant with the required fields.
    #[must_use]
    pub fn new(
        org_name: impl Into<String>,
        sub_domain: impl Into<String>,
        name: impl Into<String>,
        desc: impl Into<String>,
    ) -> Self {
        Self {
            org_name: org_name.into(),
            sub_domain: sub_domain.into(),
            desc: desc.into(),
            name: name.into(),
            tenant_id: None,
            flake_id: None,
            vbond_address: None,
            vsmarts: None,
            edge_connector_enable: false,
            edge_connector_system_ip: None,
            edge_connector_tunnel_interface_name: None,
            wan_edge_forecast: None,
            wan_edge_present: None,
            state: None,
            mode: None,
            is_destination_overlay_mt: None,
            migration_key: None,
        }
    }

    /// Mark the destination overlay as multi-tenant.
    #[must_use]
    pub const fn with_destination_overlay_mt(mut self, multi_tenant: bool) -> Self {
        self.is_destination_overlay_mt = Some(multi_tenant);
        self
    }

    /// Protect the exported archive with `key`.
    #[must_use]
    pub fn with_migration_key(mut self, key: impl Into<String>) -> Self {
        self.migration_key = Some(key.into());
        self
    }

    /// Set the WAN edge forecast.
    #[must_use]
    pub const fn with_wan_edge_forecast(mut self, forecast: u32) -> Self {
        self.wan_edge_forecast = Some(forecast);
        self
    }

    /// Enable the edge connector on `system_ip` via `tunnel_interface`.
    #[must_use]
    pub fn with_edge_connector(
        mut self,
        system_ip: impl Into<String>,
        tunnel_interface: impl Into<String>,
    ) -> Self {
        self.edge_connector_enable = true;
        self.edge_connector_system_ip = Some(system_ip.into());
        self.edge_connector_tunnel_interface_name = Some(tunnel_interface.into());
        self
    }
}

/// Query of the migration token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationTokenQueryParams {
    /// Migration id
    pub migration_id: String,
}

/// Export job started by the source controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportInfo {
    /// Process id to poll
    pub process_id: String,
}

/// Import job started by the destination controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportInfo {
    /// Process id to poll
    pub process_id: String,
    /// URL to fetch the migration token from
    #[serde(rename = "migrationTokenURL")]
    pub migration_token_url: String,
}

impl ImportInfo {
    /// Migration token URL resolved against a placeholder host, so relative
    /// and absolute URLs parse the same way.
    fn resolved_migration_token_url(&self) -> Result<Url> {
        let parse_error = |err: url::ParseError| {
            Error::ParseError(format!(
                "Invalid migration token URL `{}`: {err}",
                self.migration_token_url
            ))
        };
        let base = Url::parse("http://localhost/").map_err(parse_error)?;
        Url::options()
            .base_url(Some(&base))
            .parse(&self.migration_token_url)
            .map_err(parse_error)
    }

    /// Query component of the migration token URL, without `?` or fragment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] when the URL does not parse.
    pub fn migration_token_query(&self) -> Result<String> {
        let url = self.resolved_migration_token_url()?;
        Ok(url.query().unwrap_or_default().to_string())
    }

    /// Parameters to pass to the migration token endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] when the URL does not parse or carries
    /// no `migrationId`.
    pub fn migration_token_query_params(&self) -> Result<MigrationTokenQueryParams> {
        self.resolved_migration_token_url()?
            .query_pairs()
            .find(|(key, _)| key == "migrationId")
            .map(|(_, value)| MigrationTokenQueryParams {
                migration_id: value.into_owned(),
            })
            .ok_or_else(|| {
                Error::ParseError(format!(
                    "migrationId missing from `{}`",
                    self.migration_token_url
                ))
            })
    }
}

/// Network migration job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationInfo {
    /// Process id to poll
    pub process_id: String,
}

/// Tenant archive uploaded to the destination controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    file_name: String,
    data: Bytes,
}

impl MigrationFile {
    /// Multipart field carrying the archive.
    pub const FIELD: &'static str = "file";

    /// Wrap archive `data` uploaded as `file_name`.
    #[must_use]
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    /// Read an archive from disk; the upload uses the path's file name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] when the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await.map_err(|err| {
            Error::InvalidRequest(format!("Failed to read {}: {err}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "default.tar.gz".to_string(), |name| name.to_string_lossy().into_owned());
        Ok(Self::new(file_name, data))
    }

    /// Upload file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Archive content.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Build the multipart form for one upload attempt.
    #[must_use]
    pub fn to_form(&self) -> Form {
        let part = Part::stream(self.data.clone()).file_name(self.file_name.clone());
        Form::new().part(Self::FIELD, part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn import_info(url: &str) -> ImportInfo {
        ImportInfo {
            process_id: "p1".to_string(),
            migration_token_url: url.to_string(),
        }
    }

    #[test]
    fn migration_token_query_is_extracted() {
        let info = import_info("/dataservice/tenantmigration/migrationToken?migrationId=abc-123");
        assert_eq!(info.migration_token_query().unwrap(), "migrationId=abc-123");
        assert_eq!(
            info.migration_token_query_params().unwrap().migration_id,
            "abc-123"
        );

        let info = import_info(
            "https://vmanage:8443/dataservice/tenantmigration/migrationToken?foo=1&migrationId=a%2Bb#frag",
        );
        assert_eq!(
            info.migration_token_query().unwrap(),
            "foo=1&migrationId=a%2Bb"
        );
        assert_eq!(
            info.migration_token_query_params().unwrap().migration_id,
            "a+b"
        );
    }

    #[test]
    fn missing_migration_id_is_an_error() {
        let info = import_info("/dataservice/tenantmigration/migrationToken");
        assert_eq!(info.migration_token_query().unwrap(), "");
        assert!(matches!(
            info.migration_token_query_params(),
            Err(Error::ParseError(_))
        ));
    }

    #[test]
    fn migration_token_query_handles_unusual_urls() {
        // Query ends at the fragment even when `?` appears after `#`.
        let info = import_info("/dataservice/tenantmigration/migrationToken#top?migrationId=x");
        assert_eq!(info.migration_token_query().unwrap(), "");
        assert!(info.migration_token_query_params().is_err());

        let info = import_info("migrationToken?migrationId=m%201&migrationId=m2");
        assert_eq!(
            info.migration_token_query_params().unwrap().migration_id,
            "m 1"
        );

        let info = import_info("https://[::1:8443/migrationToken?migrationId=x");
        assert!(matches!(
            info.migration_token_query(),
            Err(Error::ParseError(_))
        ));
    }

    #[test]
    fn import_info_wire_names() {
        let info: ImportInfo = serde_json::from_value(json!({
            "processId": "42",
            "migrationTokenURL": "/x?migrationId=m"
        }))
        .unwrap();
        assert_eq!(info.process_id, "42");
        assert_eq!(info.migration_token_url, "/x?migrationId=m");
    }

    #[test]
    fn tenant_serializes_camel_case() {
        let tenant = Tenant::new("Acme Corp", "acme.vmanage.example.com", "acme", "Acme tenant")
            .with_destination_overlay_mt(true)
            .with_migration_key("s3cret-key")
            .with_wan_edge_forecast(10);
        assert!(tenant.validate().is_ok());

        let value = serde_json::to_value(&tenant).unwrap();
        assert_eq!(value["orgName"], "Acme Corp");
        assert_eq!(value["subDomain"], "acme.vmanage.example.com");
        assert_eq!(value["isDestinationOverlayMT"], true);
        assert_eq!(value["migrationKey"], "s3cret-key");
        assert_eq!(value["wanEdgeForecast"], 10);
        assert_eq!(value["edgeConnectorEnable"], false);
        assert!(value.get("tenantId").is_none());
    }

    #[test]
    fn tenant_requires_names() {
        let tenant = Tenant::new("", "acme", "acme", "desc");
        assert!(tenant.validate().is_err());
    }

    #[test]
    fn migration_file_accessors() {
        let file = MigrationFile::new("tenant.tar.gz", b"archive".to_vec());
        assert_eq!(file.file_name(), "tenant.tar.gz");
        assert_eq!(file.data().as_ref(), b"archive");
    }

    #[tokio::test]
    async fn migration_file_from_missing_path() {
        let err = MigrationFile::from_path("/nonexistent/tenant.tar.gz")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }
}
