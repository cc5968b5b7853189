//! Tenant migration endpoints.

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use tracing::info;
use validator::Validate;
use vmanage_core::query::QueryParams;
use vmanage_core::{Endpoint, Error, ServiceClient};

use crate::models::{
    ExportInfo, ImportInfo, MigrationFile, MigrationInfo, MigrationTokenQueryParams, Tenant,
};
use crate::Result;

/// Archive name used when no download path is given.
pub const DEFAULT_DOWNLOAD_PATH: &str = "default.tar.gz";

const DOWNLOAD_TENANT_DATA: Endpoint = Endpoint::get("/tenantmigration/download/{path}");
const EXPORT_TENANT_DATA: Endpoint = Endpoint::post("/tenantmigration/export");
const GET_MIGRATION_TOKEN: Endpoint = Endpoint::get("/tenantmigration/migrationToken");
const IMPORT_TENANT_DATA: Endpoint =
    Endpoint::post("/tenantmigration/import").with_versions("<20.13");
const IMPORT_TENANT_DATA_WITH_KEY: Endpoint =
    Endpoint::post("/tenantmigration/import/{migration_key}").with_versions(">=20.13");
const MIGRATE_NETWORK: Endpoint = Endpoint::post("/tenantmigration/networkMigration");
const RETRIGGER_NETWORK_MIGRATION: Endpoint = Endpoint::get("/tenantmigration/networkMigration");

/// Client for `/tenantmigration`.
#[derive(Clone)]
pub struct TenantMigrationClient {
    client: ServiceClient,
}

impl TenantMigrationClient {
    /// Create a client sharing `client`'s session.
    #[must_use]
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// Download an exported tenant archive.
    ///
    /// `path` defaults to [`DEFAULT_DOWNLOAD_PATH`].
    ///
    /// # Errors
    ///
    /// Returns transport and status errors.
    pub async fn download_tenant_data(&self, path: Option<&str>) -> Result<Bytes> {
        let path = path.unwrap_or(DEFAULT_DOWNLOAD_PATH);
        let data = self
            .client
            .call_bytes(&DOWNLOAD_TENANT_DATA, &[("path", path)], &[])
            .await?;
        info!(path, size = data.len(), "Downloaded tenant archive");
        Ok(data)
    }

    /// Start exporting `tenant` from this controller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] for an invalid tenant, otherwise
    /// transport, status and decoding errors.
    pub async fn export_tenant_data(&self, tenant: &Tenant) -> Result<ExportInfo> {
        tenant.validate().map_err(Error::from)?;
        let export: ExportInfo = self
            .client
            .call_json(&EXPORT_TENANT_DATA, &[], &[], Some(tenant))
            .await?;
        info!(tenant = %tenant.name, process_id = %export.process_id, "Tenant export started");
        Ok(export)
    }

    /// Fetch the migration token for an import.
    ///
    /// # Errors
    ///
    /// Returns transport and status errors.
    pub async fn get_migration_token(&self, params: &MigrationTokenQueryParams) -> Result<String> {
        let query = QueryParams::from_model(params)?;
        self.client
            .call_text(&GET_MIGRATION_TOKEN, &[], query.as_pairs())
            .await
    }

    /// Import a tenant archive (controllers before 20.13).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVersion`] on 20.13 and later, otherwise
    /// transport, status and decoding errors.
    pub async fn import_tenant_data(&self, file: &MigrationFile) -> Result<ImportInfo> {
        self.upload(&IMPORT_TENANT_DATA, &[], file).await
    }

    /// Import a key protected tenant archive (20.13 and later).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVersion`] before 20.13, otherwise
    /// transport, status and decoding errors.
    pub async fn import_tenant_data_with_key(
        &self,
        file: &MigrationFile,
        migration_key: &str,
    ) -> Result<ImportInfo> {
        self.upload(
            &IMPORT_TENANT_DATA_WITH_KEY,
            &[("migration_key", migration_key)],
            file,
        )
        .await
    }

    /// Migrate the network using the token issued by the destination.
    ///
    /// # Errors
    ///
    /// Returns transport, status and decoding errors.
    pub async fn migrate_network(&self, token: &str) -> Result<MigrationInfo> {
        let response = self
            .client
            .call_with(&MIGRATE_NETWORK, &[], &[], |request| {
                request
                    .header(CONTENT_TYPE, "text/plain")
                    .body(token.to_string())
            })
            .await?;
        let migration: MigrationInfo = MIGRATE_NETWORK.decode(&response.bytes().await?)?;
        info!(process_id = %migration.process_id, "Network migration started");
        Ok(migration)
    }

    /// Retry a failed network migration.
    ///
    /// # Errors
    ///
    /// Returns transport, status and decoding errors.
    pub async fn retrigger_network_migration(&self) -> Result<MigrationInfo> {
        self.client
            .call_json::<(), _>(&RETRIGGER_NETWORK_MIGRATION, &[], &[], None)
            .await
    }

    async fn upload(
        &self,
        endpoint: &Endpoint,
        args: &[(&str, &str)],
        file: &MigrationFile,
    ) -> Result<ImportInfo> {
        let response = self
            .client
            .call_with(endpoint, args, &[], |request| request.multipart(file.to_form()))
            .await?;
        let import: ImportInfo = endpoint.decode(&response.bytes().await?)?;
        info!(
            file = file.file_name(),
            process_id = %import.process_id,
            "Tenant import started"
        );
        Ok(import)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vmanage_core::client::RetryPolicy;
    use wiremock::matchers::{body_partial_json, body_string, body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_with_version(server: &MockServer, version: Option<&str>) -> TenantMigrationClient {
        let mut builder = ServiceClient::builder(server.uri())
            .unwrap()
            .with_retry_policy(RetryPolicy::no_retry());
        if let Some(version) = version {
            builder = builder.with_api_version(version.parse().unwrap());
        }
        TenantMigrationClient::new(builder.build().unwrap())
    }

    fn archive() -> MigrationFile {
        MigrationFile::new("acme.tar.gz", b"tenant-archive-bytes".to_vec())
    }

    #[tokio::test]
    async fn download_uses_default_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dataservice/tenantmigration/download/default.tar.gz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x1f\x8b archive".to_vec()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/dataservice/tenantmigration/download/acme.tar.gz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"acme".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_version(&server, None);
        let data = client.download_tenant_data(None).await.unwrap();
        assert_eq!(data.as_ref(), b"\x1f\x8b archive");
        let data = client.download_tenant_data(Some("acme.tar.gz")).await.unwrap();
        assert_eq!(data.as_ref(), b"acme");
    }

    #[tokio::test]
    async fn export_posts_tenant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dataservice/tenantmigration/export"))
            .and(body_partial_json(json!({"orgName": "Acme", "name": "acme"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"processId": "exp-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_version(&server, None);
        let tenant = Tenant::new("Acme", "acme.example.com", "acme", "Acme tenant");
        let export = client.export_tenant_data(&tenant).await.unwrap();
        assert_eq!(export.process_id, "exp-1");
    }

    #[tokio::test]
    async fn migration_token_is_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dataservice/tenantmigration/migrationToken"))
            .and(query_param("migrationId", "m-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("TOKEN-XYZ"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_version(&server, None);
        let info = ImportInfo {
            process_id: "p".to_string(),
            migration_token_url: "/dataservice/tenantmigration/migrationToken?migrationId=m-1"
                .to_string(),
        };
        let token = client
            .get_migration_token(&info.migration_token_query_params().unwrap())
            .await
            .unwrap();
        assert_eq!(token, "TOKEN-XYZ");
    }

    #[tokio::test]
    async fn legacy_import_uploads_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dataservice/tenantmigration/import"))
            .and(body_string_contains("name=\"file\""))
            .and(body_string_contains("filename=\"acme.tar.gz\""))
            .and(body_string_contains("tenant-archive-bytes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "processId": "imp-1",
                "migrationTokenURL": "/dataservice/tenantmigration/migrationToken?migrationId=imp-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_version(&server, Some("20.12.1"));
        let import = client.import_tenant_data(&archive()).await.unwrap();
        assert_eq!(import.process_id, "imp-1");
        assert_eq!(
            import.migration_token_query_params().unwrap().migration_id,
            "imp-1"
        );
    }

    #[tokio::test]
    async fn keyed_import_requires_20_13() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_with_version(&server, Some("20.12"));
        let err = client
            .import_tenant_data_with_key(&archive(), "key")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion { .. }));
    }

    #[tokio::test]
    async fn legacy_import_rejected_on_20_13() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_with_version(&server, Some("20.13.1"));
        let err = client.import_tenant_data(&archive()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedVersion { ref required, .. } if required == "<20.13"
        ));
    }

    #[tokio::test]
    async fn keyed_import_on_20_13() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dataservice/tenantmigration/import/my-key"))
            .and(body_string_contains("name=\"file\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "processId": "imp-2",
                "migrationTokenURL": "/dataservice/tenantmigration/migrationToken?migrationId=imp-2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_version(&server, Some("20.13"));
        let import = client
            .import_tenant_data_with_key(&archive(), "my-key")
            .await
            .unwrap();
        assert_eq!(import.process_id, "imp-2");
    }

    #[tokio::test]
    async fn migrate_network_sends_token_as_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dataservice/tenantmigration/networkMigration"))
            .and(header("content-type", "text/plain"))
            .and(body_string("TOKEN-XYZ"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"processId": "net-1"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/dataservice/tenantmigration/networkMigration"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"processId": "net-2"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_version(&server, None);
        let migration = client.migrate_network("TOKEN-XYZ").await.unwrap();
        assert_eq!(migration.process_id, "net-1");

        let retried = client.retrigger_network_migration().await.unwrap();
        assert_eq!(retried.process_id, "net-2");
    }
}
