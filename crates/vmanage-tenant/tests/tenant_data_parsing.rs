//! Integration tests for parsing tenant and tenant migration responses.

use std::fs;
use std::path::PathBuf;
use validator::Validate;
use vmanage_core::{DataSequence, Endpoint};
use vmanage_tenant::{ImportInfo, Tenant};

const TENANTS: Endpoint = Endpoint::get("/tenant").with_resultbody("data");

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_fixture(name: &str) -> String {
    let fixture_path = fixtures_dir().join(name);
    fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture at {}: {}",
            fixture_path.display(),
            e
        )
    })
}

#[test]
fn test_deserialize_tenants() {
    let json_data = load_fixture("tenants.json");

    let tenants: DataSequence<Tenant> = TENANTS
        .decode(json_data.as_bytes())
        .unwrap_or_else(|e| panic!("Failed to decode tenants: {e}"));

    assert_eq!(tenants.len(), 2, "Expected 2 tenants in test data");

    let acme = tenants.first().unwrap();
    assert_eq!(acme.org_name, "Acme Corp");
    assert_eq!(acme.vbond_address.as_deref(), Some("vbond.example.com"));
    assert_eq!(acme.vsmarts.as_ref().map(Vec::len), Some(2));
    assert_eq!(acme.wan_edge_present, Some(12));
    assert!(!acme.edge_connector_enable);
}

#[test]
fn test_filter_edge_connector_tenants() {
    let json_data = load_fixture("tenants.json");
    let tenants: DataSequence<Tenant> = TENANTS.decode(json_data.as_bytes()).unwrap();

    let connected = tenants.filter(|tenant| tenant.edge_connector_enable);
    let globex = connected.single_or_default().unwrap();
    assert_eq!(globex.name, "globex");
    assert_eq!(globex.edge_connector_system_ip.as_deref(), Some("10.255.0.1"));
}

#[test]
fn test_all_tenants_validate() {
    let json_data = load_fixture("tenants.json");
    let tenants: DataSequence<Tenant> = TENANTS.decode(json_data.as_bytes()).unwrap();

    for tenant in &tenants {
        tenant
            .validate()
            .unwrap_or_else(|e| panic!("Tenant {} failed validation: {e}", tenant.name));
    }
}

#[test]
fn test_import_info_token_params() {
    let json_data = load_fixture("import_info.json");

    let info: ImportInfo = serde_json::from_str(&json_data)
        .unwrap_or_else(|e| panic!("Failed to deserialize import info: {e}\nJSON: {json_data}"));

    assert_eq!(info.process_id, "import_1712065521342");
    assert_eq!(
        info.migration_token_query_params().unwrap().migration_id,
        info.process_id
    );
}
