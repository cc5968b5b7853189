//! Integration tests for parsing vManage policy data.
//!
//! These tests validate that the vmanage-policy models can deserialize
//! responses captured from a controller and that the parsed objects pass
//! local validation.

use std::fs;
use std::path::PathBuf;
use validator::Validate;
use vmanage_core::{DataSequence, Endpoint};
use vmanage_policy::lists::{AppProbeClassList, DataIpv6PrefixList};
use vmanage_policy::policy_definition::PolicyDefinitionInfoRecord;
use vmanage_policy::policy_list::PolicyListInfoRecord;
use vmanage_policy::rule_set::RuleFamily;
use vmanage_policy::RuleSet;

const LIST_ENDPOINT: Endpoint =
    Endpoint::get("/template/policy/list/appprobe").with_resultbody("data");
const DEFINITION_ENDPOINT: Endpoint =
    Endpoint::get("/template/policy/definition/ruleset").with_resultbody("data");

/// Get the path to the test fixtures directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Load a fixture from disk.
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
fn test_deserialize_app_probe_lists() {
    let json_data = load_fixture("app_probe_lists.json");

    let lists: DataSequence<PolicyListInfoRecord<AppProbeClassList>> = LIST_ENDPOINT
        .decode(json_data.as_bytes())
        .unwrap_or_else(|e| panic!("Failed to decode app probe lists: {e}"));

    assert_eq!(lists.len(), 2, "Expected 2 app probe lists in test data");

    let voice = lists.first().unwrap();
    assert_eq!(voice.list.name, "voice-probe");
    assert_eq!(voice.list.entries[0].forwarding_class, "voice");
    assert_eq!(voice.list.entries[0].map.len(), 2);
    assert_eq!(voice.info.reference_count, 1);
    assert_eq!(voice.info.references[0].reference_type, "sla");
}

#[test]
fn test_filter_app_probe_lists() {
    let json_data = load_fixture("app_probe_lists.json");
    let lists: DataSequence<PolicyListInfoRecord<AppProbeClassList>> =
        LIST_ENDPOINT.decode(json_data.as_bytes()).unwrap();

    let read_only = lists.filter(|record| record.info.read_only);
    let video = read_only.single_or_default().unwrap();
    assert_eq!(video.list.name, "video-probe");
    assert_eq!(video.info.owner.as_deref(), Some("netops"));
    assert!(video.info.is_activated_by_vsmart);
}

#[test]
fn test_all_app_probe_lists_validate() {
    let json_data = load_fixture("app_probe_lists.json");
    let lists: DataSequence<PolicyListInfoRecord<AppProbeClassList>> =
        LIST_ENDPOINT.decode(json_data.as_bytes()).unwrap();

    for record in &lists {
        record.list.validate().unwrap_or_else(|e| {
            panic!("List {} failed validation: {e}", record.list.name)
        });
    }
}

#[test]
fn test_deserialize_data_ipv6_prefix_list() {
    let json_data = load_fixture("data_ipv6_prefix_list.json");

    let record: PolicyListInfoRecord<DataIpv6PrefixList> = serde_json::from_str(&json_data)
        .unwrap_or_else(|e| {
            panic!(
                "Failed to deserialize IPv6 prefix list: {}\nJSON: {}",
                e, json_data
            )
        });

    assert_eq!(
        record.info.list_id.to_string(),
        "9e8d7c6b-5a4f-4e3d-8c2b-1a0f9e8d7c6b"
    );
    assert_eq!(record.list.entries.len(), 3);
    assert_eq!(
        record.list.entries[2].ipv6_prefix.to_string(),
        "fd00::/8"
    );
    assert!(record.list.validate().is_ok());
}

#[test]
fn test_deserialize_rule_set_definitions() {
    let json_data = load_fixture("rule_set_definitions.json");

    let definitions: DataSequence<PolicyDefinitionInfoRecord<RuleSet>> = DEFINITION_ENDPOINT
        .decode(json_data.as_bytes())
        .unwrap_or_else(|e| panic!("Failed to decode rule sets: {e}"));

    let record = definitions.single_or_default().unwrap();
    assert_eq!(record.definition.name, "branch-rules");
    assert_eq!(record.info.mode.as_deref(), Some("unlocked"));

    let rules = &record.definition.definition.rules;
    assert_eq!(rules.len(), 3);
    assert_eq!(rules[2].rule, RuleFamily::Ipv6);
    assert!(rules[1].source_ip_prefix_list.is_some());
    assert!(record.definition.validate().is_ok());
}
