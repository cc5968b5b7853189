//! Feature template trait and `templateDefinition` generation.
//!
//! vManage does not accept a feature template as a flat object. Every
//! leaf is wrapped in a descriptor carrying its kind and value:
//!
//! ```json
//! { "vipObjectType": "object", "vipType": "constant", "vipValue": 1500 }
//! ```
//!
//! Lists of scalars become `list` descriptors, lists of records become
//! `tree` descriptors keyed by `vipPrimaryKey`, and flags become
//! `node-only` descriptors. Fields are placed under the container path the
//! controller expects, which often differs from the flat model layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;
use vmanage_core::ids::TemplateId;
use vmanage_core::Error;

use crate::device_model::DeviceModel;
use crate::Result;

/// Minimum controller version assumed for generated templates.
pub const DEFAULT_TEMPLATE_MIN_VERSION: &str = "15.0.0";

const VIP_OBJECT_TYPE: &str = "vipObjectType";
const VIP_TYPE: &str = "vipType";
const VIP_VALUE: &str = "vipValue";
const VIP_PRIMARY_KEY: &str = "vipPrimaryKey";
const PRIORITY_ORDER: &str = "priority-order";

/// Where a serialised model field lives in the template definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath {
    /// Serialised field name
    pub field: &'static str,
    /// Containers between the definition root and the field
    pub data_path: &'static [&'static str],
    /// Key inside the last container, when it differs from `field`
    pub vmanage_key: Option<&'static str>,
}

impl FieldPath {
    /// Place `field` under `data_path` keeping its name.
    #[must_use]
    pub const fn new(field: &'static str, data_path: &'static [&'static str]) -> Self {
        Self {
            field,
            data_path,
            vmanage_key: None,
        }
    }

    /// Store the field under `key` instead of its serialised name.
    #[must_use]
    pub const fn with_key(mut self, key: &'static str) -> Self {
        self.vmanage_key = Some(key);
        self
    }

    /// Key used inside the last container.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.vmanage_key.unwrap_or(self.field)
    }
}

/// A feature template model.
///
/// Implementors serialise to a flat object of wire field names; nulls are
/// treated as unset.
pub trait FeatureTemplate: Serialize {
    /// vManage template type, e.g. `cisco_vpn_interface`
    const TEMPLATE_TYPE: &'static str;

    /// Fields that do not live at the definition root.
    const FIELD_PATHS: &'static [FieldPath] = &[];

    /// Template name.
    fn template_name(&self) -> &str;

    /// Template description.
    fn template_description(&self) -> &str;

    /// Device models the template applies to.
    fn device_models(&self) -> &[DeviceModel];

    /// Minimum controller version.
    fn template_min_version(&self) -> &str {
        DEFAULT_TEMPLATE_MIN_VERSION
    }

    /// Build the `templateDefinition` tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] when the model does not serialise, or
    /// [`Error::InvalidRequest`] when it does not serialise to an object.
    fn generate_definition(&self) -> Result<Value> {
        let Value::Object(fields) = serde_json::to_value(self)? else {
            return Err(Error::InvalidRequest(format!(
                "{} template must serialise to an object",
                Self::TEMPLATE_TYPE
            )));
        };

        let mut definition = Map::new();
        for (field, value) in fields {
            if value.is_null() {
                continue;
            }
            let placement = Self::FIELD_PATHS.iter().find(|path| path.field == field);
            let (data_path, key) =
                placement.map_or((&[][..], field.as_str()), |path| (path.data_path, path.key()));
            place(&mut definition, data_path, key, vip_node(value));
        }
        Ok(Value::Object(definition))
    }

    /// Build the create/edit request body.
    ///
    /// # Errors
    ///
    /// Propagates [`FeatureTemplate::generate_definition`] errors.
    fn generate_payload(&self) -> Result<FeatureTemplatePayload> {
        Ok(FeatureTemplatePayload {
            template_name: self.template_name().to_string(),
            template_description: self.template_description().to_string(),
            template_type: Self::TEMPLATE_TYPE.to_string(),
            device_type: self.device_models().to_vec(),
            template_min_version: self.template_min_version().to_string(),
            template_definition: self.generate_definition()?,
            factory_default: false,
        })
    }
}

fn descriptor(object_type: &str, value: Value) -> Map<String, Value> {
    let mut node = Map::new();
    node.insert(VIP_OBJECT_TYPE.to_string(), Value::from(object_type));
    node.insert(VIP_TYPE.to_string(), Value::from("constant"));
    node.insert(VIP_VALUE.to_string(), value);
    node
}

fn vip_node(value: Value) -> Map<String, Value> {
    match value {
        Value::Bool(flag) => descriptor("node-only", Value::from(flag.to_string())),
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
            tree(items)
        }
        Value::Array(items) => descriptor("list", Value::Array(items)),
        Value::Object(fields) => container(fields),
        scalar => descriptor("object", scalar),
    }
}

fn container(fields: Map<String, Value>) -> Map<String, Value> {
    fields
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key, Value::Object(vip_node(value))))
        .collect()
}

fn tree(items: Vec<Value>) -> Map<String, Value> {
    let primary_key: Vec<Value> = items
        .iter()
        .find_map(Value::as_object)
        .and_then(|first| first.iter().find(|(_, value)| !value.is_null()))
        .map(|(key, _)| Value::from(key.as_str()))
        .into_iter()
        .collect();

    let entries = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(fields) => {
                let mut entry = container(fields);
                let order = entry.keys().map(|key| Value::from(key.as_str())).collect();
                entry.insert(PRIORITY_ORDER.to_string(), Value::Array(order));
                Some(Value::Object(entry))
            }
            _ => None,
        })
        .collect();

    let mut node = descriptor("tree", Value::Array(entries));
    node.insert(VIP_PRIMARY_KEY.to_string(), Value::Array(primary_key));
    node
}

fn place(root: &mut Map<String, Value>, data_path: &[&str], key: &str, node: Map<String, Value>) {
    match data_path.split_first() {
        None => match root.get_mut(key) {
            // Containers created for children keep them next to the descriptor.
            Some(Value::Object(existing)) => existing.extend(node),
            _ => {
                root.insert(key.to_string(), Value::Object(node));
            }
        },
        Some((segment, rest)) => {
            let slot = root
                .entry(*segment)
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(inner) = slot {
                place(inner, rest, key, node);
            } else {
                let mut inner = Map::new();
                place(&mut inner, rest, key, node);
                *slot = Value::Object(inner);
            }
        }
    }
}

/// Create/edit request body for `/template/feature`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeatureTemplatePayload {
    /// Template name
    #[validate(length(min = 1, max = 128))]
    pub template_name: String,
    /// Template description
    #[validate(length(min = 1, max = 2048))]
    pub template_description: String,
    /// Template type
    pub template_type: String,
    /// Device models the template applies to
    #[validate(length(min = 1))]
    pub device_type: Vec<DeviceModel>,
    /// Minimum controller version
    pub template_min_version: String,
    /// Generated definition tree
    pub template_definition: Value,
    /// Whether this is a factory default template
    #[serde(default)]
    pub factory_default: bool,
}

/// Response of a template create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureTemplateId {
    /// Id of the new template
    pub template_id: TemplateId,
}

/// Response of a template edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureTemplateEditResponse {
    /// Device templates that embed the edited template
    #[serde(default)]
    pub master_templates_affected: Vec<String>,
}

/// Summary of a stored feature template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureTemplateInfo {
    /// Template id
    pub template_id: TemplateId,
    /// Template name
    pub template_name: String,
    /// Template description
    #[serde(default)]
    pub template_description: String,
    /// Template type
    pub template_type: String,
    /// Device models the template applies to
    #[serde(default)]
    pub device_type: Vec<DeviceModel>,
    /// Last editor
    #[serde(default)]
    pub last_updated_by: Option<String>,
    /// Last edit time
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_updated_on: Option<DateTime<Utc>>,
    /// Whether this is a factory default template
    #[serde(default)]
    pub factory_default: bool,
    /// Devices attached through device templates
    #[serde(default)]
    pub devices_attached: u32,
    /// Device templates embedding this template
    #[serde(default)]
    pub attached_masters_count: u32,
    /// Minimum controller version
    #[serde(default)]
    pub template_min_version: Option<String>,
    /// `template` or `file`
    #[serde(default)]
    pub config_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    #[serde(rename_all = "kebab-case")]
    struct Hop {
        address: String,
        distance: Option<u8>,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "kebab-case")]
    struct StaticRouteTemplate {
        #[serde(skip)]
        device_models: Vec<DeviceModel>,
        description: Option<String>,
        vpn_id: u16,
        name_server: Vec<String>,
        next_hop: Vec<Hop>,
        ecmp_hash_key: Option<bool>,
        ipv4_prefix: Option<String>,
    }

    impl FeatureTemplate for StaticRouteTemplate {
        const TEMPLATE_TYPE: &'static str = "cisco_vpn";
        const FIELD_PATHS: &'static [FieldPath] = &[
            FieldPath::new("vpn-id", &[]).with_key("id"),
            FieldPath::new("name-server", &["dns"]),
            FieldPath::new("next-hop", &["ip", "route"]),
            FieldPath::new("ipv4-prefix", &["ip", "route"]).with_key("prefix"),
            FieldPath::new("ecmp-hash-key", &["ip"]),
        ];

        fn template_name(&self) -> &str {
            "vpn-10"
        }

        fn template_description(&self) -> &str {
            "Service VPN"
        }

        fn device_models(&self) -> &[DeviceModel] {
            &self.device_models
        }
    }

    fn template() -> StaticRouteTemplate {
        StaticRouteTemplate {
            device_models: vec![DeviceModel::VedgeC8000V],
            description: None,
            vpn_id: 10,
            name_server: vec!["8.8.8.8".to_string(), "1.1.1.1".to_string()],
            next_hop: vec![
                Hop {
                    address: "10.0.0.1".to_string(),
                    distance: Some(1),
                },
                Hop {
                    address: "10.0.0.2".to_string(),
                    distance: None,
                },
            ],
            ecmp_hash_key: Some(true),
            ipv4_prefix: Some("0.0.0.0/0".to_string()),
        }
    }

    #[test]
    fn scalars_become_constant_objects() {
        let definition = template().generate_definition().unwrap();
        assert_eq!(
            definition["id"],
            json!({"vipObjectType": "object", "vipType": "constant", "vipValue": 10})
        );
        assert!(definition.get("description").is_none());
        assert!(definition.get("vpn-id").is_none());
    }

    #[test]
    fn scalar_lists_become_list_objects() {
        let definition = template().generate_definition().unwrap();
        assert_eq!(
            definition["dns"]["name-server"],
            json!({
                "vipObjectType": "list",
                "vipType": "constant",
                "vipValue": ["8.8.8.8", "1.1.1.1"]
            })
        );
    }

    #[test]
    fn record_lists_become_trees() {
        let definition = template().generate_definition().unwrap();
        let next_hop = &definition["ip"]["route"]["next-hop"];
        assert_eq!(next_hop["vipObjectType"], "tree");
        assert_eq!(next_hop["vipPrimaryKey"], json!(["address"]));

        let entries = next_hop["vipValue"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["address"]["vipValue"], "10.0.0.1");
        assert_eq!(entries[0]["distance"]["vipValue"], 1);
        assert_eq!(entries[0]["priority-order"], json!(["address", "distance"]));
        assert!(entries[1].get("distance").is_none());
        assert_eq!(entries[1]["priority-order"], json!(["address"]));
    }

    #[test]
    fn fields_share_containers() {
        let definition = template().generate_definition().unwrap();
        let route = definition["ip"]["route"].as_object().unwrap();
        assert!(route.contains_key("next-hop"));
        assert_eq!(route["prefix"]["vipValue"], "0.0.0.0/0");
        assert_eq!(
            definition["ip"]["ecmp-hash-key"],
            json!({"vipObjectType": "node-only", "vipType": "constant", "vipValue": "true"})
        );
    }

    #[test]
    fn flag_descriptor_merges_with_its_children() {
        let mut root = Map::new();
        place(&mut root, &["nat"], "nat-choice", vip_node(json!("Interface")));
        place(&mut root, &[], "nat", vip_node(json!(true)));

        let nat = root["nat"].as_object().unwrap();
        assert_eq!(nat["vipObjectType"], "node-only");
        assert_eq!(nat["nat-choice"]["vipValue"], "Interface");
    }

    #[test]
    fn payload_wraps_definition() {
        let payload = template().generate_payload().unwrap();
        assert_eq!(payload.template_type, "cisco_vpn");
        assert_eq!(payload.template_min_version, DEFAULT_TEMPLATE_MIN_VERSION);
        assert!(!payload.factory_default);
        assert!(payload.validate().is_ok());

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["templateName"], "vpn-10");
        assert_eq!(value["templateDescription"], "Service VPN");
        assert_eq!(value["deviceType"], json!(["vedge-C8000V"]));
        assert_eq!(value["factoryDefault"], false);
        assert_eq!(value["templateDefinition"]["id"]["vipValue"], 10);
    }

    #[test]
    fn payload_requires_device_models() {
        let mut template = template();
        template.device_models.clear();
        let payload = template.generate_payload().unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn info_parses_listing_record() {
        let info: FeatureTemplateInfo = serde_json::from_value(json!({
            "templateId": "2f5e2ac5-7d6c-4b0a-9a64-7f3b7a7f1c11",
            "templateName": "wan-if",
            "templateDescription": "WAN interface",
            "templateType": "cisco_vpn_interface",
            "deviceType": ["vedge-C8000V", "vedge-C1111-8P"],
            "lastUpdatedBy": "admin",
            "lastUpdatedOn": 1712065521342_i64,
            "factoryDefault": false,
            "devicesAttached": 3,
            "attachedMastersCount": 1,
            "templateMinVersion": "15.0.0",
            "configType": "xml"
        }))
        .unwrap();
        assert_eq!(info.template_name, "wan-if");
        assert_eq!(info.device_type[1], DeviceModel::Other("vedge-C1111-8P".to_string()));
        assert_eq!(
            info.last_updated_on.map(|at| at.timestamp_millis()),
            Some(1_712_065_521_342)
        );
    }
}
