//! Rule set policy definition.
//!
//! A rule set groups firewall match rules that zone-based firewall policies
//! reference. Each rule is either IPv4 or IPv6, and every prefix it carries
//! must belong to the rule's family.

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use vmanage_core::ids::ListId;
use vmanage_core::types::{check_fields_exclusive, check_int_range, validation_error};

use crate::lists::DEFAULT_DESCRIPTION;
use crate::policy_definition::PolicyDefinition;

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

/// Wire tag of [`RuleSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RuleSetType {
    /// `ruleSet`
    #[default]
    #[serde(rename = "ruleSet")]
    Tag,
}

/// Address family of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleFamily {
    /// IPv4 rule
    Ipv4,
    /// IPv6 rule
    Ipv6,
}

/// Rule action; rule sets only permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    /// `permit`
    #[default]
    Permit,
}

/// Rule set definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RuleSet {
    /// Definition name
    pub name: String,
    /// Definition description
    #[serde(default = "default_description")]
    pub description: String,
    /// Fixed type tag
    #[serde(rename = "type", default)]
    pub definition_type: RuleSetType,
    /// Rules
    #[validate(nested)]
    pub definition: RuleSetDefinition,
}

/// Rule container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, Default)]
pub struct RuleSetDefinition {
    /// Rules in evaluation order
    #[serde(default)]
    #[validate(nested)]
    pub rules: Vec<RuleSetRule>,
}

/// One rule set entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_rule"))]
pub struct RuleSetRule {
    /// Address family
    pub rule: RuleFamily,
    /// Position inside the rule set
    #[validate(custom(function = "check_order"))]
    pub order: String,
    /// Action
    #[serde(default)]
    pub action: RuleAction,

    /// Source network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ip_prefix: Option<IpNet>,
    /// Source network variable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ip_prefix_variable: Option<String>,
    /// Source data prefix list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ip_prefix_list: Option<ListId>,
    /// Source FQDN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_fqdn: Option<String>,
    /// Source FQDN list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_fqdn_list: Option<ListId>,
    /// Space separated source ports and port ranges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "check_ports"))]
    pub source_port: Option<String>,
    /// Source port list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port_list: Option<ListId>,
    /// Source geo location (country or continent code)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_geo_location: Option<String>,
    /// Source geo location list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_geo_location_list: Option<ListId>,

    /// Destination network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_ip_prefix: Option<IpNet>,
    /// Destination network variable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_ip_prefix_variable: Option<String>,
    /// Destination data prefix list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_ip_prefix_list: Option<ListId>,
    /// Destination FQDN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_fqdn: Option<String>,
    /// Destination FQDN list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_fqdn_list: Option<ListId>,
    /// Space separated destination ports and port ranges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "check_ports"))]
    pub destination_port: Option<String>,
    /// Destination port list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_port_list: Option<ListId>,
    /// Destination geo location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_geo_location: Option<String>,
    /// Destination geo location list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_geo_location_list: Option<ListId>,

    /// Space separated IP protocol numbers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "check_protocols"))]
    pub protocol: Option<String>,
    /// Space separated protocol names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_name: Option<String>,
    /// Protocol name list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_name_list: Option<ListId>,
}

fn check_order(value: &str) -> Result<(), ValidationError> {
    check_int_range(value, 1, i128::from(u32::MAX), "order")
}

fn check_ports(value: &str) -> Result<(), ValidationError> {
    for token in value.split_whitespace() {
        match token.split_once('-') {
            Some((first, last)) => {
                check_int_range(first, 0, 65535, "Port")?;
                check_int_range(last, 0, 65535, "Port")?;
                let (first, last): (u32, u32) = match (first.parse(), last.parse()) {
                    (Ok(first), Ok(last)) => (first, last),
                    _ => return Err(validation_error("port_range", "Port must be an integer")),
                };
                if first >= last {
                    return Err(validation_error(
                        "port_range",
                        format!("Invalid port range {token}"),
                    ));
                }
            }
            None => check_int_range(token, 0, 65535, "Port")?,
        }
    }
    Ok(())
}

fn check_protocols(value: &str) -> Result<(), ValidationError> {
    value
        .split_whitespace()
        .try_for_each(|token| check_int_range(token, 0, 255, "protocol"))
}

fn check_family(rule: &RuleSetRule, prefix: Option<&IpNet>) -> Result<(), ValidationError> {
    let matches = match (rule.rule, prefix) {
        (_, None) => true,
        (RuleFamily::Ipv4, Some(net)) => matches!(net, IpNet::V4(_)),
        (RuleFamily::Ipv6, Some(net)) => matches!(net, IpNet::V6(_)),
    };
    if matches {
        Ok(())
    } else {
        Err(validation_error(
            "address_family",
            format!("Prefix family does not match {:?} rule", rule.rule),
        ))
    }
}

fn check_rule(rule: &RuleSetRule) -> Result<(), ValidationError> {
    check_fields_exclusive(
        &[
            ("sourceIpPrefix", rule.source_ip_prefix.is_some()),
            ("sourceIpPrefixVariable", rule.source_ip_prefix_variable.is_some()),
            ("sourceIpPrefixList", rule.source_ip_prefix_list.is_some()),
        ],
        false,
    )?;
    check_fields_exclusive(
        &[
            ("destinationIpPrefix", rule.destination_ip_prefix.is_some()),
            (
                "destinationIpPrefixVariable",
                rule.destination_ip_prefix_variable.is_some(),
            ),
            ("destinationIpPrefixList", rule.destination_ip_prefix_list.is_some()),
        ],
        false,
    )?;
    check_fields_exclusive(
        &[
            ("sourceFqdn", rule.source_fqdn.is_some()),
            ("sourceFqdnList", rule.source_fqdn_list.is_some()),
        ],
        false,
    )?;
    check_fields_exclusive(
        &[
            ("destinationFqdn", rule.destination_fqdn.is_some()),
            ("destinationFqdnList", rule.destination_fqdn_list.is_some()),
        ],
        false,
    )?;
    check_fields_exclusive(
        &[
            ("sourcePort", rule.source_port.is_some()),
            ("sourcePortList", rule.source_port_list.is_some()),
        ],
        false,
    )?;
    check_fields_exclusive(
        &[
            ("destinationPort", rule.destination_port.is_some()),
            ("destinationPortList", rule.destination_port_list.is_some()),
        ],
        false,
    )?;
    check_fields_exclusive(
        &[
            ("sourceGeoLocation", rule.source_geo_location.is_some()),
            ("sourceGeoLocationList", rule.source_geo_location_list.is_some()),
        ],
        false,
    )?;
    check_fields_exclusive(
        &[
            ("destinationGeoLocation", rule.destination_geo_location.is_some()),
            (
                "destinationGeoLocationList",
                rule.destination_geo_location_list.is_some(),
            ),
        ],
        false,
    )?;
    check_fields_exclusive(
        &[
            ("protocol", rule.protocol.is_some()),
            ("protocolName", rule.protocol_name.is_some()),
            ("protocolNameList", rule.protocol_name_list.is_some()),
        ],
        false,
    )?;
    check_family(rule, rule.source_ip_prefix.as_ref())?;
    check_family(rule, rule.destination_ip_prefix.as_ref())
}

impl RuleSetRule {
    fn empty(rule: RuleFamily, order: u32) -> Self {
        Self {
            rule,
            order: order.to_string(),
            action: RuleAction::Permit,
            source_ip_prefix: None,
            source_ip_prefix_variable: None,
            source_ip_prefix_list: None,
            source_fqdn: None,
            source_fqdn_list: None,
            source_port: None,
            source_port_list: None,
            source_geo_location: None,
            source_geo_location_list: None,
            destination_ip_prefix: None,
            destination_ip_prefix_variable: None,
            destination_ip_prefix_list: None,
            destination_fqdn: None,
            destination_fqdn_list: None,
            destination_port: None,
            destination_port_list: None,
            destination_geo_location: None,
            destination_geo_location_list: None,
            protocol: None,
            protocol_name: None,
            protocol_name_list: None,
        }
    }

    /// Empty IPv4 rule at position `order`.
    #[must_use]
    pub fn ipv4(order: u32) -> Self {
        Self::empty(RuleFamily::Ipv4, order)
    }

    /// Empty IPv6 rule at position `order`.
    #[must_use]
    pub fn ipv6(order: u32) -> Self {
        Self::empty(RuleFamily::Ipv6, order)
    }

    /// Match a source network.
    #[must_use]
    pub fn with_source_prefix(mut self, prefix: IpNet) -> Self {
        self.source_ip_prefix = Some(prefix);
        self
    }

    /// Match a source data prefix list.
    #[must_use]
    pub fn with_source_prefix_list(mut self, list_id: ListId) -> Self {
        self.source_ip_prefix_list = Some(list_id);
        self
    }

    /// Match a source network given by a device variable.
    #[must_use]
    pub fn with_source_prefix_variable(mut self, variable: impl Into<String>) -> Self {
        self.source_ip_prefix_variable = Some(variable.into());
        self
    }

    /// Match a destination network.
    #[must_use]
    pub fn with_destination_prefix(mut self, prefix: IpNet) -> Self {
        self.destination_ip_prefix = Some(prefix);
        self
    }

    /// Match a destination data prefix list.
    #[must_use]
    pub fn with_destination_prefix_list(mut self, list_id: ListId) -> Self {
        self.destination_ip_prefix_list = Some(list_id);
        self
    }

    /// Match a destination FQDN.
    #[must_use]
    pub fn with_destination_fqdn(mut self, fqdn: impl Into<String>) -> Self {
        self.destination_fqdn = Some(fqdn.into());
        self
    }

    /// Match source ports (`"80 443 8000-8080"`).
    #[must_use]
    pub fn with_source_ports(mut self, ports: impl Into<String>) -> Self {
        self.source_port = Some(ports.into());
        self
    }

    /// Match destination ports (`"80 443 8000-8080"`).
    #[must_use]
    pub fn with_destination_ports(mut self, ports: impl Into<String>) -> Self {
        self.destination_port = Some(ports.into());
        self
    }

    /// Match a destination geo location.
    #[must_use]
    pub fn with_destination_geo_location(mut self, location: impl Into<String>) -> Self {
        self.destination_geo_location = Some(location.into());
        self
    }

    /// Match IP protocol numbers.
    #[must_use]
    pub fn with_protocols(mut self, protocols: &[u8]) -> Self {
        let joined = protocols
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        self.protocol = Some(joined);
        self
    }

    /// Match protocol names.
    #[must_use]
    pub fn with_protocol_names(mut self, names: &[&str]) -> Self {
        self.protocol_name = Some(names.join(" "));
        self
    }
}

impl RuleSet {
    /// Create an empty rule set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: default_description(),
            definition_type: RuleSetType::Tag,
            definition: RuleSetDefinition::default(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a rule.
    pub fn add_rule(&mut self, rule: RuleSetRule) {
        self.definition.rules.push(rule);
    }

    /// Order value following the highest one in use.
    #[must_use]
    pub fn next_order(&self) -> u32 {
        self.definition
            .rules
            .iter()
            .filter_map(|rule| rule.order.parse::<u32>().ok())
            .max()
            .map_or(1, |max| max.saturating_add(1))
    }
}

impl PolicyDefinition for RuleSet {
    const TYPE: &'static str = "ruleSet";
    const SEGMENT: &'static str = "ruleset";

    fn name(&self) -> &str {
        &self.name
    }
}
