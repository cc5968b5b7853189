//! Entries carried by policy lists.
//!
//! vManage transmits most numeric values as strings. Every entry derives
//! [`Validate`] so that range checks and cross-field rules run before a list
//! is sent to the controller.

use ipnet::{Ipv4Net, Ipv6Net};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr};
use validator::{Validate, ValidationError};
use vmanage_core::types::{
    check_fields_exclusive, check_int_range, validation_error, InterfaceType,
};

/// Largest VPN id accepted in VPN and zone lists.
pub const MAX_VPN_ID: i128 = 65530;

/// Maximum length of a local domain name server pattern.
pub const MAX_NAME_SERVER_LEN: usize = 240;

fn check_jitter(value: &str) -> Result<(), ValidationError> {
    check_int_range(value, 1, 1000, "jitter")
}

fn check_latency(value: &str) -> Result<(), ValidationError> {
    check_int_range(value, 1, 1000, "latency")
}

fn check_loss(value: &str) -> Result<(), ValidationError> {
    check_int_range(value, 0, 100, "loss")
}

fn check_ipv4_network(net: &Ipv4Net) -> Result<(), ValidationError> {
    if net.trunc() == *net {
        Ok(())
    } else {
        Err(validation_error(
            "network",
            format!("{net} has host bits set"),
        ))
    }
}

fn check_ipv6_network(net: &Ipv6Net) -> Result<(), ValidationError> {
    if net.trunc() == *net {
        Ok(())
    } else {
        Err(validation_error(
            "network",
            format!("{net} has host bits set"),
        ))
    }
}

fn check_single_vpn(value: &str) -> Result<(), ValidationError> {
    check_int_range(value, 0, MAX_VPN_ID, "VPN")
}

fn check_vpn_range(value: &str) -> Result<(), ValidationError> {
    let parts: Vec<&str> = value.split('-').collect();
    if parts.len() > 2 {
        return Err(validation_error(
            "vpn_range",
            "VPN range should consist two integers separated by hyphen",
        ));
    }

    let mut vpns = Vec::with_capacity(parts.len());
    for part in parts {
        check_single_vpn(part)?;
        let vpn: i128 = part
            .trim()
            .parse()
            .map_err(|_| validation_error("not_integer", "VPN must be an integer"))?;
        vpns.push(vpn);
    }

    if let [first, second] = vpns.as_slice() {
        if first >= second {
            return Err(validation_error(
                "vpn_range",
                "Second VPN in range should be greater than first",
            ));
        }
    }
    Ok(())
}

fn check_port(value: &str) -> Result<(), ValidationError> {
    check_int_range(value, 0, 65535, "Port")
}

fn check_name_server(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.len() > MAX_NAME_SERVER_LEN {
        return Err(validation_error(
            "name_server",
            format!("nameServer must be 1-{MAX_NAME_SERVER_LEN} characters long"),
        ));
    }
    if value.starts_with(['*', '+']) {
        return Err(validation_error(
            "name_server",
            "nameServer cannot start with '*' or '+'",
        ));
    }
    Regex::new(value).map_err(|err| {
        validation_error("name_server", format!("nameServer is not a valid regex: {err}"))
    })?;
    Ok(())
}

fn check_burst(value: &str) -> Result<(), ValidationError> {
    check_int_range(value, 15_000, 10_000_000, "burst")
}

fn check_rate(value: &str) -> Result<(), ValidationError> {
    check_int_range(value, 8, 100_000_000_000, "rate")
}

fn check_queue(value: &str) -> Result<(), ValidationError> {
    check_int_range(value, 0, 7, "queue")
}

fn check_preference(value: &str) -> Result<(), ValidationError> {
    check_int_range(value, 0, 4_294_967_295, "preference")
}

fn check_ipv4_prefix_len(value: &str) -> Result<(), ValidationError> {
    check_int_range(value, 0, 32, "ge,le")
}

fn check_ipv6_prefix_len(value: &str) -> Result<(), ValidationError> {
    check_int_range(value, 0, 128, "ge,le")
}

/// Action applied to traffic exceeding a policer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PolicerExceedAction {
    /// Drop exceeding packets
    #[default]
    Drop,
    /// Remark exceeding packets
    Remark,
}

/// TLOC encapsulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encap {
    /// IPsec
    Ipsec,
    /// GRE
    Gre,
}

/// Path selection inside a preferred color group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathPreference {
    /// `direct-path`
    DirectPath,
    /// `multi-hop-path`
    MultiHopPath,
    /// `all-paths`
    AllPaths,
}

/// Color to DSCP mapping used by app probe classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ColorDscpMap {
    /// TLOC color
    pub color: String,
    /// DSCP value
    #[validate(range(min = 0, max = 63))]
    pub dscp: u8,
}

/// One preference of a preferred color group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ColorGroupPreference {
    /// Space separated colors
    pub color_preference: String,
    /// Path preference
    pub path_preference: PathPreference,
}

/// Fallback-to-best-tunnel settings of an SLA class.
///
/// `criteria` lists the variance kinds joined by `-` (e.g. `loss-latency`)
/// and must name exactly the variances that are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_fallback_criteria"))]
pub struct FallbackBestTunnel {
    /// Hyphen separated criteria
    pub criteria: String,
    /// Jitter variance in ms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "check_jitter"))]
    pub jitter_variance: Option<String>,
    /// Latency variance in ms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "check_latency"))]
    pub latency_variance: Option<String>,
    /// Loss variance in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "check_loss"))]
    pub loss_variance: Option<String>,
}

fn check_fallback_criteria(entry: &FallbackBestTunnel) -> Result<(), ValidationError> {
    let expected: BTreeSet<&str> = [
        ("jitter", entry.jitter_variance.is_some()),
        ("latency", entry.latency_variance.is_some()),
        ("loss", entry.loss_variance.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, set)| set.then_some(name))
    .collect();

    if expected.is_empty() {
        return Err(validation_error(
            "criteria",
            "At least one variance type needs to be present",
        ));
    }

    let observed: BTreeSet<&str> = entry.criteria.split('-').collect();
    if expected != observed {
        let names = expected.iter().copied().collect::<Vec<_>>().join(", ");
        let message = if expected.len() == 1 {
            format!("Criteria must contain: {names}")
        } else {
            format!("Criteria must contain: {names} separated by hyphen")
        };
        return Err(validation_error("criteria", message));
    }
    Ok(())
}

/// IPv4 data prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DataPrefixListEntry {
    /// IPv4 network with host bits clear
    #[validate(custom(function = "check_ipv4_network"))]
    pub ip_prefix: Ipv4Net,
}

/// Site id or site id range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SiteListEntry {
    /// Site id, e.g. `100` or `100-200`
    pub site_id: String,
}

/// VPN id or VPN id range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct VpnListEntry {
    /// `0-65530` range or single number
    #[validate(custom(function = "check_vpn_range"))]
    pub vpn: String,
}

/// Zone member: either a VPN or an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "check_zone_member"))]
pub struct ZoneListEntry {
    /// Single VPN id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "check_single_vpn"))]
    pub vpn: Option<String>,
    /// Interface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<InterfaceType>,
}

fn check_zone_member(entry: &ZoneListEntry) -> Result<(), ValidationError> {
    check_fields_exclusive(
        &[
            ("vpn", entry.vpn.is_some()),
            ("interface", entry.interface.is_some()),
        ],
        true,
    )
}

/// FQDN pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FqdnListEntry {
    /// Domain pattern
    pub pattern: String,
}

/// Geographic location: a country or a continent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "check_geo_location"))]
pub struct GeoLocationListEntry {
    /// ISO-3166 alpha-3 country code, e.g. `FRA`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Two letter continent code: AF, NA, OC, AN, AS, EU, SA
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
}

fn check_geo_location(entry: &GeoLocationListEntry) -> Result<(), ValidationError> {
    check_fields_exclusive(
        &[
            ("country", entry.country.is_some()),
            ("continent", entry.continent.is_some()),
        ],
        true,
    )
}

/// Layer 4 port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PortListEntry {
    /// Port number
    #[validate(custom(function = "check_port"))]
    pub port: String,
}

/// Protocol name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolNameListEntry {
    /// Protocol name, e.g. `snmp`
    pub protocol_name: String,
}

/// Local application: an application or an application family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_local_app"))]
pub struct LocalAppListEntry {
    /// Application family
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_family: Option<String>,
    /// Application
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
}

fn check_local_app(entry: &LocalAppListEntry) -> Result<(), ValidationError> {
    check_app_or_family(entry.app.as_ref(), entry.app_family.as_ref())
}

/// Application: an application or an application family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_app"))]
pub struct AppListEntry {
    /// Application family
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_family: Option<String>,
    /// Application
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
}

fn check_app(entry: &AppListEntry) -> Result<(), ValidationError> {
    check_app_or_family(entry.app.as_ref(), entry.app_family.as_ref())
}

fn check_app_or_family(
    app: Option<&String>,
    app_family: Option<&String>,
) -> Result<(), ValidationError> {
    check_fields_exclusive(
        &[("app", app.is_some()), ("appFamily", app_family.is_some())],
        true,
    )
}

/// TLOC color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ColorListEntry {
    /// Color name, e.g. `blue`
    pub color: String,
}

/// IPv6 data prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DataIpv6PrefixListEntry {
    /// IPv6 network with host bits clear
    #[validate(custom(function = "check_ipv6_network"))]
    pub ipv6_prefix: Ipv6Net,
}

/// Local domain name server pattern.
///
/// Must be a valid regex of at most 240 characters, and cannot start with
/// `*` or `+`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocalDomainListEntry {
    /// Name server regex
    #[validate(custom(function = "check_name_server"))]
    pub name_server: String,
}

/// IPS signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IpsSignatureListEntry {
    /// Generator id
    pub generator_id: String,
    /// Signature id
    pub signature_id: String,
}

/// URL pattern for allow and block lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UrlListEntry {
    /// URL pattern
    pub pattern: String,
}

/// BGP community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CommunityListEntry {
    /// e.g. `1000:10000`, `internet`, `local-AS`, `no-advertise`, `no-export`
    pub community: String,
}

/// Policer parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PolicerListEntry {
    /// Burst in bytes
    #[validate(custom(function = "check_burst"))]
    pub burst: String,
    /// Exceed action
    #[serde(default)]
    pub exceed: PolicerExceedAction,
    /// Rate in bps
    #[validate(custom(function = "check_rate"))]
    pub rate: String,
}

/// AS path regex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AsPathListEntry {
    /// AS path
    pub as_path: String,
}

/// QoS class map queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ClassMapListEntry {
    /// Queue number
    #[validate(custom(function = "check_queue"))]
    pub queue: String,
}

/// Traffic mirror destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MirrorListEntry {
    /// Remote destination
    pub remote_dest: IpAddr,
    /// Source address
    pub source: IpAddr,
}

/// App probe class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AppProbeClassListEntry {
    /// Color to DSCP mappings
    #[serde(default)]
    #[validate(nested)]
    pub map: Vec<ColorDscpMap>,
    /// Forwarding class name
    pub forwarding_class: String,
}

/// SLA class thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_sla_thresholds"))]
pub struct SlaClassListEntry {
    /// Latency in ms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "check_latency"))]
    pub latency: Option<String>,
    /// Loss in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "check_loss"))]
    pub loss: Option<String>,
    /// Jitter in ms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "check_jitter"))]
    pub jitter: Option<String>,
    /// Referenced app probe class list id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_probe_class: Option<String>,
    /// Fallback to best tunnel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub fallback_best_tunnel: Option<FallbackBestTunnel>,
}

fn check_sla_thresholds(entry: &SlaClassListEntry) -> Result<(), ValidationError> {
    if entry.latency.is_none() && entry.loss.is_none() && entry.jitter.is_none() {
        return Err(validation_error(
            "sla_thresholds",
            "At least one of jitter, loss or latency entries must be set",
        ));
    }
    Ok(())
}

/// Transport locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TlocListEntry {
    /// System IP
    pub tloc: Ipv4Addr,
    /// Color
    pub color: String,
    /// Encapsulation
    pub encap: Encap,
    /// Preference
    #[validate(custom(function = "check_preference"))]
    pub preference: String,
}

/// Preferred color group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_preference_order"))]
pub struct PreferredColorGroupListEntry {
    /// Primary preference
    pub primary_preference: ColorGroupPreference,
    /// Secondary preference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_preference: Option<ColorGroupPreference>,
    /// Tertiary preference, requires a secondary one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tertiary_preference: Option<ColorGroupPreference>,
}

fn check_preference_order(entry: &PreferredColorGroupListEntry) -> Result<(), ValidationError> {
    if entry.secondary_preference.is_none() && entry.tertiary_preference.is_some() {
        return Err(validation_error(
            "preference_order",
            "tertiaryPreference cannot be set without secondaryPreference",
        ));
    }
    Ok(())
}

/// IPv4 route prefix with optional length bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PrefixListEntry {
    /// IPv4 network with host bits clear
    #[validate(custom(function = "check_ipv4_network"))]
    pub ip_prefix: Ipv4Net,
    /// Greater-or-equal prefix length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "check_ipv4_prefix_len"))]
    pub ge: Option<String>,
    /// Less-or-equal prefix length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "check_ipv4_prefix_len"))]
    pub le: Option<String>,
}

/// IPv6 route prefix with optional length bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Ipv6PrefixListEntry {
    /// IPv6 network with host bits clear
    #[validate(custom(function = "check_ipv6_network"))]
    pub ipv6_prefix: Ipv6Net,
    /// Greater-or-equal prefix length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "check_ipv6_prefix_len"))]
    pub ge: Option<String>,
    /// Less-or-equal prefix length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "check_ipv6_prefix_len"))]
    pub le: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn first_message(errors: &validator::ValidationErrors) -> String {
        // schema errors are reported under `__all__` alongside field errors
        errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|err| err.message.as_ref().map(ToString::to_string))
            .unwrap_or_default()
    }

    fn fallback(
        criteria: &str,
        jitter: Option<&str>,
        latency: Option<&str>,
        loss: Option<&str>,
    ) -> FallbackBestTunnel {
        FallbackBestTunnel {
            criteria: criteria.to_string(),
            jitter_variance: jitter.map(str::to_string),
            latency_variance: latency.map(str::to_string),
            loss_variance: loss.map(str::to_string),
        }
    }

    #[test]
    fn fallback_criteria_must_match_variances() {
        assert!(fallback("loss-latency", None, Some("10"), Some("5"))
            .validate()
            .is_ok());
        assert!(fallback("jitter", Some("100"), None, None).validate().is_ok());

        let err = fallback("jitter", None, None, None).validate().unwrap_err();
        assert_eq!(
            first_message(&err),
            "At least one variance type needs to be present"
        );

        let err = fallback("latency", Some("10"), None, None)
            .validate()
            .unwrap_err();
        assert_eq!(first_message(&err), "Criteria must contain: jitter");

        let err = fallback("jitter", Some("10"), Some("10"), None)
            .validate()
            .unwrap_err();
        assert_eq!(
            first_message(&err),
            "Criteria must contain: jitter, latency separated by hyphen"
        );
    }

    #[test]
    fn fallback_variance_ranges() {
        assert!(fallback("jitter", Some("1001"), None, None)
            .validate()
            .is_err());
        assert!(fallback("loss", None, None, Some("101")).validate().is_err());
        assert!(fallback("latency", None, Some("0"), None).validate().is_err());
        assert!(fallback("latency", None, Some("ten"), None)
            .validate()
            .is_err());
    }

    #[test]
    fn vpn_ranges() {
        let vpn = |value: &str| VpnListEntry {
            vpn: value.to_string(),
        };
        assert!(vpn("512").validate().is_ok());
        assert!(vpn("100-200").validate().is_ok());
        assert!(vpn("65531").validate().is_err());
        assert!(vpn("200-100").validate().is_err());
        assert!(vpn("100-100").validate().is_err());
        assert!(vpn("1-2-3").validate().is_err());
        assert!(vpn("a-b").validate().is_err());
    }

    #[test]
    fn zone_requires_exactly_one_member() {
        let both = ZoneListEntry {
            vpn: Some("1".to_string()),
            interface: Some(InterfaceType::GigabitEthernet),
        };
        assert_eq!(
            first_message(&both.validate().unwrap_err()),
            "Exactly one of [vpn, interface] must be assigned"
        );

        let neither = ZoneListEntry {
            vpn: None,
            interface: None,
        };
        assert!(neither.validate().is_err());

        let vpn_only = ZoneListEntry {
            vpn: Some("10".to_string()),
            interface: None,
        };
        assert!(vpn_only.validate().is_ok());
    }

    #[test]
    fn geo_and_app_exclusivity() {
        let geo: GeoLocationListEntry = serde_json::from_value(json!({"country": "FRA"})).unwrap();
        assert!(geo.validate().is_ok());
        let geo: GeoLocationListEntry =
            serde_json::from_value(json!({"country": "FRA", "continent": "EU"})).unwrap();
        assert!(geo.validate().is_err());

        let app: AppListEntry = serde_json::from_value(json!({"appFamily": "web"})).unwrap();
        assert!(app.validate().is_ok());
        let app: LocalAppListEntry = serde_json::from_value(json!({})).unwrap();
        assert!(app.validate().is_err());
    }

    #[test]
    fn local_domain_name_server() {
        let entry = |value: &str| LocalDomainListEntry {
            name_server: value.to_string(),
        };
        assert!(entry(".*cisco.com").validate().is_ok());
        assert!(entry("").validate().is_err());
        assert!(entry("*cisco.com").validate().is_err());
        assert!(entry("+cisco.com").validate().is_err());
        assert!(entry("cisco(.com").validate().is_err());
        assert!(entry(&"a".repeat(241)).validate().is_err());
        assert!(entry(&"a".repeat(240)).validate().is_ok());
    }

    #[test]
    fn policer_defaults_and_ranges() {
        let entry: PolicerListEntry =
            serde_json::from_value(json!({"burst": "15000", "rate": "8"})).unwrap();
        assert_eq!(entry.exceed, PolicerExceedAction::Drop);
        assert!(entry.validate().is_ok());

        let entry: PolicerListEntry = serde_json::from_value(
            json!({"burst": "14999", "exceed": "remark", "rate": "100000000001"}),
        )
        .unwrap();
        assert_eq!(entry.exceed, PolicerExceedAction::Remark);
        let err = entry.validate().unwrap_err();
        let fields = err.field_errors();
        assert!(fields.contains_key("burst"));
        assert!(fields.contains_key("rate"));
    }

    #[test]
    fn strict_networks() {
        let entry: DataPrefixListEntry =
            serde_json::from_value(json!({"ipPrefix": "10.0.0.0/8"})).unwrap();
        assert!(entry.validate().is_ok());
        let entry: DataPrefixListEntry =
            serde_json::from_value(json!({"ipPrefix": "10.0.0.1/8"})).unwrap();
        assert!(entry.validate().is_err());

        let entry: DataIpv6PrefixListEntry =
            serde_json::from_value(json!({"ipv6Prefix": "2001:db8::/32"})).unwrap();
        assert!(entry.validate().is_ok());
        let entry: DataIpv6PrefixListEntry =
            serde_json::from_value(json!({"ipv6Prefix": "2001:db8::1/32"})).unwrap();
        assert!(entry.validate().is_err());
    }

    #[test]
    fn prefix_length_bounds() {
        let entry: PrefixListEntry =
            serde_json::from_value(json!({"ipPrefix": "10.0.0.0/8", "ge": "16", "le": "32"}))
                .unwrap();
        assert!(entry.validate().is_ok());
        let entry: PrefixListEntry =
            serde_json::from_value(json!({"ipPrefix": "10.0.0.0/8", "le": "33"})).unwrap();
        assert!(entry.validate().is_err());

        let entry: Ipv6PrefixListEntry =
            serde_json::from_value(json!({"ipv6Prefix": "2001:db8::/32", "ge": "128"})).unwrap();
        assert!(entry.validate().is_ok());
        let entry: Ipv6PrefixListEntry =
            serde_json::from_value(json!({"ipv6Prefix": "2001:db8::/32", "ge": "129"})).unwrap();
        assert!(entry.validate().is_err());
    }

    #[test]
    fn sla_class_needs_a_threshold() {
        let entry: SlaClassListEntry =
            serde_json::from_value(json!({"appProbeClass": "abc"})).unwrap();
        assert!(entry.validate().is_err());

        let entry: SlaClassListEntry = serde_json::from_value(json!({
            "latency": "200",
            "appProbeClass": "abc",
            "fallbackBestTunnel": {"criteria": "loss", "lossVariance": "101"}
        }))
        .unwrap();
        assert!(entry.validate().is_err());

        let entry: SlaClassListEntry = serde_json::from_value(json!({
            "latency": "200",
            "fallbackBestTunnel": {"criteria": "loss", "lossVariance": "10"}
        }))
        .unwrap();
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn tloc_and_color_groups() {
        let tloc: TlocListEntry = serde_json::from_value(json!({
            "tloc": "10.0.0.1", "color": "blue", "encap": "gre", "preference": "4294967296"
        }))
        .unwrap();
        assert_eq!(tloc.encap, Encap::Gre);
        assert!(tloc.validate().is_err());
        assert!(serde_json::from_value::<TlocListEntry>(json!({
            "tloc": "10.0.0.1", "color": "blue", "encap": "vxlan", "preference": "1"
        }))
        .is_err());

        let pref = ColorGroupPreference {
            color_preference: "blue".to_string(),
            path_preference: PathPreference::DirectPath,
        };
        let group = PreferredColorGroupListEntry {
            primary_preference: pref.clone(),
            secondary_preference: None,
            tertiary_preference: Some(pref),
        };
        assert!(group.validate().is_err());
    }

    #[test]
    fn class_map_port_and_dscp() {
        let queue = |q: &str| ClassMapListEntry {
            queue: q.to_string(),
        };
        assert!(queue("7").validate().is_ok());
        assert!(queue("8").validate().is_err());

        let port = |p: &str| PortListEntry {
            port: p.to_string(),
        };
        assert!(port("65535").validate().is_ok());
        assert!(port("65536").validate().is_err());

        let probe = AppProbeClassListEntry {
            map: vec![ColorDscpMap {
                color: "mpls".to_string(),
                dscp: 64,
            }],
            forwarding_class: "gold".to_string(),
        };
        assert!(probe.validate().is_err());
    }
}
