//! Policy list models.
//!
//! Every list kind has a fixed `type` tag on the wire and a REST segment under
//! `/template/policy/list/`. Decoding a list whose tag does not match its kind
//! fails.

use ipnet::{Ipv4Net, Ipv6Net};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use validator::Validate;
use vmanage_core::types::InterfaceType;

use crate::list_entries::{
    AppListEntry, AppProbeClassListEntry, AsPathListEntry, ClassMapListEntry, ColorDscpMap,
    ColorGroupPreference, ColorListEntry, CommunityListEntry, DataIpv6PrefixListEntry,
    DataPrefixListEntry, Encap, FallbackBestTunnel, FqdnListEntry, GeoLocationListEntry,
    IpsSignatureListEntry, Ipv6PrefixListEntry, LocalAppListEntry, LocalDomainListEntry,
    MirrorListEntry, PolicerExceedAction, PolicerListEntry, PortListEntry,
    PreferredColorGroupListEntry, PrefixListEntry, ProtocolNameListEntry, SiteListEntry,
    SlaClassListEntry, TlocListEntry, UrlListEntry, VpnListEntry, ZoneListEntry,
};

/// Description vManage shows for lists created without one.
pub const DEFAULT_DESCRIPTION: &str = "Desc Not Required";

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

/// Behaviour shared by all policy list kinds.
pub trait PolicyList:
    Serialize + DeserializeOwned + Validate + Clone + Send + Sync + 'static
{
    /// Wire value of the `type` field.
    const TYPE: &'static str;

    /// REST segment under `/template/policy/list/`.
    const SEGMENT: &'static str;

    /// Entry type carried by the list.
    type Entry;

    /// List name.
    fn name(&self) -> &str;

    /// Entries in insertion order.
    fn entries(&self) -> &[Self::Entry];
}

macro_rules! policy_list {
    (
        $(#[$meta:meta])*
        $name:ident, $tag:ident, $entry:ty, type = $type_tag:literal, segment = $segment:literal
    ) => {
        #[doc = concat!("Wire tag `", $type_tag, "` of [`", stringify!($name), "`].")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
        pub enum $tag {
            #[doc = concat!("`", $type_tag, "`")]
            #[default]
            #[serde(rename = $type_tag)]
            Tag,
        }

        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
        pub struct $name {
            /// List name
            pub name: String,
            /// List description
            #[serde(default = "default_description")]
            pub description: String,
            /// Fixed type tag
            #[serde(rename = "type", default)]
            pub list_type: $tag,
            /// List entries
            #[serde(default)]
            #[validate(nested)]
            pub entries: Vec<$entry>,
        }

        impl $name {
            /// Create an empty list.
            #[must_use]
            pub fn new(name: impl Into<String>) -> Self {
                Self {
                    name: name.into(),
                    description: default_description(),
                    list_type: $tag::Tag,
                    entries: Vec::new(),
                }
            }

            /// Set the description.
            #[must_use]
            pub fn with_description(mut self, description: impl Into<String>) -> Self {
                self.description = description.into();
                self
            }

            /// Append a raw entry.
            pub fn push_entry(&mut self, entry: $entry) {
                self.entries.push(entry);
            }
        }

        impl PolicyList for $name {
            const TYPE: &'static str = $type_tag;
            const SEGMENT: &'static str = $segment;
            type Entry = $entry;

            fn name(&self) -> &str {
                &self.name
            }

            fn entries(&self) -> &[Self::Entry] {
                &self.entries
            }
        }
    };
}

policy_list!(
    /// Applications and application families.
    AppList, AppListType, AppListEntry, type = "app", segment = "app"
);
policy_list!(
    /// App probe classes.
    AppProbeClassList, AppProbeClassListType, AppProbeClassListEntry,
    type = "appProbe", segment = "appprobe"
);
policy_list!(
    /// BGP AS paths.
    AsPathList, AsPathListType, AsPathListEntry, type = "asPath", segment = "aspath"
);
policy_list!(
    /// QoS class maps.
    ClassMapList, ClassMapListType, ClassMapListEntry, type = "class", segment = "class"
);
policy_list!(
    /// TLOC colors.
    ColorList, ColorListType, ColorListEntry, type = "color", segment = "color"
);
policy_list!(
    /// BGP communities.
    CommunityList, CommunityListType, CommunityListEntry,
    type = "community", segment = "community"
);
policy_list!(
    /// IPv6 data prefixes.
    DataIpv6PrefixList, DataIpv6PrefixListType, DataIpv6PrefixListEntry,
    type = "dataIpv6Prefix", segment = "dataipv6prefix"
);
policy_list!(
    /// IPv4 data prefixes.
    DataPrefixList, DataPrefixListType, DataPrefixListEntry,
    type = "dataPrefix", segment = "dataprefix"
);
policy_list!(
    /// FQDN patterns.
    FqdnList, FqdnListType, FqdnListEntry, type = "fqdn", segment = "fqdn"
);
policy_list!(
    /// Countries and continents.
    GeoLocationList, GeoLocationListType, GeoLocationListEntry,
    type = "geoLocation", segment = "geolocation"
);
policy_list!(
    /// IPS signatures.
    IpsSignatureList, IpsSignatureListType, IpsSignatureListEntry,
    type = "ipsSignature", segment = "ipssignature"
);
policy_list!(
    /// IPv6 route prefixes.
    Ipv6PrefixList, Ipv6PrefixListType, Ipv6PrefixListEntry,
    type = "ipv6prefix", segment = "ipv6prefix"
);
policy_list!(
    /// Local applications.
    LocalAppList, LocalAppListType, LocalAppListEntry, type = "localApp", segment = "localapp"
);
policy_list!(
    /// Local domain name servers.
    LocalDomainList, LocalDomainListType, LocalDomainListEntry,
    type = "localDomain", segment = "localdomain"
);
policy_list!(
    /// Traffic mirrors.
    MirrorList, MirrorListType, MirrorListEntry, type = "mirror", segment = "mirror"
);
policy_list!(
    /// Policers.
    PolicerList, PolicerListType, PolicerListEntry, type = "policer", segment = "policer"
);
policy_list!(
    /// Ports.
    PortList, PortListType, PortListEntry, type = "port", segment = "port"
);
policy_list!(
    /// Preferred color groups.
    PreferredColorGroupList, PreferredColorGroupListType, PreferredColorGroupListEntry,
    type = "preferredColorGroup", segment = "preferredcolorgroup"
);
policy_list!(
    /// IPv4 route prefixes.
    PrefixList, PrefixListType, PrefixListEntry, type = "prefix", segment = "prefix"
);
policy_list!(
    /// Protocol names.
    ProtocolNameList, ProtocolNameListType, ProtocolNameListEntry,
    type = "protocolName", segment = "protocolname"
);
policy_list!(
    /// Sites.
    SiteList, SiteListType, SiteListEntry, type = "site", segment = "site"
);
policy_list!(
    /// SLA classes.
    SlaClassList, SlaClassListType, SlaClassListEntry, type = "sla", segment = "sla"
);
policy_list!(
    /// Transport locators.
    TlocList, TlocListType, TlocListEntry, type = "tloc", segment = "tloc"
);
policy_list!(
    /// Allowed URL patterns.
    UrlAllowList, UrlAllowListType, UrlListEntry,
    type = "urlWhiteList", segment = "urlwhitelist"
);
policy_list!(
    /// Blocked URL patterns.
    UrlBlockList, UrlBlockListType, UrlListEntry,
    type = "urlBlackList", segment = "urlblacklist"
);
policy_list!(
    /// VPNs.
    VpnList, VpnListType, VpnListEntry, type = "vpn", segment = "vpn"
);
policy_list!(
    /// Security zones.
    ZoneList, ZoneListType, ZoneListEntry, type = "zone", segment = "zone"
);

impl AppList {
    /// Add an application.
    pub fn add_app(&mut self, app: impl Into<String>) {
        self.entries.push(AppListEntry {
            app_family: None,
            app: Some(app.into()),
        });
    }

    /// Add an application family.
    pub fn add_app_family(&mut self, app_family: impl Into<String>) {
        self.entries.push(AppListEntry {
            app_family: Some(app_family.into()),
            app: None,
        });
    }
}

impl LocalAppList {
    /// Add an application.
    pub fn add_app(&mut self, app: impl Into<String>) {
        self.entries.push(LocalAppListEntry {
            app_family: None,
            app: Some(app.into()),
        });
    }

    /// Add an application family.
    pub fn add_app_family(&mut self, app_family: impl Into<String>) {
        self.entries.push(LocalAppListEntry {
            app_family: Some(app_family.into()),
            app: None,
        });
    }
}

impl AppProbeClassList {
    /// Set the forwarding class, keeping existing color mappings.
    pub fn assign_forwarding_class(&mut self, forwarding_class: impl Into<String>) {
        let forwarding_class = forwarding_class.into();
        match self.entries.first_mut() {
            Some(entry) => entry.forwarding_class = forwarding_class,
            None => self.entries.push(AppProbeClassListEntry {
                map: Vec::new(),
                forwarding_class,
            }),
        }
    }

    /// Map a color to a DSCP value.
    ///
    /// Creates an entry with an empty forwarding class when none exists yet.
    pub fn add_color_mapping(&mut self, color: impl Into<String>, dscp: u8) {
        let mapping = ColorDscpMap {
            color: color.into(),
            dscp,
        };
        match self.entries.first_mut() {
            Some(entry) => entry.map.push(mapping),
            None => self.entries.push(AppProbeClassListEntry {
                map: vec![mapping],
                forwarding_class: String::new(),
            }),
        }
    }
}

impl AsPathList {
    /// Add an AS path regex.
    pub fn add_as_path(&mut self, as_path: impl Into<String>) {
        self.entries.push(AsPathListEntry {
            as_path: as_path.into(),
        });
    }
}

impl ClassMapList {
    /// Set the queue, replacing any previous one.
    pub fn set_queue(&mut self, queue: u8) {
        self.entries = vec![ClassMapListEntry {
            queue: queue.to_string(),
        }];
    }
}

impl ColorList {
    /// Add a color.
    pub fn add_color(&mut self, color: impl Into<String>) {
        self.entries.push(ColorListEntry {
            color: color.into(),
        });
    }
}

impl CommunityList {
    /// Add a community.
    pub fn add_community(&mut self, community: impl Into<String>) {
        self.entries.push(CommunityListEntry {
            community: community.into(),
        });
    }
}

impl DataIpv6PrefixList {
    /// Add an IPv6 network.
    pub fn add_prefix(&mut self, prefix: Ipv6Net) {
        self.entries.push(DataIpv6PrefixListEntry {
            ipv6_prefix: prefix,
        });
    }
}

impl DataPrefixList {
    /// Add an IPv4 network.
    pub fn add_prefix(&mut self, prefix: Ipv4Net) {
        self.entries.push(DataPrefixListEntry { ip_prefix: prefix });
    }
}

impl FqdnList {
    /// Add an FQDN pattern.
    pub fn add_fqdn(&mut self, pattern: impl Into<String>) {
        self.entries.push(FqdnListEntry {
            pattern: pattern.into(),
        });
    }
}

impl GeoLocationList {
    /// Add a country (ISO-3166 alpha-3).
    pub fn add_country(&mut self, country: impl Into<String>) {
        self.entries.push(GeoLocationListEntry {
            country: Some(country.into()),
            continent: None,
        });
    }

    /// Add a continent (two letter code).
    pub fn add_continent(&mut self, continent: impl Into<String>) {
        self.entries.push(GeoLocationListEntry {
            country: None,
            continent: Some(continent.into()),
        });
    }
}

impl IpsSignatureList {
    /// Add a signature.
    pub fn add_signature(&mut self, generator_id: u32, signature_id: u32) {
        self.entries.push(IpsSignatureListEntry {
            generator_id: generator_id.to_string(),
            signature_id: signature_id.to_string(),
        });
    }
}

impl Ipv6PrefixList {
    /// Add an IPv6 prefix with optional length bounds.
    pub fn add_prefix(&mut self, prefix: Ipv6Net, ge: Option<u8>, le: Option<u8>) {
        self.entries.push(Ipv6PrefixListEntry {
            ipv6_prefix: prefix,
            ge: ge.map(|v| v.to_string()),
            le: le.map(|v| v.to_string()),
        });
    }
}

impl LocalDomainList {
    /// Add a name server regex.
    pub fn add_domain(&mut self, name_server: impl Into<String>) {
        self.entries.push(LocalDomainListEntry {
            name_server: name_server.into(),
        });
    }
}

impl MirrorList {
    /// Add a mirror destination.
    pub fn add_mirror(&mut self, remote_dest: IpAddr, source: IpAddr) {
        self.entries.push(MirrorListEntry {
            remote_dest,
            source,
        });
    }
}

impl PolicerList {
    /// Set the policer parameters, replacing any previous ones.
    pub fn set_policer(&mut self, burst: u64, exceed: PolicerExceedAction, rate: u64) {
        self.entries = vec![PolicerListEntry {
            burst: burst.to_string(),
            exceed,
            rate: rate.to_string(),
        }];
    }
}

impl PortList {
    /// Add a port.
    pub fn add_port(&mut self, port: u16) {
        self.entries.push(PortListEntry {
            port: port.to_string(),
        });
    }
}

impl PreferredColorGroupList {
    /// Set the color group preferences, replacing any previous ones.
    pub fn assign_color_groups(
        &mut self,
        primary: ColorGroupPreference,
        secondary: Option<ColorGroupPreference>,
        tertiary: Option<ColorGroupPreference>,
    ) {
        self.entries = vec![PreferredColorGroupListEntry {
            primary_preference: primary,
            secondary_preference: secondary,
            tertiary_preference: tertiary,
        }];
    }
}

impl PrefixList {
    /// Add an IPv4 prefix with optional length bounds.
    pub fn add_prefix(&mut self, prefix: Ipv4Net, ge: Option<u8>, le: Option<u8>) {
        self.entries.push(PrefixListEntry {
            ip_prefix: prefix,
            ge: ge.map(|v| v.to_string()),
            le: le.map(|v| v.to_string()),
        });
    }
}

impl ProtocolNameList {
    /// Add a protocol name.
    pub fn add_protocol_name(&mut self, protocol_name: impl Into<String>) {
        self.entries.push(ProtocolNameListEntry {
            protocol_name: protocol_name.into(),
        });
    }
}

impl SiteList {
    /// Add a single site id.
    pub fn add_site(&mut self, site_id: u32) {
        self.entries.push(SiteListEntry {
            site_id: site_id.to_string(),
        });
    }

    /// Add a site id range.
    pub fn add_site_range(&mut self, first: u32, last: u32) {
        self.entries.push(SiteListEntry {
            site_id: format!("{first}-{last}"),
        });
    }
}

impl SlaClassList {
    /// Set the referenced app probe class.
    pub fn assign_app_probe_class(&mut self, app_probe_class_id: impl Into<String>) {
        self.first_entry().app_probe_class = Some(app_probe_class_id.into());
    }

    /// Set latency (ms), loss (%) and jitter (ms) thresholds.
    pub fn add_thresholds(&mut self, latency: Option<u32>, loss: Option<u32>, jitter: Option<u32>) {
        let entry = self.first_entry();
        entry.latency = latency.map(|v| v.to_string());
        entry.loss = loss.map(|v| v.to_string());
        entry.jitter = jitter.map(|v| v.to_string());
    }

    /// Set the fallback-to-best-tunnel rule.
    pub fn set_fallback_best_tunnel(&mut self, fallback: FallbackBestTunnel) {
        self.first_entry().fallback_best_tunnel = Some(fallback);
    }

    fn first_entry(&mut self) -> &mut SlaClassListEntry {
        if self.entries.is_empty() {
            self.entries.push(SlaClassListEntry {
                latency: None,
                loss: None,
                jitter: None,
                app_probe_class: None,
                fallback_best_tunnel: None,
            });
        }
        &mut self.entries[0]
    }
}

impl TlocList {
    /// Add a TLOC.
    pub fn add_tloc(
        &mut self,
        tloc: Ipv4Addr,
        color: impl Into<String>,
        encap: Encap,
        preference: Option<u32>,
    ) {
        self.entries.push(TlocListEntry {
            tloc,
            color: color.into(),
            encap,
            preference: preference.unwrap_or_default().to_string(),
        });
    }
}

impl UrlAllowList {
    /// Add a URL pattern.
    pub fn add_url(&mut self, pattern: impl Into<String>) {
        self.entries.push(UrlListEntry {
            pattern: pattern.into(),
        });
    }
}

impl UrlBlockList {
    /// Add a URL pattern.
    pub fn add_url(&mut self, pattern: impl Into<String>) {
        self.entries.push(UrlListEntry {
            pattern: pattern.into(),
        });
    }
}

impl VpnList {
    /// Add a single VPN.
    pub fn add_vpn(&mut self, vpn: u16) {
        self.entries.push(VpnListEntry {
            vpn: vpn.to_string(),
        });
    }

    /// Add a VPN range.
    pub fn add_vpn_range(&mut self, first: u16, last: u16) {
        self.entries.push(VpnListEntry {
            vpn: format!("{first}-{last}"),
        });
    }
}

impl ZoneList {
    /// Add a VPN member.
    pub fn add_vpn(&mut self, vpn: u16) {
        self.entries.push(ZoneListEntry {
            vpn: Some(vpn.to_string()),
            interface: None,
        });
    }

    /// Add an interface member.
    pub fn add_interface(&mut self, interface: InterfaceType) {
        self.entries.push(ZoneListEntry {
            vpn: None,
            interface: Some(interface),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_entries::PathPreference;
    use serde_json::json;

    #[test]
    fn new_list_serializes_with_tag_and_default_description() {
        let mut list = VpnList::new("corp-vpns");
        list.add_vpn(10);
        list.add_vpn_range(100, 200);

        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "corp-vpns",
                "description": "Desc Not Required",
                "type": "vpn",
                "entries": [{"vpn": "10"}, {"vpn": "100-200"}]
            })
        );
        assert!(list.validate().is_ok());
    }

    #[test]
    fn wrong_type_tag_is_rejected() {
        let err = serde_json::from_value::<DataPrefixList>(json!({
            "name": "p", "type": "prefix", "entries": []
        }));
        assert!(err.is_err());

        let list: DataPrefixList = serde_json::from_value(json!({
            "name": "p", "type": "dataPrefix", "entries": [{"ipPrefix": "10.0.0.0/8"}]
        }))
        .unwrap();
        assert_eq!(list.description, DEFAULT_DESCRIPTION);
        assert_eq!(list.entries().len(), 1);
    }

    #[test]
    fn kind_constants() {
        assert_eq!(AppProbeClassList::TYPE, "appProbe");
        assert_eq!(AppProbeClassList::SEGMENT, "appprobe");
        assert_eq!(DataIpv6PrefixList::TYPE, "dataIpv6Prefix");
        assert_eq!(DataIpv6PrefixList::SEGMENT, "dataipv6prefix");
        assert_eq!(UrlAllowList::TYPE, "urlWhiteList");
        assert_eq!(UrlBlockList::SEGMENT, "urlblacklist");
    }

    #[test]
    fn nested_entry_validation() {
        let mut list = ZoneList::new("zones");
        list.add_interface(InterfaceType::GigabitEthernet);
        list.push_entry(ZoneListEntry {
            vpn: Some("1".to_string()),
            interface: Some(InterfaceType::Vlan),
        });
        assert!(list.validate().is_err());

        let mut ports = PortList::new("ports");
        ports.add_port(443);
        assert!(ports.validate().is_ok());
    }

    #[test]
    fn app_probe_builder() {
        let mut list = AppProbeClassList::new("probe").with_description("gold probe");
        list.add_color_mapping("mpls", 46);
        list.assign_forwarding_class("gold");
        list.add_color_mapping("biz-internet", 34);

        assert_eq!(list.entries.len(), 1);
        assert_eq!(list.entries[0].forwarding_class, "gold");
        assert_eq!(list.entries[0].map.len(), 2);
        assert_eq!(list.description, "gold probe");
        assert!(list.validate().is_ok());
    }

    #[test]
    fn sla_builder() {
        let mut list = SlaClassList::new("sla");
        list.assign_app_probe_class("probe-id");
        list.add_thresholds(Some(100), None, Some(30));
        list.set_fallback_best_tunnel(FallbackBestTunnel {
            criteria: "jitter-latency".to_string(),
            jitter_variance: Some("10".to_string()),
            latency_variance: Some("20".to_string()),
            loss_variance: None,
        });
        assert_eq!(list.entries.len(), 1);
        assert!(list.validate().is_ok());

        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(value["type"], "sla");
        assert_eq!(value["entries"][0]["appProbeClass"], "probe-id");
        assert_eq!(
            value["entries"][0]["fallbackBestTunnel"]["criteria"],
            "jitter-latency"
        );
    }

    #[test]
    fn preferred_color_group_builder() {
        let pref = |colors: &str| ColorGroupPreference {
            color_preference: colors.to_string(),
            path_preference: PathPreference::AllPaths,
        };
        let mut list = PreferredColorGroupList::new("colors");
        list.assign_color_groups(pref("mpls"), None, Some(pref("lte")));
        assert!(list.validate().is_err());

        list.assign_color_groups(pref("mpls"), Some(pref("biz-internet")), Some(pref("lte")));
        assert!(list.validate().is_ok());
        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(value["entries"][0]["primaryPreference"]["pathPreference"], "all-paths");
    }

    #[test]
    fn policer_and_tloc_builders() {
        let mut policer = PolicerList::new("policer");
        policer.set_policer(1000, PolicerExceedAction::Remark, 1_000_000);
        assert!(policer.validate().is_err());
        policer.set_policer(15_000, PolicerExceedAction::Remark, 1_000_000);
        assert!(policer.validate().is_ok());

        let mut tlocs = TlocList::new("tlocs");
        tlocs.add_tloc(Ipv4Addr::new(10, 0, 0, 1), "mpls", Encap::Ipsec, Some(100));
        tlocs.add_tloc(Ipv4Addr::new(10, 0, 0, 2), "lte", Encap::Gre, None);
        let value = serde_json::to_value(&tlocs).unwrap();
        assert_eq!(value["entries"][1]["preference"], "0");
        assert_eq!(value["entries"][1]["encap"], "gre");
    }

    #[test]
    fn prefix_builders() {
        let mut list = PrefixList::new("prefixes");
        list.add_prefix("10.0.0.0/8".parse().unwrap(), Some(16), None);
        list.add_prefix("192.168.1.0/24".parse().unwrap(), None, Some(33));
        assert!(list.validate().is_err());

        let mut data = DataIpv6PrefixList::new("v6");
        data.add_prefix("2001:db8::/32".parse().unwrap());
        assert!(data.validate().is_ok());
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["entries"][0]["ipv6Prefix"], "2001:db8::/32");
    }
}
