//! `cisco_vpn_interface` feature template.
//!
//! Covers the Ethernet interface of a Cisco edge device in a transport or
//! service VPN: addressing, NAT, the SD-WAN tunnel interface, adaptive QoS,
//! VRRP, ACLs and TrustSec.

use ipnet::{Ipv4Net, Ipv6Net};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};
use validator::{Validate, ValidationError};
use vmanage_core::types::{validation_error, StringBool};

use crate::device_model::DeviceModel;
use crate::feature_template::{FeatureTemplate, FieldPath};

const fn default_vrrp_priority() -> u8 {
    100
}

const fn default_vrrp_timer() -> u32 {
    1000
}

const fn default_encapsulation_weight() -> u8 {
    1
}

/// Address translation flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NatChoice {
    /// Translate to the interface address
    Interface,
    /// Translate to a pool
    Pool,
    /// Translate to a loopback address
    Loopback,
}

/// Direction of a static NAT rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaticNatDirection {
    /// Inside to outside
    #[default]
    Inside,
    /// Outside to inside
    Outside,
}

/// Transport protocol of a port forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Proto {
    /// TCP
    Tcp,
    /// UDP
    Udp,
}

/// Multi-region fabric core role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoreRegion {
    /// Core only
    Core,
    /// Shared between core and access
    CoreShared,
}

/// Multi-region fabric secondary region role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecondaryRegion {
    /// Not part of a secondary region
    Off,
    /// Secondary region only
    SecondaryOnly,
    /// Shared with the secondary region
    SecondaryShared,
}

/// Tunnel encapsulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encap {
    /// GRE
    Gre,
    /// IPsec
    Ipsec,
}

/// Tunnel interface mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Hub
    Hub,
    /// Spoke
    Spoke,
}

/// TLOC color of the tunnel interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Color {
    /// `default`
    Default,
    /// `mpls`
    Mpls,
    /// `metro-ethernet`
    MetroEthernet,
    /// `biz-internet`
    BizInternet,
    /// `public-internet`
    PublicInternet,
    /// `lte`
    Lte,
    /// `3g`
    #[serde(rename = "3g")]
    ThreeG,
    /// `red`
    Red,
    /// `green`
    Green,
    /// `blue`
    Blue,
    /// `gold`
    Gold,
    /// `silver`
    Silver,
    /// `bronze`
    Bronze,
    /// `custom1`
    Custom1,
    /// `custom2`
    Custom2,
    /// `custom3`
    Custom3,
    /// `private1`
    Private1,
    /// `private2`
    Private2,
    /// `private3`
    Private3,
    /// `private4`
    Private4,
    /// `private5`
    Private5,
    /// `private6`
    Private6,
}

/// Color values as named on the wire.
pub type Value = Color;

/// Carrier of the tunnel interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Carrier {
    /// `default`
    Default,
    /// `carrier1`
    Carrier1,
    /// `carrier2`
    Carrier2,
    /// `carrier3`
    Carrier3,
    /// `carrier4`
    Carrier4,
    /// `carrier5`
    Carrier5,
    /// `carrier6`
    Carrier6,
    /// `carrier7`
    Carrier7,
    /// `carrier8`
    Carrier8,
}

/// Physical media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaType {
    /// Auto-select
    AutoSelect,
    /// Copper
    Rj45,
    /// Fibre
    Sfp,
}

/// Interface speed in Mbps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speed {
    /// 10 Mbps
    #[serde(rename = "10")]
    Ten,
    /// 100 Mbps
    #[serde(rename = "100")]
    Hundred,
    /// 1 Gbps
    #[serde(rename = "1000")]
    Thousand,
    /// 2.5 Gbps
    #[serde(rename = "2500")]
    TwoAndAHalfThousand,
    /// 10 Gbps
    #[serde(rename = "10000")]
    TenThousand,
}

/// Duplex mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Duplex {
    /// Full duplex
    Full,
    /// Half duplex
    Half,
    /// Negotiated
    Auto,
}

/// ACL direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ingress
    In,
    /// Egress
    Out,
}

/// What a VRRP tracker does when the tracked object goes down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackAction {
    /// Lower the priority
    #[default]
    Decrement,
    /// Leave the group
    Shutdown,
}

/// Secondary IPv4 address with prefix length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SecondaryIpv4Address {
    /// Address and prefix length
    pub address: Ipv4Net,
}

/// Secondary IPv6 address with prefix length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SecondaryIpv6Address {
    /// Address and prefix length
    pub address: Ipv6Net,
}

/// ACL bound to the interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct AccessList {
    /// Direction the ACL applies to
    pub direction: Direction,
    /// ACL name
    #[validate(length(min = 1, max = 127))]
    pub acl_name: String,
}

impl AccessList {
    /// Bind `acl_name` in `direction`.
    #[must_use]
    pub fn new(direction: Direction, acl_name: impl Into<String>) -> Self {
        Self {
            direction,
            acl_name: acl_name.into(),
        }
    }
}

/// DHCPv6 relay target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DhcpHelperV6 {
    /// Server address
    pub address: Ipv6Addr,
    /// VPN of the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(max = 65530))]
    pub vpn: Option<u16>,
}

/// Static NAT66 prefix translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct StaticNat66 {
    /// Source prefix
    pub source_prefix: Ipv6Net,
    /// Translated prefix
    pub translated_source_prefix: String,
    /// Source VPN
    #[serde(default)]
    #[validate(range(max = 65530))]
    pub source_vpn_id: u16,
}

/// Static one-to-one NAT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct StaticNat {
    /// Address to translate
    pub source_ip: Ipv4Addr,
    /// Translated address
    pub translate_ip: Ipv4Addr,
    /// Rule direction
    #[serde(default)]
    pub static_nat_direction: StaticNatDirection,
    /// Source VPN
    #[serde(default)]
    #[validate(range(max = 65530))]
    pub source_vpn: u16,
}

impl StaticNat {
    /// Translate `source_ip` to `translate_ip` inside to outside.
    #[must_use]
    pub fn new(source_ip: Ipv4Addr, translate_ip: Ipv4Addr) -> Self {
        Self {
            source_ip,
            translate_ip,
            static_nat_direction: StaticNatDirection::default(),
            source_vpn: 0,
        }
    }
}

/// Static port forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct StaticPortForward {
    /// Address to translate
    pub source_ip: Ipv4Addr,
    /// Translated address
    pub translate_ip: Ipv4Addr,
    /// Rule direction
    #[serde(default)]
    pub static_nat_direction: StaticNatDirection,
    /// Port to translate
    #[serde(default)]
    pub source_port: u16,
    /// Translated port
    #[serde(default)]
    pub translate_port: u16,
    /// Protocol
    pub proto: Proto,
    /// Source VPN
    #[serde(default)]
    #[validate(range(max = 65530))]
    pub source_vpn: u16,
}

/// Tunnel encapsulation with its TLOC preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Encapsulation {
    /// Encapsulation
    pub encap: Encap,
    /// TLOC preference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preference: Option<u32>,
    /// Load-balancing weight
    #[serde(default = "default_encapsulation_weight")]
    #[validate(range(min = 1, max = 255))]
    pub weight: u8,
}

impl Encapsulation {
    /// `encap` with the default weight.
    #[must_use]
    pub const fn new(encap: Encap) -> Self {
        Self {
            encap,
            preference: None,
            weight: default_encapsulation_weight(),
        }
    }
}

/// Static ARP entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ArpEntry {
    /// IPv4 address
    pub addr: Ipv4Addr,
    /// MAC address
    #[validate(custom(function = "check_mac"))]
    pub mac: String,
}

/// VRRP secondary address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Ipv4Secondary {
    /// Address
    pub address: Ipv4Addr,
}

/// Object tracked by a VRRP group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct TrackingObject {
    /// Tracker id
    #[validate(range(min = 1, max = 1000))]
    pub name: u32,
    /// Action when the object goes down
    #[serde(default)]
    pub track_action: TrackAction,
    /// Priority decrement
    #[validate(range(min = 1, max = 255))]
    pub decrement: u8,
}

/// IPv4 VRRP group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct Vrrp {
    /// Group id
    #[validate(range(min = 1, max = 255))]
    pub grp_id: u8,
    /// Router priority
    #[serde(default = "default_vrrp_priority")]
    #[validate(range(min = 1, max = 254))]
    pub priority: u8,
    /// Advertisement timer in milliseconds
    #[serde(default = "default_vrrp_timer")]
    #[validate(range(min = 100, max = 40950))]
    pub timer: u32,
    /// Track OMP sessions
    #[serde(default)]
    pub track_omp: StringBool,
    /// Tracked prefix list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_prefix_list: Option<String>,
    /// Virtual address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Ipv4Addr>,
    /// Secondary virtual addresses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub ipv4_secondary: Option<Vec<Ipv4Secondary>>,
    /// Change TLOC preference on failover
    #[serde(default)]
    pub tloc_change_pref: StringBool,
    /// TLOC preference change value
    #[validate(range(min = 1))]
    pub value: u32,
    /// Tracked objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub tracking_object: Option<Vec<TrackingObject>>,
}

impl Vrrp {
    /// Group `grp_id` with the default priority and timer.
    #[must_use]
    pub const fn new(grp_id: u8, value: u32) -> Self {
        Self {
            grp_id,
            priority: default_vrrp_priority(),
            timer: default_vrrp_timer(),
            track_omp: StringBool::False,
            track_prefix_list: None,
            address: None,
            ipv4_secondary: None,
            tloc_change_pref: StringBool::False,
            value,
            tracking_object: None,
        }
    }

    /// Set the virtual address.
    #[must_use]
    pub const fn with_address(mut self, address: Ipv4Addr) -> Self {
        self.address = Some(address);
        self
    }

    /// Set the router priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }
}

/// IPv6 VRRP virtual address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct Ipv6VrrpAddress {
    /// Link-local address
    pub ipv6_link_local: Ipv6Addr,
    /// Global prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<Ipv6Net>,
}

/// IPv6 VRRP group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct Ipv6Vrrp {
    /// Group id
    #[validate(range(min = 1, max = 255))]
    pub grp_id: u8,
    /// Router priority
    #[serde(default = "default_vrrp_priority")]
    #[validate(range(min = 1, max = 254))]
    pub priority: u8,
    /// Advertisement timer in milliseconds
    #[serde(default = "default_vrrp_timer")]
    #[validate(range(min = 100, max = 40950))]
    pub timer: u32,
    /// Track OMP sessions
    #[serde(default)]
    pub track_omp: StringBool,
    /// Tracked prefix list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_prefix_list: Option<String>,
    /// Virtual addresses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub ipv6: Option<Vec<Ipv6VrrpAddress>>,
}

impl Ipv6Vrrp {
    /// Group `grp_id` with the default priority and timer.
    #[must_use]
    pub const fn new(grp_id: u8) -> Self {
        Self {
            grp_id,
            priority: default_vrrp_priority(),
            timer: default_vrrp_timer(),
            track_omp: StringBool::False,
            track_prefix_list: None,
            ipv6: None,
        }
    }
}

/// Cisco VPN interface (Ethernet) feature template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "kebab-case")]
#[validate(schema(function = "check_interface"))]
pub struct CiscoVpnInterfaceModel {
    /// Template name
    #[serde(skip)]
    pub template_name: String,
    /// Template description
    #[serde(skip)]
    pub template_description: String,
    /// Device models the template applies to
    #[serde(skip)]
    pub device_models: Vec<DeviceModel>,

    /// Interface name, e.g. `GigabitEthernet1`
    #[validate(length(min = 1, max = 32))]
    pub if_name: String,
    /// Interface description
    pub description: Option<String>,
    /// Power over Ethernet
    pub poe: Option<StringBool>,
    /// Static IPv4 address
    pub ipv4_address: Option<Ipv4Net>,
    /// Secondary IPv4 addresses
    #[validate(nested, length(max = 4))]
    pub secondary_ipv4_address: Option<Vec<SecondaryIpv4Address>>,
    /// Obtain the IPv4 address over DHCP
    pub dhcp_ipv4_client: Option<StringBool>,
    /// Administrative distance of DHCP routes
    #[validate(range(min = 1, max = 255))]
    pub dhcp_distance: Option<u8>,
    /// Static IPv6 address
    pub ipv6_address: Option<Ipv6Net>,
    /// Obtain the IPv6 address over DHCP
    pub dhcp_ipv6_client: Option<StringBool>,
    /// Secondary IPv6 addresses
    #[validate(nested, length(max = 2))]
    pub secondary_ipv6_address: Option<Vec<SecondaryIpv6Address>>,
    /// IPv4 ACLs
    #[validate(nested)]
    pub access_list_ipv4: Option<Vec<AccessList>>,
    /// DHCP relay servers
    #[validate(length(max = 8))]
    pub dhcp_helper: Option<Vec<Ipv4Addr>>,
    /// DHCPv6 relay servers
    #[validate(nested)]
    pub dhcp_helper_v6: Option<Vec<DhcpHelperV6>>,
    /// Trackers bound to the interface
    pub tracker: Option<Vec<String>>,
    /// Detect bandwidth automatically
    pub auto_bandwidth_detect: Option<StringBool>,
    /// iPerf server used for bandwidth detection
    pub iperf_server: Option<Ipv4Addr>,

    /// Enable NAT
    pub nat: Option<bool>,
    /// NAT flavour
    pub nat_choice: Option<NatChoice>,
    /// UDP session timeout in minutes
    #[validate(range(min = 1, max = 8947))]
    pub udp_timeout: Option<u32>,
    /// TCP session timeout in minutes
    #[validate(range(min = 1, max = 8947))]
    pub tcp_timeout: Option<u32>,
    /// First pool address
    pub nat_range_start: Option<Ipv4Addr>,
    /// Last pool address
    pub nat_range_end: Option<Ipv4Addr>,
    /// Port address translation
    pub overload: Option<StringBool>,
    /// Loopback interface used for NAT
    pub loopback_interface: Option<String>,
    /// Pool prefix length
    #[validate(range(min = 1, max = 32))]
    pub prefix_length: Option<u8>,
    /// Enable translation
    pub enable: Option<StringBool>,
    /// NAT64
    pub nat64: Option<StringBool>,
    /// NAT66
    pub nat66: Option<StringBool>,
    /// Static NAT66 translations
    #[validate(nested)]
    pub static_nat66: Option<Vec<StaticNat66>>,
    /// Static NAT translations
    #[serde(rename = "static")]
    #[validate(nested)]
    pub static_nat: Option<Vec<StaticNat>>,
    /// Static port forwards
    #[validate(nested)]
    pub static_port_forward: Option<Vec<StaticPortForward>>,

    /// Participate in the core region
    pub enable_core_region: Option<StringBool>,
    /// Core region role
    pub core_region: Option<CoreRegion>,
    /// Secondary region role
    pub secondary_region: Option<SecondaryRegion>,
    /// Tunnel encapsulations
    #[validate(nested, length(min = 1, max = 2))]
    pub tloc_encapsulation: Option<Vec<Encapsulation>>,
    /// Border TLOC
    pub border: Option<StringBool>,
    /// Per-tunnel QoS
    pub per_tunnel_qos: Option<StringBool>,
    /// Per-tunnel QoS aggregator
    pub per_tunnel_qos_aggregator: Option<StringBool>,
    /// Hub or spoke
    pub mode: Option<Mode>,
    /// Tunnel bandwidth percentage
    #[validate(range(min = 1, max = 100))]
    pub tunnels_bandwidth: Option<u8>,
    /// Restrict to these controller groups
    pub group: Option<Vec<u32>>,
    /// TLOC color
    pub value: Option<Color>,
    /// Maximum control connections
    #[validate(range(max = 100))]
    pub max_control_connections: Option<u8>,
    /// Establish control connections
    pub control_connections: Option<StringBool>,
    /// Use vBond as STUN server
    pub vbond_as_stun_server: Option<StringBool>,
    /// Controller groups to exclude
    pub exclude_controller_group_list: Option<Vec<u32>>,
    /// vManage connection preference
    #[validate(range(max = 8))]
    pub vmanage_connection_preference: Option<u8>,
    /// Port hopping
    pub port_hop: Option<StringBool>,
    /// Restrict the color to matching colors
    pub restrict: Option<StringBool>,
    /// GRE tunnel destination for a TLOC extension
    pub dst_ip: Option<Ipv4Addr>,
    /// Carrier
    pub carrier: Option<Carrier>,
    /// NAT refresh interval in seconds
    #[validate(range(min = 1, max = 60))]
    pub nat_refresh_interval: Option<u8>,
    /// Hello interval in milliseconds
    #[validate(range(min = 100, max = 600_000))]
    pub hello_interval: Option<u32>,
    /// Hello tolerance in seconds
    #[validate(range(min = 12, max = 6000))]
    pub hello_tolerance: Option<u32>,
    /// Bind the tunnel to this loopback
    pub bind: Option<String>,
    /// Last resort circuit
    pub last_resort_circuit: Option<StringBool>,
    /// Low bandwidth link
    pub low_bandwidth_link: Option<StringBool>,
    /// Tunnel TCP MSS
    #[validate(range(min = 500, max = 1460))]
    pub tunnel_tcp_mss_adjust: Option<u16>,
    /// Clear the DF bit
    pub clear_dont_fragment: Option<StringBool>,
    /// Propagate SGT over the tunnel
    pub propagate_sgt: Option<StringBool>,
    /// Network broadcast
    pub network_broadcast: Option<StringBool>,
    /// Allow all services
    pub all: Option<StringBool>,
    /// Allow BGP
    pub bgp: Option<StringBool>,
    /// Allow DHCP
    pub dhcp: Option<StringBool>,
    /// Allow DNS
    pub dns: Option<StringBool>,
    /// Allow ICMP
    pub icmp: Option<StringBool>,
    /// Allow SSH
    pub sshd: Option<StringBool>,
    /// Allow NETCONF
    pub netconf: Option<StringBool>,
    /// Allow NTP
    pub ntp: Option<StringBool>,
    /// Allow OSPF
    pub ospf: Option<StringBool>,
    /// Allow STUN
    pub stun: Option<StringBool>,
    /// Allow SNMP
    pub snmp: Option<StringBool>,
    /// Allow HTTPS
    pub https: Option<StringBool>,

    /// Physical media
    pub media_type: Option<MediaType>,
    /// Interface MTU
    #[validate(range(min = 1500, max = 9216))]
    pub intrf_mtu: Option<u16>,
    /// IP MTU
    #[validate(range(min = 576, max = 9216))]
    pub mtu: Option<u16>,
    /// TCP MSS
    #[validate(range(min = 500, max = 1460))]
    pub tcp_mss_adjust: Option<u16>,
    /// TLOC extension interface
    pub tloc_extension: Option<String>,
    /// Load interval in seconds
    #[validate(range(min = 30, max = 600))]
    pub load_interval: Option<u16>,
    /// GRE tunnel source for a TLOC extension
    pub src_ip: Option<Ipv4Addr>,
    /// GRE tunnel source interface for a TLOC extension
    pub xconnect: Option<String>,
    /// MAC address
    #[validate(custom(function = "check_mac"))]
    pub mac_address: Option<String>,
    /// Speed
    pub speed: Option<Speed>,
    /// Duplex
    pub duplex: Option<Duplex>,
    /// Administratively down
    pub shutdown: Option<StringBool>,
    /// ARP timeout in seconds
    #[validate(range(max = 2_147_483))]
    pub arp_timeout: Option<u32>,
    /// Autonegotiation
    pub autonegotiate: Option<StringBool>,
    /// IP directed broadcast
    pub ip_directed_broadcast: Option<StringBool>,
    /// Disable ICMP redirects
    pub icmp_redirect_disable: Option<StringBool>,

    /// Adaptive QoS
    pub qos_adaptive: Option<StringBool>,
    /// Adaptation period in minutes
    #[validate(range(min = 1, max = 720))]
    pub period: Option<u16>,
    /// Default downstream bandwidth in kbps
    pub bandwidth_down: Option<u32>,
    /// Minimum downstream bandwidth in kbps
    pub dmin: Option<u32>,
    /// Maximum downstream bandwidth in kbps
    pub dmax: Option<u32>,
    /// Default upstream bandwidth in kbps
    pub bandwidth_up: Option<u32>,
    /// Minimum upstream bandwidth in kbps
    pub umin: Option<u32>,
    /// Maximum upstream bandwidth in kbps
    pub umax: Option<u32>,
    /// Shaping rate in kbps
    pub shaping_rate: Option<u32>,
    /// QoS map
    pub qos_map: Option<String>,
    /// VPN QoS map
    pub qos_map_vpn: Option<String>,
    /// Service provider
    pub service_provider: Option<String>,
    /// Upstream bandwidth in kbps
    pub bandwidth_upstream: Option<u32>,
    /// Downstream bandwidth in kbps
    pub bandwidth_downstream: Option<u32>,
    /// Drop packets whose source is not on the subnet
    pub block_non_source_ip: Option<StringBool>,
    /// Rewrite rule
    pub rule_name: Option<String>,
    /// IPv6 ACLs
    #[validate(nested)]
    pub access_list_ipv6: Option<Vec<AccessList>>,
    /// Static ARP entries
    #[validate(nested)]
    pub ip: Option<Vec<ArpEntry>>,
    /// IPv4 VRRP groups
    #[validate(nested)]
    pub vrrp: Option<Vec<Vrrp>>,
    /// IPv6 VRRP groups
    #[validate(nested)]
    pub ipv6_vrrp: Option<Vec<Ipv6Vrrp>>,

    /// Propagate SGT
    pub enable_sgt_propagation: Option<StringBool>,
    /// Static SGT
    #[validate(range(min = 2, max = 65519))]
    pub sgt: Option<u32>,
    /// Trust incoming SGT
    pub trusted: Option<StringBool>,
    /// SGT authorization and forwarding
    pub enable_sgt_authorization_and_forwarding: Option<StringBool>,
    /// SGT enforcement
    pub enable_sgt_enforcement: Option<StringBool>,
    /// Enforcement SGT
    #[validate(range(min = 2, max = 65519))]
    pub enforcement_sgt: Option<u32>,
}

impl CiscoVpnInterfaceModel {
    /// Interface template for `if_name` that is administratively up.
    #[must_use]
    pub fn new(
        template_name: impl Into<String>,
        template_description: impl Into<String>,
        if_name: impl Into<String>,
    ) -> Self {
        Self {
            template_name: template_name.into(),
            template_description: template_description.into(),
            if_name: if_name.into(),
            shutdown: Some(StringBool::False),
            ..Self::default()
        }
    }

    /// Apply the template to `models`.
    #[must_use]
    pub fn with_device_models(mut self, models: impl IntoIterator<Item = DeviceModel>) -> Self {
        self.device_models = models.into_iter().collect();
        self
    }

    /// Use a static IPv4 address.
    #[must_use]
    pub fn with_ipv4_address(mut self, address: Ipv4Net) -> Self {
        self.ipv4_address = Some(address);
        self.dhcp_ipv4_client = None;
        self
    }

    /// Obtain the IPv4 address over DHCP.
    #[must_use]
    pub fn with_dhcp_client(mut self) -> Self {
        self.ipv4_address = None;
        self.dhcp_ipv4_client = Some(StringBool::True);
        self
    }

    /// Make the interface an SD-WAN tunnel interface with `color`.
    #[must_use]
    pub fn with_tunnel(mut self, color: Color, encapsulation: Encap) -> Self {
        self.value = Some(color);
        self.tloc_encapsulation = Some(vec![Encapsulation::new(encapsulation)]);
        self
    }

    /// Allow a service over the tunnel.
    #[must_use]
    pub fn allow_service(mut self, service: AllowedService) -> Self {
        let slot = match service {
            AllowedService::All => &mut self.all,
            AllowedService::Bgp => &mut self.bgp,
            AllowedService::Dhcp => &mut self.dhcp,
            AllowedService::Dns => &mut self.dns,
            AllowedService::Icmp => &mut self.icmp,
            AllowedService::Sshd => &mut self.sshd,
            AllowedService::Netconf => &mut self.netconf,
            AllowedService::Ntp => &mut self.ntp,
            AllowedService::Ospf => &mut self.ospf,
            AllowedService::Stun => &mut self.stun,
            AllowedService::Snmp => &mut self.snmp,
            AllowedService::Https => &mut self.https,
        };
        *slot = Some(StringBool::True);
        self
    }

    /// Translate to the interface address.
    #[must_use]
    pub fn with_interface_nat(mut self) -> Self {
        self.nat = Some(true);
        self.nat_choice = Some(NatChoice::Interface);
        self
    }

    /// Translate to the pool `start..=end`.
    #[must_use]
    pub fn with_nat_pool(mut self, start: Ipv4Addr, end: Ipv4Addr, prefix_length: u8) -> Self {
        self.nat = Some(true);
        self.nat_choice = Some(NatChoice::Pool);
        self.nat_range_start = Some(start);
        self.nat_range_end = Some(end);
        self.prefix_length = Some(prefix_length);
        self
    }

    /// Add a static NAT translation.
    #[must_use]
    pub fn add_static_nat(mut self, entry: StaticNat) -> Self {
        self.static_nat.get_or_insert_with(Vec::new).push(entry);
        self
    }

    /// Bind an IPv4 ACL.
    #[must_use]
    pub fn add_access_list(mut self, direction: Direction, acl_name: impl Into<String>) -> Self {
        self.access_list_ipv4
            .get_or_insert_with(Vec::new)
            .push(AccessList::new(direction, acl_name));
        self
    }

    /// Add an IPv4 VRRP group.
    #[must_use]
    pub fn add_vrrp(mut self, group: Vrrp) -> Self {
        self.vrrp.get_or_insert_with(Vec::new).push(group);
        self
    }

    /// Set the IP MTU.
    #[must_use]
    pub const fn with_mtu(mut self, mtu: u16) -> Self {
        self.mtu = Some(mtu);
        self
    }
}

/// Services that can be allowed over a tunnel interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllowedService {
    /// Every service
    All,
    /// BGP
    Bgp,
    /// DHCP
    Dhcp,
    /// DNS
    Dns,
    /// ICMP
    Icmp,
    /// SSH
    Sshd,
    /// NETCONF
    Netconf,
    /// NTP
    Ntp,
    /// OSPF
    Ospf,
    /// STUN
    Stun,
    /// SNMP
    Snmp,
    /// HTTPS
    Https,
}

const TUNNEL: &[&str] = &["tunnel-interface"];
const ALLOW_SERVICE: &[&str] = &["tunnel-interface", "allow-service"];
const NATPOOL: &[&str] = &["nat", "natpool"];

impl FeatureTemplate for CiscoVpnInterfaceModel {
    const TEMPLATE_TYPE: &'static str = "cisco_vpn_interface";

    const FIELD_PATHS: &'static [FieldPath] = &[
        FieldPath::new("ipv4-address", &["ip"]).with_key("address"),
        FieldPath::new("secondary-ipv4-address", &["ip"]).with_key("secondary-address"),
        FieldPath::new("dhcp-ipv4-client", &["ip"]).with_key("dhcp-client"),
        FieldPath::new("dhcp-distance", &["ip"]),
        FieldPath::new("ipv6-address", &["ipv6"]).with_key("address"),
        FieldPath::new("dhcp-ipv6-client", &["ipv6"]).with_key("dhcp-client"),
        FieldPath::new("secondary-ipv6-address", &["ipv6"]).with_key("secondary-address"),
        FieldPath::new("access-list-ipv6", &["ipv6"]).with_key("access-list"),
        FieldPath::new("dhcp-helper-v6", &["ipv6"]),
        FieldPath::new("access-list-ipv4", &[]).with_key("access-list"),
        FieldPath::new("nat-choice", &["nat"]),
        FieldPath::new("udp-timeout", &["nat"]),
        FieldPath::new("tcp-timeout", &["nat"]),
        FieldPath::new("loopback-interface", &["nat"]),
        FieldPath::new("static", &["nat"]),
        FieldPath::new("static-port-forward", &["nat"]),
        FieldPath::new("nat-range-start", NATPOOL).with_key("range-start"),
        FieldPath::new("nat-range-end", NATPOOL).with_key("range-end"),
        FieldPath::new("overload", NATPOOL),
        FieldPath::new("prefix-length", NATPOOL),
        FieldPath::new("static-nat66", &["nat66"]),
        FieldPath::new("tloc-encapsulation", TUNNEL).with_key("encapsulation"),
        FieldPath::new("border", TUNNEL),
        FieldPath::new("per-tunnel-qos", TUNNEL),
        FieldPath::new("per-tunnel-qos-aggregator", TUNNEL),
        FieldPath::new("mode", TUNNEL),
        FieldPath::new("tunnels-bandwidth", TUNNEL),
        FieldPath::new("group", TUNNEL),
        FieldPath::new("max-control-connections", TUNNEL),
        FieldPath::new("control-connections", TUNNEL),
        FieldPath::new("vbond-as-stun-server", TUNNEL),
        FieldPath::new("exclude-controller-group-list", TUNNEL),
        FieldPath::new("vmanage-connection-preference", TUNNEL),
        FieldPath::new("port-hop", TUNNEL),
        FieldPath::new("carrier", TUNNEL),
        FieldPath::new("nat-refresh-interval", TUNNEL),
        FieldPath::new("hello-interval", TUNNEL),
        FieldPath::new("hello-tolerance", TUNNEL),
        FieldPath::new("bind", TUNNEL),
        FieldPath::new("last-resort-circuit", TUNNEL),
        FieldPath::new("low-bandwidth-link", TUNNEL),
        FieldPath::new("tunnel-tcp-mss-adjust", TUNNEL),
        FieldPath::new("clear-dont-fragment", TUNNEL),
        FieldPath::new("propagate-sgt", TUNNEL),
        FieldPath::new("network-broadcast", TUNNEL),
        FieldPath::new("value", &["tunnel-interface", "color"]),
        FieldPath::new("restrict", &["tunnel-interface", "color"]),
        FieldPath::new("dst-ip", &["tunnel-interface", "tloc-extension-gre-to"]),
        FieldPath::new("enable-core-region", &["tunnel-interface", "multi-region-fabric"]),
        FieldPath::new("core-region", &["tunnel-interface", "multi-region-fabric"]),
        FieldPath::new("secondary-region", &["tunnel-interface", "multi-region-fabric"]),
        FieldPath::new("all", ALLOW_SERVICE),
        FieldPath::new("bgp", ALLOW_SERVICE),
        FieldPath::new("dhcp", ALLOW_SERVICE),
        FieldPath::new("dns", ALLOW_SERVICE),
        FieldPath::new("icmp", ALLOW_SERVICE),
        FieldPath::new("sshd", ALLOW_SERVICE),
        FieldPath::new("netconf", ALLOW_SERVICE),
        FieldPath::new("ntp", ALLOW_SERVICE),
        FieldPath::new("ospf", ALLOW_SERVICE),
        FieldPath::new("stun", ALLOW_SERVICE),
        FieldPath::new("snmp", ALLOW_SERVICE),
        FieldPath::new("https", ALLOW_SERVICE),
        FieldPath::new("src-ip", &["tloc-extension-gre-from"]),
        FieldPath::new("xconnect", &["tloc-extension-gre-from"]),
        FieldPath::new("period", &["qos-adaptive"]),
        FieldPath::new("bandwidth-down", &["qos-adaptive", "downstream"]),
        FieldPath::new("dmin", &["qos-adaptive", "downstream", "range"]),
        FieldPath::new("dmax", &["qos-adaptive", "downstream", "range"]),
        FieldPath::new("bandwidth-up", &["qos-adaptive", "upstream"]),
        FieldPath::new("umin", &["qos-adaptive", "upstream", "range"]),
        FieldPath::new("umax", &["qos-adaptive", "upstream", "range"]),
        FieldPath::new("ip", &["arp"]),
        FieldPath::new("enable-sgt-propagation", &["trustsec", "propagate"]).with_key("sgt"),
        FieldPath::new("sgt", &["trustsec", "static"]),
        FieldPath::new("trusted", &["trustsec", "static"]),
        FieldPath::new("enable-sgt-authorization-and-forwarding", &["trustsec"])
            .with_key("enable"),
        FieldPath::new("enable-sgt-enforcement", &["trustsec", "enforcement"]).with_key("enable"),
        FieldPath::new("enforcement-sgt", &["trustsec", "enforcement"]).with_key("sgt"),
    ];

    fn template_name(&self) -> &str {
        &self.template_name
    }

    fn template_description(&self) -> &str {
        &self.template_description
    }

    fn device_models(&self) -> &[DeviceModel] {
        &self.device_models
    }
}

fn check_mac(mac: &str) -> Result<(), ValidationError> {
    let colon = mac.split(':').collect::<Vec<_>>();
    let dotted = mac.split('.').collect::<Vec<_>>();
    let hex = |group: &str, len: usize| {
        group.len() == len && group.chars().all(|c| c.is_ascii_hexdigit())
    };

    let valid = (colon.len() == 6 && colon.iter().all(|group| hex(group, 2)))
        || (dotted.len() == 3 && dotted.iter().all(|group| hex(group, 4)));
    if valid {
        Ok(())
    } else {
        Err(validation_error(
            "mac_address",
            format!("{mac} is not a MAC address"),
        ))
    }
}

fn check_range(min: Option<u32>, max: Option<u32>, label: &str) -> Result<(), ValidationError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(validation_error(
            "range_order",
            format!("{label} minimum {min} exceeds maximum {max}"),
        )),
        _ => Ok(()),
    }
}

fn check_interface(model: &CiscoVpnInterfaceModel) -> Result<(), ValidationError> {
    if model.ipv4_address.is_some() && model.dhcp_ipv4_client == Some(StringBool::True) {
        return Err(validation_error(
            "address_source",
            "ipv4-address cannot be combined with dhcp-client",
        ));
    }

    match model.nat_choice {
        Some(NatChoice::Pool) => {
            let (Some(start), Some(end)) = (model.nat_range_start, model.nat_range_end) else {
                return Err(validation_error(
                    "nat_pool",
                    "Pool NAT requires range-start and range-end",
                ));
            };
            if start > end {
                return Err(validation_error(
                    "nat_pool",
                    format!("NAT pool start {start} is after end {end}"),
                ));
            }
        }
        Some(NatChoice::Loopback) if model.loopback_interface.is_none() => {
            return Err(validation_error(
                "nat_loopback",
                "Loopback NAT requires loopback-interface",
            ));
        }
        _ => {}
    }

    check_range(model.dmin, model.dmax, "Downstream bandwidth")?;
    check_range(model.umin, model.umax, "Upstream bandwidth")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn first_message(model: &CiscoVpnInterfaceModel) -> String {
        let errors = model.validate().unwrap_err();
        errors
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|error| error.message.as_ref().map(ToString::to_string))
            .unwrap_or_default()
    }

    fn wan_interface() -> CiscoVpnInterfaceModel {
        CiscoVpnInterfaceModel::new("wan-if", "Internet uplink", "GigabitEthernet1")
            .with_device_models([DeviceModel::VedgeC8000V])
            .with_ipv4_address("203.0.113.10/29".parse().unwrap())
            .with_tunnel(Color::BizInternet, Encap::Ipsec)
            .allow_service(AllowedService::Icmp)
            .allow_service(AllowedService::Https)
            .with_interface_nat()
            .with_mtu(1500)
    }

    #[test]
    fn nested_defaults() {
        let vrrp: Vrrp = serde_json::from_value(json!({"grp-id": 1, "value": 10})).unwrap();
        assert_eq!(vrrp.priority, 100);
        assert_eq!(vrrp.timer, 1000);
        assert_eq!(vrrp.track_omp, StringBool::False);

        let nat: StaticNat = serde_json::from_value(json!({
            "source-ip": "10.0.0.5",
            "translate-ip": "203.0.113.5"
        }))
        .unwrap();
        assert_eq!(nat.static_nat_direction, StaticNatDirection::Inside);
        assert_eq!(nat.source_vpn, 0);

        let encapsulation: Encapsulation = serde_json::from_value(json!({"encap": "gre"})).unwrap();
        assert_eq!(encapsulation.weight, 1);

        let tracker: TrackingObject =
            serde_json::from_value(json!({"name": 1, "decrement": 10})).unwrap();
        assert_eq!(tracker.track_action, TrackAction::Decrement);
    }

    #[test]
    fn enum_wire_values() {
        assert_eq!(serde_json::to_value(Color::ThreeG).unwrap(), "3g");
        assert_eq!(serde_json::to_value(Color::BizInternet).unwrap(), "biz-internet");
        assert_eq!(serde_json::to_value(Speed::TwoAndAHalfThousand).unwrap(), "2500");
        assert_eq!(serde_json::to_value(NatChoice::Loopback).unwrap(), "Loopback");
        assert_eq!(serde_json::to_value(CoreRegion::CoreShared).unwrap(), "core-shared");
        assert_eq!(
            serde_json::to_value(SecondaryRegion::SecondaryOnly).unwrap(),
            "secondary-only"
        );
        assert_eq!(serde_json::to_value(MediaType::AutoSelect).unwrap(), "auto-select");
        assert_eq!(serde_json::to_value(TrackAction::Shutdown).unwrap(), "Shutdown");
    }

    #[test]
    fn model_serializes_kebab_case_without_header() {
        let value = serde_json::to_value(wan_interface()).unwrap();
        assert_eq!(value["if-name"], "GigabitEthernet1");
        assert_eq!(value["ipv4-address"], "203.0.113.10/29");
        assert_eq!(value["shutdown"], "false");
        assert!(value.get("template-name").is_none());
        assert!(value.get("device-models").is_none());
    }

    #[test]
    fn definition_places_fields() {
        let definition = wan_interface().generate_definition().unwrap();

        assert_eq!(definition["if-name"]["vipValue"], "GigabitEthernet1");
        assert_eq!(definition["ip"]["address"]["vipValue"], "203.0.113.10/29");
        assert_eq!(definition["mtu"]["vipValue"], 1500);

        let tunnel = &definition["tunnel-interface"];
        assert_eq!(tunnel["color"]["value"]["vipValue"], "biz-internet");
        assert_eq!(tunnel["allow-service"]["icmp"]["vipValue"], "true");
        assert_eq!(tunnel["allow-service"]["https"]["vipValue"], "true");
        assert!(tunnel["allow-service"].get("sshd").is_none());

        let encapsulation = &tunnel["encapsulation"];
        assert_eq!(encapsulation["vipObjectType"], "tree");
        assert_eq!(encapsulation["vipPrimaryKey"], json!(["encap"]));
        assert_eq!(encapsulation["vipValue"][0]["encap"]["vipValue"], "ipsec");
        assert_eq!(encapsulation["vipValue"][0]["weight"]["vipValue"], 1);

        let nat = &definition["nat"];
        assert_eq!(nat["vipObjectType"], "node-only");
        assert_eq!(nat["nat-choice"]["vipValue"], "Interface");
    }

    #[test]
    fn definition_places_nat_pool_and_vrrp() {
        let model = CiscoVpnInterfaceModel::new("lan-if", "LAN", "GigabitEthernet2")
            .with_device_models([DeviceModel::VedgeC8000V])
            .with_ipv4_address("10.10.0.2/24".parse().unwrap())
            .with_nat_pool(
                "198.51.100.1".parse().unwrap(),
                "198.51.100.14".parse().unwrap(),
                28,
            )
            .add_static_nat(StaticNat::new(
                "10.10.0.20".parse().unwrap(),
                "198.51.100.20".parse().unwrap(),
            ))
            .add_vrrp(Vrrp::new(1, 10).with_address("10.10.0.1".parse().unwrap()))
            .add_access_list(Direction::In, "lan-in");
        assert!(model.validate().is_ok());

        let definition = model.generate_definition().unwrap();
        let natpool = &definition["nat"]["natpool"];
        assert_eq!(natpool["range-start"]["vipValue"], "198.51.100.1");
        assert_eq!(natpool["range-end"]["vipValue"], "198.51.100.14");
        assert_eq!(natpool["prefix-length"]["vipValue"], 28);
        assert_eq!(
            definition["nat"]["static"]["vipPrimaryKey"],
            json!(["source-ip"])
        );
        assert_eq!(
            definition["nat"]["static"]["vipValue"][0]["static-nat-direction"]["vipValue"],
            "inside"
        );

        let vrrp = &definition["vrrp"];
        assert_eq!(vrrp["vipPrimaryKey"], json!(["grp-id"]));
        assert_eq!(vrrp["vipValue"][0]["priority"]["vipValue"], 100);
        assert_eq!(vrrp["vipValue"][0]["address"]["vipValue"], "10.10.0.1");

        assert_eq!(
            definition["access-list"]["vipValue"][0]["acl-name"]["vipValue"],
            "lan-in"
        );
    }

    #[test]
    fn definition_places_trustsec_and_qos() {
        let mut model = CiscoVpnInterfaceModel::new("sgt-if", "TrustSec", "GigabitEthernet3");
        model.enable_sgt_propagation = Some(StringBool::True);
        model.sgt = Some(100);
        model.enable_sgt_enforcement = Some(StringBool::True);
        model.enforcement_sgt = Some(200);
        model.qos_adaptive = Some(StringBool::True);
        model.dmin = Some(1000);
        model.dmax = Some(5000);

        let definition = model.generate_definition().unwrap();
        let trustsec = &definition["trustsec"];
        assert_eq!(trustsec["propagate"]["sgt"]["vipValue"], "true");
        assert_eq!(trustsec["static"]["sgt"]["vipValue"], 100);
        assert_eq!(trustsec["enforcement"]["enable"]["vipValue"], "true");
        assert_eq!(trustsec["enforcement"]["sgt"]["vipValue"], 200);

        let qos = &definition["qos-adaptive"];
        assert_eq!(qos["vipValue"], "true");
        assert_eq!(qos["downstream"]["range"]["dmin"]["vipValue"], 1000);
        assert_eq!(qos["downstream"]["range"]["dmax"]["vipValue"], 5000);
    }

    #[test]
    fn payload_uses_template_type() {
        let payload = wan_interface().generate_payload().unwrap();
        assert_eq!(payload.template_type, "cisco_vpn_interface");
        assert_eq!(payload.template_name, "wan-if");
        assert_eq!(payload.device_type, vec![DeviceModel::VedgeC8000V]);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn static_address_and_dhcp_are_exclusive() {
        let mut model = wan_interface();
        model.dhcp_ipv4_client = Some(StringBool::True);
        assert!(first_message(&model).contains("dhcp-client"));

        let model = wan_interface().with_dhcp_client();
        assert!(model.ipv4_address.is_none());
        assert!(model.validate().is_ok());
    }

    #[test]
    fn nat_pool_requires_ordered_range() {
        let model = CiscoVpnInterfaceModel::new("lan", "LAN", "GigabitEthernet2").with_nat_pool(
            "198.51.100.14".parse().unwrap(),
            "198.51.100.1".parse().unwrap(),
            28,
        );
        assert!(first_message(&model).contains("is after end"));

        let mut model = CiscoVpnInterfaceModel::new("lan", "LAN", "GigabitEthernet2");
        model.nat_choice = Some(NatChoice::Pool);
        assert!(first_message(&model).contains("range-start"));

        let mut model = CiscoVpnInterfaceModel::new("lan", "LAN", "GigabitEthernet2");
        model.nat_choice = Some(NatChoice::Loopback);
        assert!(first_message(&model).contains("loopback-interface"));
    }

    #[test]
    fn qos_bounds_must_be_ordered() {
        let mut model = CiscoVpnInterfaceModel::new("qos", "QoS", "GigabitEthernet4");
        model.umin = Some(9000);
        model.umax = Some(1000);
        assert!(first_message(&model).contains("Upstream bandwidth"));
    }

    #[test]
    fn field_ranges_are_checked() {
        let model = wan_interface().with_mtu(100);
        assert!(model.validate().is_err());

        let model = wan_interface().add_vrrp(Vrrp::new(1, 10).with_priority(255));
        assert!(model.validate().is_err());

        let mut model = wan_interface();
        model.tloc_encapsulation = Some(Vec::new());
        assert!(model.validate().is_err());
    }

    #[test]
    fn dhcpv6_relay_accepts_transport_vpn() {
        let helper = |vpn| DhcpHelperV6 {
            address: "2001:db8::53".parse().unwrap(),
            vpn: Some(vpn),
        };
        assert!(helper(0).validate().is_ok());
        assert!(helper(65530).validate().is_ok());
        assert!(helper(65531).validate().is_err());

        let mut model = wan_interface();
        model.dhcp_helper_v6 = Some(vec![helper(0)]);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn mac_addresses() {
        assert!(check_mac("00:1a:2b:3c:4d:5e").is_ok());
        assert!(check_mac("001a.2b3c.4d5e").is_ok());
        assert!(check_mac("00:1a:2b:3c:4d").is_err());
        assert!(check_mac("zz:1a:2b:3c:4d:5e").is_err());

        let mut model = wan_interface();
        model.mac_address = Some("not-a-mac".to_string());
        assert!(first_message(&model).contains("not a MAC"));
    }
}
