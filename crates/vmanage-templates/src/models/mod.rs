//! Feature template models.

pub mod cisco_vpn_interface;

pub use cisco_vpn_interface::CiscoVpnInterfaceModel;
