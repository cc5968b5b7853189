//! Feature templates for vManage.
//!
//! A feature template is a typed model implementing [`FeatureTemplate`].
//! The trait turns the model into the `templateDefinition` tree vManage
//! stores, and [`FeatureTemplateClient`] creates, edits, lists and deletes
//! templates on the controller.
//!
//! ```no_run
//! use vmanage_core::config::VmanageClientConfig;
//! use vmanage_core::ServiceClient;
//! use vmanage_templates::models::cisco_vpn_interface::{Color, Encap};
//! use vmanage_templates::{CiscoVpnInterfaceModel, DeviceModel, FeatureTemplateClient};
//!
//! # async fn example() -> vmanage_templates::Result<()> {
//! let config = VmanageClientConfig::new("https://vmanage.example.com", "admin", "secret")?;
//! let client = FeatureTemplateClient::new(ServiceClient::connect(&config).await?);
//!
//! let template = CiscoVpnInterfaceModel::new("wan-if", "Internet uplink", "GigabitEthernet1")
//!     .with_device_models([DeviceModel::VedgeC8000V])
//!     .with_dhcp_client()
//!     .with_tunnel(Color::BizInternet, Encap::Ipsec);
//! let id = client.create(&template).await?;
//! println!("created {id}");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod client;
pub mod device_model;
pub mod feature_template;
pub mod models;

pub use client::FeatureTemplateClient;
pub use device_model::DeviceModel;
pub use feature_template::{FeatureTemplate, FeatureTemplatePayload, FieldPath};
pub use models::CiscoVpnInterfaceModel;

/// Convenient result alias matching the shared vManage error type.
pub type Result<T> = vmanage_core::Result<T>;
