//! Policy list and policy definition support for vManage.
//!
//! This crate models the policy objects vManage stores under
//! `/template/policy/` and exposes asynchronous clients for them. Lists and
//! definitions are validated locally before they are sent.

#![deny(missing_docs)]

pub mod client;
pub mod list_entries;
pub mod lists;
pub mod policy_definition;
pub mod policy_list;
pub mod rule_set;

pub use client::{
    ConfigurationPolicyAppProbeClassList, ConfigurationPolicyDataIpv6PrefixList,
    ConfigurationPolicyRuleSetDefinition, PolicyDefinitionClient, PolicyListClient,
};
pub use lists::PolicyList;
pub use policy_definition::{PolicyDefinition, PolicyDefinitionEndpoints};
pub use policy_list::{InfoTag, PolicyListEndpoints};
pub use rule_set::{RuleSet, RuleSetRule};

/// Convenient result alias matching the shared vManage error type.
pub type Result<T> = vmanage_core::Result<T>;
