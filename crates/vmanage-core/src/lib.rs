//! # vmanage-core
//!
//! Core types and utilities for working with the vManage SD-WAN controller.
//!
//! This crate provides the shared error type, the HTTP service client with
//! retry and session handling, and the declarative endpoint descriptors that
//! the API crates build on.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status code mapping
//! - [`client`] - HTTP service client, retry policy and client configuration
//! - [`config`] - Validated connection configuration
//! - [`endpoint`] - Declarative endpoint descriptors
//! - [`version`] - API version parsing and constraint matching
//! - [`session`] - Form login and session context
//! - [`sequence`] - Typed result collections
//! - [`ids`] - Strongly-typed UUID wrappers for vManage resources
//! - [`types`] - Shared wire enums and validation helpers
//! - [`query`] - Query parameter builder

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod ids;
pub mod query;
pub mod sequence;
pub mod session;
pub mod types;
pub mod version;

// Re-export commonly used types
pub use client::{ServiceClient, ServiceClientBuilder};
pub use endpoint::{Endpoint, HttpVerb};
pub use error::{Error, Result};
pub use sequence::DataSequence;
pub use version::{ApiVersion, VersionConstraint};
