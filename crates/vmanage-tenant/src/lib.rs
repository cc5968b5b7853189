//! Tenant management and tenant migration for vManage.
//!
//! Migration moves a tenant between single-tenant and multi-tenant overlays:
//! the source controller exports the tenant into an archive, the destination
//! imports it and hands out a migration token, and the source then migrates
//! its network using that token.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{TenantMigrationClient, DEFAULT_DOWNLOAD_PATH};
pub use models::{
    ExportInfo, ImportInfo, MigrationFile, MigrationInfo, MigrationTokenQueryParams, Tenant,
};

/// Convenient result alias matching the shared vManage error type.
pub type Result<T> = vmanage_core::Result<T>;
