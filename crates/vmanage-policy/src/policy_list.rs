//! Policy list metadata and the endpoint contract shared by all list kinds.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vmanage_core::ids::ListId;
use vmanage_core::DataSequence;

use crate::lists::PolicyList;
use crate::Result;

/// Identifier returned when a list is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyListId {
    /// List id
    pub list_id: ListId,
}

/// Object referencing a policy list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyReference {
    /// Referencing object id
    pub id: String,
    /// Referencing object type
    #[serde(rename = "type")]
    pub reference_type: String,
}

/// Server-managed metadata of a policy list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyListInfo {
    /// List id
    pub list_id: ListId,
    /// Last modification time
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<DateTime<Utc>>,
    /// Owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Whether the list is read-only
    #[serde(default)]
    pub read_only: bool,
    /// Version token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Number of references
    #[serde(default)]
    pub reference_count: u32,
    /// Referencing objects
    #[serde(default)]
    pub references: Vec<PolicyReference>,
    /// Whether an active vSmart policy uses the list
    #[serde(default)]
    pub is_activated_by_vsmart: bool,
    /// Info tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_tag: Option<String>,
}

/// Device configuration preview of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyListPreview {
    /// Rendered configuration
    pub preview: String,
}

/// Info tag filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoTag {
    /// Tag value
    pub info_tag: String,
}

impl InfoTag {
    /// Create a filter for `tag`.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            info_tag: tag.into(),
        }
    }
}

/// Body of a list update: the list plus its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "L: Serialize", deserialize = "L: PolicyList"))]
pub struct PolicyListEditPayload<L> {
    /// Updated list
    #[serde(flatten)]
    pub list: L,
    /// Id of the list being updated
    #[serde(rename = "listId")]
    pub list_id: ListId,
}

impl<L> PolicyListEditPayload<L> {
    /// Pair `list` with `list_id`.
    pub fn new(list_id: ListId, list: L) -> Self {
        Self { list, list_id }
    }
}

/// A list as returned by the controller, with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "L: Serialize", deserialize = "L: PolicyList"))]
pub struct PolicyListInfoRecord<L> {
    /// List content
    #[serde(flatten)]
    pub list: L,
    /// Metadata
    #[serde(flatten)]
    pub info: PolicyListInfo,
}

/// Operations available for every policy list kind.
#[async_trait]
pub trait PolicyListEndpoints {
    /// List kind handled by the implementation.
    type List: PolicyList;

    /// `POST /template/policy/list/{kind}`
    async fn create_policy_list(&self, payload: &Self::List) -> Result<PolicyListId>;

    /// `DELETE /template/policy/list/{kind}/{id}`
    async fn delete_policy_list(&self, id: ListId) -> Result<()>;

    /// `DELETE /template/policy/list/{kind}?infoTag=...`
    async fn delete_policy_lists_with_info_tag(&self, params: &InfoTag) -> Result<()>;

    /// `PUT /template/policy/list/{kind}/{id}`
    async fn edit_policy_list(
        &self,
        id: ListId,
        payload: &PolicyListEditPayload<Self::List>,
    ) -> Result<()>;

    /// `GET /template/policy/list/{kind}/{id}`
    async fn get_lists_by_id(&self, id: ListId) -> Result<PolicyListInfoRecord<Self::List>>;

    /// `GET /template/policy/list/{kind}`
    async fn get_policy_lists(&self) -> Result<DataSequence<PolicyListInfoRecord<Self::List>>>;

    /// `GET /template/policy/list/{kind}/filtered?infoTag=...`
    async fn get_policy_lists_with_info_tag(
        &self,
        params: &InfoTag,
    ) -> Result<DataSequence<PolicyListInfoRecord<Self::List>>>;

    /// `POST /template/policy/list/{kind}/preview`
    async fn preview_policy_list(&self, payload: &Self::List) -> Result<PolicyListPreview>;

    /// `GET /template/policy/list/{kind}/preview/{id}`
    async fn preview_policy_list_by_id(&self, id: ListId) -> Result<PolicyListPreview>;
}
