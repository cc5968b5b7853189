//! Policy definition metadata and endpoint contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;
use vmanage_core::ids::DefinitionId;
use vmanage_core::DataSequence;

use crate::policy_list::PolicyReference;
use crate::Result;

/// Behaviour shared by policy definition kinds.
pub trait PolicyDefinition:
    Serialize + DeserializeOwned + Validate + Clone + Send + Sync + 'static
{
    /// Wire value of the `type` field.
    const TYPE: &'static str;

    /// REST segment under `/template/policy/definition/`.
    const SEGMENT: &'static str;

    /// Definition name.
    fn name(&self) -> &str;
}

/// Identifier returned when a definition is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDefinitionId {
    /// Definition id
    pub definition_id: DefinitionId,
}

/// Server-managed metadata of a definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDefinitionInfo {
    /// Definition id
    pub definition_id: DefinitionId,
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
    /// Info tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_tag: Option<String>,
    /// `created` / `unlocked` etc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Optimisation flag, `"true"` / `"false"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimized: Option<String>,
    /// Number of references
    #[serde(default)]
    pub reference_count: u32,
    /// Referencing objects
    #[serde(default)]
    pub references: Vec<PolicyReference>,
    /// Ids of activated policies using the definition
    #[serde(default)]
    pub activated_id: Vec<String>,
    /// Whether an active vSmart policy uses the definition
    #[serde(default)]
    pub is_activated_by_vsmart: bool,
}

/// Result of a definition update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDefinitionEditResponse {
    /// Device templates that need to be re-attached
    #[serde(default)]
    pub master_templates_affected: Vec<String>,
}

/// Device configuration preview of a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDefinitionPreview {
    /// Rendered configuration
    pub preview: String,
}

/// Body of a definition update: the definition plus its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "D: Serialize", deserialize = "D: PolicyDefinition"))]
pub struct PolicyDefinitionEditPayload<D> {
    /// Updated definition
    #[serde(flatten)]
    pub definition: D,
    /// Id of the definition being updated
    #[serde(rename = "definitionId")]
    pub definition_id: DefinitionId,
}

impl<D> PolicyDefinitionEditPayload<D> {
    /// Pair `definition` with `definition_id`.
    pub fn new(definition_id: DefinitionId, definition: D) -> Self {
        Self {
            definition,
            definition_id,
        }
    }
}

/// A definition as returned by the controller, with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "D: Serialize", deserialize = "D: PolicyDefinition"))]
pub struct PolicyDefinitionInfoRecord<D> {
    /// Definition content
    #[serde(flatten)]
    pub definition: D,
    /// Metadata
    #[serde(flatten)]
    pub info: PolicyDefinitionInfo,
}

/// Operations available for every policy definition kind.
#[async_trait]
pub trait PolicyDefinitionEndpoints {
    /// Definition kind handled by the implementation.
    type Definition: PolicyDefinition;

    /// `POST /template/policy/definition/{kind}`
    async fn create_policy_definition(
        &self,
        payload: &Self::Definition,
    ) -> Result<PolicyDefinitionId>;

    /// `DELETE /template/policy/definition/{kind}/{id}`
    async fn delete_policy_definition(&self, id: DefinitionId) -> Result<()>;

    /// `PUT /template/policy/definition/{kind}/multiple/{id}`
    async fn edit_multiple_policy_definition(
        &self,
        id: DefinitionId,
        payload: &PolicyDefinitionEditPayload<Self::Definition>,
    ) -> Result<PolicyDefinitionEditResponse>;

    /// `PUT /template/policy/definition/{kind}/{id}`
    async fn edit_policy_definition(
        &self,
        id: DefinitionId,
        payload: &PolicyDefinitionEditPayload<Self::Definition>,
    ) -> Result<PolicyDefinitionEditResponse>;

    /// `GET /template/policy/definition/{kind}`
    async fn get_definitions(
        &self,
    ) -> Result<DataSequence<PolicyDefinitionInfoRecord<Self::Definition>>>;

    /// `GET /template/policy/definition/{kind}/{id}`
    async fn get_policy_definition(
        &self,
        id: DefinitionId,
    ) -> Result<PolicyDefinitionInfoRecord<Self::Definition>>;

    /// `POST /template/policy/definition/{kind}/preview`
    async fn preview_policy_definition(
        &self,
        payload: &Self::Definition,
    ) -> Result<PolicyDefinitionPreview>;

    /// `GET /template/policy/definition/{kind}/preview/{id}`
    async fn preview_policy_definition_by_id(
        &self,
        id: DefinitionId,
    ) -> Result<PolicyDefinitionPreview>;

    /// `PUT /template/policy/definition/{kind}/bulk`
    async fn save_policy_definition_in_bulk(
        &self,
        payloads: &[PolicyDefinitionEditPayload<Self::Definition>],
    ) -> Result<()>;
}
