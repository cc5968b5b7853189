//! Feature template endpoints.

use tracing::{debug, info};
use validator::Validate;
use vmanage_core::ids::TemplateId;
use vmanage_core::{DataSequence, Endpoint, Error, ServiceClient};

use crate::feature_template::{
    FeatureTemplate, FeatureTemplateEditResponse, FeatureTemplateId, FeatureTemplateInfo,
    FeatureTemplatePayload,
};
use crate::Result;

const CREATE_FEATURE_TEMPLATE: Endpoint = Endpoint::post("/template/feature");
const EDIT_FEATURE_TEMPLATE: Endpoint = Endpoint::put("/template/feature/{id}");
const DELETE_FEATURE_TEMPLATE: Endpoint = Endpoint::delete("/template/feature/{id}");
const GET_FEATURE_TEMPLATES: Endpoint = Endpoint::get("/template/feature").with_resultbody("data");
const GET_FEATURE_TEMPLATE: Endpoint = Endpoint::get("/template/feature/object/{id}");

fn build_payload<T: FeatureTemplate>(template: &T) -> Result<FeatureTemplatePayload> {
    let payload = template.generate_payload()?;
    payload.validate().map_err(Error::from)?;
    Ok(payload)
}

/// Client for `/template/feature`.
#[derive(Clone)]
pub struct FeatureTemplateClient {
    client: ServiceClient,
}

impl FeatureTemplateClient {
    /// Create a client sharing `client`'s session.
    #[must_use]
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// Create `template` and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] for an invalid payload, otherwise
    /// transport, status and decoding errors.
    pub async fn create<T: FeatureTemplate + Sync>(&self, template: &T) -> Result<TemplateId> {
        let payload = build_payload(template)?;
        let created: FeatureTemplateId = self
            .client
            .call_json(&CREATE_FEATURE_TEMPLATE, &[], &[], Some(&payload))
            .await?;
        info!(
            template_type = T::TEMPLATE_TYPE,
            name = %payload.template_name,
            template_id = %created.template_id,
            "Created feature template"
        );
        Ok(created.template_id)
    }

    /// Replace the template `id` with `template`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] for an invalid payload, otherwise
    /// transport, status and decoding errors.
    pub async fn edit<T: FeatureTemplate + Sync>(
        &self,
        id: TemplateId,
        template: &T,
    ) -> Result<FeatureTemplateEditResponse> {
        let payload = build_payload(template)?;
        let id = id.to_string();
        let response = self
            .client
            .call_with(&EDIT_FEATURE_TEMPLATE, &[("id", &id)], &[], |request| {
                request.json(&payload)
            })
            .await?;
        let body = response.bytes().await?;
        // Edits of unattached templates answer with an empty body.
        let edited = if body.is_empty() {
            FeatureTemplateEditResponse::default()
        } else {
            EDIT_FEATURE_TEMPLATE.decode(&body)?
        };
        info!(
            template_type = T::TEMPLATE_TYPE,
            template_id = %id,
            affected = edited.master_templates_affected.len(),
            "Edited feature template"
        );
        Ok(edited)
    }

    /// Delete the template `id`.
    ///
    /// # Errors
    ///
    /// Returns transport and status errors.
    pub async fn delete(&self, id: TemplateId) -> Result<()> {
        let id = id.to_string();
        self.client
            .call_empty::<()>(&DELETE_FEATURE_TEMPLATE, &[("id", &id)], &[], None)
            .await?;
        info!(template_id = %id, "Deleted feature template");
        Ok(())
    }

    /// List every feature template.
    ///
    /// # Errors
    ///
    /// Returns transport, status and decoding errors.
    pub async fn get_feature_templates(&self) -> Result<DataSequence<FeatureTemplateInfo>> {
        let templates: DataSequence<FeatureTemplateInfo> = self
            .client
            .call_json::<(), _>(&GET_FEATURE_TEMPLATES, &[], &[], None)
            .await?;
        debug!(count = templates.len(), "Listed feature templates");
        Ok(templates)
    }

    /// Fetch the stored payload of the template `id`.
    ///
    /// # Errors
    ///
    /// Returns transport, status and decoding errors.
    pub async fn get_feature_template(&self, id: TemplateId) -> Result<FeatureTemplatePayload> {
        let id = id.to_string();
        self.client
            .call_json::<(), _>(&GET_FEATURE_TEMPLATE, &[("id", &id)], &[], None)
            .await
    }
}
