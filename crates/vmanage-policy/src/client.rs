//! Asynchronous clients for policy list and policy definition endpoints.
//!
//! One generic client per family covers every kind; the kind's REST segment
//! is substituted into the endpoint path templates below. Payloads are
//! validated locally before anything is sent.

use async_trait::async_trait;
use std::marker::PhantomData;
use tracing::{debug, info};
use validator::Validate;
use vmanage_core::ids::{DefinitionId, ListId};
use vmanage_core::{DataSequence, Endpoint, Error, ServiceClient};

use crate::lists::{
    AppList, AppProbeClassList, AsPathList, ClassMapList, ColorList, CommunityList,
    DataIpv6PrefixList, DataPrefixList, FqdnList, GeoLocationList, IpsSignatureList,
    Ipv6PrefixList, LocalAppList, LocalDomainList, MirrorList, PolicerList, PolicyList, PortList,
    PreferredColorGroupList, PrefixList, ProtocolNameList, SiteList, SlaClassList, TlocList,
    UrlAllowList, UrlBlockList, VpnList, ZoneList,
};
use crate::policy_definition::{
    PolicyDefinition, PolicyDefinitionEditPayload, PolicyDefinitionEditResponse,
    PolicyDefinitionEndpoints, PolicyDefinitionId, PolicyDefinitionInfoRecord,
    PolicyDefinitionPreview,
};
use crate::policy_list::{
    InfoTag, PolicyListEditPayload, PolicyListEndpoints, PolicyListId, PolicyListInfoRecord,
    PolicyListPreview,
};
use crate::rule_set::RuleSet;
use crate::Result;

const CREATE_LIST: Endpoint = Endpoint::post("/template/policy/list/{kind}");
const DELETE_LIST: Endpoint = Endpoint::delete("/template/policy/list/{kind}/{id}");
const DELETE_LISTS_BY_TAG: Endpoint = Endpoint::delete("/template/policy/list/{kind}");
const EDIT_LIST: Endpoint = Endpoint::put("/template/policy/list/{kind}/{id}");
const GET_LIST: Endpoint = Endpoint::get("/template/policy/list/{kind}/{id}");
const GET_LISTS: Endpoint = Endpoint::get("/template/policy/list/{kind}").with_resultbody("data");
const GET_LISTS_BY_TAG: Endpoint =
    Endpoint::get("/template/policy/list/{kind}/filtered").with_resultbody("data");
const PREVIEW_LIST: Endpoint = Endpoint::post("/template/policy/list/{kind}/preview");
const PREVIEW_LIST_BY_ID: Endpoint = Endpoint::get("/template/policy/list/{kind}/preview/{id}");

const CREATE_DEFINITION: Endpoint = Endpoint::post("/template/policy/definition/{kind}");
const DELETE_DEFINITION: Endpoint = Endpoint::delete("/template/policy/definition/{kind}/{id}");
const EDIT_MULTIPLE_DEFINITION: Endpoint =
    Endpoint::put("/template/policy/definition/{kind}/multiple/{id}");
const EDIT_DEFINITION: Endpoint = Endpoint::put("/template/policy/definition/{kind}/{id}");
const GET_DEFINITIONS: Endpoint =
    Endpoint::get("/template/policy/definition/{kind}").with_resultbody("data");
const GET_DEFINITION: Endpoint = Endpoint::get("/template/policy/definition/{kind}/{id}");
const PREVIEW_DEFINITION: Endpoint = Endpoint::post("/template/policy/definition/{kind}/preview");
const PREVIEW_DEFINITION_BY_ID: Endpoint =
    Endpoint::get("/template/policy/definition/{kind}/preview/{id}");
const SAVE_DEFINITIONS_IN_BULK: Endpoint =
    Endpoint::put("/template/policy/definition/{kind}/bulk");

fn validate_payload<T: Validate>(payload: &T) -> Result<()> {
    payload.validate().map_err(Error::from)
}

fn info_tag_query(params: &InfoTag) -> Vec<(String, String)> {
    vec![("infoTag".to_string(), params.info_tag.clone())]
}

/// Client for one policy list kind.
pub struct PolicyListClient<L> {
    client: ServiceClient,
    kind: PhantomData<fn() -> L>,
}

impl<L: PolicyList> PolicyListClient<L> {
    /// Create a client sharing `client`'s session.
    #[must_use]
    pub fn new(client: ServiceClient) -> Self {
        Self {
            client,
            kind: PhantomData,
        }
    }

    /// Underlying service client.
    #[must_use]
    pub fn service(&self) -> &ServiceClient {
        &self.client
    }
}

impl<L> Clone for PolicyListClient<L> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            kind: PhantomData,
        }
    }
}

#[async_trait]
impl<L: PolicyList> PolicyListEndpoints for PolicyListClient<L> {
    type List = L;

    async fn create_policy_list(&self, payload: &L) -> Result<PolicyListId> {
        validate_payload(payload)?;
        let created: PolicyListId = self
            .client
            .call_json(&CREATE_LIST, &[("kind", L::SEGMENT)], &[], Some(payload))
            .await?;
        info!(kind = L::TYPE, name = payload.name(), list_id = %created.list_id, "Created policy list");
        Ok(created)
    }

    async fn delete_policy_list(&self, id: ListId) -> Result<()> {
        let id = id.to_string();
        self.client
            .call_empty::<()>(&DELETE_LIST, &[("kind", L::SEGMENT), ("id", &id)], &[], None)
            .await?;
        info!(kind = L::TYPE, list_id = %id, "Deleted policy list");
        Ok(())
    }

    async fn delete_policy_lists_with_info_tag(&self, params: &InfoTag) -> Result<()> {
        self.client
            .call_empty::<()>(
                &DELETE_LISTS_BY_TAG,
                &[("kind", L::SEGMENT)],
                &info_tag_query(params),
                None,
            )
            .await
    }

    async fn edit_policy_list(&self, id: ListId, payload: &PolicyListEditPayload<L>) -> Result<()> {
        validate_payload(&payload.list)?;
        let id = id.to_string();
        self.client
            .call_empty(
                &EDIT_LIST,
                &[("kind", L::SEGMENT), ("id", &id)],
                &[],
                Some(payload),
            )
            .await
    }

    async fn get_lists_by_id(&self, id: ListId) -> Result<PolicyListInfoRecord<L>> {
        let id = id.to_string();
        self.client
            .call_json::<(), _>(&GET_LIST, &[("kind", L::SEGMENT), ("id", &id)], &[], None)
            .await
    }

    async fn get_policy_lists(&self) -> Result<DataSequence<PolicyListInfoRecord<L>>> {
        let lists: DataSequence<PolicyListInfoRecord<L>> = self
            .client
            .call_json::<(), _>(&GET_LISTS, &[("kind", L::SEGMENT)], &[], None)
            .await?;
        debug!(kind = L::TYPE, count = lists.len(), "Fetched policy lists");
        Ok(lists)
    }

    async fn get_policy_lists_with_info_tag(
        &self,
        params: &InfoTag,
    ) -> Result<DataSequence<PolicyListInfoRecord<L>>> {
        self.client
            .call_json::<(), _>(
                &GET_LISTS_BY_TAG,
                &[("kind", L::SEGMENT)],
                &info_tag_query(params),
                None,
            )
            .await
    }

    async fn preview_policy_list(&self, payload: &L) -> Result<PolicyListPreview> {
        validate_payload(payload)?;
        self.client
            .call_json(&PREVIEW_LIST, &[("kind", L::SEGMENT)], &[], Some(payload))
            .await
    }

    async fn preview_policy_list_by_id(&self, id: ListId) -> Result<PolicyListPreview> {
        let id = id.to_string();
        self.client
            .call_json::<(), _>(
                &PREVIEW_LIST_BY_ID,
                &[("kind", L::SEGMENT), ("id", &id)],
                &[],
                None,
            )
            .await
    }
}

/// Client for one policy definition kind.
pub struct PolicyDefinitionClient<D> {
    client: ServiceClient,
    kind: PhantomData<fn() -> D>,
}

impl<D: PolicyDefinition> PolicyDefinitionClient<D> {
    /// Create a client sharing `client`'s session.
    #[must_use]
    pub fn new(client: ServiceClient) -> Self {
        Self {
            client,
            kind: PhantomData,
        }
    }
}

impl<D> Clone for PolicyDefinitionClient<D> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            kind: PhantomData,
        }
    }
}

#[async_trait]
impl<D: PolicyDefinition> PolicyDefinitionEndpoints for PolicyDefinitionClient<D> {
    type Definition = D;

    async fn create_policy_definition(&self, payload: &D) -> Result<PolicyDefinitionId> {
        validate_payload(payload)?;
        let created: PolicyDefinitionId = self
            .client
            .call_json(&CREATE_DEFINITION, &[("kind", D::SEGMENT)], &[], Some(payload))
            .await?;
        info!(
            kind = D::TYPE,
            name = payload.name(),
            definition_id = %created.definition_id,
            "Created policy definition"
        );
        Ok(created)
    }

    async fn delete_policy_definition(&self, id: DefinitionId) -> Result<()> {
        let id = id.to_string();
        self.client
            .call_empty::<()>(
                &DELETE_DEFINITION,
                &[("kind", D::SEGMENT), ("id", &id)],
                &[],
                None,
            )
            .await
    }

    async fn edit_multiple_policy_definition(
        &self,
        id: DefinitionId,
        payload: &PolicyDefinitionEditPayload<D>,
    ) -> Result<PolicyDefinitionEditResponse> {
        validate_payload(&payload.definition)?;
        let id = id.to_string();
        self.client
            .call_json(
                &EDIT_MULTIPLE_DEFINITION,
                &[("kind", D::SEGMENT), ("id", &id)],
                &[],
                Some(payload),
            )
            .await
    }

    async fn edit_policy_definition(
        &self,
        id: DefinitionId,
        payload: &PolicyDefinitionEditPayload<D>,
    ) -> Result<PolicyDefinitionEditResponse> {
        validate_payload(&payload.definition)?;
        let id = id.to_string();
        self.client
            .call_json(
                &EDIT_DEFINITION,
                &[("kind", D::SEGMENT), ("id", &id)],
                &[],
                Some(payload),
            )
            .await
    }

    async fn get_definitions(&self) -> Result<DataSequence<PolicyDefinitionInfoRecord<D>>> {
        self.client
            .call_json::<(), _>(&GET_DEFINITIONS, &[("kind", D::SEGMENT)], &[], None)
            .await
    }

    async fn get_policy_definition(&self, id: DefinitionId) -> Result<PolicyDefinitionInfoRecord<D>> {
        let id = id.to_string();
        self.client
            .call_json::<(), _>(
                &GET_DEFINITION,
                &[("kind", D::SEGMENT), ("id", &id)],
                &[],
                None,
            )
            .await
    }

    async fn preview_policy_definition(&self, payload: &D) -> Result<PolicyDefinitionPreview> {
        validate_payload(payload)?;
        self.client
            .call_json(&PREVIEW_DEFINITION, &[("kind", D::SEGMENT)], &[], Some(payload))
            .await
    }

    async fn preview_policy_definition_by_id(
        &self,
        id: DefinitionId,
    ) -> Result<PolicyDefinitionPreview> {
        let id = id.to_string();
        self.client
            .call_json::<(), _>(
                &PREVIEW_DEFINITION_BY_ID,
                &[("kind", D::SEGMENT), ("id", &id)],
                &[],
                None,
            )
            .await
    }

    async fn save_policy_definition_in_bulk(
        &self,
        payloads: &[PolicyDefinitionEditPayload<D>],
    ) -> Result<()> {
        for payload in payloads {
            validate_payload(&payload.definition)?;
        }
        self.client
            .call_empty(
                &SAVE_DEFINITIONS_IN_BULK,
                &[("kind", D::SEGMENT)],
                &[],
                Some(payloads),
            )
            .await
    }
}

/// Application lists
pub type ConfigurationPolicyAppList = PolicyListClient<AppList>;
/// App probe class lists
pub type ConfigurationPolicyAppProbeClassList = PolicyListClient<AppProbeClassList>;
/// AS path lists
pub type ConfigurationPolicyAsPathList = PolicyListClient<AsPathList>;
/// Class map lists
pub type ConfigurationPolicyClassMapList = PolicyListClient<ClassMapList>;
/// Color lists
pub type ConfigurationPolicyColorList = PolicyListClient<ColorList>;
/// Community lists
pub type ConfigurationPolicyCommunityList = PolicyListClient<CommunityList>;
/// IPv6 data prefix lists
pub type ConfigurationPolicyDataIpv6PrefixList = PolicyListClient<DataIpv6PrefixList>;
/// IPv4 data prefix lists
pub type ConfigurationPolicyDataPrefixList = PolicyListClient<DataPrefixList>;
/// FQDN lists
pub type ConfigurationPolicyFqdnList = PolicyListClient<FqdnList>;
/// Geo location lists
pub type ConfigurationPolicyGeoLocationList = PolicyListClient<GeoLocationList>;
/// IPS signature lists
pub type ConfigurationPolicyIpsSignatureList = PolicyListClient<IpsSignatureList>;
/// IPv6 prefix lists
pub type ConfigurationPolicyIpv6PrefixList = PolicyListClient<Ipv6PrefixList>;
/// Local application lists
pub type ConfigurationPolicyLocalAppList = PolicyListClient<LocalAppList>;
/// Local domain lists
pub type ConfigurationPolicyLocalDomainList = PolicyListClient<LocalDomainList>;
/// Mirror lists
pub type ConfigurationPolicyMirrorList = PolicyListClient<MirrorList>;
/// Policer lists
pub type ConfigurationPolicyPolicerList = PolicyListClient<PolicerList>;
/// Port lists
pub type ConfigurationPolicyPortList = PolicyListClient<PortList>;
/// Preferred color group lists
pub type ConfigurationPolicyPreferredColorGroupList = PolicyListClient<PreferredColorGroupList>;
/// IPv4 prefix lists
pub type ConfigurationPolicyPrefixList = PolicyListClient<PrefixList>;
/// Protocol name lists
pub type ConfigurationPolicyProtocolNameList = PolicyListClient<ProtocolNameList>;
/// Site lists
pub type ConfigurationPolicySiteList = PolicyListClient<SiteList>;
/// SLA class lists
pub type ConfigurationPolicySlaClassList = PolicyListClient<SlaClassList>;
/// TLOC lists
pub type ConfigurationPolicyTlocList = PolicyListClient<TlocList>;
/// URL allow lists
pub type ConfigurationPolicyUrlAllowList = PolicyListClient<UrlAllowList>;
/// URL block lists
pub type ConfigurationPolicyUrlBlockList = PolicyListClient<UrlBlockList>;
/// VPN lists
pub type ConfigurationPolicyVpnList = PolicyListClient<VpnList>;
/// Zone lists
pub type ConfigurationPolicyZoneList = PolicyListClient<ZoneList>;

/// Rule set definitions
pub type ConfigurationPolicyRuleSetDefinition = PolicyDefinitionClient<RuleSet>;
