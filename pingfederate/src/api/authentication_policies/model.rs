//! Authentication policy tree models

use super::super::common::{
    AttributeFulfillmentValue, AttributeMapping, AttributeSource, IssuanceCriteria, ResourceLink,
    SourceTypeIdKey,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticationPolicyTreeNode {
    pub action: PolicyAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<AuthenticationPolicyTreeNode>>,
}

/// Result action of a policy tree node, tagged by `type` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PolicyAction {
    #[serde(rename = "APC_MAPPING")]
    ApcMapping(ApcMappingPolicyAction),
    #[serde(rename = "AUTHN_SELECTOR")]
    AuthnSelector(AuthnSelectorPolicyAction),
    #[serde(rename = "AUTHN_SOURCE")]
    AuthnSource(AuthnSourcePolicyAction),
    #[serde(rename = "CONTINUE")]
    Continue(SimplePolicyAction),
    #[serde(rename = "DONE")]
    Done(SimplePolicyAction),
    #[serde(rename = "FRAGMENT")]
    Fragment(FragmentPolicyAction),
    #[serde(rename = "LOCAL_IDENTITY_MAPPING")]
    LocalIdentityMapping(LocalIdentityMappingPolicyAction),
    #[serde(rename = "RESTART")]
    Restart(SimplePolicyAction),
    /// Action types introduced by newer server versions
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimplePolicyAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApcMappingPolicyAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub attribute_mapping: AttributeMapping,
    pub authentication_policy_contract_ref: ResourceLink,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthnSelectorPolicyAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub authentication_selector_ref: ResourceLink,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthnSourcePolicyAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_rules: Option<AttributeRules>,
    pub authentication_source: AuthenticationSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_user_id_mapping: Option<InputUserIdMapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id_authenticated: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationSource {
    /// IDP_ADAPTER or IDP_CONNECTION
    #[serde(rename = "type")]
    pub source_type: String,
    pub source_ref: ResourceLink,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputUserIdMapping {
    pub source: SourceTypeIdKey,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentPolicyAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_rules: Option<AttributeRules>,
    pub fragment: ResourceLink,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment_mapping: Option<FragmentMapping>,
}

/// Attribute mapping whose contract fulfillment may be left out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentMapping {
    #[serde(default)]
    pub attribute_sources: Vec<AttributeSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_contract_fulfillment: Option<HashMap<String, AttributeFulfillmentValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuance_criteria: Option<IssuanceCriteria>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalIdentityMappingPolicyAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inbound_mapping: Option<AttributeMapping>,
    pub local_identity_ref: ResourceLink,
    pub outbound_attribute_mapping: AttributeMapping,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_to_success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<AttributeRule>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_source: Option<SourceTypeIdKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    pub result: String,
}
