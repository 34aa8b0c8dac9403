//! Local identity profile API implementation

use super::super::common::{PingFederateApiResource, ResourceLink};
use crate::api::{ApiError, Client};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalIdentityProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub apc_id: ResourceLink,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub auth_sources: Vec<AuthSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_source_update_policy: Option<AuthSourceUpdatePolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_config: Option<RegistrationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_config: Option<ProfileConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_config: Option<FieldConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verification_config: Option<EmailVerificationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_store_config: Option<DataStoreConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_enabled: Option<bool>,
}

impl PingFederateApiResource for LocalIdentityProfile {
    fn api_path() -> &'static str {
        "/localIdentity/identityProfiles"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSourceUpdatePolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_attributes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retain_attributes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_attributes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_interval: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_provider_ref: Option<ResourceLink>,
    pub template_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_authn_session_after_registration: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub this_is_my_device_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_workflow: Option<ResourceLink>,
    /// BEFORE_ACCOUNT_CREATION or AFTER_ACCOUNT_CREATION
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execute_workflow: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_identity_enabled: Option<bool>,
    pub template_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<LocalIdentityField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_space_from_unique_field: Option<bool>,
}

/// A profile field. Which of `options` and `default_value` apply depends on
/// the field type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalIdentityField {
    #[serde(rename = "type")]
    pub field_type: String,
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_page_field: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_page_field: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<HashMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailVerificationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verification_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_email_template_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verification_sent_template_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verification_success_template_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verification_error_template_name: Option<String>,
    /// OTP or OTL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verification_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp_retry_attempts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_otp_character_set: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp_time_to_live: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verification_otp_template_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otl_time_to_live: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_for_email_to_verify: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_storing_verification_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_publisher_ref: Option<ResourceLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_verified_email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_verified_email_template_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStoreConfig {
    #[serde(rename = "type")]
    pub store_type: String,
    pub data_store_ref: ResourceLink,
    #[serde(default)]
    pub data_store_mapping: HashMap<String, DataStoreAttribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auxiliary_object_classes: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataStoreAttribute {
    #[serde(rename = "type")]
    pub attribute_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

pub struct IdentityProfilesApi<'a> {
    client: &'a Client,
}

impl<'a> IdentityProfilesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &str) -> Result<LocalIdentityProfile, ApiError> {
        self.client.get(&LocalIdentityProfile::resource_path(id)).await
    }

    pub async fn create(
        &self,
        profile: &LocalIdentityProfile,
    ) -> Result<LocalIdentityProfile, ApiError> {
        self.client
            .post(LocalIdentityProfile::api_path(), profile)
            .await
    }

    pub async fn update(
        &self,
        id: &str,
        profile: &LocalIdentityProfile,
    ) -> Result<LocalIdentityProfile, ApiError> {
        self.client
            .put(&LocalIdentityProfile::resource_path(id), profile)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&LocalIdentityProfile::resource_path(id))
            .await
    }
}
