//! Authentication policy API implementation

use super::super::common::{PingFederateApiResource, ResourceLink};
use super::model::AuthenticationPolicyTreeNode;
use crate::api::{ApiError, Client};
use serde::{Deserialize, Serialize};

/// A single authentication policy tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication_api_application_ref: Option<ResourceLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_node: Option<AuthenticationPolicyTreeNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_failures_locally: Option<bool>,
}

impl PingFederateApiResource for AuthenticationPolicy {
    fn api_path() -> &'static str {
        "/authenticationPolicies/policy"
    }
}

pub struct PoliciesApi<'a> {
    client: &'a Client,
}

impl<'a> PoliciesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &str) -> Result<AuthenticationPolicy, ApiError> {
        self.client.get(&AuthenticationPolicy::resource_path(id)).await
    }

    pub async fn create(
        &self,
        policy: &AuthenticationPolicy,
    ) -> Result<AuthenticationPolicy, ApiError> {
        self.client.post(AuthenticationPolicy::api_path(), policy).await
    }

    pub async fn update(
        &self,
        id: &str,
        policy: &AuthenticationPolicy,
    ) -> Result<AuthenticationPolicy, ApiError> {
        self.client
            .put(&AuthenticationPolicy::resource_path(id), policy)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&AuthenticationPolicy::resource_path(id))
            .await
    }
}
