//! Authentication policy fragment API implementation

use super::super::common::{PingFederateApiResource, ResourceLink};
use super::model::AuthenticationPolicyTreeNode;
use crate::api::{ApiError, Client};
use serde::{Deserialize, Serialize};

/// Reusable sub-tree that policies reference through a FRAGMENT action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationPolicyFragment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub root_node: AuthenticationPolicyTreeNode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<ResourceLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<ResourceLink>,
}

impl PingFederateApiResource for AuthenticationPolicyFragment {
    fn api_path() -> &'static str {
        "/authenticationPolicies/fragments"
    }
}

pub struct FragmentsApi<'a> {
    client: &'a Client,
}

impl<'a> FragmentsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &str) -> Result<AuthenticationPolicyFragment, ApiError> {
        self.client
            .get(&AuthenticationPolicyFragment::resource_path(id))
            .await
    }

    pub async fn create(
        &self,
        fragment: &AuthenticationPolicyFragment,
    ) -> Result<AuthenticationPolicyFragment, ApiError> {
        self.client
            .post(AuthenticationPolicyFragment::api_path(), fragment)
            .await
    }

    pub async fn update(
        &self,
        id: &str,
        fragment: &AuthenticationPolicyFragment,
    ) -> Result<AuthenticationPolicyFragment, ApiError> {
        self.client
            .put(&AuthenticationPolicyFragment::resource_path(id), fragment)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&AuthenticationPolicyFragment::resource_path(id))
            .await
    }
}
