//! Authentication policy tree data source

use crate::data_sources::lookup_schema;
use crate::resources::authentication_policies::resource_policy::{
    policy_schema, policy_to_state,
};
use crate::resources::{api_error, call, downcast_provider_data, not_configured, state_or};
use async_trait::async_trait;
use std::sync::OnceLock;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource,
    DataSourceMetadataRequest, DataSourceMetadataResponse, DataSourceSchemaRequest,
    DataSourceSchemaResponse, DataSourceWithConfigure, ReadDataSourceRequest,
    ReadDataSourceResponse, ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::schema::Schema;
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};
use tfplug::validator::validate_schema;

const TYPE_NAME: &str = "pingfederate_authentication_policies_policy";

#[derive(Default)]
pub struct AuthenticationPoliciesPolicyDataSource {
    provider_data: Option<crate::PingFederateProviderData>,
}

impl AuthenticationPoliciesPolicyDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

fn build_schema() -> Schema {
    lookup_schema(
        policy_schema(),
        "policy_id",
        "The authentication policy ID. ID is unique.",
        "Data source to retrieve an authentication policy tree.",
    )
}

fn schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(build_schema)
}

#[async_trait]
impl DataSource for AuthenticationPoliciesPolicyDataSource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: DataSourceMetadataRequest,
    ) -> DataSourceMetadataResponse {
        DataSourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        DataSourceSchemaResponse {
            schema: schema().clone(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateDataSourceConfigRequest,
    ) -> ValidateDataSourceConfigResponse {
        ValidateDataSourceConfigResponse {
            diagnostics: validate_schema(schema(), &request.config),
        }
    }

    async fn read(&self, ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let mut diagnostics = vec![];

        let Some(provider_data) = &self.provider_data else {
            diagnostics.push(not_configured());
            return ReadDataSourceResponse::new(DynamicValue::null(), diagnostics);
        };

        let id = match request.config.get_string(&AttributePath::new("policy_id")) {
            Ok(id) => id,
            Err(_) => {
                diagnostics.push(
                    Diagnostic::error("Missing policy ID", "policy_id must be set")
                        .with_attribute(AttributePath::new("policy_id")),
                );
                return ReadDataSourceResponse::new(DynamicValue::null(), diagnostics);
            }
        };

        tracing::debug!("Reading authentication policy '{}'", id);

        match call(
            &ctx,
            provider_data.client.authentication_policies().policies().get(&id),
        )
        .await
        {
            Ok(policy) => {
                let state = policy_to_state(&policy, &mut diagnostics);
                ReadDataSourceResponse::new(
                    state_or(state, DynamicValue::null(), &diagnostics),
                    diagnostics,
                )
            }
            Err(e) => {
                diagnostics.push(api_error(
                    "An error occurred while getting the authentication policy",
                    &e,
                ));
                ReadDataSourceResponse::new(DynamicValue::null(), diagnostics)
            }
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for AuthenticationPoliciesPolicyDataSource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        let mut diagnostics = vec![];
        self.provider_data =
            downcast_provider_data(request.provider_data, "data source", &mut diagnostics);
        ConfigureDataSourceResponse { diagnostics }
    }
}

#[cfg(test)]
#[path = "./data_source_policy_test.rs"]
mod data_source_policy_test;
