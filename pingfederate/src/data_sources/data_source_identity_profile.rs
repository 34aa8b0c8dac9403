//! Local identity profile data source

use crate::data_sources::lookup_schema;
use crate::resources::local_identity::{profile_schema, profile_to_state};
use crate::resources::{api_error, call, downcast_provider_data, not_configured};
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

const TYPE_NAME: &str = "pingfederate_local_identity_profile";

#[derive(Default)]
pub struct LocalIdentityProfileDataSource {
    provider_data: Option<crate::PingFederateProviderData>,
}

impl LocalIdentityProfileDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

fn build_schema() -> Schema {
    lookup_schema(
        profile_schema(),
        "profile_id",
        "The persistent, unique ID for the local identity profile.",
        "Data source to retrieve a local identity profile.",
    )
}

fn schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(build_schema)
}

#[async_trait]
impl DataSource for LocalIdentityProfileDataSource {
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

        let id = match request.config.get_string(&AttributePath::new("profile_id")) {
            Ok(id) => id,
            Err(_) => {
                diagnostics.push(
                    Diagnostic::error("Missing profile ID", "profile_id must be set")
                        .with_attribute(AttributePath::new("profile_id")),
                );
                return ReadDataSourceResponse::new(DynamicValue::null(), diagnostics);
            }
        };

        tracing::debug!("Reading local identity profile '{}'", id);

        match call(
            &ctx,
            provider_data.client.local_identity().identity_profiles().get(&id),
        )
        .await
        {
            Ok(profile) => {
                let state = profile_to_state(&profile);
                ReadDataSourceResponse::new(state, diagnostics)
            }
            Err(e) => {
                diagnostics.push(api_error(
                    "An error occurred while getting the local identity profile",
                    &e,
                ));
                ReadDataSourceResponse::new(DynamicValue::null(), diagnostics)
            }
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for LocalIdentityProfileDataSource {
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
#[path = "./data_source_identity_profile_test.rs"]
mod data_source_identity_profile_test;
