//! PingFederate provider
//!
//! Manages authentication policy trees and local identity profiles through
//! the PingFederate Admin API.

pub mod api;
pub mod common;
pub mod config;
pub mod data_sources;
pub mod provider_data;
pub mod resources;

pub use provider_data::PingFederateProviderData;

use async_trait::async_trait;
use config::ProviderConfig;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tfplug::context::Context;
use tfplug::data_source::DataSourceWithConfigure;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, DataSourceFactory, Provider,
    ProviderMetaSchemaRequest, ProviderMetaSchemaResponse, ProviderMetadataRequest,
    ProviderMetadataResponse, ProviderSchemaRequest, ProviderSchemaResponse, ResourceFactory,
    StopProviderRequest, StopProviderResponse, ValidateProviderConfigRequest,
    ValidateProviderConfigResponse,
};
use tfplug::resource::ResourceWithConfigure;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, ServerCapabilities};
use tfplug::validator::validate_schema;

const BOOL_ATTRIBUTES: [&str; 2] = ["insecure_trust_all_tls", "x_bypass_external_validation_header"];

#[derive(Default)]
pub struct PingFederateProvider {
    provider_data: Option<PingFederateProviderData>,
}

impl PingFederateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider data handed out after a successful configure
    pub fn provider_data(&self) -> Option<&PingFederateProviderData> {
        self.provider_data.as_ref()
    }
}

fn provider_schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Manages PingFederate configuration through the Admin API.")
        .attribute(
            AttributeBuilder::new("https_host", AttributeType::String)
                .description("URI for PingFederate HTTPS port. Default value can be set with the `PINGFEDERATE_PROVIDER_HTTPS_HOST` environment variable.")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("admin_api_path", AttributeType::String)
                .description("Path for PingFederate Admin API. Default value can be set with the `PINGFEDERATE_PROVIDER_ADMIN_API_PATH` environment variable. If no value is supplied, the value used will be `/pf-admin-api/v1`.")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("username", AttributeType::String)
                .description("Username for PingFederate Admin user. Default value can be set with the `PINGFEDERATE_PROVIDER_USERNAME` environment variable.")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("password", AttributeType::String)
                .description("Password for PingFederate Admin user. Default value can be set with the `PINGFEDERATE_PROVIDER_PASSWORD` environment variable.")
                .optional()
                .sensitive()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("access_token", AttributeType::String)
                .description("Access token for PingFederate Admin API. Cannot be used in conjunction with username and password. Default value can be set with the `PINGFEDERATE_PROVIDER_ACCESS_TOKEN` environment variable.")
                .optional()
                .sensitive()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("insecure_trust_all_tls", AttributeType::Bool)
                .description("Set to true to trust any certificate when connecting to the PingFederate server. This is insecure and should not be enabled outside of testing. Default value can be set with the `PINGFEDERATE_PROVIDER_INSECURE_TRUST_ALL_TLS` environment variable.")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("x_bypass_external_validation_header", AttributeType::Bool)
                .description("Header value in request for PingFederate. The connection test will be bypassed when set to true. Default value can be set with the `PINGFEDERATE_PROVIDER_X_BYPASS_EXTERNAL_VALIDATION_HEADER` environment variable.")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("product_version", AttributeType::String)
                .description("Version of the PingFederate server being configured. Default value can be set with the `PINGFEDERATE_PROVIDER_PRODUCT_VERSION` environment variable.")
                .optional()
                .build(),
        )
        .build()
}

/// Cached provider schema
pub fn schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(provider_schema)
}

#[async_trait]
impl Provider for PingFederateProvider {
    fn type_name(&self) -> &str {
        "pingfederate"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: self.type_name().to_string(),
            server_capabilities: ServerCapabilities {
                plan_destroy: false,
                get_provider_schema_optional: false,
                move_resource_state: false,
            },
        }
    }

    async fn schema(&self, _ctx: Context, _request: ProviderSchemaRequest) -> ProviderSchemaResponse {
        ProviderSchemaResponse {
            schema: schema().clone(),
            diagnostics: vec![],
        }
    }

    async fn meta_schema(
        &self,
        _ctx: Context,
        _request: ProviderMetaSchemaRequest,
    ) -> ProviderMetaSchemaResponse {
        ProviderMetaSchemaResponse {
            schema: None,
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        let config = match ProviderConfig::resolve(&request.config.value) {
            Ok(config) => config,
            Err(diagnostics) => {
                return ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                }
            }
        };

        let client = match api::Client::new(config.client_config()) {
            Ok(client) => client,
            Err(e) => {
                return ConfigureProviderResponse {
                    diagnostics: vec![Diagnostic::error(
                        "Failed to create API client",
                        e.to_string(),
                    )],
                    provider_data: None,
                }
            }
        };

        tracing::info!(
            "Configured PingFederate provider for {} (product version {})",
            config.base_url(),
            config.product_version
        );

        let provider_data = PingFederateProviderData::new(client, config.product_version);
        self.provider_data = Some(provider_data.clone());

        ConfigureProviderResponse {
            diagnostics: vec![],
            provider_data: Some(Arc::new(provider_data)),
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateProviderConfigRequest,
    ) -> ValidateProviderConfigResponse {
        let mut diagnostics = validate_schema(schema(), &request.config);
        let values = &request.config.value;

        for name in BOOL_ATTRIBUTES {
            let value = values.attr(name);
            if value.is_present() && value.as_bool().is_none() {
                diagnostics.push(
                    Diagnostic::error(
                        config::INVALID_PROVIDER_CONFIGURATION,
                        format!("{} must be a boolean, got {}", name, value.type_name()),
                    )
                    .with_attribute(AttributePath::new(name)),
                );
            }
        }

        if let Some(host) = values.attr("https_host").as_str() {
            if let Err(e) = url::Url::parse(host) {
                diagnostics.push(
                    Diagnostic::error(
                        config::INVALID_PROVIDER_CONFIGURATION,
                        format!("https_host '{}' is not a valid URL: {}", host, e),
                    )
                    .with_attribute(AttributePath::new("https_host")),
                );
            }
        }

        ValidateProviderConfigResponse { diagnostics }
    }

    async fn stop(&self, _ctx: Context, _request: StopProviderRequest) -> StopProviderResponse {
        StopProviderResponse { error: None }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let mut factories: HashMap<String, ResourceFactory> = HashMap::new();
        factories.insert(
            "pingfederate_authentication_policies_fragment".to_string(),
            Box::new(|| {
                Box::new(resources::AuthenticationPoliciesFragmentResource::new())
                    as Box<dyn ResourceWithConfigure>
            }),
        );
        factories.insert(
            "pingfederate_authentication_policies_policy".to_string(),
            Box::new(|| {
                Box::new(resources::AuthenticationPoliciesPolicyResource::new())
                    as Box<dyn ResourceWithConfigure>
            }),
        );
        factories.insert(
            "pingfederate_local_identity_profile".to_string(),
            Box::new(|| {
                Box::new(resources::LocalIdentityProfileResource::new())
                    as Box<dyn ResourceWithConfigure>
            }),
        );
        factories
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        let mut factories: HashMap<String, DataSourceFactory> = HashMap::new();
        factories.insert(
            "pingfederate_authentication_policies_fragment".to_string(),
            Box::new(|| {
                Box::new(data_sources::AuthenticationPoliciesFragmentDataSource::new())
                    as Box<dyn DataSourceWithConfigure>
            }),
        );
        factories.insert(
            "pingfederate_authentication_policies_policy".to_string(),
            Box::new(|| {
                Box::new(data_sources::AuthenticationPoliciesPolicyDataSource::new())
                    as Box<dyn DataSourceWithConfigure>
            }),
        );
        factories.insert(
            "pingfederate_local_identity_profile".to_string(),
            Box::new(|| {
                Box::new(data_sources::LocalIdentityProfileDataSource::new())
                    as Box<dyn DataSourceWithConfigure>
            }),
        );
        factories
    }
}
