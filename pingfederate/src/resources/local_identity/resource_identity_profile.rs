//! Local identity profile resource

use super::convert::{profile_from_plan, profile_to_state};
use super::plan::apply_profile_defaults;
use super::schema::profile_schema;
use super::validate::validate_profile;
use crate::resources::{
    api_error, call, conversion_error, downcast_provider_data, not_configured, removed_from_state,
};
use async_trait::async_trait;
use std::sync::OnceLock;
use tfplug::context::Context;
use tfplug::import::import_state_passthrough_id;
use tfplug::plan_modifier::plan_schema;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ModifyPlanRequest,
    ModifyPlanResponse, ReadResourceRequest, ReadResourceResponse, Resource,
    ResourceMetadataRequest, ResourceMetadataResponse, ResourceSchemaRequest,
    ResourceSchemaResponse, ResourceWithConfigure, ResourceWithImportState,
    ResourceWithModifyPlan, UpdateResourceRequest, UpdateResourceResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::Schema;
use tfplug::types::{AttributePath, DynamicValue};
use tfplug::validator::validate_schema;

const TYPE_NAME: &str = "pingfederate_local_identity_profile";
const KIND: &str = "local identity profile";

#[derive(Default)]
pub struct LocalIdentityProfileResource {
    provider_data: Option<crate::PingFederateProviderData>,
}

impl LocalIdentityProfileResource {
    pub fn new() -> Self {
        Self::default()
    }
}

fn schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(profile_schema)
}

fn profile_id(state: &DynamicValue) -> Option<String> {
    state
        .get_string(&AttributePath::new("profile_id"))
        .or_else(|_| state.get_string(&AttributePath::new("id")))
        .ok()
}

#[async_trait]
impl Resource for LocalIdentityProfileResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        ResourceSchemaResponse {
            schema: schema().clone(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        let mut diagnostics = validate_schema(schema(), &request.config);
        diagnostics.extend(validate_profile(&request.config.value));
        ValidateResourceConfigResponse { diagnostics }
    }

    async fn create(
        &self,
        ctx: Context,
        request: CreateResourceRequest,
    ) -> CreateResourceResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return CreateResourceResponse::new(DynamicValue::null(), diagnostics);
            }
        };

        let profile = match profile_from_plan(&request.planned_state.value) {
            Ok(profile) => profile,
            Err(e) => {
                diagnostics.push(conversion_error(
                    "Failed to add optional properties to add request for a local identity profile",
                    &e,
                ));
                return CreateResourceResponse::new(DynamicValue::null(), diagnostics);
            }
        };

        match call(
            &ctx,
            provider_data.client.local_identity().identity_profiles().create(&profile),
        )
        .await
        {
            Ok(created) => {
                let new_state = profile_to_state(&created);
                CreateResourceResponse::new(new_state, diagnostics)
            }
            Err(e) => {
                diagnostics.push(api_error(
                    "An error occurred while creating the local identity profile",
                    &e,
                ));
                CreateResourceResponse::new(DynamicValue::null(), diagnostics)
            }
        }
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let mut diagnostics = vec![];

        let Some(id) = profile_id(&request.current_state) else {
            return ReadResourceResponse::new(None, request.private, diagnostics);
        };

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return ReadResourceResponse::new(
                    Some(request.current_state),
                    request.private,
                    diagnostics,
                );
            }
        };

        match call(
            &ctx,
            provider_data.client.local_identity().identity_profiles().get(&id),
        )
        .await
        {
            Ok(profile) => {
                let new_state = profile_to_state(&profile);
                ReadResourceResponse::new(Some(new_state), request.private, diagnostics)
            }
            Err(e) if e.is_not_found() => {
                diagnostics.push(removed_from_state(KIND, &id));
                ReadResourceResponse::new(None, request.private, diagnostics)
            }
            Err(e) => {
                diagnostics.push(api_error(
                    "An error occurred while getting the local identity profile",
                    &e,
                ));
                ReadResourceResponse::new(Some(request.current_state), request.private, diagnostics)
            }
        }
    }

    async fn update(
        &self,
        ctx: Context,
        request: UpdateResourceRequest,
    ) -> UpdateResourceResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return UpdateResourceResponse::new(request.prior_state, diagnostics);
            }
        };

        let profile = match profile_from_plan(&request.planned_state.value) {
            Ok(profile) => profile,
            Err(e) => {
                diagnostics.push(conversion_error(
                    "Failed to add optional properties to add request for a local identity profile",
                    &e,
                ));
                return UpdateResourceResponse::new(request.prior_state, diagnostics);
            }
        };
        let id = profile
            .id
            .clone()
            .or_else(|| profile_id(&request.prior_state))
            .unwrap_or_default();

        match call(
            &ctx,
            provider_data.client.local_identity().identity_profiles().update(&id, &profile),
        )
        .await
        {
            Ok(updated) => {
                let new_state = profile_to_state(&updated);
                UpdateResourceResponse::new(new_state, diagnostics)
            }
            Err(e) => {
                diagnostics.push(api_error(
                    "An error occurred while updating the local identity profile",
                    &e,
                ));
                UpdateResourceResponse::new(request.prior_state, diagnostics)
            }
        }
    }

    async fn delete(
        &self,
        ctx: Context,
        request: DeleteResourceRequest,
    ) -> DeleteResourceResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return DeleteResourceResponse { diagnostics };
            }
        };

        let Some(id) = profile_id(&request.prior_state) else {
            return DeleteResourceResponse { diagnostics };
        };

        match call(
            &ctx,
            provider_data.client.local_identity().identity_profiles().delete(&id),
        )
        .await
        {
            Ok(()) => DeleteResourceResponse { diagnostics },
            Err(e) if e.is_not_found() => DeleteResourceResponse { diagnostics },
            Err(e) => {
                diagnostics.push(api_error(
                    "An error occurred while deleting the local identity profile",
                    &e,
                ));
                DeleteResourceResponse { diagnostics }
            }
        }
    }
}

#[async_trait]
impl ResourceWithModifyPlan for LocalIdentityProfileResource {
    async fn modify_plan(&self, _ctx: Context, request: ModifyPlanRequest) -> ModifyPlanResponse {
        let mut planned = plan_schema(
            schema(),
            &request.config,
            &request.prior_state,
            &request.proposed_new_state,
        );
        apply_profile_defaults(&mut planned.planned_state.value);
        ModifyPlanResponse {
            planned_state: planned.planned_state,
            requires_replace: planned.requires_replace,
            planned_private: request.prior_private,
            diagnostics: planned.diagnostics,
        }
    }
}

#[async_trait]
impl ResourceWithImportState for LocalIdentityProfileResource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
            deferred: None,
        };
        import_state_passthrough_id(&ctx, AttributePath::new("profile_id"), &request, &mut response);
        response
    }
}

#[async_trait]
impl ResourceWithConfigure for LocalIdentityProfileResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        let mut diagnostics = vec![];
        if let Some(data) =
            downcast_provider_data(request.provider_data, "resource", &mut diagnostics)
        {
            self.provider_data = Some(data);
        }
        ConfigureResourceResponse { diagnostics }
    }

    fn as_modify_plan(&self) -> Option<&dyn ResourceWithModifyPlan> {
        Some(self)
    }

    fn as_import_state(&self) -> Option<&dyn ResourceWithImportState> {
        Some(self)
    }
}

#[cfg(test)]
#[path = "./resource_identity_profile_test.rs"]
mod resource_identity_profile_test;
