//! Authentication policy fragment resource

use crate::api::authentication_policies::AuthenticationPolicyFragment;
use crate::common::{policy_tree, resource_link, ConversionError, ObjectReader};
use crate::resources::{
    api_error, call, conversion_error, downcast_provider_data, not_configured, removed_from_state,
    state_or,
};
use async_trait::async_trait;
use std::sync::OnceLock;
use tfplug::context::Context;
use tfplug::import::import_state_passthrough_id;
use tfplug::plan_modifier::{plan_schema, RequiresReplace, UseStateForUnknown};
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
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use tfplug::validator::{validate_schema, StringPattern};

const TYPE_NAME: &str = "pingfederate_authentication_policies_fragment";
const KIND: &str = "authentication policy fragment";

#[derive(Default)]
pub struct AuthenticationPoliciesFragmentResource {
    provider_data: Option<crate::PingFederateProviderData>,
}

impl AuthenticationPoliciesFragmentResource {
    pub fn new() -> Self {
        Self::default()
    }
}

pub(crate) fn fragment_schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Manages an authentication policy fragment.")
        .attribute(
            AttributeBuilder::new("fragment_id", AttributeType::String)
                .description("The authentication policy fragment ID. ID is unique.")
                .optional()
                .computed()
                .validator(StringPattern::create(
                    "^[a-zA-Z0-9._-]+$",
                    "must contain only alphanumeric characters, '.', '_' or '-'",
                ))
                .plan_modifier(RequiresReplace::create())
                .plan_modifier(UseStateForUnknown::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .description("The ID of this resource.")
                .computed()
                .plan_modifier(UseStateForUnknown::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("name", AttributeType::String)
                .description("The authentication policy fragment name. Name is unique.")
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("description", AttributeType::String)
                .description("A description for the authentication policy fragment.")
                .optional()
                .build(),
        )
        .attribute(
            resource_link::attribute(
                "inputs",
                "The reference to the authentication policy contract to use as the attribute inputs for this authentication policy fragment.",
            )
            .optional()
            .build(),
        )
        .attribute(
            resource_link::attribute(
                "outputs",
                "The reference to the authentication policy contract to use as the attribute outputs for this authentication policy fragment.",
            )
            .optional()
            .build(),
        )
        .attribute(policy_tree::attribute("root_node").required().build())
        .build()
}

fn schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(fragment_schema)
}

pub(crate) fn fragment_from_plan(
    plan: &Dynamic,
) -> Result<AuthenticationPolicyFragment, ConversionError> {
    let plan = ObjectReader::new(plan, AttributePath::root());
    Ok(AuthenticationPolicyFragment {
        id: plan.optional_string("fragment_id")?,
        name: plan.required_string("name")?,
        description: plan.optional_string("description")?,
        root_node: policy_tree::from_plan(&plan, "root_node")?,
        inputs: resource_link::optional_from_plan(&plan, "inputs")?,
        outputs: resource_link::optional_from_plan(&plan, "outputs")?,
    })
}

/// State for a fragment returned by the server
pub(crate) fn fragment_to_state(
    fragment: &AuthenticationPolicyFragment,
    diagnostics: &mut Vec<Diagnostic>,
) -> DynamicValue {
    DynamicValue::new(Dynamic::object([
        ("id", Dynamic::from(fragment.id.clone())),
        ("fragment_id", Dynamic::from(fragment.id.clone())),
        ("name", Dynamic::from(fragment.name.clone())),
        ("description", Dynamic::from(fragment.description.clone())),
        ("inputs", resource_link::optional_to_state(fragment.inputs.as_ref())),
        ("outputs", resource_link::optional_to_state(fragment.outputs.as_ref())),
        (
            "root_node",
            policy_tree::to_state(&fragment.root_node, &AttributePath::new("root_node"), diagnostics),
        ),
    ]))
}

fn fragment_id(state: &DynamicValue) -> Option<String> {
    state
        .get_string(&AttributePath::new("fragment_id"))
        .or_else(|_| state.get_string(&AttributePath::new("id")))
        .ok()
}

#[async_trait]
impl Resource for AuthenticationPoliciesFragmentResource {
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
        diagnostics.extend(policy_tree::validate(
            request.config.value.attr("root_node"),
            &AttributePath::new("root_node"),
        ));
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

        let fragment = match fragment_from_plan(&request.planned_state.value) {
            Ok(fragment) => fragment,
            Err(e) => {
                diagnostics.push(conversion_error(
                    "Failed to build authentication policy fragment",
                    &e,
                ));
                return CreateResourceResponse::new(DynamicValue::null(), diagnostics);
            }
        };

        match call(
            &ctx,
            provider_data.client.authentication_policies().fragments().create(&fragment),
        )
        .await
        {
            Ok(created) => {
                let new_state = fragment_to_state(&created, &mut diagnostics);
                CreateResourceResponse::new(
                    state_or(new_state, DynamicValue::null(), &diagnostics),
                    diagnostics,
                )
            }
            Err(e) => {
                diagnostics.push(api_error(
                    "An error occurred while creating the authentication policy fragment",
                    &e,
                ));
                CreateResourceResponse::new(DynamicValue::null(), diagnostics)
            }
        }
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let mut diagnostics = vec![];

        let Some(id) = fragment_id(&request.current_state) else {
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
            provider_data.client.authentication_policies().fragments().get(&id),
        )
        .await
        {
            Ok(fragment) => {
                let new_state = fragment_to_state(&fragment, &mut diagnostics);
                let new_state = state_or(new_state, request.current_state, &diagnostics);
                ReadResourceResponse::new(Some(new_state), request.private, diagnostics)
            }
            Err(e) if e.is_not_found() => {
                diagnostics.push(removed_from_state(KIND, &id));
                ReadResourceResponse::new(None, request.private, diagnostics)
            }
            Err(e) => {
                diagnostics.push(api_error(
                    "An error occurred while getting the authentication policy fragment",
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

        let fragment = match fragment_from_plan(&request.planned_state.value) {
            Ok(fragment) => fragment,
            Err(e) => {
                diagnostics.push(conversion_error(
                    "Failed to build authentication policy fragment",
                    &e,
                ));
                return UpdateResourceResponse::new(request.prior_state, diagnostics);
            }
        };
        let id = fragment
            .id
            .clone()
            .or_else(|| fragment_id(&request.prior_state))
            .unwrap_or_default();

        match call(
            &ctx,
            provider_data.client.authentication_policies().fragments().update(&id, &fragment),
        )
        .await
        {
            Ok(updated) => {
                let new_state = fragment_to_state(&updated, &mut diagnostics);
                let new_state = state_or(new_state, request.prior_state, &diagnostics);
                UpdateResourceResponse::new(new_state, diagnostics)
            }
            Err(e) => {
                diagnostics.push(api_error(
                    "An error occurred while updating the authentication policy fragment",
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

        let Some(id) = fragment_id(&request.prior_state) else {
            return DeleteResourceResponse { diagnostics };
        };

        match call(
            &ctx,
            provider_data.client.authentication_policies().fragments().delete(&id),
        )
        .await
        {
            Ok(()) => DeleteResourceResponse { diagnostics },
            Err(e) if e.is_not_found() => DeleteResourceResponse { diagnostics },
            Err(e) => {
                diagnostics.push(api_error(
                    "An error occurred while deleting the authentication policy fragment",
                    &e,
                ));
                DeleteResourceResponse { diagnostics }
            }
        }
    }
}

#[async_trait]
impl ResourceWithModifyPlan for AuthenticationPoliciesFragmentResource {
    async fn modify_plan(&self, _ctx: Context, request: ModifyPlanRequest) -> ModifyPlanResponse {
        let planned = plan_schema(
            schema(),
            &request.config,
            &request.prior_state,
            &request.proposed_new_state,
        );
        ModifyPlanResponse {
            planned_state: planned.planned_state,
            requires_replace: planned.requires_replace,
            planned_private: request.prior_private,
            diagnostics: planned.diagnostics,
        }
    }
}

#[async_trait]
impl ResourceWithImportState for AuthenticationPoliciesFragmentResource {
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
        import_state_passthrough_id(&ctx, AttributePath::new("fragment_id"), &request, &mut response);
        response
    }
}

#[async_trait]
impl ResourceWithConfigure for AuthenticationPoliciesFragmentResource {
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
#[path = "./resource_fragment_test.rs"]
mod resource_fragment_test;
