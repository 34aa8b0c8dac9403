//! Authentication policy resource

use crate::api::authentication_policies::AuthenticationPolicy;
use crate::common::{policy_tree, resource_link, ConversionError, ObjectReader};
use crate::resources::{
    api_error, call, conversion_error, downcast_provider_data, not_configured, removed_from_state,
    state_or,
};
use async_trait::async_trait;
use std::sync::OnceLock;
use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
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
use tfplug::validator::validate_schema;

const TYPE_NAME: &str = "pingfederate_authentication_policies_policy";
const KIND: &str = "authentication policy";

#[derive(Default)]
pub struct AuthenticationPoliciesPolicyResource {
    provider_data: Option<crate::PingFederateProviderData>,
}

impl AuthenticationPoliciesPolicyResource {
    pub fn new() -> Self {
        Self::default()
    }
}

pub(crate) fn policy_schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Manages an authentication policy tree.")
        .attribute(
            AttributeBuilder::new("policy_id", AttributeType::String)
                .description("The authentication policy ID. ID is unique.")
                .optional()
                .computed()
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
                .description("The authentication policy name. Name is unique.")
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("description", AttributeType::String)
                .description("A description for the authentication policy.")
                .optional()
                .build(),
        )
        .attribute(
            resource_link::attribute(
                "authentication_api_application_ref",
                "Authentication API Application ID to be used in this policy branch. If the value is not specified, no Authentication API Application will be used.",
            )
            .optional()
            .build(),
        )
        .attribute(
            AttributeBuilder::new("enabled", AttributeType::Bool)
                .description("Whether or not this authentication policy tree is enabled. Default is true.")
                .optional()
                .computed()
                .default(StaticDefault::bool(true))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("handle_failures_locally", AttributeType::Bool)
                .description("If a policy ends in failure keep the user local. Default is false.")
                .optional()
                .computed()
                .default(StaticDefault::bool(false))
                .build(),
        )
        .attribute(policy_tree::attribute("root_node").required().build())
        .build()
}

fn schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(policy_schema)
}

pub(crate) fn policy_from_plan(plan: &Dynamic) -> Result<AuthenticationPolicy, ConversionError> {
    let plan = ObjectReader::new(plan, AttributePath::root());
    Ok(AuthenticationPolicy {
        id: plan.optional_string("policy_id")?,
        name: Some(plan.required_string("name")?),
        description: plan.optional_string("description")?,
        authentication_api_application_ref: resource_link::optional_from_plan(
            &plan,
            "authentication_api_application_ref",
        )?,
        enabled: plan.optional_bool("enabled")?,
        root_node: Some(policy_tree::from_plan(&plan, "root_node")?),
        handle_failures_locally: plan.optional_bool("handle_failures_locally")?,
    })
}

pub(crate) fn policy_to_state(
    policy: &AuthenticationPolicy,
    diagnostics: &mut Vec<Diagnostic>,
) -> DynamicValue {
    let root_node = match &policy.root_node {
        Some(root_node) => {
            policy_tree::to_state(root_node, &AttributePath::new("root_node"), diagnostics)
        }
        None => Dynamic::Null,
    };
    DynamicValue::new(Dynamic::object([
        ("id", Dynamic::from(policy.id.clone())),
        ("policy_id", Dynamic::from(policy.id.clone())),
        ("name", Dynamic::from(policy.name.clone())),
        ("description", Dynamic::from(policy.description.clone())),
        (
            "authentication_api_application_ref",
            resource_link::optional_to_state(policy.authentication_api_application_ref.as_ref()),
        ),
        ("enabled", Dynamic::from(policy.enabled.unwrap_or(true))),
        (
            "handle_failures_locally",
            Dynamic::from(policy.handle_failures_locally.unwrap_or(false)),
        ),
        ("root_node", root_node),
    ]))
}

fn policy_id(state: &DynamicValue) -> Option<String> {
    state
        .get_string(&AttributePath::new("policy_id"))
        .or_else(|_| state.get_string(&AttributePath::new("id")))
        .ok()
}

#[async_trait]
impl Resource for AuthenticationPoliciesPolicyResource {
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

        let policy = match policy_from_plan(&request.planned_state.value) {
            Ok(policy) => policy,
            Err(e) => {
                diagnostics.push(conversion_error(
                    "Failed to build authentication policy",
                    &e,
                ));
                return CreateResourceResponse::new(DynamicValue::null(), diagnostics);
            }
        };

        match call(
            &ctx,
            provider_data.client.authentication_policies().policies().create(&policy),
        )
        .await
        {
            Ok(created) => {
                let new_state = policy_to_state(&created, &mut diagnostics);
                CreateResourceResponse::new(
                    state_or(new_state, DynamicValue::null(), &diagnostics),
                    diagnostics,
                )
            }
            Err(e) => {
                diagnostics.push(api_error(
                    "An error occurred while creating the authentication policy",
                    &e,
                ));
                CreateResourceResponse::new(DynamicValue::null(), diagnostics)
            }
        }
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let mut diagnostics = vec![];

        let Some(id) = policy_id(&request.current_state) else {
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
            provider_data.client.authentication_policies().policies().get(&id),
        )
        .await
        {
            Ok(policy) => {
                let new_state = policy_to_state(&policy, &mut diagnostics);
                let new_state = state_or(new_state, request.current_state, &diagnostics);
                ReadResourceResponse::new(Some(new_state), request.private, diagnostics)
            }
            Err(e) if e.is_not_found() => {
                diagnostics.push(removed_from_state(KIND, &id));
                ReadResourceResponse::new(None, request.private, diagnostics)
            }
            Err(e) => {
                diagnostics.push(api_error(
                    "An error occurred while getting the authentication policy",
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

        let policy = match policy_from_plan(&request.planned_state.value) {
            Ok(policy) => policy,
            Err(e) => {
                diagnostics.push(conversion_error(
                    "Failed to build authentication policy",
                    &e,
                ));
                return UpdateResourceResponse::new(request.prior_state, diagnostics);
            }
        };
        let id = policy
            .id
            .clone()
            .or_else(|| policy_id(&request.prior_state))
            .unwrap_or_default();

        match call(
            &ctx,
            provider_data.client.authentication_policies().policies().update(&id, &policy),
        )
        .await
        {
            Ok(updated) => {
                let new_state = policy_to_state(&updated, &mut diagnostics);
                let new_state = state_or(new_state, request.prior_state, &diagnostics);
                UpdateResourceResponse::new(new_state, diagnostics)
            }
            Err(e) => {
                diagnostics.push(api_error(
                    "An error occurred while updating the authentication policy",
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

        let Some(id) = policy_id(&request.prior_state) else {
            return DeleteResourceResponse { diagnostics };
        };

        match call(
            &ctx,
            provider_data.client.authentication_policies().policies().delete(&id),
        )
        .await
        {
            Ok(()) => DeleteResourceResponse { diagnostics },
            Err(e) if e.is_not_found() => DeleteResourceResponse { diagnostics },
            Err(e) => {
                diagnostics.push(api_error(
                    "An error occurred while deleting the authentication policy",
                    &e,
                ));
                DeleteResourceResponse { diagnostics }
            }
        }
    }
}

#[async_trait]
impl ResourceWithModifyPlan for AuthenticationPoliciesPolicyResource {
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
impl ResourceWithImportState for AuthenticationPoliciesPolicyResource {
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
        import_state_passthrough_id(&ctx, AttributePath::new("policy_id"), &request, &mut response);
        response
    }
}

#[async_trait]
impl ResourceWithConfigure for AuthenticationPoliciesPolicyResource {
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
#[path = "./resource_policy_test.rs"]
mod resource_policy_test;
