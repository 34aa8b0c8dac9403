#![allow(clippy::disallowed_methods)]

use mockito::{Matcher, Server};
use pingfederate::PingFederateProvider;
use serial_test::serial;
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, DataSource, DataSourceWithConfigure, ReadDataSourceRequest,
};
use tfplug::provider::{ConfigureProviderRequest, Provider};
use tfplug::resource::{
    ConfigureResourceRequest, CreateResourceRequest, ModifyPlanRequest, Resource,
    ResourceWithConfigure, ResourceWithModifyPlan,
};
use tfplug::types::{ClientCapabilities, Dynamic, DynamicValue};

const FRAGMENT_BODY: &str = r#"{
    "id": "frag1",
    "name": "Done Fragment",
    "rootNode": {"action": {"type": "DONE", "context": "Done"}}
}"#;

async fn configured_provider(url: &str) -> (PingFederateProvider, Arc<dyn Any + Send + Sync>) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    std::env::remove_var("PINGFEDERATE_TF_APPEND_USER_AGENT");
    std::env::remove_var("PINGFEDERATE_PROVIDER_ACCESS_TOKEN");

    let mut provider = PingFederateProvider::new();
    let response = provider
        .configure(
            Context::new(),
            ConfigureProviderRequest {
                terraform_version: "1.9.0".to_string(),
                config: DynamicValue::new(Dynamic::object([
                    ("https_host", Dynamic::from(url)),
                    ("admin_api_path", Dynamic::from("/pf-admin-api/v1")),
                    ("username", Dynamic::from("administrator")),
                    ("password", Dynamic::from("2FederateM0re")),
                    ("product_version", Dynamic::from("12.2")),
                    ("x_bypass_external_validation_header", Dynamic::Bool(true)),
                ])),
                client_capabilities: ClientCapabilities::default(),
            },
        )
        .await;
    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    let provider_data = response.provider_data.unwrap();
    (provider, provider_data)
}

fn fragment_config() -> Dynamic {
    Dynamic::object([
        ("fragment_id", Dynamic::from("frag1")),
        ("id", Dynamic::Null),
        ("name", Dynamic::from("Done Fragment")),
        ("description", Dynamic::Null),
        ("inputs", Dynamic::Null),
        ("outputs", Dynamic::Null),
        (
            "root_node",
            Dynamic::object([
                (
                    "action",
                    Dynamic::object([(
                        "done_policy_action",
                        Dynamic::object([("context", Dynamic::from("Done"))]),
                    )]),
                ),
                ("children", Dynamic::Null),
            ]),
        ),
    ])
}

#[tokio::test]
#[serial]
async fn test_fragment_lifecycle_through_provider() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/pf-admin-api/v1/authenticationPolicies/fragments")
        .match_header("x-xsrf-header", "PingFederate")
        .match_header("x-bypassexternalvalidation", "true")
        .match_header(
            "authorization",
            "Basic YWRtaW5pc3RyYXRvcjoyRmVkZXJhdGVNMHJl",
        )
        .match_header(
            "user-agent",
            Matcher::Regex(r"^terraform-provider-pingfederate/\S+ 12\.2$".to_string()),
        )
        .match_body(Matcher::PartialJson(json!({
            "id": "frag1",
            "name": "Done Fragment",
            "rootNode": {"action": {"type": "DONE", "context": "Done"}}
        })))
        .with_status(200)
        .with_body(FRAGMENT_BODY)
        .create_async()
        .await;

    let (provider, provider_data) = configured_provider(&server.url()).await;

    let mut resource = provider
        .resources()
        .remove("pingfederate_authentication_policies_fragment")
        .unwrap()();
    let configured = resource
        .configure(
            Context::new(),
            ConfigureResourceRequest {
                provider_data: Some(provider_data.clone()),
            },
        )
        .await;
    assert!(configured.diagnostics.is_empty());

    let mut proposed = fragment_config();
    if let Dynamic::Map(map) = &mut proposed {
        map.insert("id".to_string(), Dynamic::Unknown);
    }
    let planned = resource
        .as_modify_plan()
        .unwrap()
        .modify_plan(
            Context::new(),
            ModifyPlanRequest {
                type_name: "pingfederate_authentication_policies_fragment".to_string(),
                config: DynamicValue::new(fragment_config()),
                prior_state: DynamicValue::null(),
                proposed_new_state: DynamicValue::new(proposed),
                prior_private: vec![],
                provider_meta: None,
            },
        )
        .await;
    assert!(planned.diagnostics.is_empty(), "{:?}", planned.diagnostics);

    let created = resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "pingfederate_authentication_policies_fragment".to_string(),
                planned_state: planned.planned_state,
                config: DynamicValue::new(fragment_config()),
                planned_private: vec![],
                provider_meta: None,
            },
        )
        .await;

    create.assert_async().await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    assert_eq!(created.new_state.value.attr("id").as_str(), Some("frag1"));
    assert_eq!(
        created
            .new_state
            .value
            .attr("root_node")
            .attr("action")
            .attr("done_policy_action")
            .attr("context")
            .as_str(),
        Some("Done")
    );
}

#[tokio::test]
#[serial]
async fn test_data_source_reads_through_provider() {
    let mut server = Server::new_async().await;
    let get = server
        .mock("GET", "/pf-admin-api/v1/authenticationPolicies/fragments/frag1")
        .match_header("x-xsrf-header", "PingFederate")
        .with_status(200)
        .with_body(FRAGMENT_BODY)
        .create_async()
        .await;

    let (provider, provider_data) = configured_provider(&server.url()).await;

    let mut data_source = provider
        .data_sources()
        .remove("pingfederate_authentication_policies_fragment")
        .unwrap()();
    let configured = data_source
        .configure(
            Context::new(),
            ConfigureDataSourceRequest {
                provider_data: Some(provider_data),
            },
        )
        .await;
    assert!(configured.diagnostics.is_empty());

    let response = data_source
        .read(
            Context::new(),
            ReadDataSourceRequest {
                type_name: "pingfederate_authentication_policies_fragment".to_string(),
                config: DynamicValue::new(Dynamic::object([(
                    "fragment_id",
                    Dynamic::from("frag1"),
                )])),
                provider_meta: None,
                client_capabilities: ClientCapabilities::default(),
            },
        )
        .await;

    get.assert_async().await;
    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    assert_eq!(
        response.state.value.attr("name").as_str(),
        Some("Done Fragment")
    );
}

#[tokio::test]
#[serial]
async fn test_resources_reject_foreign_provider_data() {
    let provider = PingFederateProvider::new();
    for (name, factory) in provider.resources() {
        let mut resource = factory();
        let response = resource
            .configure(
                Context::new(),
                ConfigureResourceRequest {
                    provider_data: Some(Arc::new(42_u32)),
                },
            )
            .await;
        assert_eq!(response.diagnostics.len(), 1, "{}", name);
        assert_eq!(response.diagnostics[0].summary, "Invalid provider data");
    }
}
