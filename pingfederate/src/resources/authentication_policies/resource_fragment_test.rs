#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::super::*;
    use crate::api::test_helpers::create_test_provider_data;
    use crate::common::policy_action;
    use mockito::{Matcher, Server};
    use std::sync::Arc;
    use tfplug::resource::ResourceWithConfigure;
    use tfplug::types::ClientCapabilities;

    fn link(id: &str) -> Dynamic {
        Dynamic::object([("id", Dynamic::from(id)), ("location", Dynamic::Unknown)])
    }

    fn action(name: &str, body: Dynamic) -> Dynamic {
        Dynamic::object([(name, body)])
    }

    fn done(context: &str) -> Dynamic {
        action(
            policy_action::DONE,
            Dynamic::object([("context", Dynamic::from(context))]),
        )
    }

    fn planned_state() -> DynamicValue {
        DynamicValue::new(Dynamic::object([
            ("fragment_id", Dynamic::from("frag1")),
            ("id", Dynamic::Unknown),
            ("name", Dynamic::from("First Factor")),
            ("description", Dynamic::Null),
            ("inputs", Dynamic::Null),
            ("outputs", Dynamic::Null),
            (
                "root_node",
                Dynamic::object([
                    (
                        "action",
                        action(
                            policy_action::AUTHN_SOURCE,
                            Dynamic::object([(
                                "authentication_source",
                                Dynamic::object([
                                    ("type", Dynamic::from("IDP_ADAPTER")),
                                    ("source_ref", link("htmlform")),
                                ]),
                            )]),
                        ),
                    ),
                    (
                        "children",
                        Dynamic::List(vec![
                            Dynamic::object([
                                ("action", done("Success")),
                                ("children", Dynamic::List(vec![])),
                            ]),
                            Dynamic::object([
                                (
                                    "action",
                                    action(
                                        policy_action::CONTINUE,
                                        Dynamic::object([("context", Dynamic::from("Fail"))]),
                                    ),
                                ),
                                ("children", Dynamic::List(vec![])),
                            ]),
                        ]),
                    ),
                ]),
            ),
        ]))
    }

    const FRAGMENT_RESPONSE: &str = r#"{
        "id": "frag1",
        "name": "First Factor",
        "rootNode": {
            "action": {
                "type": "AUTHN_SOURCE",
                "authenticationSource": {
                    "type": "IDP_ADAPTER",
                    "sourceRef": {"id": "htmlform", "location": "https://localhost:9999/pf-admin-api/v1/idp/adapters/htmlform"}
                }
            },
            "children": [
                {"action": {"type": "DONE", "context": "Success"}},
                {"action": {"type": "CONTINUE", "context": "Fail"}}
            ]
        }
    }"#;

    fn configured(server_url: &str) -> AuthenticationPoliciesFragmentResource {
        AuthenticationPoliciesFragmentResource {
            provider_data: Some(create_test_provider_data(server_url)),
        }
    }

    fn validate_request(config: DynamicValue) -> ValidateResourceConfigRequest {
        ValidateResourceConfigRequest {
            type_name: TYPE_NAME.to_string(),
            config,
            client_capabilities: ClientCapabilities::default(),
        }
    }

    fn read_request(state: DynamicValue) -> ReadResourceRequest {
        ReadResourceRequest {
            type_name: TYPE_NAME.to_string(),
            current_state: state,
            private: vec![],
            provider_meta: None,
            client_capabilities: ClientCapabilities::default(),
            current_identity: None,
        }
    }

    fn state_with_id(id: &str) -> DynamicValue {
        DynamicValue::new(Dynamic::object([
            ("fragment_id", Dynamic::from(id)),
            ("id", Dynamic::from(id)),
        ]))
    }

    #[test]
    fn test_resource_type_name() {
        let resource = AuthenticationPoliciesFragmentResource::new();
        assert_eq!(resource.type_name(), "pingfederate_authentication_policies_fragment");
    }

    #[tokio::test]
    async fn test_resource_schema() {
        let resource = AuthenticationPoliciesFragmentResource::new();
        let response = resource.schema(Context::new(), ResourceSchemaRequest).await;

        assert!(response.diagnostics.is_empty());
        let attrs = &response.schema.block.attributes;
        assert!(attrs.iter().any(|a| a.name == "name" && a.required));
        assert!(attrs.iter().any(|a| a.name == "root_node" && a.required));
        assert!(attrs
            .iter()
            .any(|a| a.name == "fragment_id" && a.optional && a.computed));
        assert!(attrs.iter().any(|a| a.name == "id" && a.computed && !a.optional));
    }

    #[tokio::test]
    async fn test_validate_valid_config() {
        let resource = AuthenticationPoliciesFragmentResource::new();
        let response = resource
            .validate(Context::new(), validate_request(planned_state()))
            .await;
        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    }

    #[tokio::test]
    async fn test_validate_rejects_bad_fragment_id_and_two_actions() {
        let resource = AuthenticationPoliciesFragmentResource::new();
        let mut config = planned_state();
        config
            .set_string(&AttributePath::new("fragment_id"), "bad id!".to_string())
            .unwrap();
        let root = match &mut config.value {
            Dynamic::Map(m) => m.get_mut("root_node").unwrap(),
            _ => unreachable!(),
        };
        if let Dynamic::Map(node) = root {
            node.insert(
                "action".to_string(),
                Dynamic::object([
                    (policy_action::DONE, Dynamic::object([("context", Dynamic::Null)])),
                    (policy_action::RESTART, Dynamic::object([("context", Dynamic::Null)])),
                ]),
            );
        }

        let response = resource.validate(Context::new(), validate_request(config)).await;
        assert_eq!(response.diagnostics.len(), 2, "{:?}", response.diagnostics);
        assert!(response
            .diagnostics
            .iter()
            .any(|d| d.summary == "Invalid policy action"
                && d.attribute.as_ref().unwrap().to_string() == "root_node.action"));
        assert!(response
            .diagnostics
            .iter()
            .any(|d| d.attribute.as_ref().unwrap().to_string() == "fragment_id"));
    }

    #[tokio::test]
    async fn test_create_without_provider_data() {
        let resource = AuthenticationPoliciesFragmentResource::new();
        let request = CreateResourceRequest {
            type_name: TYPE_NAME.to_string(),
            planned_state: planned_state(),
            config: planned_state(),
            planned_private: vec![],
            provider_meta: None,
        };
        let response = resource.create(Context::new(), request).await;
        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].summary, "Provider not configured");
        assert!(response.new_state.is_null());
    }

    #[tokio::test]
    async fn test_create_successful() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/authenticationPolicies/fragments")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "id": "frag1",
                "name": "First Factor",
                "rootNode": {
                    "action": {
                        "type": "AUTHN_SOURCE",
                        "authenticationSource": {"type": "IDP_ADAPTER", "sourceRef": {"id": "htmlform"}}
                    },
                    "children": [
                        {"action": {"type": "DONE", "context": "Success"}, "children": []},
                        {"action": {"type": "CONTINUE", "context": "Fail"}, "children": []}
                    ]
                }
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(FRAGMENT_RESPONSE)
            .create_async()
            .await;

        let resource = configured(&server.url());
        let request = CreateResourceRequest {
            type_name: TYPE_NAME.to_string(),
            planned_state: planned_state(),
            config: planned_state(),
            planned_private: vec![],
            provider_meta: None,
        };
        let response = resource.create(Context::new(), request).await;

        mock.assert_async().await;
        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        let state = &response.new_state;
        assert_eq!(state.get_string(&AttributePath::new("id")).unwrap(), "frag1");
        assert_eq!(
            state
                .get_string(
                    &AttributePath::new("root_node")
                        .attribute("action")
                        .attribute(policy_action::AUTHN_SOURCE)
                        .attribute("authentication_source")
                        .attribute("source_ref")
                        .attribute("location")
                )
                .unwrap(),
            "https://localhost:9999/pf-admin-api/v1/idp/adapters/htmlform"
        );
        let children = state.value.attr("root_node").attr("children").as_list().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].attr("children"), &Dynamic::List(vec![]));
        assert!(children[1].attr("action").attr(policy_action::DONE).is_null());
    }

    #[tokio::test]
    async fn test_create_reports_conversion_error_without_calling_api() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/authenticationPolicies/fragments")
            .expect(0)
            .create_async()
            .await;

        let mut planned = planned_state();
        if let Dynamic::Map(m) = &mut planned.value {
            m.insert(
                "root_node".to_string(),
                Dynamic::object([("action", Dynamic::object([(policy_action::DONE, Dynamic::Null)]))]),
            );
        }
        let resource = configured(&server.url());
        let request = CreateResourceRequest {
            type_name: TYPE_NAME.to_string(),
            planned_state: planned.clone(),
            config: planned,
            planned_private: vec![],
            provider_meta: None,
        };
        let response = resource.create(Context::new(), request).await;

        mock.assert_async().await;
        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics[0].summary,
            "Failed to build authentication policy fragment"
        );
        assert!(response.diagnostics[0]
            .detail
            .starts_with("no valid policy action type found"));
        assert!(response.new_state.is_null());
    }

    #[tokio::test]
    async fn test_create_reports_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/authenticationPolicies/fragments")
            .with_status(422)
            .with_body(
                r#"{"resultId":"validation_error","message":"Validation error(s) occurred.",
                "validationErrors":[{"message":"Unknown adapter","fieldPath":"rootNode.action.authenticationSource"}]}"#,
            )
            .create_async()
            .await;

        let resource = configured(&server.url());
        let request = CreateResourceRequest {
            type_name: TYPE_NAME.to_string(),
            planned_state: planned_state(),
            config: planned_state(),
            planned_private: vec![],
            provider_meta: None,
        };
        let response = resource.create(Context::new(), request).await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics[0].summary,
            "An error occurred while creating the authentication policy fragment"
        );
        assert!(response.diagnostics[0].detail.contains("Unknown adapter"));
        assert!(response.new_state.is_null());
    }

    #[tokio::test]
    async fn test_read_successful() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/authenticationPolicies/fragments/frag1")
            .with_body(FRAGMENT_RESPONSE)
            .create_async()
            .await;

        let resource = configured(&server.url());
        let response = resource
            .read(Context::new(), read_request(state_with_id("frag1")))
            .await;

        mock.assert_async().await;
        assert!(response.diagnostics.is_empty());
        let state = response.new_state.unwrap();
        assert_eq!(
            state.get_string(&AttributePath::new("fragment_id")).unwrap(),
            "frag1"
        );
        assert_eq!(
            state.get_string(&AttributePath::new("name")).unwrap(),
            "First Factor"
        );
        assert!(state.value.attr("inputs").is_null());
    }

    #[tokio::test]
    async fn test_read_not_found_removes_resource() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/authenticationPolicies/fragments/gone")
            .with_status(404)
            .with_body(r#"{"resultId":"resource_not_found","message":"Resource not found."}"#)
            .create_async()
            .await;

        let resource = configured(&server.url());
        let response = resource
            .read(Context::new(), read_request(state_with_id("gone")))
            .await;

        assert!(response.new_state.is_none());
        assert_eq!(response.diagnostics.len(), 1);
        assert!(!response.diagnostics[0].is_error());
        assert_eq!(response.diagnostics[0].summary, "Resource not found");
    }

    #[tokio::test]
    async fn test_read_reports_server_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/authenticationPolicies/fragments/frag1")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let resource = configured(&server.url());
        let response = resource
            .read(Context::new(), read_request(state_with_id("frag1")))
            .await;

        assert!(response.new_state.is_some());
        assert_eq!(
            response.diagnostics[0].summary,
            "An error occurred while getting the authentication policy fragment"
        );
    }

    #[tokio::test]
    async fn test_update_successful() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/authenticationPolicies/fragments/frag1")
            .match_body(Matcher::PartialJson(serde_json::json!({"name": "First Factor"})))
            .with_body(FRAGMENT_RESPONSE)
            .create_async()
            .await;

        let resource = configured(&server.url());
        let request = UpdateResourceRequest {
            type_name: TYPE_NAME.to_string(),
            prior_state: state_with_id("frag1"),
            planned_state: planned_state(),
            config: planned_state(),
            planned_private: vec![],
            provider_meta: None,
            planned_identity: None,
        };
        let response = resource.update(Context::new(), request).await;

        mock.assert_async().await;
        assert!(response.diagnostics.is_empty());
        assert_eq!(
            response.new_state.get_string(&AttributePath::new("id")).unwrap(),
            "frag1"
        );
    }

    #[tokio::test]
    async fn test_update_unrecognized_action_keeps_prior_state() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("PUT", "/authenticationPolicies/fragments/frag1")
            .with_body(
                r#"{"id": "frag1", "name": "First Factor",
                    "rootNode": {"action": {"type": "SOMETHING_NEW"}}}"#,
            )
            .create_async()
            .await;

        let resource = configured(&server.url());
        let request = UpdateResourceRequest {
            type_name: TYPE_NAME.to_string(),
            prior_state: state_with_id("frag1"),
            planned_state: planned_state(),
            config: planned_state(),
            planned_private: vec![],
            provider_meta: None,
            planned_identity: None,
        };
        let response = resource.update(Context::new(), request).await;

        assert!(response.diagnostics.iter().any(|d| d.is_error()));
        assert_eq!(response.new_state, state_with_id("frag1"));
    }

    #[tokio::test]
    async fn test_delete_treats_not_found_as_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/authenticationPolicies/fragments/frag1")
            .with_status(404)
            .create_async()
            .await;

        let resource = configured(&server.url());
        let request = DeleteResourceRequest {
            type_name: TYPE_NAME.to_string(),
            prior_state: state_with_id("frag1"),
            planned_private: vec![],
            provider_meta: None,
        };
        let response = resource.delete(Context::new(), request).await;

        mock.assert_async().await;
        assert!(response.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_delete_reports_server_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/authenticationPolicies/fragments/frag1")
            .with_status(422)
            .with_body(r#"{"resultId":"in_use","message":"The fragment is in use."}"#)
            .create_async()
            .await;

        let resource = configured(&server.url());
        let request = DeleteResourceRequest {
            type_name: TYPE_NAME.to_string(),
            prior_state: state_with_id("frag1"),
            planned_private: vec![],
            provider_meta: None,
        };
        let response = resource.delete(Context::new(), request).await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics[0].summary,
            "An error occurred while deleting the authentication policy fragment"
        );
        assert!(response.diagnostics[0].detail.contains("The fragment is in use."));
    }

    #[tokio::test]
    async fn test_modify_plan_fills_defaults_and_requires_replace() {
        let resource = AuthenticationPoliciesFragmentResource::new();
        let config = DynamicValue::new(Dynamic::object([
            ("fragment_id", Dynamic::from("frag2")),
            ("name", Dynamic::from("First Factor")),
            (
                "root_node",
                Dynamic::object([("action", done("Success")), ("children", Dynamic::Null)]),
            ),
        ]));
        let mut proposed = config.clone();
        if let Dynamic::Map(m) = &mut proposed.value {
            m.insert("id".to_string(), Dynamic::Unknown);
        }

        let request = ModifyPlanRequest {
            type_name: TYPE_NAME.to_string(),
            config,
            prior_state: state_with_id("frag1"),
            proposed_new_state: proposed,
            prior_private: vec![],
            provider_meta: None,
        };
        let response = resource.modify_plan(Context::new(), request).await;

        assert!(response.diagnostics.is_empty());
        assert_eq!(
            response.planned_state.value.attr("root_node").attr("children"),
            &Dynamic::List(vec![])
        );
        assert_eq!(
            response.planned_state.get_string(&AttributePath::new("id")).unwrap(),
            "frag1"
        );
        assert_eq!(response.requires_replace, vec![AttributePath::new("fragment_id")]);
    }

    #[tokio::test]
    async fn test_import_state() {
        let resource = AuthenticationPoliciesFragmentResource::new();
        let request = ImportResourceStateRequest {
            type_name: TYPE_NAME.to_string(),
            id: "frag1".to_string(),
            client_capabilities: ClientCapabilities::default(),
            identity: None,
        };
        let response = resource.import_state(Context::new(), request).await;

        assert!(response.diagnostics.is_empty());
        assert_eq!(response.imported_resources.len(), 1);
        assert_eq!(
            response.imported_resources[0]
                .state
                .get_string(&AttributePath::new("fragment_id"))
                .unwrap(),
            "frag1"
        );
    }

    #[tokio::test]
    async fn test_configure_resource() {
        let mut resource = AuthenticationPoliciesFragmentResource::new();
        let data: Arc<dyn std::any::Any + Send + Sync> =
            Arc::new(create_test_provider_data("http://localhost"));
        let response = resource
            .configure(
                Context::new(),
                ConfigureResourceRequest {
                    provider_data: Some(data),
                },
            )
            .await;
        assert!(response.diagnostics.is_empty());
        assert!(resource.provider_data.is_some());
        assert!(resource.as_modify_plan().is_some());
        assert!(resource.as_import_state().is_some());

        let response = resource
            .configure(
                Context::new(),
                ConfigureResourceRequest {
                    provider_data: Some(Arc::new("wrong type")),
                },
            )
            .await;
        assert_eq!(response.diagnostics[0].summary, "Invalid provider data");
    }
}
