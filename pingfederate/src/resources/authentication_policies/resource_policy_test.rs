#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::super::*;
    use crate::api::test_helpers::create_test_provider_data;
    use crate::common::policy_action;
    use mockito::{Matcher, Server};
    use tfplug::types::ClientCapabilities;

    fn config() -> DynamicValue {
        DynamicValue::new(Dynamic::object([
            ("name", Dynamic::from("Default Policy")),
            ("description", Dynamic::Null),
            (
                "root_node",
                Dynamic::object([
                    (
                        "action",
                        Dynamic::object([(
                            policy_action::FRAGMENT,
                            Dynamic::object([(
                                "fragment",
                                Dynamic::object([("id", Dynamic::from("frag1"))]),
                            )]),
                        )]),
                    ),
                    (
                        "children",
                        Dynamic::List(vec![Dynamic::object([(
                            "action",
                            Dynamic::object([(
                                policy_action::DONE,
                                Dynamic::object([("context", Dynamic::from("Success"))]),
                            )]),
                        )])]),
                    ),
                ]),
            ),
        ]))
    }

    /// Plan for a new policy, as proposed before defaults apply
    fn proposed() -> DynamicValue {
        let mut proposed = config();
        if let Dynamic::Map(m) = &mut proposed.value {
            m.insert("policy_id".to_string(), Dynamic::Unknown);
            m.insert("id".to_string(), Dynamic::Unknown);
            m.insert("enabled".to_string(), Dynamic::Unknown);
            m.insert("handle_failures_locally".to_string(), Dynamic::Unknown);
        }
        proposed
    }

    const POLICY_RESPONSE: &str = r#"{
        "id": "pol1",
        "name": "Default Policy",
        "enabled": true,
        "handleFailuresLocally": false,
        "rootNode": {
            "action": {"type": "FRAGMENT", "fragment": {"id": "frag1"}},
            "children": [{"action": {"type": "DONE", "context": "Success"}}]
        }
    }"#;

    fn configured(server_url: &str) -> AuthenticationPoliciesPolicyResource {
        AuthenticationPoliciesPolicyResource {
            provider_data: Some(create_test_provider_data(server_url)),
        }
    }

    async fn planned() -> DynamicValue {
        let resource = AuthenticationPoliciesPolicyResource::new();
        let response = resource
            .modify_plan(
                Context::new(),
                ModifyPlanRequest {
                    type_name: TYPE_NAME.to_string(),
                    config: config(),
                    prior_state: DynamicValue::null(),
                    proposed_new_state: proposed(),
                    prior_private: vec![],
                    provider_meta: None,
                },
            )
            .await;
        assert!(response.diagnostics.is_empty());
        assert!(response.requires_replace.is_empty());
        response.planned_state
    }

    #[test]
    fn test_resource_type_name() {
        let resource = AuthenticationPoliciesPolicyResource::new();
        assert_eq!(resource.type_name(), "pingfederate_authentication_policies_policy");
    }

    #[tokio::test]
    async fn test_modify_plan_applies_defaults() {
        let planned = planned().await;
        assert!(planned.get_bool(&AttributePath::new("enabled")).unwrap());
        assert!(!planned
            .get_bool(&AttributePath::new("handle_failures_locally"))
            .unwrap());
        assert!(planned.value.attr("policy_id").is_unknown());

        let child = &planned.value.attr("root_node").attr("children").as_list().unwrap()[0];
        assert_eq!(child.attr("children"), &Dynamic::List(vec![]));
    }

    #[tokio::test]
    async fn test_modify_plan_skips_destroy() {
        let resource = AuthenticationPoliciesPolicyResource::new();
        let response = resource
            .modify_plan(
                Context::new(),
                ModifyPlanRequest {
                    type_name: TYPE_NAME.to_string(),
                    config: DynamicValue::null(),
                    prior_state: config(),
                    proposed_new_state: DynamicValue::null(),
                    prior_private: vec![],
                    provider_meta: None,
                },
            )
            .await;
        assert!(response.planned_state.is_null());
    }

    #[tokio::test]
    async fn test_create_sends_defaults() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/authenticationPolicies/policy")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "name": "Default Policy",
                "enabled": true,
                "handleFailuresLocally": false,
                "rootNode": {"action": {"type": "FRAGMENT", "fragment": {"id": "frag1"}}}
            })))
            .with_body(POLICY_RESPONSE)
            .create_async()
            .await;

        let planned = planned().await;
        let resource = configured(&server.url());
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: TYPE_NAME.to_string(),
                    planned_state: planned,
                    config: config(),
                    planned_private: vec![],
                    provider_meta: None,
                },
            )
            .await;

        mock.assert_async().await;
        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(
            response.new_state.get_string(&AttributePath::new("policy_id")).unwrap(),
            "pol1"
        );
        assert!(response
            .new_state
            .value
            .attr("authentication_api_application_ref")
            .is_null());
    }

    #[tokio::test]
    async fn test_read_reports_unrecognized_action() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/authenticationPolicies/policy/pol1")
            .with_body(
                r#"{"id": "pol1", "name": "Default Policy",
                    "rootNode": {"action": {"type": "SOMETHING_NEW"}}}"#,
            )
            .create_async()
            .await;

        let current = DynamicValue::new(Dynamic::object([
            ("policy_id", Dynamic::from("pol1")),
            ("name", Dynamic::from("Default Policy")),
        ]));
        let resource = configured(&server.url());
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: TYPE_NAME.to_string(),
                    current_state: current.clone(),
                    private: vec![],
                    provider_meta: None,
                    client_capabilities: ClientCapabilities::default(),
                    current_identity: None,
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert!(response.diagnostics[0].is_error());
        assert_eq!(
            response.diagnostics[0].detail,
            "no valid non-nil policy action type found in struct"
        );
        assert_eq!(
            response.diagnostics[0].attribute.as_ref().unwrap().to_string(),
            "root_node.action"
        );
        assert_eq!(response.new_state, Some(current));
    }

    #[tokio::test]
    async fn test_create_unrecognized_action_leaves_no_state() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/authenticationPolicies/policy")
            .with_body(
                r#"{"id": "pol1", "name": "Default Policy",
                    "rootNode": {"action": {"type": "SOMETHING_NEW"}}}"#,
            )
            .create_async()
            .await;

        let planned = planned().await;
        let resource = configured(&server.url());
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: TYPE_NAME.to_string(),
                    planned_state: planned,
                    config: config(),
                    planned_private: vec![],
                    provider_meta: None,
                },
            )
            .await;

        assert!(response.diagnostics.iter().any(|d| d.is_error()));
        assert!(response.new_state.is_null());
    }

    #[tokio::test]
    async fn test_create_api_error_leaves_no_state() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/authenticationPolicies/policy")
            .with_status(422)
            .with_body(r#"{"message": "Validation error(s) occurred."}"#)
            .create_async()
            .await;

        let planned = planned().await;
        let resource = configured(&server.url());
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: TYPE_NAME.to_string(),
                    planned_state: planned,
                    config: config(),
                    planned_private: vec![],
                    provider_meta: None,
                },
            )
            .await;

        assert_eq!(
            response.diagnostics[0].summary,
            "An error occurred while creating the authentication policy"
        );
        assert!(response.new_state.is_null());
    }

    #[tokio::test]
    async fn test_update_reports_api_error_and_keeps_prior_state() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("PUT", "/authenticationPolicies/policy/pol1")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let mut planned = planned().await;
        planned
            .set_string(&AttributePath::new("policy_id"), "pol1".to_string())
            .unwrap();
        let prior = DynamicValue::new(Dynamic::object([("policy_id", Dynamic::from("pol1"))]));
        let resource = configured(&server.url());
        let response = resource
            .update(
                Context::new(),
                UpdateResourceRequest {
                    type_name: TYPE_NAME.to_string(),
                    prior_state: prior.clone(),
                    planned_state: planned,
                    config: config(),
                    planned_private: vec![],
                    provider_meta: None,
                    planned_identity: None,
                },
            )
            .await;

        assert_eq!(
            response.diagnostics[0].summary,
            "An error occurred while updating the authentication policy"
        );
        assert_eq!(response.new_state, prior);
    }

    #[tokio::test]
    async fn test_delete_successful() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/authenticationPolicies/policy/pol1")
            .with_status(204)
            .create_async()
            .await;

        let resource = configured(&server.url());
        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: TYPE_NAME.to_string(),
                    prior_state: DynamicValue::new(Dynamic::object([
                        ("policy_id", Dynamic::from("pol1")),
                        ("id", Dynamic::from("pol1")),
                    ])),
                    planned_private: vec![],
                    provider_meta: None,
                },
            )
            .await;

        mock.assert_async().await;
        assert!(response.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_import_state() {
        let resource = AuthenticationPoliciesPolicyResource::new();
        let response = resource
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: TYPE_NAME.to_string(),
                    id: "pol1".to_string(),
                    client_capabilities: ClientCapabilities::default(),
                    identity: None,
                },
            )
            .await;

        assert_eq!(
            response.imported_resources[0]
                .state
                .get_string(&AttributePath::new("policy_id"))
                .unwrap(),
            "pol1"
        );
    }
}
