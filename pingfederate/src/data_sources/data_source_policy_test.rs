#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::super::*;
    use crate::api::test_helpers::create_test_provider_data;
    use mockito::Server;
    use tfplug::types::{ClientCapabilities, Dynamic};

    fn configured(server_url: &str) -> AuthenticationPoliciesPolicyDataSource {
        AuthenticationPoliciesPolicyDataSource {
            provider_data: Some(create_test_provider_data(server_url)),
        }
    }

    fn read_request(config: Dynamic) -> ReadDataSourceRequest {
        ReadDataSourceRequest {
            type_name: TYPE_NAME.to_string(),
            config: DynamicValue::new(config),
            provider_meta: None,
            client_capabilities: ClientCapabilities::default(),
        }
    }

    #[tokio::test]
    async fn test_validate_accepts_policy_id() {
        let data_source = AuthenticationPoliciesPolicyDataSource::new();
        let response = data_source
            .validate(
                Context::new(),
                ValidateDataSourceConfigRequest {
                    type_name: TYPE_NAME.to_string(),
                    config: DynamicValue::new(Dynamic::object([(
                        "policy_id",
                        Dynamic::from("pol1"),
                    )])),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    }

    #[tokio::test]
    async fn test_read_policy() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/authenticationPolicies/policy/pol1")
            .with_body(
                r#"{"id": "pol1", "name": "Default Policy", "enabled": true,
                    "handleFailuresLocally": false,
                    "rootNode": {"action": {"type": "FRAGMENT", "fragment": {"id": "frag1"}}}}"#,
            )
            .create_async()
            .await;

        let data_source = configured(&server.url());
        let response = data_source
            .read(
                Context::new(),
                read_request(Dynamic::object([("policy_id", Dynamic::from("pol1"))])),
            )
            .await;

        mock.assert_async().await;
        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        let state = &response.state.value;
        assert_eq!(state.attr("policy_id").as_str(), Some("pol1"));
        assert_eq!(state.attr("name").as_str(), Some("Default Policy"));
        assert_eq!(state.attr("enabled").as_bool(), Some(true));
    }

    #[tokio::test]
    async fn test_read_without_policy_id() {
        let data_source = configured("http://127.0.0.1:1");
        let response = data_source
            .read(Context::new(), read_request(Dynamic::object([("policy_id", Dynamic::Null)])))
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics[0].attribute.as_ref().unwrap().to_string(),
            "policy_id"
        );
        assert!(response.state.is_null());
    }

    #[tokio::test]
    async fn test_read_server_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/authenticationPolicies/policy/pol1")
            .with_status(500)
            .with_body(r#"{"resultId":"internal_error","message":"boom"}"#)
            .create_async()
            .await;

        let data_source = configured(&server.url());
        let response = data_source
            .read(
                Context::new(),
                read_request(Dynamic::object([("policy_id", Dynamic::from("pol1"))])),
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics[0].summary,
            "An error occurred while getting the authentication policy"
        );
    }
}
