#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::super::*;
    use crate::api::test_helpers::create_test_provider_data;
    use mockito::Server;
    use tfplug::types::{ClientCapabilities, Dynamic};

    fn read_request(id: &str) -> ReadDataSourceRequest {
        ReadDataSourceRequest {
            type_name: TYPE_NAME.to_string(),
            config: DynamicValue::new(Dynamic::object([("profile_id", Dynamic::from(id))])),
            provider_meta: None,
            client_capabilities: ClientCapabilities::default(),
        }
    }

    #[tokio::test]
    async fn test_schema_marks_nested_objects_computed() {
        let data_source = LocalIdentityProfileDataSource::new();
        let schema = data_source
            .schema(Context::new(), DataSourceSchemaRequest)
            .await
            .schema;

        let profile_id = schema.attribute("profile_id").unwrap();
        assert!(profile_id.required);
        assert!(profile_id.validators.is_empty());

        let email = schema.attribute("email_verification_config").unwrap();
        assert!(email.computed && !email.optional);
        let otp_length = email.nested_type.as_ref().unwrap().attribute("otp_length").unwrap();
        assert!(otp_length.computed && otp_length.validators.is_empty());
        assert!(otp_length.default.is_none());
    }

    #[tokio::test]
    async fn test_read_profile() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/localIdentity/identityProfiles/regprofile")
            .with_body(
                r#"{"id": "regprofile", "name": "Registration Profile",
                    "apcId": {"id": "apc1"},
                    "authSources": [{"id": "src1", "source": "google"}],
                    "registrationEnabled": false,
                    "profileEnabled": true,
                    "profileConfig": {"deleteIdentityEnabled": true, "templateName": "local.identity.profile.html"}}"#,
            )
            .create_async()
            .await;

        let data_source = LocalIdentityProfileDataSource {
            provider_data: Some(create_test_provider_data(&server.url())),
        };
        let response = data_source.read(Context::new(), read_request("regprofile")).await;

        mock.assert_async().await;
        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        let state = &response.state.value;
        assert_eq!(state.attr("profile_id").as_str(), Some("regprofile"));
        assert_eq!(state.attr("apc_id").attr("id").as_str(), Some("apc1"));
        assert_eq!(state.attr("profile_enabled").as_bool(), Some(true));
        assert_eq!(
            state.attr("profile_config").attr("delete_identity_enabled").as_bool(),
            Some(true)
        );
        assert!(state.attr("registration_config").is_null());
    }

    #[tokio::test]
    async fn test_read_unauthorized() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/localIdentity/identityProfiles/regprofile")
            .with_status(401)
            .create_async()
            .await;

        let data_source = LocalIdentityProfileDataSource {
            provider_data: Some(create_test_provider_data(&server.url())),
        };
        let response = data_source.read(Context::new(), read_request("regprofile")).await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics[0].summary,
            "An error occurred while getting the local identity profile"
        );
        assert!(response.state.is_null());
    }
}
