//! Source of an attribute value

use super::{ConversionError, ObjectReader};
use crate::api::common::SourceTypeIdKey;
use tfplug::schema::{Attribute, AttributeBuilder, AttributeType, ObjectNestingMode};
use tfplug::types::Dynamic;
use tfplug::validator::StringOneOf;

pub const SOURCE_TYPES: [&str; 33] = [
    "TOKEN_EXCHANGE_PROCESSOR_POLICY",
    "ACCOUNT_LINK",
    "ADAPTER",
    "ASSERTION",
    "CONTEXT",
    "CUSTOM_DATA_STORE",
    "EXPRESSION",
    "JDBC_DATA_STORE",
    "LDAP_DATA_STORE",
    "PING_ONE_LDAP_GATEWAY_DATA_STORE",
    "MAPPED_ATTRIBUTES",
    "NO_MAPPING",
    "TEXT",
    "TOKEN",
    "REQUEST",
    "OAUTH_PERSISTENT_GRANT",
    "SUBJECT_TOKEN",
    "ACTOR_TOKEN",
    "PASSWORD_CREDENTIAL_VALIDATOR",
    "IDP_CONNECTION",
    "AUTHENTICATION_POLICY_CONTRACT",
    "CLAIMS",
    "LOCAL_IDENTITY_PROFILE",
    "EXTENDED_CLIENT_METADATA",
    "EXTENDED_PROPERTIES",
    "TRACKED_HTTP_PARAMS",
    "FRAGMENT",
    "INPUTS",
    "ATTRIBUTE_QUERY",
    "IDENTITY_STORE_USER",
    "IDENTITY_STORE_GROUP",
    "SCIM_USER",
    "SCIM_GROUP",
];

pub fn attributes() -> Vec<Attribute> {
    vec![
        AttributeBuilder::new("type", AttributeType::String)
            .description("The source type of this key.")
            .required()
            .validator(StringOneOf::create(&SOURCE_TYPES))
            .build(),
        AttributeBuilder::new("id", AttributeType::String)
            .description(
                "The attribute source ID that refers to the attribute source that this key references. \
                 If the source type is not an attribute source then the ID can be omitted.",
            )
            .optional()
            .build(),
    ]
}

pub fn attribute(name: &str) -> AttributeBuilder {
    AttributeBuilder::nested(name, ObjectNestingMode::Single, attributes())
        .description("The attribute value source.")
}

pub fn from_plan(object: &ObjectReader) -> Result<SourceTypeIdKey, ConversionError> {
    Ok(SourceTypeIdKey {
        source_type: object.required_string("type")?,
        id: object.optional_string("id")?,
    })
}

pub fn to_state(key: &SourceTypeIdKey) -> Dynamic {
    Dynamic::object([
        ("type", Dynamic::from(key.source_type.clone())),
        ("id", Dynamic::from(key.id.clone())),
    ])
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use tfplug::schema::ValidatorRequest;
    use tfplug::types::{AttributePath, DynamicValue};

    #[test]
    fn source_type_rejects_unlisted_value() {
        let attrs = attributes();
        let type_attr = attrs.iter().find(|a| a.name == "type").unwrap();
        let response = type_attr.validators[0].validate(ValidatorRequest {
            config_value: DynamicValue::new(Dynamic::from("MADE_UP")),
            path: AttributePath::new("type"),
        });
        assert_eq!(response.diagnostics.len(), 1);

        let response = type_attr.validators[0].validate(ValidatorRequest {
            config_value: DynamicValue::new(Dynamic::from("SCIM_GROUP")),
            path: AttributePath::new("type"),
        });
        assert!(response.diagnostics.is_empty());
    }

    #[test]
    fn key_without_id_keeps_id_null_in_state() {
        let plan = Dynamic::object([("type", Dynamic::from("NO_MAPPING")), ("id", Dynamic::Null)]);
        let key = from_plan(&ObjectReader::new(&plan, AttributePath::new("source"))).unwrap();
        assert_eq!(key.id, None);
        assert_eq!(to_state(&key), plan);
    }
}
