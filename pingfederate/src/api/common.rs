//! Common types shared by PingFederate Admin API models

use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Error body returned by the Admin API on a failed request
#[derive(Debug, Clone, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("API error details: result_id={result_id:?}, message={message}")]
pub struct ApiErrorDetails {
    pub result_id: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub validation_errors: Vec<ValidationError>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    #[serde(default)]
    pub message: String,
    pub field_path: Option<String>,
    pub error_id: Option<String>,
}

/// A configuration object addressable under a fixed collection path
pub trait PingFederateApiResource {
    fn api_path() -> &'static str;

    fn resource_path(id: &str) -> String {
        format!("{}/{}", Self::api_path(), urlencoding::encode(id))
    }
}

/// Reference to another configuration object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub id: String,
    #[serde(skip_serializing)]
    pub location: Option<String>,
}

impl ResourceLink {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            location: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTypeIdKey {
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeFulfillmentValue {
    pub source: SourceTypeIdKey,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceCriteria {
    #[serde(default)]
    pub conditional_criteria: Vec<ConditionalIssuanceCriteriaEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_criteria: Option<Vec<ExpressionIssuanceCriteriaEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalIssuanceCriteriaEntry {
    pub source: SourceTypeIdKey,
    pub attribute_name: String,
    pub condition: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_result: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionIssuanceCriteriaEntry {
    pub expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_result: Option<String>,
}

/// Attribute source, discriminated on the wire by its `type` member
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeSource {
    Custom(CustomAttributeSource),
    Jdbc(JdbcAttributeSource),
    Ldap(LdapAttributeSource),
}

impl AttributeSource {
    pub fn source_type(&self) -> &str {
        match self {
            AttributeSource::Custom(s) => &s.source_type,
            AttributeSource::Jdbc(s) => &s.source_type,
            AttributeSource::Ldap(s) => &s.source_type,
        }
    }
}

impl<'de> Deserialize<'de> for AttributeSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let source_type = value
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or_else(|| de::Error::missing_field("type"))?
            .to_string();

        match source_type.as_str() {
            "CUSTOM" => serde_json::from_value(value).map(AttributeSource::Custom),
            "JDBC" => serde_json::from_value(value).map(AttributeSource::Jdbc),
            "LDAP" | "PING_ONE_LDAP_GATEWAY" => {
                serde_json::from_value(value).map(AttributeSource::Ldap)
            }
            other => {
                return Err(de::Error::unknown_variant(
                    other,
                    &["CUSTOM", "JDBC", "LDAP", "PING_ONE_LDAP_GATEWAY"],
                ))
            }
        }
        .map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomAttributeSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub data_store_ref: ResourceLink,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_contract_fulfillment: Option<HashMap<String, AttributeFulfillmentValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_fields: Option<Vec<FieldEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JdbcAttributeSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub data_store_ref: ResourceLink,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_contract_fulfillment: Option<HashMap<String, AttributeFulfillmentValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_names: Option<Vec<String>>,
    pub filter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LdapAttributeSource {
    /// LDAP or PING_ONE_LDAP_GATEWAY
    #[serde(rename = "type")]
    pub source_type: String,
    pub data_store_ref: ResourceLink,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_contract_fulfillment: Option<HashMap<String, AttributeFulfillmentValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dn: Option<String>,
    pub search_scope: String,
    pub search_filter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_attributes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary_attribute_settings: Option<HashMap<String, BinaryLdapAttributeSettings>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_of_nested_group: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryLdapAttributeSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary_encoding: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeMapping {
    #[serde(default)]
    pub attribute_sources: Vec<AttributeSource>,
    pub attribute_contract_fulfillment: HashMap<String, AttributeFulfillmentValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuance_criteria: Option<IssuanceCriteria>,
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn attribute_source_dispatches_on_type() {
        let json = r#"[
            {"type":"JDBC","dataStoreRef":{"id":"ds1"},"table":"users","filter":"uid=${uid}"},
            {"type":"PING_ONE_LDAP_GATEWAY","dataStoreRef":{"id":"gw"},"searchScope":"SUBTREE","searchFilter":"(uid=x)"},
            {"type":"CUSTOM","dataStoreRef":{"id":"c1"},"filterFields":[{"name":"n"}]}
        ]"#;
        let sources: Vec<AttributeSource> = serde_json::from_str(json).unwrap();

        assert!(matches!(&sources[0], AttributeSource::Jdbc(s) if s.table == "users"));
        match &sources[1] {
            AttributeSource::Ldap(s) => assert_eq!(s.source_type, "PING_ONE_LDAP_GATEWAY"),
            other => panic!("expected LDAP source, got {:?}", other),
        }
        assert_eq!(sources[2].source_type(), "CUSTOM");
    }

    #[test]
    fn attribute_source_rejects_unknown_type() {
        let json = r#"{"type":"MYSTERY","dataStoreRef":{"id":"x"}}"#;
        let err = serde_json::from_str::<AttributeSource>(json).unwrap_err();
        assert!(err.to_string().contains("MYSTERY"));
    }

    #[test]
    fn attribute_source_serializes_its_own_type() {
        let source = AttributeSource::Ldap(LdapAttributeSource {
            source_type: "LDAP".to_string(),
            data_store_ref: ResourceLink::new("ldap1"),
            id: None,
            description: None,
            attribute_contract_fulfillment: None,
            base_dn: Some("ou=people".to_string()),
            search_scope: "SUBTREE".to_string(),
            search_filter: "(uid=${username})".to_string(),
            search_attributes: None,
            binary_attribute_settings: None,
            member_of_nested_group: Some(false),
        });
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["type"], "LDAP");
        assert_eq!(json["baseDn"], "ou=people");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn resource_link_never_sends_location() {
        let link = ResourceLink {
            id: "apc1".to_string(),
            location: Some("https://pf/apc1".to_string()),
        };
        assert_eq!(serde_json::to_string(&link).unwrap(), r#"{"id":"apc1"}"#);
    }

    #[test]
    fn error_details_parse_validation_errors() {
        let body = r#"{"resultId":"validation_error","message":"Validation error(s) occurred.",
            "validationErrors":[{"message":"Invalid","fieldPath":"rootNode","errorId":"x"}]}"#;
        let details: ApiErrorDetails = serde_json::from_str(body).unwrap();
        assert_eq!(details.validation_errors.len(), 1);
        assert_eq!(details.validation_errors[0].field_path.as_deref(), Some("rootNode"));
    }
}
