//! Data stores that attributes are looked up from
//!
//! Each list entry carries exactly one of the three source variants. The
//! variant decides the `type` discriminator sent to the server.

use super::{attribute_contract_fulfillment, resource_link, string_list, ConversionError, ObjectReader};
use crate::api::common::{
    AttributeFulfillmentValue, AttributeSource, BinaryLdapAttributeSettings,
    CustomAttributeSource, FieldEntry, JdbcAttributeSource, LdapAttributeSource, ResourceLink,
};
use std::collections::HashMap;
use tfplug::defaults::StaticDefault;
use tfplug::schema::{
    Attribute, AttributeBuilder, AttributeType, ObjectNestingMode, Validator, ValidatorRequest,
    ValidatorResponse,
};
use tfplug::types::{Diagnostic, Dynamic};
use tfplug::validator::{SizeAtLeast, StringOneOf};

pub const CUSTOM: &str = "custom_attribute_source";
pub const JDBC: &str = "jdbc_attribute_source";
pub const LDAP: &str = "ldap_attribute_source";

const VARIANTS: [&str; 3] = [CUSTOM, JDBC, LDAP];

fn missing_variant() -> ConversionError {
    ConversionError::MissingVariant(format!(
        "exactly one of {}, {} or {} must be set",
        CUSTOM, JDBC, LDAP
    ))
}

fn common_attributes() -> Vec<Attribute> {
    vec![
        resource_link::attribute("data_store_ref", "Reference to the associated data store.")
            .required()
            .build(),
        AttributeBuilder::new("id", AttributeType::String)
            .description("The ID that defines this attribute source. Only alphanumeric characters allowed.")
            .optional()
            .build(),
        AttributeBuilder::new("description", AttributeType::String)
            .description("The description of this attribute source.")
            .optional()
            .build(),
        attribute_contract_fulfillment::attribute("attribute_contract_fulfillment")
            .optional()
            .build(),
    ]
}

fn computed_type(value: &str) -> Attribute {
    AttributeBuilder::new("type", AttributeType::String)
        .description("The data store type of this attribute source.")
        .computed()
        .default(StaticDefault::string(value))
        .build()
}

fn custom_attributes() -> Vec<Attribute> {
    let mut attrs = common_attributes();
    attrs.push(computed_type("CUSTOM"));
    attrs.push(
        AttributeBuilder::nested(
            "filter_fields",
            ObjectNestingMode::Set,
            vec![
                AttributeBuilder::new("name", AttributeType::String)
                    .description("The name of this field.")
                    .required()
                    .build(),
                AttributeBuilder::new("value", AttributeType::String)
                    .description("The value of this field.")
                    .optional()
                    .computed()
                    .default(StaticDefault::string(""))
                    .build(),
            ],
        )
        .description("The list of fields that can be used to filter a request to the custom data store.")
        .optional()
        .build(),
    );
    attrs
}

fn jdbc_attributes() -> Vec<Attribute> {
    let mut attrs = common_attributes();
    attrs.push(computed_type("JDBC"));
    attrs.extend([
        AttributeBuilder::new("schema", AttributeType::String)
            .description("Lists the table structure that stores information within a database.")
            .optional()
            .build(),
        AttributeBuilder::new("filter", AttributeType::String)
            .description("The JDBC WHERE clause used to query your data store to locate a user record.")
            .required()
            .build(),
        AttributeBuilder::new("table", AttributeType::String)
            .description("The name of the database table.")
            .required()
            .build(),
        AttributeBuilder::new("column_names", AttributeType::Set(Box::new(AttributeType::String)))
            .description("A list of column names used to construct the SQL query.")
            .optional()
            .build(),
    ]);
    attrs
}

fn ldap_attributes() -> Vec<Attribute> {
    let mut attrs = common_attributes();
    attrs.extend([
        AttributeBuilder::new("type", AttributeType::String)
            .description("The data store type of this attribute source.")
            .required()
            .validator(StringOneOf::create(&["LDAP", "PING_ONE_LDAP_GATEWAY"]))
            .build(),
        AttributeBuilder::new("base_dn", AttributeType::String)
            .description("The base DN to search from. If not specified, the search will start at the LDAP's root.")
            .optional()
            .build(),
        AttributeBuilder::new("search_scope", AttributeType::String)
            .description("Determines the node depth of the query.")
            .required()
            .validator(StringOneOf::create(&["OBJECT", "ONE_LEVEL", "SUBTREE"]))
            .build(),
        AttributeBuilder::new("search_filter", AttributeType::String)
            .description("The LDAP filter that will be used to lookup the objects from the directory.")
            .required()
            .build(),
        AttributeBuilder::new("search_attributes", AttributeType::Set(Box::new(AttributeType::String)))
            .description("A list of LDAP attributes returned from search and available for mapping.")
            .optional()
            .build(),
        AttributeBuilder::new("member_of_nested_group", AttributeType::Bool)
            .description("Set this to true to return transitive group memberships for the 'memberOf' attribute.")
            .optional()
            .computed()
            .default(StaticDefault::bool(false))
            .build(),
        AttributeBuilder::nested(
            "binary_attribute_settings",
            ObjectNestingMode::Map,
            vec![AttributeBuilder::new("binary_encoding", AttributeType::String)
                .description("Get the encoding type for this attribute. If not specified, the default is BASE64.")
                .optional()
                .validator(StringOneOf::create(&["BASE64", "HEX", "SID"]))
                .build()],
        )
        .description("The advanced settings for binary LDAP attributes.")
        .optional()
        .validator(SizeAtLeast::create(1))
        .build(),
    ]);
    attrs
}

/// Every entry of the list must hold exactly one source variant
struct OneSourcePerEntry;

impl Validator for OneSourcePerEntry {
    fn description(&self) -> String {
        format!("each entry sets exactly one of {}", VARIANTS.join(", "))
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = vec![];
        if let Dynamic::List(entries) = &request.config_value.value {
            for (i, entry) in entries.iter().enumerate() {
                if !entry.is_present() {
                    continue;
                }
                let set = VARIANTS.iter().filter(|v| entry.attr(v).is_present()).count();
                let unknown = VARIANTS.iter().any(|v| entry.attr(v).is_unknown());
                if set > 1 || (set == 0 && !unknown) {
                    diagnostics.push(
                        Diagnostic::error("Invalid attribute source", missing_variant().to_string())
                            .with_attribute(request.path.clone().index(i as i64)),
                    );
                }
            }
        }
        ValidatorResponse { diagnostics }
    }
}

pub fn attribute(name: &str) -> AttributeBuilder {
    AttributeBuilder::nested(
        name,
        ObjectNestingMode::List,
        vec![
            AttributeBuilder::nested(CUSTOM, ObjectNestingMode::Single, custom_attributes())
                .description("The configured settings used to look up attributes from a custom data store.")
                .optional()
                .build(),
            AttributeBuilder::nested(JDBC, ObjectNestingMode::Single, jdbc_attributes())
                .description("The configured settings used to look up attributes from a JDBC data store.")
                .optional()
                .build(),
            AttributeBuilder::nested(LDAP, ObjectNestingMode::Single, ldap_attributes())
                .description("The configured settings used to look up attributes from a LDAP data store.")
                .optional()
                .build(),
        ],
    )
    .description("A list of configured data stores to look up attributes from.")
    .optional()
    .computed()
    .default(StaticDefault::empty_list())
    .validator(Box::new(OneSourcePerEntry))
}

pub fn from_plan(parent: &ObjectReader, name: &str) -> Result<Vec<AttributeSource>, ConversionError> {
    parent
        .optional_list(name)?
        .unwrap_or_default()
        .iter()
        .map(entry_from_plan)
        .collect()
}

fn entry_from_plan(entry: &ObjectReader) -> Result<AttributeSource, ConversionError> {
    if let Some(custom) = entry.optional_object(CUSTOM)? {
        let filter_fields = custom
            .optional_list("filter_fields")?
            .map(|fields| {
                fields
                    .iter()
                    .map(|field| {
                        Ok(FieldEntry {
                            name: field.required_string("name")?,
                            value: field.optional_string("value")?,
                        })
                    })
                    .collect::<Result<Vec<_>, ConversionError>>()
            })
            .transpose()?;
        return Ok(AttributeSource::Custom(CustomAttributeSource {
            source_type: "CUSTOM".to_string(),
            data_store_ref: resource_link::required_from_plan(&custom, "data_store_ref")?,
            id: custom.optional_string("id")?,
            description: custom.optional_string("description")?,
            attribute_contract_fulfillment: attribute_contract_fulfillment::from_plan(
                &custom,
                "attribute_contract_fulfillment",
            )?,
            filter_fields,
        }));
    }

    if let Some(jdbc) = entry.optional_object(JDBC)? {
        return Ok(AttributeSource::Jdbc(JdbcAttributeSource {
            source_type: "JDBC".to_string(),
            data_store_ref: resource_link::required_from_plan(&jdbc, "data_store_ref")?,
            id: jdbc.optional_string("id")?,
            description: jdbc.optional_string("description")?,
            attribute_contract_fulfillment: attribute_contract_fulfillment::from_plan(
                &jdbc,
                "attribute_contract_fulfillment",
            )?,
            schema: jdbc.optional_string("schema")?,
            table: jdbc.required_string("table")?,
            column_names: jdbc.optional_string_list("column_names")?,
            filter: jdbc.required_string("filter")?,
        }));
    }

    if let Some(ldap) = entry.optional_object(LDAP)? {
        let binary_attribute_settings = ldap
            .optional_map("binary_attribute_settings")?
            .map(|entries| {
                entries
                    .into_iter()
                    .map(|(key, settings)| {
                        Ok((
                            key,
                            BinaryLdapAttributeSettings {
                                binary_encoding: settings.optional_string("binary_encoding")?,
                            },
                        ))
                    })
                    .collect::<Result<HashMap<_, _>, ConversionError>>()
            })
            .transpose()?;
        return Ok(AttributeSource::Ldap(LdapAttributeSource {
            source_type: ldap.required_string("type")?,
            data_store_ref: resource_link::required_from_plan(&ldap, "data_store_ref")?,
            id: ldap.optional_string("id")?,
            description: ldap.optional_string("description")?,
            attribute_contract_fulfillment: attribute_contract_fulfillment::from_plan(
                &ldap,
                "attribute_contract_fulfillment",
            )?,
            base_dn: ldap.optional_string("base_dn")?,
            search_scope: ldap.required_string("search_scope")?,
            search_filter: ldap.required_string("search_filter")?,
            search_attributes: ldap.optional_string_list("search_attributes")?,
            binary_attribute_settings,
            member_of_nested_group: ldap.optional_bool("member_of_nested_group")?,
        }));
    }

    Err(missing_variant())
}

fn common_state(
    data_store_ref: &ResourceLink,
    id: &Option<String>,
    description: &Option<String>,
    fulfillment: Option<&HashMap<String, AttributeFulfillmentValue>>,
) -> Vec<(&'static str, Dynamic)> {
    vec![
        ("data_store_ref", resource_link::to_state(data_store_ref)),
        ("id", Dynamic::from(id.clone())),
        ("description", Dynamic::from(description.clone())),
        (
            "attribute_contract_fulfillment",
            attribute_contract_fulfillment::optional_to_state(fulfillment),
        ),
    ]
}

fn entry_to_state(source: &AttributeSource) -> Dynamic {
    let (variant, fields) = match source {
        AttributeSource::Custom(s) => {
            let mut fields = common_state(
                &s.data_store_ref,
                &s.id,
                &s.description,
                s.attribute_contract_fulfillment.as_ref(),
            );
            fields.push(("type", Dynamic::from(s.source_type.clone())));
            fields.push((
                "filter_fields",
                s.filter_fields
                    .as_ref()
                    .map(|entries| {
                        Dynamic::List(
                            entries
                                .iter()
                                .map(|f| {
                                    Dynamic::object([
                                        ("name", Dynamic::from(f.name.clone())),
                                        ("value", Dynamic::from(f.value.clone().unwrap_or_default())),
                                    ])
                                })
                                .collect(),
                        )
                    })
                    .unwrap_or(Dynamic::Null),
            ));
            (CUSTOM, fields)
        }
        AttributeSource::Jdbc(s) => {
            let mut fields = common_state(
                &s.data_store_ref,
                &s.id,
                &s.description,
                s.attribute_contract_fulfillment.as_ref(),
            );
            fields.extend([
                ("type", Dynamic::from(s.source_type.clone())),
                ("schema", Dynamic::from(s.schema.clone())),
                ("filter", Dynamic::from(s.filter.clone())),
                ("table", Dynamic::from(s.table.clone())),
                ("column_names", string_list(s.column_names.as_ref())),
            ]);
            (JDBC, fields)
        }
        AttributeSource::Ldap(s) => {
            let mut fields = common_state(
                &s.data_store_ref,
                &s.id,
                &s.description,
                s.attribute_contract_fulfillment.as_ref(),
            );
            fields.extend([
                ("type", Dynamic::from(s.source_type.clone())),
                ("base_dn", Dynamic::from(s.base_dn.clone())),
                ("search_scope", Dynamic::from(s.search_scope.clone())),
                ("search_filter", Dynamic::from(s.search_filter.clone())),
                ("search_attributes", string_list(s.search_attributes.as_ref())),
                (
                    "member_of_nested_group",
                    Dynamic::from(s.member_of_nested_group.unwrap_or(false)),
                ),
                (
                    "binary_attribute_settings",
                    s.binary_attribute_settings
                        .as_ref()
                        .map(|settings| {
                            Dynamic::Map(
                                settings
                                    .iter()
                                    .map(|(k, v)| {
                                        (
                                            k.clone(),
                                            Dynamic::object([(
                                                "binary_encoding",
                                                Dynamic::from(v.binary_encoding.clone()),
                                            )]),
                                        )
                                    })
                                    .collect(),
                            )
                        })
                        .unwrap_or(Dynamic::Null),
                ),
            ]);
            (LDAP, fields)
        }
    };

    Dynamic::object(VARIANTS.iter().map(|name| {
        let value = if *name == variant {
            Dynamic::object(fields.clone())
        } else {
            Dynamic::Null
        };
        (*name, value)
    }))
}

pub fn to_state(sources: &[AttributeSource]) -> Dynamic {
    Dynamic::List(sources.iter().map(entry_to_state).collect())
}
