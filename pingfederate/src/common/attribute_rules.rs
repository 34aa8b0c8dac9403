//! Rules that pick a policy branch from attribute values

use super::{issuance_criteria::CONDITIONS, source_type_id_key, ConversionError, ObjectReader};
use crate::api::authentication_policies::{AttributeRule, AttributeRules};
use tfplug::schema::{AttributeBuilder, AttributeType, ObjectNestingMode};
use tfplug::types::Dynamic;
use tfplug::validator::StringOneOf;

pub fn attribute(name: &str) -> AttributeBuilder {
    let items = AttributeBuilder::nested(
        "items",
        ObjectNestingMode::List,
        vec![
            AttributeBuilder::new("attribute_name", AttributeType::String)
                .description("The name of the attribute to use in this attribute rule. This field is required if the Attribute Source type is not 'EXPRESSION'.")
                .optional()
                .build(),
            source_type_id_key::attribute("attribute_source")
                .description("The source of the attribute, if this attribute is not provided then it is defaulted to be the previous authentication source.")
                .optional()
                .build(),
            AttributeBuilder::new("condition", AttributeType::String)
                .description("The condition that will be applied to the attribute's expected value. This field is required if the Attribute Source type is not 'EXPRESSION'.")
                .optional()
                .validator(StringOneOf::create(&CONDITIONS))
                .build(),
            AttributeBuilder::new("expected_value", AttributeType::String)
                .description("The expected value of this attribute rule. This field is required if the Attribute Source type is not 'EXPRESSION'.")
                .optional()
                .build(),
            AttributeBuilder::new("expression", AttributeType::String)
                .description("The expression of this attribute rule. This field is required if the Attribute Source type is 'EXPRESSION'.")
                .optional()
                .build(),
            AttributeBuilder::new("result", AttributeType::String)
                .description("The result of this attribute rule.")
                .required()
                .build(),
        ],
    )
    .description("The actual list of attribute rules.")
    .optional()
    .build();

    AttributeBuilder::nested(
        name,
        ObjectNestingMode::Single,
        vec![
            AttributeBuilder::new("fallback_to_success", AttributeType::Bool)
                .description("When all the rules fail, you may choose to default to the general success action or fail. Default to success.")
                .optional()
                .build(),
            items,
        ],
    )
    .description("A collection of attribute rules")
    .optional()
}

pub fn from_plan(parent: &ObjectReader, name: &str) -> Result<Option<AttributeRules>, ConversionError> {
    let Some(rules) = parent.optional_object(name)? else {
        return Ok(None);
    };
    let items = rules
        .optional_list("items")?
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    Ok(AttributeRule {
                        attribute_name: item.optional_string("attribute_name")?,
                        attribute_source: item
                            .optional_object("attribute_source")?
                            .map(|source| source_type_id_key::from_plan(&source))
                            .transpose()?,
                        condition: item.optional_string("condition")?,
                        expected_value: item.optional_string("expected_value")?,
                        expression: item.optional_string("expression")?,
                        result: item.required_string("result")?,
                    })
                })
                .collect::<Result<Vec<_>, ConversionError>>()
        })
        .transpose()?;
    Ok(Some(AttributeRules {
        fallback_to_success: rules.optional_bool("fallback_to_success")?,
        items,
    }))
}

pub fn to_state(rules: Option<&AttributeRules>) -> Dynamic {
    let Some(rules) = rules else {
        return Dynamic::Null;
    };
    let items = rules.items.as_ref().map(|items| {
        items
            .iter()
            .map(|item| {
                Dynamic::object([
                    ("attribute_name", Dynamic::from(item.attribute_name.clone())),
                    (
                        "attribute_source",
                        item.attribute_source
                            .as_ref()
                            .map(source_type_id_key::to_state)
                            .unwrap_or(Dynamic::Null),
                    ),
                    ("condition", Dynamic::from(item.condition.clone())),
                    ("expected_value", Dynamic::from(item.expected_value.clone())),
                    ("expression", Dynamic::from(item.expression.clone())),
                    ("result", Dynamic::from(item.result.clone())),
                ])
            })
            .collect::<Vec<_>>()
    });
    Dynamic::object([
        ("fallback_to_success", Dynamic::from(rules.fallback_to_success)),
        ("items", Dynamic::from(items)),
    ])
}
