//! Conditions a transaction must satisfy before a contract is fulfilled

use super::{source_type_id_key, ConversionError, ObjectReader};
use crate::api::common::{
    ConditionalIssuanceCriteriaEntry, ExpressionIssuanceCriteriaEntry, IssuanceCriteria,
};
use tfplug::defaults::StaticDefault;
use tfplug::schema::{AttributeBuilder, AttributeType, ObjectNestingMode};
use tfplug::types::Dynamic;
use tfplug::validator::StringOneOf;

pub const CONDITIONS: [&str; 12] = [
    "EQUALS",
    "EQUALS_CASE_INSENSITIVE",
    "EQUALS_DN",
    "NOT_EQUAL",
    "NOT_EQUAL_CASE_INSENSITIVE",
    "NOT_EQUAL_DN",
    "MULTIVALUE_CONTAINS",
    "MULTIVALUE_CONTAINS_CASE_INSENSITIVE",
    "MULTIVALUE_CONTAINS_DN",
    "MULTIVALUE_DOES_NOT_CONTAIN",
    "MULTIVALUE_DOES_NOT_CONTAIN_CASE_INSENSITIVE",
    "MULTIVALUE_DOES_NOT_CONTAIN_DN",
];

/// `{conditional_criteria: [], expression_criteria: null}`
pub fn default_value() -> Dynamic {
    Dynamic::object([
        ("conditional_criteria", Dynamic::List(vec![])),
        ("expression_criteria", Dynamic::Null),
    ])
}

fn error_result() -> tfplug::schema::Attribute {
    AttributeBuilder::new("error_result", AttributeType::String)
        .description(
            "The error result to return if this issuance criterion fails. \
             This error result will show up in the PingFederate server logs.",
        )
        .optional()
        .build()
}

pub fn attribute(name: &str) -> AttributeBuilder {
    let conditional = AttributeBuilder::nested(
        "conditional_criteria",
        ObjectNestingMode::List,
        vec![
            source_type_id_key::attribute("source").required().build(),
            AttributeBuilder::new("attribute_name", AttributeType::String)
                .description("The name of the attribute to use in this issuance criterion.")
                .required()
                .build(),
            AttributeBuilder::new("condition", AttributeType::String)
                .description("The condition that will be applied to the source attribute's value and the expected value.")
                .required()
                .validator(StringOneOf::create(&CONDITIONS))
                .build(),
            AttributeBuilder::new("value", AttributeType::String)
                .description("The expected value of this issuance criterion.")
                .required()
                .build(),
            error_result(),
        ],
    )
    .description(
        "A list of conditional issuance criteria where existing attributes must satisfy \
         their conditions against expected values in order for the transaction to continue.",
    )
    .optional()
    .computed()
    .default(StaticDefault::empty_list())
    .build();

    let expression = AttributeBuilder::nested(
        "expression_criteria",
        ObjectNestingMode::List,
        vec![
            AttributeBuilder::new("expression", AttributeType::String)
                .description("The OGNL expression to evaluate.")
                .required()
                .build(),
            error_result(),
        ],
    )
    .description(
        "A list of expression issuance criteria where the OGNL expressions must evaluate \
         to true in order for the transaction to continue.",
    )
    .optional()
    .build();

    AttributeBuilder::nested(name, ObjectNestingMode::Single, vec![conditional, expression])
        .description(
            "The issuance criteria that this transaction must meet before the \
             corresponding attribute contract is fulfilled.",
        )
        .optional()
        .computed()
        .default(StaticDefault::create(default_value()))
}

pub fn from_plan(parent: &ObjectReader, name: &str) -> Result<Option<IssuanceCriteria>, ConversionError> {
    let Some(criteria) = parent.optional_object(name)? else {
        return Ok(None);
    };

    let conditional_criteria = criteria
        .optional_list("conditional_criteria")?
        .unwrap_or_default()
        .iter()
        .map(|entry| {
            Ok(ConditionalIssuanceCriteriaEntry {
                source: source_type_id_key::from_plan(&entry.required_object("source")?)?,
                attribute_name: entry.required_string("attribute_name")?,
                condition: entry.required_string("condition")?,
                value: entry.required_string("value")?,
                error_result: entry.optional_string("error_result")?,
            })
        })
        .collect::<Result<Vec<_>, ConversionError>>()?;

    let expression_criteria = criteria
        .optional_list("expression_criteria")?
        .map(|entries| {
            entries
                .iter()
                .map(|entry| {
                    Ok(ExpressionIssuanceCriteriaEntry {
                        expression: entry.required_string("expression")?,
                        error_result: entry.optional_string("error_result")?,
                    })
                })
                .collect::<Result<Vec<_>, ConversionError>>()
        })
        .transpose()?;

    Ok(Some(IssuanceCriteria {
        conditional_criteria,
        expression_criteria,
    }))
}

/// An absent response value is rendered as the schema default
pub fn to_state(criteria: Option<&IssuanceCriteria>) -> Dynamic {
    let Some(criteria) = criteria else {
        return default_value();
    };

    let conditional = criteria
        .conditional_criteria
        .iter()
        .map(|entry| {
            Dynamic::object([
                ("source", source_type_id_key::to_state(&entry.source)),
                ("attribute_name", Dynamic::from(entry.attribute_name.clone())),
                ("condition", Dynamic::from(entry.condition.clone())),
                ("value", Dynamic::from(entry.value.clone())),
                ("error_result", Dynamic::from(entry.error_result.clone())),
            ])
        })
        .collect::<Vec<_>>();

    let expression = criteria.expression_criteria.as_ref().map(|entries| {
        entries
            .iter()
            .map(|entry| {
                Dynamic::object([
                    ("expression", Dynamic::from(entry.expression.clone())),
                    ("error_result", Dynamic::from(entry.error_result.clone())),
                ])
            })
            .collect::<Vec<_>>()
    });

    Dynamic::object([
        ("conditional_criteria", Dynamic::List(conditional)),
        ("expression_criteria", Dynamic::from(expression)),
    ])
}
