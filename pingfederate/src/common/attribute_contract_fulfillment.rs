//! Mapping from contract attribute names to value sources

use super::{source_type_id_key, ConversionError, ObjectReader};
use crate::api::common::AttributeFulfillmentValue;
use std::collections::HashMap;
use tfplug::defaults::StaticDefault;
use tfplug::schema::{AttributeBuilder, AttributeType, ObjectNestingMode};
use tfplug::types::Dynamic;

pub fn attribute(name: &str) -> AttributeBuilder {
    AttributeBuilder::nested(
        name,
        ObjectNestingMode::Map,
        vec![
            source_type_id_key::attribute("source").required().build(),
            AttributeBuilder::new("value", AttributeType::String)
                .description("The value for this attribute.")
                .optional()
                .computed()
                .default(StaticDefault::string(""))
                .build(),
        ],
    )
    .description("A list of mappings from attribute names to their fulfillment values.")
}

pub fn from_plan(
    parent: &ObjectReader,
    name: &str,
) -> Result<Option<HashMap<String, AttributeFulfillmentValue>>, ConversionError> {
    let Some(entries) = parent.optional_map(name)? else {
        return Ok(None);
    };
    entries
        .into_iter()
        .map(|(key, entry)| {
            let value = AttributeFulfillmentValue {
                source: source_type_id_key::from_plan(&entry.required_object("source")?)?,
                value: entry.optional_string("value")?.unwrap_or_default(),
            };
            Ok((key, value))
        })
        .collect::<Result<HashMap<_, _>, _>>()
        .map(Some)
}

pub fn to_state(fulfillment: &HashMap<String, AttributeFulfillmentValue>) -> Dynamic {
    Dynamic::Map(
        fulfillment
            .iter()
            .map(|(key, entry)| {
                (
                    key.clone(),
                    Dynamic::object([
                        ("source", source_type_id_key::to_state(&entry.source)),
                        ("value", Dynamic::from(entry.value.clone())),
                    ]),
                )
            })
            .collect(),
    )
}

pub fn optional_to_state(fulfillment: Option<&HashMap<String, AttributeFulfillmentValue>>) -> Dynamic {
    fulfillment.map(to_state).unwrap_or(Dynamic::Null)
}
