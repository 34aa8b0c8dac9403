//! Reference to another configuration object

use super::{ConversionError, ObjectReader};
use crate::api::common::ResourceLink;
use tfplug::schema::{Attribute, AttributeBuilder, AttributeType, ObjectNestingMode};
use tfplug::types::Dynamic;
use tfplug::validator::StringLength;

pub fn attributes() -> Vec<Attribute> {
    vec![
        AttributeBuilder::new("id", AttributeType::String)
            .description("The ID of the resource.")
            .required()
            .validator(StringLength::at_least(1))
            .build(),
        AttributeBuilder::new("location", AttributeType::String)
            .description("A read-only URL that references the resource.")
            .computed()
            .build(),
    ]
}

/// Single nested link attribute; the caller decides its optionality
pub fn attribute(name: &str, description: &str) -> AttributeBuilder {
    AttributeBuilder::nested(name, ObjectNestingMode::Single, attributes()).description(description)
}

pub fn from_plan(object: &ObjectReader) -> Result<ResourceLink, ConversionError> {
    Ok(ResourceLink::new(object.required_string("id")?))
}

pub fn optional_from_plan(
    parent: &ObjectReader,
    name: &str,
) -> Result<Option<ResourceLink>, ConversionError> {
    parent
        .optional_object(name)?
        .map(|object| from_plan(&object))
        .transpose()
}

pub fn required_from_plan(parent: &ObjectReader, name: &str) -> Result<ResourceLink, ConversionError> {
    from_plan(&parent.required_object(name)?)
}

pub fn to_state(link: &ResourceLink) -> Dynamic {
    Dynamic::object([
        ("id", Dynamic::from(link.id.clone())),
        ("location", Dynamic::from(link.location.clone())),
    ])
}

pub fn optional_to_state(link: Option<&ResourceLink>) -> Dynamic {
    link.map(to_state).unwrap_or(Dynamic::Null)
}
