//! Attribute mappings: sources, contract fulfillment and issuance criteria

use super::{
    attribute_contract_fulfillment, attribute_sources, issuance_criteria, ConversionError,
    ObjectReader,
};
use crate::api::authentication_policies::FragmentMapping;
use crate::api::common::AttributeMapping;
use tfplug::schema::{AttributeBuilder, ObjectNestingMode};
use tfplug::types::Dynamic;

/// Mapping whose contract fulfillment is required
pub fn attribute(name: &str) -> AttributeBuilder {
    AttributeBuilder::nested(
        name,
        ObjectNestingMode::Single,
        vec![
            attribute_contract_fulfillment::attribute("attribute_contract_fulfillment")
                .required()
                .build(),
            attribute_sources::attribute("attribute_sources").build(),
            issuance_criteria::attribute("issuance_criteria").build(),
        ],
    )
    .description("A list of mappings from attribute sources to attribute targets.")
}

/// Mapping into a policy fragment, where contract fulfillment may be left out
pub fn fragment_attribute(name: &str) -> AttributeBuilder {
    AttributeBuilder::nested(
        name,
        ObjectNestingMode::Single,
        vec![
            attribute_contract_fulfillment::attribute("attribute_contract_fulfillment")
                .optional()
                .build(),
            attribute_sources::attribute("attribute_sources").build(),
            issuance_criteria::attribute("issuance_criteria").build(),
        ],
    )
    .description("A list of mappings from attribute sources to attribute targets.")
}

pub fn from_plan(object: &ObjectReader) -> Result<AttributeMapping, ConversionError> {
    let attribute_contract_fulfillment =
        attribute_contract_fulfillment::from_plan(object, "attribute_contract_fulfillment")?
            .ok_or_else(|| {
                ConversionError::MissingAttribute(
                    object
                        .path()
                        .clone()
                        .attribute("attribute_contract_fulfillment")
                        .to_string(),
                )
            })?;
    Ok(AttributeMapping {
        attribute_sources: attribute_sources::from_plan(object, "attribute_sources")?,
        attribute_contract_fulfillment,
        issuance_criteria: issuance_criteria::from_plan(object, "issuance_criteria")?,
    })
}

pub fn fragment_from_plan(object: &ObjectReader) -> Result<FragmentMapping, ConversionError> {
    Ok(FragmentMapping {
        attribute_sources: attribute_sources::from_plan(object, "attribute_sources")?,
        attribute_contract_fulfillment: attribute_contract_fulfillment::from_plan(
            object,
            "attribute_contract_fulfillment",
        )?,
        issuance_criteria: issuance_criteria::from_plan(object, "issuance_criteria")?,
    })
}

pub fn to_state(mapping: &AttributeMapping) -> Dynamic {
    Dynamic::object([
        (
            "attribute_contract_fulfillment",
            attribute_contract_fulfillment::to_state(&mapping.attribute_contract_fulfillment),
        ),
        (
            "attribute_sources",
            attribute_sources::to_state(&mapping.attribute_sources),
        ),
        (
            "issuance_criteria",
            issuance_criteria::to_state(mapping.issuance_criteria.as_ref()),
        ),
    ])
}

pub fn fragment_to_state(mapping: &FragmentMapping) -> Dynamic {
    Dynamic::object([
        (
            "attribute_contract_fulfillment",
            attribute_contract_fulfillment::optional_to_state(
                mapping.attribute_contract_fulfillment.as_ref(),
            ),
        ),
        (
            "attribute_sources",
            attribute_sources::to_state(&mapping.attribute_sources),
        ),
        (
            "issuance_criteria",
            issuance_criteria::to_state(mapping.issuance_criteria.as_ref()),
        ),
    ])
}
