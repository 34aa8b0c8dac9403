//! Data source implementations
//!
//! Each data source looks up a single object by its ID and exposes the same
//! attributes as the matching resource, all of them read-only.

pub mod data_source_fragment;
pub mod data_source_identity_profile;
pub mod data_source_policy;

pub use data_source_fragment::AuthenticationPoliciesFragmentDataSource;
pub use data_source_identity_profile::LocalIdentityProfileDataSource;
pub use data_source_policy::AuthenticationPoliciesPolicyDataSource;

use crate::common::computed_only;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};

/// Derive a data source schema from a resource schema: `id_attribute`
/// becomes the single required input and everything else is computed.
pub(crate) fn lookup_schema(
    resource: Schema,
    id_attribute: &str,
    id_description: &str,
    description: &str,
) -> Schema {
    let mut builder = SchemaBuilder::new().version(0).description(description);
    for attr in resource.block.attributes {
        builder = if attr.name == id_attribute {
            builder.attribute(
                AttributeBuilder::new(id_attribute, AttributeType::String)
                    .description(id_description)
                    .required()
                    .build(),
            )
        } else {
            builder.attribute(computed_only(attr))
        };
    }
    builder.build()
}
