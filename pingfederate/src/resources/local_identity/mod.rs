//! Local identity profile resource

mod convert;
mod plan;
pub mod resource_identity_profile;
mod schema;
mod validate;

pub(crate) use convert::profile_to_state;
pub use resource_identity_profile::LocalIdentityProfileResource;
pub(crate) use schema::profile_schema;
