//! Authentication policy tree resources

pub mod resource_fragment;
pub mod resource_policy;

pub use resource_fragment::AuthenticationPoliciesFragmentResource;
pub use resource_policy::AuthenticationPoliciesPolicyResource;
