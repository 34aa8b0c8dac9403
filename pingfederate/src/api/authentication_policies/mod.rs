pub mod fragments;
pub mod model;
pub mod policy;

pub use fragments::AuthenticationPolicyFragment;
pub use model::*;
pub use policy::AuthenticationPolicy;

use crate::api::Client;

/// Authentication policies API
pub struct AuthenticationPoliciesApi<'a> {
    client: &'a Client,
}

impl<'a> AuthenticationPoliciesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Policy fragment operations
    pub fn fragments(&self) -> fragments::FragmentsApi<'a> {
        fragments::FragmentsApi::new(self.client)
    }

    /// Policy operations
    pub fn policies(&self) -> policy::PoliciesApi<'a> {
        policy::PoliciesApi::new(self.client)
    }
}
