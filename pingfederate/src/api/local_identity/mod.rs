pub mod identity_profiles;

pub use identity_profiles::*;

use crate::api::Client;

/// Local identity API
pub struct LocalIdentityApi<'a> {
    client: &'a Client,
}

impl<'a> LocalIdentityApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Identity profile operations
    pub fn identity_profiles(&self) -> IdentityProfilesApi<'a> {
        IdentityProfilesApi::new(self.client)
    }
}
