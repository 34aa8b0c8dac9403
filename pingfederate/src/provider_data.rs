//! Provider data structure passed to resources and data sources

use crate::api::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct PingFederateProviderData {
    pub client: Arc<Client>,
    /// Server version the configuration targets, e.g. `12.2`
    pub product_version: String,
}

impl PingFederateProviderData {
    pub fn new(client: Client, product_version: impl Into<String>) -> Self {
        Self {
            client: Arc::new(client),
            product_version: product_version.into(),
        }
    }
}
