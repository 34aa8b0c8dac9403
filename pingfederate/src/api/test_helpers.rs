//! Test helpers for the PingFederate API

#![allow(clippy::disallowed_methods)]

use super::{Client, ClientConfig, Credentials};
use crate::PingFederateProviderData;

/// Route tracing output through the test harness
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn create_test_client(url: &str) -> Client {
    init_test_logging();
    Client::new(ClientConfig {
        base_url: url.to_string(),
        credentials: Credentials::Basic {
            username: "administrator".to_string(),
            password: "2FederateM0re".to_string(),
        },
        insecure_trust_all_tls: true,
        bypass_external_validation: false,
        user_agent: "terraform-provider-pingfederate/test 12.2".to_string(),
    })
    .unwrap()
}

pub fn create_test_provider_data(url: &str) -> PingFederateProviderData {
    PingFederateProviderData::new(create_test_client(url), "12.2")
}
