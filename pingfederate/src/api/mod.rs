//! PingFederate Admin API client and typed request/response models

pub mod authentication_policies;
pub mod client;
pub mod common;
pub mod error;
pub mod local_identity;
#[cfg(test)]
pub mod test_helpers;

pub use client::{Client, ClientConfig, Credentials};
pub use error::ApiError;
