//! Resource implementations

pub mod authentication_policies;
pub mod local_identity;

pub use authentication_policies::{
    AuthenticationPoliciesFragmentResource, AuthenticationPoliciesPolicyResource,
};
pub use local_identity::LocalIdentityProfileResource;

use crate::api::ApiError;
use crate::common::ConversionError;
use crate::PingFederateProviderData;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::types::{Diagnostic, DynamicValue};

pub(crate) fn not_configured() -> Diagnostic {
    Diagnostic::error(
        "Provider not configured",
        "Provider data was not properly configured",
    )
}

/// Send an API request that is abandoned when `ctx` is cancelled
pub(crate) async fn call<T, F>(ctx: &Context, request: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    ctx.run(request).await?
}

pub(crate) fn api_error(summary: &str, err: &ApiError) -> Diagnostic {
    tracing::debug!("{}: {}", summary, err);
    Diagnostic::error(summary, err.detail())
}

/// `state`, or `fallback` when producing it reported an error
pub(crate) fn state_or(
    state: DynamicValue,
    fallback: DynamicValue,
    diagnostics: &[Diagnostic],
) -> DynamicValue {
    if diagnostics.iter().any(Diagnostic::is_error) {
        fallback
    } else {
        state
    }
}

pub(crate) fn conversion_error(summary: &str, err: &ConversionError) -> Diagnostic {
    Diagnostic::error(summary, err.to_string())
}

/// Warning for an object that disappeared from the server
pub(crate) fn removed_from_state(kind: &str, id: &str) -> Diagnostic {
    tracing::warn!("{} '{}' not found, removing from state", kind, id);
    Diagnostic::warning(
        "Resource not found",
        format!(
            "The requested {} '{}' could not be found. It will be removed from state.",
            kind, id
        ),
    )
}

/// Downcast the data handed over by the provider's configure call
pub(crate) fn downcast_provider_data(
    data: Option<Arc<dyn Any + Send + Sync>>,
    kind: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<PingFederateProviderData> {
    match data {
        Some(data) => match data.downcast_ref::<PingFederateProviderData>() {
            Some(provider_data) => Some(provider_data.clone()),
            None => {
                diagnostics.push(Diagnostic::error(
                    "Invalid provider data",
                    "Failed to extract PingFederateProviderData from provider data",
                ));
                None
            }
        },
        None => {
            diagnostics.push(Diagnostic::error(
                "No provider data",
                format!("No provider data was provided to the {}", kind),
            ));
            None
        }
    }
}
