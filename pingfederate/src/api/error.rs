use thiserror::Error;

use super::common::ApiErrorDetails;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error (HTTP {status}): {message}")]
    ApiError {
        status: u16,
        message: String,
        #[source]
        details: Option<Box<ApiErrorDetails>>,
    },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Authentication failed")]
    AuthError,

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Request cancelled before PingFederate answered")]
    Cancelled(#[from] tfplug::context::Cancelled),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ApiError { status, .. } => Some(*status),
            ApiError::AuthError => Some(401),
            ApiError::RequestError(e) => e.status().map(|s| s.as_u16()),
            ApiError::ParseError(_) | ApiError::InvalidConfig(_) | ApiError::Cancelled(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Text for a diagnostic detail. Validation errors reported by the
    /// server are listed one per line after the main message.
    pub fn detail(&self) -> String {
        match self {
            ApiError::ApiError {
                status,
                details: Some(details),
                ..
            } => {
                let mut detail = format!("HTTP {}: {}", status, details.message);
                for err in &details.validation_errors {
                    detail.push('\n');
                    match &err.field_path {
                        Some(field) => detail.push_str(&format!("{}: {}", field, err.message)),
                        None => detail.push_str(&err.message),
                    }
                }
                detail
            }
            other => other.to_string(),
        }
    }
}
