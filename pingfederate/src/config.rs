//! Provider configuration
//!
//! Every provider attribute falls back to a `PINGFEDERATE_PROVIDER_*`
//! environment variable when it is not set in the provider block. Problems
//! are collected as diagnostics so the user sees all of them at once.

use crate::api::{ClientConfig, Credentials};
use tfplug::types::{AttributePath, Diagnostic, Dynamic};

pub const INVALID_PROVIDER_CONFIGURATION: &str = "Invalid provider configuration";
pub const DEFAULT_ADMIN_API_PATH: &str = "/pf-admin-api/v1";
pub const SUPPORTED_VERSIONS: [&str; 5] = ["11.3", "12.0", "12.1", "12.2", "12.3"];

pub const HTTPS_HOST_ENV: &str = "PINGFEDERATE_PROVIDER_HTTPS_HOST";
pub const ADMIN_API_PATH_ENV: &str = "PINGFEDERATE_PROVIDER_ADMIN_API_PATH";
pub const USERNAME_ENV: &str = "PINGFEDERATE_PROVIDER_USERNAME";
pub const PASSWORD_ENV: &str = "PINGFEDERATE_PROVIDER_PASSWORD";
pub const ACCESS_TOKEN_ENV: &str = "PINGFEDERATE_PROVIDER_ACCESS_TOKEN";
pub const INSECURE_TRUST_ALL_TLS_ENV: &str = "PINGFEDERATE_PROVIDER_INSECURE_TRUST_ALL_TLS";
pub const BYPASS_EXTERNAL_VALIDATION_ENV: &str =
    "PINGFEDERATE_PROVIDER_X_BYPASS_EXTERNAL_VALIDATION_HEADER";
pub const PRODUCT_VERSION_ENV: &str = "PINGFEDERATE_PROVIDER_PRODUCT_VERSION";
pub const APPEND_USER_AGENT_ENV: &str = "PINGFEDERATE_TF_APPEND_USER_AGENT";

/// Fully resolved provider settings
#[derive(Clone)]
pub struct ProviderConfig {
    pub https_host: String,
    pub admin_api_path: String,
    pub credentials: Credentials,
    pub insecure_trust_all_tls: bool,
    pub bypass_external_validation: bool,
    pub product_version: String,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let auth = match &self.credentials {
            Credentials::Basic { .. } => "basic",
            Credentials::AccessToken(_) => "access_token",
        };
        f.debug_struct("ProviderConfig")
            .field("https_host", &self.https_host)
            .field("admin_api_path", &self.admin_api_path)
            .field("auth", &auth)
            .field("insecure_trust_all_tls", &self.insecure_trust_all_tls)
            .field("bypass_external_validation", &self.bypass_external_validation)
            .field("product_version", &self.product_version)
            .finish()
    }
}

impl ProviderConfig {
    /// Resolve the provider block against the environment
    pub fn resolve(config: &Dynamic) -> Result<Self, Vec<Diagnostic>> {
        let mut diagnostics = vec![];

        let https_host = string_setting(config, "https_host", HTTPS_HOST_ENV);
        if https_host.as_deref().map_or(true, str::is_empty) {
            diagnostics.push(required_error("https_host", HTTPS_HOST_ENV));
        }

        let admin_api_path = string_setting(config, "admin_api_path", ADMIN_API_PATH_ENV)
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_API_PATH.to_string());

        let credentials = resolve_credentials(config, &mut diagnostics);

        let product_version = match string_setting(config, "product_version", PRODUCT_VERSION_ENV)
        {
            Some(version) if !version.is_empty() => match parse_product_version(&version) {
                Ok(_) => Some(version),
                Err(detail) => {
                    diagnostics.push(invalid("product_version", detail));
                    None
                }
            },
            _ => {
                diagnostics.push(required_error("product_version", PRODUCT_VERSION_ENV));
                None
            }
        };

        let insecure_trust_all_tls =
            bool_setting(config, "insecure_trust_all_tls", INSECURE_TRUST_ALL_TLS_ENV);
        let bypass_external_validation = bool_setting(
            config,
            "x_bypass_external_validation_header",
            BYPASS_EXTERNAL_VALIDATION_ENV,
        );

        match (https_host, credentials, product_version) {
            (Some(https_host), Some(credentials), Some(product_version))
                if diagnostics.is_empty() =>
            {
                Ok(Self {
                    https_host,
                    admin_api_path,
                    credentials,
                    insecure_trust_all_tls,
                    bypass_external_validation,
                    product_version,
                })
            }
            _ => Err(diagnostics),
        }
    }

    /// Host plus admin API path, e.g. `https://localhost:9999/pf-admin-api/v1`
    pub fn base_url(&self) -> String {
        format!(
            "{}{}",
            self.https_host.trim_end_matches('/'),
            self.admin_api_path
        )
    }

    pub fn user_agent(&self) -> String {
        let mut agent = format!(
            "terraform-provider-pingfederate/{} {}",
            env!("CARGO_PKG_VERSION"),
            self.product_version
        );
        if let Ok(suffix) = std::env::var(APPEND_USER_AGENT_ENV) {
            if !suffix.is_empty() {
                agent.push(' ');
                agent.push_str(&suffix);
            }
        }
        agent
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url(),
            credentials: self.credentials.clone(),
            insecure_trust_all_tls: self.insecure_trust_all_tls,
            bypass_external_validation: self.bypass_external_validation,
            user_agent: self.user_agent(),
        }
    }
}

/// Check a `major.minor[.patch]` version against the supported releases.
/// Returns the `major.minor` part.
pub fn parse_product_version(version: &str) -> Result<String, String> {
    let parts: Vec<&str> = version.split('.').collect();
    let well_formed = matches!(parts.len(), 2 | 3)
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    if !well_formed {
        return Err(format!(
            "failed to parse PingFederate version '{}'. Expected either two digits (e.g. '11.3') or three digits (e.g. '11.3.4')",
            version
        ));
    }

    let major_minor = format!("{}.{}", parts[0], parts[1]);
    if SUPPORTED_VERSIONS.contains(&major_minor.as_str()) {
        Ok(major_minor)
    } else {
        Err(format!(
            "PingFederate version '{}' is not supported in this version of the PingFederate terraform provider. Supported versions are: {}",
            version,
            SUPPORTED_VERSIONS.join(", ")
        ))
    }
}

fn resolve_credentials(config: &Dynamic, diagnostics: &mut Vec<Diagnostic>) -> Option<Credentials> {
    let username = string_setting(config, "username", USERNAME_ENV);
    let password = string_setting(config, "password", PASSWORD_ENV);
    let access_token =
        string_setting(config, "access_token", ACCESS_TOKEN_ENV).filter(|t| !t.is_empty());

    let has_basic = username.is_some() || password.is_some();
    match (has_basic, access_token) {
        (false, None) => {
            diagnostics.push(Diagnostic::error(
                INVALID_PROVIDER_CONFIGURATION,
                "Unable to find username and password, or access_token for configuration. \
                 Either set them in the configuration or use the PINGFEDERATE_PROVIDER_* environment variables.",
            ));
            None
        }
        (true, Some(_)) => {
            diagnostics.push(Diagnostic::error(
                INVALID_PROVIDER_CONFIGURATION,
                "Username and password cannot be used with access_token. \
                 Only basic authentication (username and password) or access_token can be used.",
            ));
            None
        }
        (false, Some(token)) => Some(Credentials::AccessToken(token)),
        (true, None) => {
            let username = username.unwrap_or_default();
            let password = password.unwrap_or_default();
            if username.is_empty() {
                diagnostics.push(basic_auth_empty("username", USERNAME_ENV));
            }
            if password.is_empty() {
                diagnostics.push(basic_auth_empty("password", PASSWORD_ENV));
            }
            (!username.is_empty() && !password.is_empty())
                .then_some(Credentials::Basic { username, password })
        }
    }
}

/// Configured value when present, otherwise the environment variable
fn string_setting(config: &Dynamic, attribute: &str, env: &str) -> Option<String> {
    match config.attr(attribute).as_str() {
        Some(value) => Some(value.to_string()),
        None => std::env::var(env).ok().filter(|v| !v.is_empty()),
    }
}

/// Unparseable environment values count as false
fn bool_setting(config: &Dynamic, attribute: &str, env: &str) -> bool {
    config
        .attr(attribute)
        .as_bool()
        .or_else(|| std::env::var(env).ok().and_then(|v| v.parse::<bool>().ok()))
        .unwrap_or(false)
}

fn invalid(attribute: &str, detail: impl Into<String>) -> Diagnostic {
    Diagnostic::error(INVALID_PROVIDER_CONFIGURATION, detail)
        .with_attribute(AttributePath::new(attribute))
}

fn required_error(attribute: &str, env: &str) -> Diagnostic {
    invalid(
        attribute,
        format!(
            "{} is required. Either set it in the configuration or use the {} environment variable",
            attribute, env
        ),
    )
}

fn basic_auth_empty(attribute: &str, env: &str) -> Diagnostic {
    invalid(
        attribute,
        format!(
            "{} cannot be empty when using basic authentication. Either set it in the configuration or use the {} environment variable.",
            attribute, env
        ),
    )
}
