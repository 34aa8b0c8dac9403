//! Cross-attribute rules for local identity profile configuration

use tfplug::types::{Diagnostic, Dynamic};

const INVALID_COMBINATION: &str = "Invalid Attribute Combination!";
const INVALID_VALUE: &str = "Invalid Value for Attribute!";

/// Field types that take no `options`
const NO_OPTIONS: [&str; 6] = ["CHECKBOX", "DATE", "EMAIL", "HIDDEN", "PHONE", "TEXT"];
/// Field types that take no `default_value`
const NO_DEFAULT_VALUE: [&str; 4] = ["CHECKBOX_GROUP", "EMAIL", "HIDDEN", "PHONE"];

const OTP_ONLY: [&str; 4] = [
    "otp_length",
    "otp_retry_attempts",
    "allowed_otp_character_set",
    "email_verification_otp_template_name",
];

fn error(summary: &str, detail: impl Into<String>) -> Diagnostic {
    Diagnostic::error(summary, detail)
}

fn is_true(value: &Dynamic) -> bool {
    value.as_bool() == Some(true)
}

fn fields(config: &Dynamic) -> &[Dynamic] {
    config
        .attr("field_config")
        .attr("fields")
        .as_list()
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Every rule runs; problems accumulate.
pub(crate) fn validate_profile(config: &Dynamic) -> Vec<Diagnostic> {
    let mut diagnostics = vec![];
    validate_email_verification(config.attr("email_verification_config"), &mut diagnostics);
    validate_enablement(config, &mut diagnostics);
    validate_captcha(config.attr("registration_config"), &mut diagnostics);
    validate_field_types(config, &mut diagnostics);
    diagnostics
}

fn validate_email_verification(email: &Dynamic, diagnostics: &mut Vec<Diagnostic>) {
    if !email.is_present() {
        return;
    }

    let not_allowed = |name: &str, when: &str| {
        error(
            INVALID_COMBINATION,
            format!("{} attribute is not allowed when {}.", name, when),
        )
    };

    match email.attr("email_verification_type").as_str() {
        Some("OTP") => {
            if email.attr("otl_time_to_live").is_present() {
                diagnostics.push(not_allowed("otl_time_to_live", "email_verification_type is OTP"));
            }
            for name in [
                "require_verified_email_template_name",
                "email_verification_sent_template_name",
            ] {
                if email.attr(name).is_present() {
                    diagnostics.push(error(
                        INVALID_COMBINATION,
                        format!(
                            "{} is not allowed when email verification or require_verified_email is disabled or when email_verification_type is OTP.",
                            name
                        ),
                    ));
                }
            }
        }
        Some("OTL") => {
            for name in OTP_ONLY {
                if email.attr(name).is_present() {
                    diagnostics.push(not_allowed(name, "email_verification_type is OTL"));
                }
            }
        }
        _ => {
            for name in ["otl_time_to_live"].into_iter().chain(OTP_ONLY) {
                if email.attr(name).is_present() {
                    diagnostics.push(not_allowed(name, "email verification is disabled"));
                }
            }
            for name in [
                "require_verified_email_template_name",
                "email_verification_sent_template_name",
            ] {
                if email.attr(name).is_present() {
                    diagnostics.push(error(
                        INVALID_COMBINATION,
                        format!("{} is not allowed when email verification is disabled.", name),
                    ));
                }
            }
        }
    }

    if is_true(email.attr("email_verification_enabled")) {
        for name in ["field_for_email_to_verify", "field_storing_verification_status"] {
            let value = email.attr(name);
            if value.is_null() || value.as_str() == Some("") {
                diagnostics.push(error(
                    "Missing Required Attribute",
                    format!(
                        "{} is required when email_verification_enabled is set to true",
                        name
                    ),
                ));
            }
        }
        if email.attr("notification_publisher_ref").is_null() {
            diagnostics.push(error(
                "Missing Required Attribute",
                "notification_publisher_ref is required when email_verification_enabled is set to true",
            ));
        }
    }
}

fn validate_enablement(config: &Dynamic, diagnostics: &mut Vec<Diagnostic>) {
    let registration_enabled = is_true(config.attr("registration_enabled"));
    let profile_enabled = is_true(config.attr("profile_enabled"));

    if !registration_enabled && !profile_enabled {
        let configured = [
            "email_verification_config",
            "data_store_config",
            "field_config",
            "registration_config",
            "profile_config",
        ]
        .iter()
        .any(|name| config.attr(name).is_present());
        if configured {
            diagnostics.push(error(
                INVALID_COMBINATION,
                "email, data_store_config, field Config, registration_config and profile_config are not allowed when registration and profile are disabled.",
            ));
        }
        if config.attr("auth_source_update_policy").is_present() {
            diagnostics.push(error(
                INVALID_COMBINATION,
                "auth_source_update_policy is not allowed when registration and profile are disabled.",
            ));
        }
        return;
    }

    if config.attr("field_config").is_null() {
        diagnostics.push(error(
            INVALID_VALUE,
            "field_config is required when profile or registration is enabled.",
        ));
    }
    if profile_enabled && config.attr("profile_config").is_null() {
        diagnostics.push(error(
            INVALID_VALUE,
            "profile_config is required when profile is enabled.",
        ));
    }
    if registration_enabled && config.attr("registration_config").is_null() {
        diagnostics.push(error(
            INVALID_VALUE,
            "registration_config is required when registration is enabled.",
        ));
    }

    if !registration_enabled {
        for field in fields(config) {
            if is_true(field.attr("registration_page_field")) {
                diagnostics.push(error(
                    INVALID_VALUE,
                    "registration_page_field option for the fields attribute should not be set to 'true' when registration is disabled.",
                ));
            }
            if field.attr("profile_page_field").as_bool() == Some(false) {
                diagnostics.push(error(
                    INVALID_VALUE,
                    "profile_page_field option is required to be set to 'true' for the fields attribute when profile management is the only option enabled.",
                ));
            }
        }
        if config.attr("registration_config").is_present() {
            diagnostics.push(error(
                "Invalid Attribute!",
                "registration_config is not allowed when registration is not enabled.",
            ));
        }
    }

    if !profile_enabled {
        for field in fields(config) {
            if is_true(field.attr("profile_page_field")) {
                diagnostics.push(error(
                    INVALID_VALUE,
                    "profile_page_field option for the fields attribute should not be set to 'true' when profile is disabled.",
                ));
            }
            if field.attr("registration_page_field").as_bool() == Some(false) {
                diagnostics.push(error(
                    INVALID_VALUE,
                    "registration_page_field option is required to be set to 'true' for the fields attribute when registration is the only option enabled.",
                ));
            }
        }
        if config.attr("profile_config").is_present() {
            diagnostics.push(error(
                INVALID_COMBINATION,
                "profile_config is not allowed when profile is not enabled.",
            ));
        }
    }
}

fn validate_captcha(registration: &Dynamic, diagnostics: &mut Vec<Diagnostic>) {
    if !registration.is_present() {
        return;
    }
    let enabled = registration.attr("captcha_enabled").as_bool();
    let provider = registration.attr("captcha_provider_ref");
    let missing_provider = enabled == Some(true) && provider.is_null();
    let unexpected_provider = enabled == Some(false) && provider.is_present();
    if missing_provider || unexpected_provider {
        diagnostics.push(error(
            "Invalid registration captcha settings",
            "If registration_config.captcha_enabled is set to true, then registration_config.captcha_provider_ref must be configured. If registration_config.captcha_enabled is false, then registration_config.captcha_provider_ref must not be configured.",
        ));
    }
}

fn validate_field_types(config: &Dynamic, diagnostics: &mut Vec<Diagnostic>) {
    for field in fields(config) {
        let Some(field_type) = field.attr("type").as_str() else {
            continue;
        };
        let not_applicable = |name: &str| {
            error(
                "Invalid attribute combination",
                format!(
                    "\"{}\" is not applicable for the \"{}\" field type.",
                    name, field_type
                ),
            )
        };
        if NO_DEFAULT_VALUE.contains(&field_type) && field.attr("default_value").is_present() {
            diagnostics.push(not_applicable("default_value"));
        }
        if NO_OPTIONS.contains(&field_type) && field.attr("options").is_present() {
            diagnostics.push(not_applicable("options"));
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    fn field(field_type: &str, extra: Vec<(&str, Dynamic)>) -> Dynamic {
        let mut members = vec![
            ("type", Dynamic::from(field_type)),
            ("id", Dynamic::from("f")),
            ("label", Dynamic::from("F")),
        ];
        members.extend(extra);
        Dynamic::object(members)
    }

    fn profile(members: Vec<(&str, Dynamic)>) -> Dynamic {
        Dynamic::object(members)
    }

    fn details(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.detail.as_str()).collect()
    }

    #[test]
    fn disabled_profile_with_nothing_configured_is_valid() {
        let config = profile(vec![
            ("registration_enabled", Dynamic::from(false)),
            ("profile_enabled", Dynamic::Null),
        ]);
        assert!(validate_profile(&config).is_empty());
    }

    #[test]
    fn otp_rejects_otl_attributes() {
        let config = profile(vec![(
            "email_verification_config",
            Dynamic::object([
                ("email_verification_type", Dynamic::from("OTP")),
                ("otl_time_to_live", Dynamic::from(1440i64)),
                ("email_verification_sent_template_name", Dynamic::from("sent.html")),
            ]),
        )]);
        let diagnostics = validate_email_verification_only(&config);
        assert_eq!(
            details(&diagnostics),
            vec![
                "otl_time_to_live attribute is not allowed when email_verification_type is OTP.",
                "email_verification_sent_template_name is not allowed when email verification or require_verified_email is disabled or when email_verification_type is OTP.",
            ]
        );
        assert!(diagnostics.iter().all(|d| d.summary == INVALID_COMBINATION));
    }

    #[test]
    fn missing_type_rejects_every_type_specific_attribute() {
        let config = profile(vec![(
            "email_verification_config",
            Dynamic::object([
                ("otp_length", Dynamic::from(8i64)),
                ("otl_time_to_live", Dynamic::from(1440i64)),
            ]),
        )]);
        let diagnostics = validate_email_verification_only(&config);
        assert_eq!(
            details(&diagnostics),
            vec![
                "otl_time_to_live attribute is not allowed when email verification is disabled.",
                "otp_length attribute is not allowed when email verification is disabled.",
            ]
        );
    }

    #[test]
    fn enabled_verification_requires_fields_and_publisher() {
        let config = profile(vec![(
            "email_verification_config",
            Dynamic::object([
                ("email_verification_enabled", Dynamic::from(true)),
                ("email_verification_type", Dynamic::from("OTL")),
                ("field_for_email_to_verify", Dynamic::from("")),
                ("field_storing_verification_status", Dynamic::from("verified")),
            ]),
        )]);
        let diagnostics = validate_email_verification_only(&config);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.summary == "Missing Required Attribute"));
        assert!(diagnostics[0].detail.starts_with("field_for_email_to_verify"));
        assert!(diagnostics[1].detail.starts_with("notification_publisher_ref"));
    }

    fn validate_email_verification_only(config: &Dynamic) -> Vec<Diagnostic> {
        let mut diagnostics = vec![];
        validate_email_verification(config.attr("email_verification_config"), &mut diagnostics);
        diagnostics
    }

    #[test]
    fn disabled_profile_rejects_sub_configuration() {
        let config = profile(vec![
            ("registration_enabled", Dynamic::from(false)),
            ("profile_enabled", Dynamic::from(false)),
            ("field_config", Dynamic::object([("fields", Dynamic::List(vec![]))])),
            (
                "auth_source_update_policy",
                Dynamic::object([("store_attributes", Dynamic::from(true))]),
            ),
        ]);
        let diagnostics = validate_profile(&config);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[1].detail.starts_with("auth_source_update_policy"));
    }

    #[test]
    fn profile_only_rules_apply_to_fields() {
        let config = profile(vec![
            ("registration_enabled", Dynamic::from(false)),
            ("profile_enabled", Dynamic::from(true)),
            (
                "profile_config",
                Dynamic::object([("template_name", Dynamic::from("profile.html"))]),
            ),
            (
                "field_config",
                Dynamic::object([(
                    "fields",
                    Dynamic::List(vec![
                        field("TEXT", vec![("registration_page_field", Dynamic::from(true))]),
                        field("TEXT", vec![("profile_page_field", Dynamic::from(false))]),
                    ]),
                )]),
            ),
        ]);
        let diagnostics = validate_profile(&config);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].detail.starts_with("registration_page_field option"));
        assert!(diagnostics[1].detail.starts_with("profile_page_field option is required"));
    }

    #[test]
    fn enabled_registration_requires_its_configuration() {
        let config = profile(vec![("registration_enabled", Dynamic::from(true))]);
        assert_eq!(
            details(&validate_profile(&config)),
            vec![
                "field_config is required when profile or registration is enabled.",
                "registration_config is required when registration is enabled.",
            ]
        );
    }

    #[test]
    fn captcha_provider_must_match_captcha_enabled() {
        let registration = |enabled: bool, provider: Dynamic| {
            profile(vec![
                ("registration_enabled", Dynamic::from(true)),
                ("field_config", Dynamic::object([("fields", Dynamic::List(vec![]))])),
                (
                    "registration_config",
                    Dynamic::object([
                        ("captcha_enabled", Dynamic::from(enabled)),
                        ("captcha_provider_ref", provider),
                        ("template_name", Dynamic::from("registration.html")),
                    ]),
                ),
            ])
        };
        let provider = Dynamic::object([("id", Dynamic::from("recaptcha"))]);

        for config in [registration(true, Dynamic::Null), registration(false, provider.clone())] {
            let diagnostics = validate_profile(&config);
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].summary, "Invalid registration captcha settings");
        }
        assert!(validate_profile(&registration(true, provider)).is_empty());
    }

    #[test]
    fn field_type_limits_options_and_default_value() {
        let config = profile(vec![
            ("registration_enabled", Dynamic::from(true)),
            (
                "registration_config",
                Dynamic::object([("template_name", Dynamic::from("registration.html"))]),
            ),
            (
                "field_config",
                Dynamic::object([(
                    "fields",
                    Dynamic::List(vec![
                        field(
                            "CHECKBOX",
                            vec![("options", Dynamic::List(vec![Dynamic::from("yes")]))],
                        ),
                        field("EMAIL", vec![("default_value", Dynamic::from("a@b.c"))]),
                        field(
                            "DROP_DOWN",
                            vec![
                                ("options", Dynamic::List(vec![Dynamic::from("a")])),
                                ("default_value", Dynamic::from("a")),
                            ],
                        ),
                    ]),
                )]),
            ),
        ]);
        assert_eq!(
            details(&validate_profile(&config)),
            vec![
                "\"options\" is not applicable for the \"CHECKBOX\" field type.",
                "\"default_value\" is not applicable for the \"EMAIL\" field type.",
            ]
        );
    }
}
