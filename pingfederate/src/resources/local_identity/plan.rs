//! Plan defaults that depend on other planned values

use std::collections::HashMap;
use tfplug::types::Dynamic;

const DEFAULT_OTP_CHARACTER_SET: &str = "23456789BCDFGHJKMNPQRSTVWXZbcdfghjkmnpqrstvwxz";

/// Which email verification settings a default applies to
#[derive(Clone, Copy)]
enum When {
    Enabled,
    Otp,
    Otl,
}

const EMAIL_DEFAULTS: [(&str, When); 12] = [
    ("verify_email_template_name", When::Enabled),
    ("email_verification_success_template_name", When::Enabled),
    ("email_verification_error_template_name", When::Enabled),
    ("require_verified_email", When::Enabled),
    ("allowed_otp_character_set", When::Otp),
    ("otp_time_to_live", When::Otp),
    ("otp_length", When::Otp),
    ("otp_retry_attempts", When::Otp),
    ("email_verification_otp_template_name", When::Otp),
    ("email_verification_sent_template_name", When::Otl),
    ("otl_time_to_live", When::Otl),
    ("require_verified_email_template_name", When::Otl),
];

fn email_default(name: &str) -> Dynamic {
    match name {
        "verify_email_template_name" => "message-template-email-ownership-verification.html".into(),
        "email_verification_success_template_name" => {
            "local.identity.email.verification.success.html".into()
        }
        "email_verification_error_template_name" => {
            "local.identity.email.verification.error.html".into()
        }
        "require_verified_email" => false.into(),
        "allowed_otp_character_set" => DEFAULT_OTP_CHARACTER_SET.into(),
        "otp_time_to_live" => 15i64.into(),
        "otp_length" => 8i64.into(),
        "otp_retry_attempts" => 3i64.into(),
        "email_verification_otp_template_name" => {
            "local.identity.email.verification.otp.html".into()
        }
        "email_verification_sent_template_name" => {
            "local.identity.email.verification.sent.html".into()
        }
        "otl_time_to_live" => 1440i64.into(),
        "require_verified_email_template_name" => {
            "local.identity.email.verification.required.html".into()
        }
        _ => Dynamic::Null,
    }
}

fn auth_source_update_policy_default() -> Dynamic {
    Dynamic::object([
        ("store_attributes", Dynamic::from(false)),
        ("retain_attributes", Dynamic::from(false)),
        ("update_attributes", Dynamic::from(false)),
        ("update_interval", Dynamic::from(0i64)),
    ])
}

fn email_verification_config_default() -> Dynamic {
    let mut config: HashMap<String, Dynamic> = EMAIL_DEFAULTS
        .iter()
        .map(|(name, _)| (name.to_string(), Dynamic::Null))
        .collect();
    config.insert("email_verification_enabled".to_string(), Dynamic::from(false));
    config.insert("email_verification_type".to_string(), Dynamic::Null);
    config.insert("field_for_email_to_verify".to_string(), Dynamic::from(""));
    config.insert("field_storing_verification_status".to_string(), Dynamic::from(""));
    config.insert("notification_publisher_ref".to_string(), Dynamic::Null);
    Dynamic::Map(config)
}

/// Attribute keys the server fills for a field of the given type
fn field_attribute_defaults(field_type: &str) -> &'static [&'static str] {
    match field_type {
        "HIDDEN" => &["Unique ID Field", "Mask Log Values"],
        "CHECKBOX" => &["Mask Log Values", "Must Be Checked", "Read-Only"],
        "DATE" => &["Mask Log Values", "Read-Only", "Required"],
        "EMAIL" | "PHONE" | "TEXT" => &["Mask Log Values", "Read-Only", "Required", "Unique ID Field"],
        _ => &[],
    }
}

fn replace_unknown(object: &mut HashMap<String, Dynamic>, name: &str, value: impl FnOnce() -> Dynamic) {
    let entry = object.entry(name.to_string()).or_insert(Dynamic::Null);
    if entry.is_unknown() {
        *entry = value();
    }
}

/// Resolve the unknown values the server would otherwise fill in. A null
/// plan (destroy) is left alone.
pub(crate) fn apply_profile_defaults(plan: &mut Dynamic) {
    let Dynamic::Map(profile) = plan else {
        return;
    };

    let enabled = profile.get("registration_enabled").and_then(Dynamic::as_bool) == Some(true)
        || profile.get("profile_enabled").and_then(Dynamic::as_bool) == Some(true);
    if enabled {
        replace_unknown(profile, "auth_source_update_policy", auth_source_update_policy_default);
        replace_unknown(profile, "email_verification_config", email_verification_config_default);
    } else {
        replace_unknown(profile, "auth_source_update_policy", || Dynamic::Null);
        replace_unknown(profile, "email_verification_config", || Dynamic::Null);
    }

    if let Some(Dynamic::Map(email)) = profile.get_mut("email_verification_config") {
        apply_email_verification_defaults(email);
    }

    if let Some(Dynamic::Map(field_config)) = profile.get_mut("field_config") {
        if let Some(Dynamic::List(fields)) = field_config.get_mut("fields") {
            for field in fields.iter_mut() {
                if let Dynamic::Map(field) = field {
                    apply_field_defaults(field);
                }
            }
        }
    }
}

fn apply_email_verification_defaults(email: &mut HashMap<String, Dynamic>) {
    let enabled = email.get("email_verification_enabled").and_then(Dynamic::as_bool) == Some(true);
    let verification_type = email
        .get("email_verification_type")
        .and_then(Dynamic::as_str)
        .map(str::to_string);
    let is_otp = verification_type.as_deref() == Some("OTP");
    let is_otl = verification_type.as_deref() == Some("OTL");

    for (name, when) in EMAIL_DEFAULTS {
        let applies = enabled
            && match when {
                When::Enabled => true,
                When::Otp => is_otp,
                When::Otl => is_otl,
            };
        replace_unknown(email, name, || {
            if applies {
                email_default(name)
            } else {
                Dynamic::Null
            }
        });
    }

    // anything the table does not cover has no server default
    for value in email.values_mut() {
        if value.is_unknown() {
            *value = Dynamic::Null;
        }
    }
}

fn apply_field_defaults(field: &mut HashMap<String, Dynamic>) {
    let field_type = field
        .get("type")
        .and_then(Dynamic::as_str)
        .unwrap_or_default()
        .to_string();

    let keys = field_attribute_defaults(&field_type);
    if !keys.is_empty() {
        replace_unknown(field, "attributes", || {
            Dynamic::Map(
                keys.iter()
                    .map(|key| (key.to_string(), Dynamic::from(false)))
                    .collect(),
            )
        });
    }
    replace_unknown(field, "registration_page_field", || Dynamic::from(false));
    replace_unknown(field, "profile_page_field", || Dynamic::from(false));
    replace_unknown(field, "default_value", || Dynamic::Null);
    replace_unknown(field, "options", || Dynamic::Null);
}
