//! Local identity profile plan and state conversion

use crate::api::local_identity::{
    AuthSource, AuthSourceUpdatePolicy, DataStoreAttribute, DataStoreConfig,
    EmailVerificationConfig, FieldConfig, LocalIdentityField, LocalIdentityProfile,
    ProfileConfig, RegistrationConfig,
};
use crate::common::{int64, resource_link, string_list, ConversionError, ObjectReader};
use std::collections::HashMap;
use tfplug::types::{AttributePath, Dynamic, DynamicValue};

pub(crate) fn profile_from_plan(plan: &Dynamic) -> Result<LocalIdentityProfile, ConversionError> {
    let plan = ObjectReader::new(plan, AttributePath::root());

    let auth_sources = plan
        .optional_list("auth_sources")?
        .unwrap_or_default()
        .iter()
        .map(|source| {
            Ok(AuthSource {
                id: source.optional_string("id")?,
                source: source.optional_string("source")?,
            })
        })
        .collect::<Result<Vec<_>, ConversionError>>()?;

    Ok(LocalIdentityProfile {
        id: plan.optional_string("profile_id")?,
        name: plan.required_string("name")?,
        apc_id: resource_link::required_from_plan(&plan, "apc_id")?,
        auth_sources,
        auth_source_update_policy: plan
            .optional_object("auth_source_update_policy")?
            .map(|policy| auth_source_update_policy_from_plan(&policy))
            .transpose()?,
        registration_enabled: plan.optional_bool("registration_enabled")?,
        registration_config: plan
            .optional_object("registration_config")?
            .map(|config| registration_config_from_plan(&config))
            .transpose()?,
        profile_config: plan
            .optional_object("profile_config")?
            .map(|config| {
                Ok(ProfileConfig {
                    delete_identity_enabled: config.optional_bool("delete_identity_enabled")?,
                    template_name: config.required_string("template_name")?,
                })
            })
            .transpose()?,
        field_config: plan
            .optional_object("field_config")?
            .map(|config| field_config_from_plan(&config))
            .transpose()?,
        email_verification_config: plan
            .optional_object("email_verification_config")?
            .map(|config| email_verification_from_plan(&config))
            .transpose()?,
        data_store_config: plan
            .optional_object("data_store_config")?
            .map(|config| data_store_config_from_plan(&config))
            .transpose()?,
        profile_enabled: plan.optional_bool("profile_enabled")?,
    })
}

fn auth_source_update_policy_from_plan(
    policy: &ObjectReader,
) -> Result<AuthSourceUpdatePolicy, ConversionError> {
    Ok(AuthSourceUpdatePolicy {
        store_attributes: policy.optional_bool("store_attributes")?,
        retain_attributes: policy.optional_bool("retain_attributes")?,
        update_attributes: policy.optional_bool("update_attributes")?,
        update_interval: policy.optional_i64("update_interval")?,
    })
}

fn registration_config_from_plan(
    config: &ObjectReader,
) -> Result<RegistrationConfig, ConversionError> {
    Ok(RegistrationConfig {
        captcha_enabled: config.optional_bool("captcha_enabled")?,
        captcha_provider_ref: resource_link::optional_from_plan(config, "captcha_provider_ref")?,
        template_name: config.required_string("template_name")?,
        create_authn_session_after_registration: config
            .optional_bool("create_authn_session_after_registration")?,
        username_field: config.optional_string("username_field")?,
        this_is_my_device_enabled: config.optional_bool("this_is_my_device_enabled")?,
        registration_workflow: resource_link::optional_from_plan(config, "registration_workflow")?,
        execute_workflow: config.optional_string("execute_workflow")?,
    })
}

fn field_config_from_plan(config: &ObjectReader) -> Result<FieldConfig, ConversionError> {
    let fields = config
        .optional_list("fields")?
        .map(|fields| {
            fields
                .iter()
                .map(|field| {
                    Ok(LocalIdentityField {
                        field_type: field.required_string("type")?,
                        id: field.required_string("id")?,
                        label: field.required_string("label")?,
                        registration_page_field: field.optional_bool("registration_page_field")?,
                        profile_page_field: field.optional_bool("profile_page_field")?,
                        attributes: field.optional_bool_map("attributes")?,
                        options: field.optional_string_list("options")?,
                        default_value: field.optional_string("default_value")?,
                    })
                })
                .collect::<Result<Vec<_>, ConversionError>>()
        })
        .transpose()?;

    Ok(FieldConfig {
        fields,
        strip_space_from_unique_field: config.optional_bool("strip_space_from_unique_field")?,
    })
}

fn email_verification_from_plan(
    config: &ObjectReader,
) -> Result<EmailVerificationConfig, ConversionError> {
    Ok(EmailVerificationConfig {
        email_verification_enabled: config.optional_bool("email_verification_enabled")?,
        verify_email_template_name: config.optional_string("verify_email_template_name")?,
        email_verification_sent_template_name: config
            .optional_string("email_verification_sent_template_name")?,
        email_verification_success_template_name: config
            .optional_string("email_verification_success_template_name")?,
        email_verification_error_template_name: config
            .optional_string("email_verification_error_template_name")?,
        email_verification_type: config.optional_string("email_verification_type")?,
        otp_length: config.optional_i64("otp_length")?,
        otp_retry_attempts: config.optional_i64("otp_retry_attempts")?,
        allowed_otp_character_set: config.optional_string("allowed_otp_character_set")?,
        otp_time_to_live: config.optional_i64("otp_time_to_live")?,
        email_verification_otp_template_name: config
            .optional_string("email_verification_otp_template_name")?,
        otl_time_to_live: config.optional_i64("otl_time_to_live")?,
        field_for_email_to_verify: config.optional_string("field_for_email_to_verify")?,
        field_storing_verification_status: config
            .optional_string("field_storing_verification_status")?,
        notification_publisher_ref: resource_link::optional_from_plan(
            config,
            "notification_publisher_ref",
        )?,
        require_verified_email: config.optional_bool("require_verified_email")?,
        require_verified_email_template_name: config
            .optional_string("require_verified_email_template_name")?,
    })
}

fn data_store_config_from_plan(config: &ObjectReader) -> Result<DataStoreConfig, ConversionError> {
    let data_store_mapping = config
        .optional_map("data_store_mapping")?
        .unwrap_or_default()
        .into_iter()
        .map(|(key, attribute)| {
            Ok((
                key,
                DataStoreAttribute {
                    attribute_type: attribute.required_string("type")?,
                    name: attribute.required_string("name")?,
                    metadata: attribute.optional_string_map("metadata")?,
                },
            ))
        })
        .collect::<Result<HashMap<_, _>, ConversionError>>()?;

    Ok(DataStoreConfig {
        store_type: config.required_string("type")?,
        data_store_ref: resource_link::required_from_plan(config, "data_store_ref")?,
        data_store_mapping,
        base_dn: config.optional_string("base_dn")?,
        create_pattern: config.optional_string("create_pattern")?,
        object_class: config.optional_string("object_class")?,
        auxiliary_object_classes: config.optional_string_list("auxiliary_object_classes")?,
    })
}

/// State for a profile returned by the server. Both `id` and `profile_id`
/// carry the server-side ID.
pub(crate) fn profile_to_state(profile: &LocalIdentityProfile) -> DynamicValue {
    let auth_sources = profile
        .auth_sources
        .iter()
        .map(|source| {
            Dynamic::object([
                ("id", Dynamic::from(source.id.clone())),
                ("source", Dynamic::from(source.source.clone())),
            ])
        })
        .collect();

    DynamicValue::new(Dynamic::object([
        ("id", Dynamic::from(profile.id.clone())),
        ("profile_id", Dynamic::from(profile.id.clone())),
        ("name", Dynamic::from(profile.name.clone())),
        ("apc_id", resource_link::to_state(&profile.apc_id)),
        ("auth_sources", Dynamic::List(auth_sources)),
        (
            "auth_source_update_policy",
            profile
                .auth_source_update_policy
                .as_ref()
                .map(auth_source_update_policy_to_state)
                .unwrap_or(Dynamic::Null),
        ),
        (
            "registration_enabled",
            Dynamic::from(profile.registration_enabled.unwrap_or(false)),
        ),
        (
            "registration_config",
            profile
                .registration_config
                .as_ref()
                .map(registration_config_to_state)
                .unwrap_or(Dynamic::Null),
        ),
        (
            "profile_config",
            profile
                .profile_config
                .as_ref()
                .map(|config| {
                    Dynamic::object([
                        (
                            "delete_identity_enabled",
                            Dynamic::from(config.delete_identity_enabled),
                        ),
                        ("template_name", Dynamic::from(config.template_name.clone())),
                    ])
                })
                .unwrap_or(Dynamic::Null),
        ),
        (
            "field_config",
            profile
                .field_config
                .as_ref()
                .map(field_config_to_state)
                .unwrap_or(Dynamic::Null),
        ),
        (
            "email_verification_config",
            profile
                .email_verification_config
                .as_ref()
                .map(email_verification_to_state)
                .unwrap_or(Dynamic::Null),
        ),
        (
            "data_store_config",
            profile
                .data_store_config
                .as_ref()
                .map(data_store_config_to_state)
                .unwrap_or(Dynamic::Null),
        ),
        ("profile_enabled", Dynamic::from(profile.profile_enabled)),
    ]))
}

fn auth_source_update_policy_to_state(policy: &AuthSourceUpdatePolicy) -> Dynamic {
    Dynamic::object([
        ("store_attributes", Dynamic::from(policy.store_attributes)),
        ("retain_attributes", Dynamic::from(policy.retain_attributes)),
        ("update_attributes", Dynamic::from(policy.update_attributes)),
        ("update_interval", int64(policy.update_interval)),
    ])
}

fn registration_config_to_state(config: &RegistrationConfig) -> Dynamic {
    Dynamic::object([
        ("captcha_enabled", Dynamic::from(config.captcha_enabled)),
        (
            "captcha_provider_ref",
            resource_link::optional_to_state(config.captcha_provider_ref.as_ref()),
        ),
        ("template_name", Dynamic::from(config.template_name.clone())),
        (
            "create_authn_session_after_registration",
            Dynamic::from(config.create_authn_session_after_registration),
        ),
        ("username_field", Dynamic::from(config.username_field.clone())),
        (
            "this_is_my_device_enabled",
            Dynamic::from(config.this_is_my_device_enabled),
        ),
        (
            "registration_workflow",
            resource_link::optional_to_state(config.registration_workflow.as_ref()),
        ),
        ("execute_workflow", Dynamic::from(config.execute_workflow.clone())),
    ])
}

fn field_config_to_state(config: &FieldConfig) -> Dynamic {
    let fields = config.fields.as_ref().map(|fields| {
        Dynamic::List(
            fields
                .iter()
                .map(|field| {
                    let attributes = field.attributes.as_ref().map(|attributes| {
                        Dynamic::Map(
                            attributes
                                .iter()
                                .map(|(k, v)| (k.clone(), Dynamic::Bool(*v)))
                                .collect(),
                        )
                    });
                    Dynamic::object([
                        ("type", Dynamic::from(field.field_type.clone())),
                        ("id", Dynamic::from(field.id.clone())),
                        ("label", Dynamic::from(field.label.clone())),
                        (
                            "registration_page_field",
                            Dynamic::from(field.registration_page_field),
                        ),
                        ("profile_page_field", Dynamic::from(field.profile_page_field)),
                        ("attributes", attributes.unwrap_or(Dynamic::Null)),
                        ("options", string_list(field.options.as_ref())),
                        ("default_value", Dynamic::from(field.default_value.clone())),
                    ])
                })
                .collect(),
        )
    });

    Dynamic::object([
        ("fields", fields.unwrap_or(Dynamic::Null)),
        (
            "strip_space_from_unique_field",
            Dynamic::from(config.strip_space_from_unique_field),
        ),
    ])
}

fn email_verification_to_state(config: &EmailVerificationConfig) -> Dynamic {
    Dynamic::object([
        (
            "email_verification_enabled",
            Dynamic::from(config.email_verification_enabled),
        ),
        (
            "verify_email_template_name",
            Dynamic::from(config.verify_email_template_name.clone()),
        ),
        (
            "email_verification_sent_template_name",
            Dynamic::from(config.email_verification_sent_template_name.clone()),
        ),
        (
            "email_verification_success_template_name",
            Dynamic::from(config.email_verification_success_template_name.clone()),
        ),
        (
            "email_verification_error_template_name",
            Dynamic::from(config.email_verification_error_template_name.clone()),
        ),
        (
            "email_verification_type",
            Dynamic::from(config.email_verification_type.clone()),
        ),
        ("otp_length", int64(config.otp_length)),
        ("otp_retry_attempts", int64(config.otp_retry_attempts)),
        (
            "allowed_otp_character_set",
            Dynamic::from(config.allowed_otp_character_set.clone()),
        ),
        ("otp_time_to_live", int64(config.otp_time_to_live)),
        (
            "email_verification_otp_template_name",
            Dynamic::from(config.email_verification_otp_template_name.clone()),
        ),
        ("otl_time_to_live", int64(config.otl_time_to_live)),
        (
            "field_for_email_to_verify",
            Dynamic::from(config.field_for_email_to_verify.clone()),
        ),
        (
            "field_storing_verification_status",
            Dynamic::from(config.field_storing_verification_status.clone()),
        ),
        (
            "notification_publisher_ref",
            resource_link::optional_to_state(config.notification_publisher_ref.as_ref()),
        ),
        (
            "require_verified_email",
            Dynamic::from(config.require_verified_email),
        ),
        (
            "require_verified_email_template_name",
            Dynamic::from(config.require_verified_email_template_name.clone()),
        ),
    ])
}

fn data_store_config_to_state(config: &DataStoreConfig) -> Dynamic {
    let mapping = config
        .data_store_mapping
        .iter()
        .map(|(key, attribute)| {
            let metadata = attribute
                .metadata
                .iter()
                .flatten()
                .map(|(k, v)| (k.clone(), Dynamic::from(v.clone())))
                .collect();
            (
                key.clone(),
                Dynamic::object([
                    ("type", Dynamic::from(attribute.attribute_type.clone())),
                    ("name", Dynamic::from(attribute.name.clone())),
                    ("metadata", Dynamic::Map(metadata)),
                ]),
            )
        })
        .collect();

    Dynamic::object([
        ("type", Dynamic::from(config.store_type.clone())),
        ("data_store_ref", resource_link::to_state(&config.data_store_ref)),
        ("data_store_mapping", Dynamic::Map(mapping)),
        ("base_dn", Dynamic::from(config.base_dn.clone())),
        ("create_pattern", Dynamic::from(config.create_pattern.clone())),
        ("object_class", Dynamic::from(config.object_class.clone())),
        (
            "auxiliary_object_classes",
            string_list(config.auxiliary_object_classes.as_ref()),
        ),
    ])
}
