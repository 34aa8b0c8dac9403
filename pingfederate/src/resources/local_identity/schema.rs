use crate::common::resource_link;
use tfplug::defaults::StaticDefault;
use tfplug::plan_modifier::{RequiresReplace, UseStateForUnknown};
use tfplug::schema::{
    Attribute, AttributeBuilder, AttributeType, ObjectNestingMode, Schema, SchemaBuilder,
};
use tfplug::validator::{Int64Between, SizeAtLeast, StringLength, StringOneOf, StringPattern};

pub const FIELD_TYPES: [&str; 8] = [
    "CHECKBOX",
    "CHECKBOX_GROUP",
    "DATE",
    "DROP_DOWN",
    "EMAIL",
    "PHONE",
    "TEXT",
    "HIDDEN",
];

pub const DATA_STORE_TYPES: [&str; 4] = ["LDAP", "PING_ONE_LDAP_GATEWAY", "JDBC", "CUSTOM"];

const ID_PATTERN: &str = "^[a-zA-Z0-9._-]+$";
const ID_PATTERN_MESSAGE: &str = "must contain only alphanumeric characters, '.', '_' or '-'";

fn string(name: &str, description: &str) -> AttributeBuilder {
    AttributeBuilder::new(name, AttributeType::String).description(description)
}

fn bool_with_default(name: &str, description: &str, default: bool) -> Attribute {
    AttributeBuilder::new(name, AttributeType::Bool)
        .description(description)
        .optional()
        .computed()
        .default(StaticDefault::bool(default))
        .build()
}

fn required_name(name: &str, description: &str) -> Attribute {
    string(name, description)
        .required()
        .validator(StringLength::at_least(1))
        .build()
}

fn auth_sources() -> Attribute {
    AttributeBuilder::nested(
        "auth_sources",
        ObjectNestingMode::Set,
        vec![
            string(
                "id",
                "The persistent, unique ID for the local identity authentication source. It can be any combination of `[a-zA-Z0-9._-]`. This property is system-assigned if not specified.",
            )
            .optional()
            .computed()
            .validator(StringPattern::create(ID_PATTERN, ID_PATTERN_MESSAGE))
            .plan_modifier(UseStateForUnknown::create())
            .build(),
            required_name(
                "source",
                "The local identity authentication source. Source is unique.",
            ),
        ],
    )
    .description("The local identity authentication sources. Sources are unique.")
    .optional()
    .computed()
    .default(StaticDefault::empty_list())
    .build()
}

fn auth_source_update_policy() -> Attribute {
    AttributeBuilder::nested(
        "auth_source_update_policy",
        ObjectNestingMode::Single,
        vec![
            bool_with_default(
                "store_attributes",
                "Whether or not to store attributes that came from authentication sources. The default value is `false`.",
                false,
            ),
            bool_with_default(
                "retain_attributes",
                "Whether or not to keep attributes after user disconnects. The default value is `false`.",
                false,
            ),
            bool_with_default(
                "update_attributes",
                "Whether or not to update attributes when users authenticate. The default value is `false`.",
                false,
            ),
            AttributeBuilder::new("update_interval", AttributeType::Number)
                .description("The minimum number of days between updates. The default value is `0`.")
                .optional()
                .computed()
                .default(StaticDefault::number(0.0))
                .build(),
        ],
    )
    .description("The attribute update policy for authentication sources.")
    .optional()
    .computed()
    .build()
}

fn registration_config() -> Attribute {
    AttributeBuilder::nested(
        "registration_config",
        ObjectNestingMode::Single,
        vec![
            bool_with_default(
                "captcha_enabled",
                "Whether CAPTCHA is enabled or not in the registration configuration. The default value is `false`.",
                false,
            ),
            resource_link::attribute(
                "captcha_provider_ref",
                "Reference to the associated CAPTCHA provider.",
            )
            .optional()
            .build(),
            required_name(
                "template_name",
                "The template name for the registration configuration.",
            ),
            bool_with_default(
                "create_authn_session_after_registration",
                "Whether to create an Authentication Session when registering a local account. The default value is `true`.",
                true,
            ),
            string(
                "username_field",
                "When creating an Authentication Session after registering a local account, PingFederate will pass the Unique ID field's value as the username. If the Unique ID value is not the username, then override which field's value will be used as the username.",
            )
            .optional()
            .validator(StringLength::at_least(1))
            .build(),
            bool_with_default(
                "this_is_my_device_enabled",
                "Allows users to indicate whether their device is shared or private. The default value is `false`.",
                false,
            ),
            resource_link::attribute(
                "registration_workflow",
                "The policy fragment to be executed as part of the registration workflow.",
            )
            .optional()
            .build(),
            string(
                "execute_workflow",
                "Whether PingFederate executes the registration workflow before or after account creation. Supported values are `BEFORE_ACCOUNT_CREATION` and `AFTER_ACCOUNT_CREATION`. Requires that `registration_workflow` is also set.",
            )
            .optional()
            .validator(StringOneOf::create(&[
                "BEFORE_ACCOUNT_CREATION",
                "AFTER_ACCOUNT_CREATION",
            ]))
            .build(),
        ],
    )
    .description("The local identity profile registration configuration.")
    .optional()
    .build()
}

fn profile_config() -> Attribute {
    AttributeBuilder::nested(
        "profile_config",
        ObjectNestingMode::Single,
        vec![
            bool_with_default(
                "delete_identity_enabled",
                "Whether the end user is allowed to use delete functionality. The default value is `false`.",
                false,
            ),
            required_name(
                "template_name",
                "The template name for end-user profile management.",
            ),
        ],
    )
    .description("The local identity profile management configuration.")
    .optional()
    .build()
}

fn field_config() -> Attribute {
    let field = vec![
        string(
            "type",
            "The type of the local identity field. Supported values are `CHECKBOX`, `CHECKBOX_GROUP`, `DATE`, `DROP_DOWN`, `EMAIL`, `PHONE`, `TEXT`, and `HIDDEN`.",
        )
        .required()
        .validator(StringOneOf::create(&FIELD_TYPES))
        .build(),
        required_name("id", "Id of the local identity field."),
        required_name("label", "Label of the local identity field."),
        AttributeBuilder::new("registration_page_field", AttributeType::Bool)
            .description("Whether this is a registration page field or not. The default value is `false`.")
            .optional()
            .computed()
            .build(),
        AttributeBuilder::new("profile_page_field", AttributeType::Bool)
            .description("Whether this is a profile page field or not. The default value is `false`.")
            .optional()
            .computed()
            .build(),
        AttributeBuilder::new("attributes", AttributeType::Map(Box::new(AttributeType::Bool)))
            .description("Attributes of the local identity field.")
            .optional()
            .computed()
            .build(),
        AttributeBuilder::new("options", AttributeType::Set(Box::new(AttributeType::String)))
            .description("The list of options for this selection field.")
            .optional()
            .computed()
            .validator(SizeAtLeast::create(1))
            .build(),
        string("default_value", "The default value for this field.")
            .optional()
            .computed()
            .build(),
    ];

    AttributeBuilder::nested(
        "field_config",
        ObjectNestingMode::Single,
        vec![
            AttributeBuilder::nested("fields", ObjectNestingMode::Set, field)
                .description("The field configuration for the local identity profile.")
                .optional()
                .build(),
            bool_with_default(
                "strip_space_from_unique_field",
                "Strip leading/trailing spaces from unique ID field. The default value is `false`.",
                false,
            ),
        ],
    )
    .description("The local identity profile field configuration.")
    .optional()
    .build()
}

fn template_name(name: &str, description: &str) -> Attribute {
    string(name, description)
        .optional()
        .computed()
        .validator(StringLength::at_least(1))
        .build()
}

fn email_verification_config() -> Attribute {
    AttributeBuilder::nested(
        "email_verification_config",
        ObjectNestingMode::Single,
        vec![
            bool_with_default(
                "email_verification_enabled",
                "Whether the email ownership verification is enabled. The default value is `false`.",
                false,
            ),
            template_name(
                "verify_email_template_name",
                "The template name for verify email. The default is `message-template-email-ownership-verification.html`.",
            ),
            template_name(
                "email_verification_sent_template_name",
                "The template name for email verification sent. The default is `local.identity.email.verification.sent.html`. Only applicable if `email_verification_type` is `OTL`.",
            ),
            template_name(
                "email_verification_success_template_name",
                "The template name for email verification success. The default is `local.identity.email.verification.success.html`.",
            ),
            template_name(
                "email_verification_error_template_name",
                "The template name for email verification error. The default is `local.identity.email.verification.error.html`.",
            ),
            string(
                "email_verification_type",
                "Email Verification Type. Supported values are `OTP` and `OTL`.",
            )
            .optional()
            .validator(StringOneOf::create(&["OTP", "OTL"]))
            .build(),
            AttributeBuilder::new("otp_length", AttributeType::Number)
                .description("The OTP length generated for email verification. The default is `8`. Only applicable if `email_verification_type` is `OTP`. The value must be between `5` and `100`.")
                .optional()
                .computed()
                .validator(Int64Between::create(5, 100))
                .build(),
            AttributeBuilder::new("otp_retry_attempts", AttributeType::Number)
                .description("The number of OTP retry attempts for email verification. The default is `3`. Only applicable if `email_verification_type` is `OTP`.")
                .optional()
                .computed()
                .build(),
            template_name(
                "allowed_otp_character_set",
                "The allowed character set used to generate the OTP. The default is `23456789BCDFGHJKMNPQRSTVWXZbcdfghjkmnpqrstvwxz`. Only applicable if `email_verification_type` is `OTP`.",
            ),
            AttributeBuilder::new("otp_time_to_live", AttributeType::Number)
                .description("Field used OTP time to live. The default is `15`. Only applicable if `email_verification_type` is `OTP`.")
                .optional()
                .computed()
                .build(),
            template_name(
                "email_verification_otp_template_name",
                "The template name for email verification OTP verification. The default is `local.identity.email.verification.otp.html`. Only applicable if `email_verification_type` is `OTP`.",
            ),
            AttributeBuilder::new("otl_time_to_live", AttributeType::Number)
                .description("Field used OTL time to live. The default is `1440`. Only applicable if `email_verification_type` is `OTL`.")
                .optional()
                .computed()
                .build(),
            string(
                "field_for_email_to_verify",
                "Field used for email ownership verification. Not required when `email_verification_enabled` is set to `false`.",
            )
            .optional()
            .computed()
            .default(StaticDefault::string(""))
            .build(),
            string(
                "field_storing_verification_status",
                "Field used for storing email verification status. Not required when `email_verification_enabled` is set to `false`.",
            )
            .optional()
            .computed()
            .default(StaticDefault::string(""))
            .build(),
            resource_link::attribute(
                "notification_publisher_ref",
                "Reference to the associated notification publisher.",
            )
            .optional()
            .build(),
            AttributeBuilder::new("require_verified_email", AttributeType::Bool)
                .description("Whether the user must verify their email address before they can complete a single sign-on transaction. The default is `false`.")
                .optional()
                .computed()
                .build(),
            template_name(
                "require_verified_email_template_name",
                "The template to render when the user must verify their email address before they can complete a single sign-on transaction. The default is `local.identity.email.verification.required.html`. Only applicable if `email_verification_type` is `OTL` and `require_verified_email` is true.",
            ),
        ],
    )
    .description("The local identity email verification configuration.")
    .optional()
    .computed()
    .build()
}

fn data_store_config() -> Attribute {
    let mapping = vec![
        string(
            "type",
            "The data store attribute type. Supported values are `LDAP`, `PING_ONE_LDAP_GATEWAY`, `JDBC`, and `CUSTOM`.",
        )
        .required()
        .validator(StringOneOf::create(&DATA_STORE_TYPES))
        .build(),
        required_name("name", "The data store attribute name."),
        AttributeBuilder::new("metadata", AttributeType::Map(Box::new(AttributeType::String)))
            .description("The data store attribute metadata.")
            .optional()
            .computed()
            .default(StaticDefault::empty_map())
            .build(),
    ];

    AttributeBuilder::nested(
        "data_store_config",
        ObjectNestingMode::Single,
        vec![
            string(
                "type",
                "The data store config type. Supported values are `LDAP`, `PING_ONE_LDAP_GATEWAY`, `JDBC`, and `CUSTOM`.",
            )
            .required()
            .validator(StringOneOf::create(&DATA_STORE_TYPES))
            .build(),
            resource_link::attribute("data_store_ref", "Reference to the associated data store.")
                .required()
                .build(),
            AttributeBuilder::nested("data_store_mapping", ObjectNestingMode::Map, mapping)
                .description("The data store mapping.")
                .required()
                .build(),
            required_name(
                "base_dn",
                "The base DN to search from. If not specified, the search will start at the LDAP's root.",
            ),
            string(
                "create_pattern",
                "The Relative DN Pattern that will be used to create objects in the directory.",
            )
            .optional()
            .computed()
            .default(StaticDefault::string(""))
            .build(),
            string(
                "object_class",
                "The Object Class used by the new objects stored in the LDAP data store.",
            )
            .optional()
            .computed()
            .default(StaticDefault::string(""))
            .build(),
            AttributeBuilder::new(
                "auxiliary_object_classes",
                AttributeType::Set(Box::new(AttributeType::String)),
            )
            .description("The Auxiliary Object Classes used by the new objects stored in the LDAP data store.")
            .optional()
            .build(),
        ],
    )
    .description("The local identity profile data store configuration.")
    .optional()
    .build()
}

pub(crate) fn profile_schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Manages a configured local identity profile.")
        .attribute(
            string(
                "profile_id",
                "The persistent, unique ID for the local identity profile. It can be any combination of `[a-zA-Z0-9._-]`.",
            )
            .required()
            .validator(StringLength::at_least(1))
            .validator(StringPattern::create(ID_PATTERN, ID_PATTERN_MESSAGE))
            .plan_modifier(RequiresReplace::create())
            .build(),
        )
        .attribute(
            string("id", "The ID of this resource.")
                .computed()
                .plan_modifier(UseStateForUnknown::create())
                .build(),
        )
        .attribute(required_name(
            "name",
            "The local identity profile name. Name is unique.",
        ))
        .attribute(
            resource_link::attribute(
                "apc_id",
                "The reference to the authentication policy contract to use for this local identity profile.",
            )
            .required()
            .build(),
        )
        .attribute(auth_sources())
        .attribute(auth_source_update_policy())
        .attribute(bool_with_default(
            "registration_enabled",
            "Whether the registration configuration is enabled or not. The default value is `false`.",
            false,
        ))
        .attribute(registration_config())
        .attribute(profile_config())
        .attribute(field_config())
        .attribute(email_verification_config())
        .attribute(data_store_config())
        .attribute(bool_with_default(
            "profile_enabled",
            "Whether the profile configuration is enabled or not. The default value is `false`.",
            false,
        ))
        .build()
}
