//! Result actions of an authentication policy tree node
//!
//! The action object holds one optional attribute per action kind. Exactly
//! one of them may be set; its attribute name picks the `type` sent to the
//! server.

use super::{attribute_mapping, attribute_rules, resource_link, source_type_id_key, ConversionError, ObjectReader};
use crate::api::authentication_policies::{
    ApcMappingPolicyAction, AuthenticationSource, AuthnSelectorPolicyAction,
    AuthnSourcePolicyAction, FragmentPolicyAction, InputUserIdMapping,
    LocalIdentityMappingPolicyAction, PolicyAction, SimplePolicyAction,
};
use tfplug::schema::{
    Attribute, AttributeBuilder, AttributeType, ObjectNestingMode, Validator, ValidatorRequest,
    ValidatorResponse,
};
use tfplug::types::{AttributePath, Diagnostic, Dynamic};
use tfplug::validator::StringOneOf;

pub const APC_MAPPING: &str = "apc_mapping_policy_action";
pub const AUTHN_SELECTOR: &str = "authn_selector_policy_action";
pub const AUTHN_SOURCE: &str = "authn_source_policy_action";
pub const CONTINUE: &str = "continue_policy_action";
pub const DONE: &str = "done_policy_action";
pub const FRAGMENT: &str = "fragment_policy_action";
pub const LOCAL_IDENTITY_MAPPING: &str = "local_identity_mapping_policy_action";
pub const RESTART: &str = "restart_policy_action";

/// Action attributes in the order they are tried during conversion
pub const ALTERNATIVES: [&str; 8] = [
    APC_MAPPING,
    AUTHN_SELECTOR,
    AUTHN_SOURCE,
    CONTINUE,
    DONE,
    FRAGMENT,
    LOCAL_IDENTITY_MAPPING,
    RESTART,
];

const NO_ACTION: &str = "no valid policy action type found when building client struct. \
                         Ensure you have specified an action value in your policy tree node";

fn context() -> Attribute {
    AttributeBuilder::new("context", AttributeType::String)
        .description("The result context.")
        .optional()
        .build()
}

fn context_only(name: &str, description: &str) -> Attribute {
    AttributeBuilder::nested(name, ObjectNestingMode::Single, vec![context()])
        .description(description)
        .optional()
        .build()
}

fn apc_mapping_attributes() -> Vec<Attribute> {
    vec![
        context(),
        attribute_mapping::attribute("attribute_mapping")
            .description("Contract fulfillment with the authentication policy contract's default values, and additional attributes retrieved from local data stores.")
            .required()
            .build(),
        resource_link::attribute(
            "authentication_policy_contract_ref",
            "Reference to the associated authentication policy contract.",
        )
        .required()
        .build(),
    ]
}

fn authn_selector_attributes() -> Vec<Attribute> {
    vec![
        context(),
        resource_link::attribute(
            "authentication_selector_ref",
            "Reference to the associated authentication selector.",
        )
        .required()
        .build(),
    ]
}

fn authn_source_attributes() -> Vec<Attribute> {
    vec![
        context(),
        attribute_rules::attribute("attribute_rules").build(),
        AttributeBuilder::nested(
            "authentication_source",
            ObjectNestingMode::Single,
            vec![
                resource_link::attribute("source_ref", "A reference to the authentication source.")
                    .required()
                    .build(),
                AttributeBuilder::new("type", AttributeType::String)
                    .description("The type of this authentication source. Options are `IDP_ADAPTER` or `IDP_CONNECTION`.")
                    .required()
                    .validator(StringOneOf::create(&["IDP_ADAPTER", "IDP_CONNECTION"]))
                    .build(),
            ],
        )
        .description("The associated authentication source.")
        .required()
        .build(),
        AttributeBuilder::nested(
            "input_user_id_mapping",
            ObjectNestingMode::Single,
            vec![
                source_type_id_key::attribute("source").required().build(),
                AttributeBuilder::new("value", AttributeType::String)
                    .description("The value for this attribute.")
                    .required()
                    .build(),
            ],
        )
        .description("The input user ID mapping.")
        .optional()
        .build(),
        AttributeBuilder::new("user_id_authenticated", AttributeType::Bool)
            .description("Indicates whether the user ID obtained by the user ID mapping is authenticated.")
            .optional()
            .build(),
    ]
}

fn fragment_attributes() -> Vec<Attribute> {
    vec![
        context(),
        attribute_rules::attribute("attribute_rules").build(),
        resource_link::attribute("fragment", "Reference to the associated authentication policy fragment.")
            .required()
            .build(),
        attribute_mapping::fragment_attribute("fragment_mapping")
            .description("The fragment mapping for attributes to be passed into the authentication fragment.")
            .optional()
            .build(),
    ]
}

fn local_identity_mapping_attributes() -> Vec<Attribute> {
    vec![
        context(),
        attribute_mapping::attribute("inbound_mapping")
            .description("Inbound mappings into the local identity profile fields.")
            .optional()
            .build(),
        resource_link::attribute("local_identity_ref", "Reference to the associated local identity profile.")
            .required()
            .build(),
        attribute_mapping::attribute("outbound_attribute_mapping")
            .description("Authentication policy contract mappings associated with this local identity profile.")
            .required()
            .build(),
    ]
}

/// Rejects an action object with more than one kind set
struct OneActionPerNode;

impl Validator for OneActionPerNode {
    fn description(&self) -> String {
        format!("at most one of {} is set", ALTERNATIVES.join(", "))
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = vec![];
        if present_alternatives(&request.config_value.value).len() > 1 {
            diagnostics.push(
                Diagnostic::error(
                    "Invalid policy action",
                    format!("only one of {} may be set", ALTERNATIVES.join(", ")),
                )
                .with_attribute(request.path.clone()),
            );
        }
        ValidatorResponse { diagnostics }
    }
}

/// Action kinds set on `action`, in conversion order
pub fn present_alternatives(action: &Dynamic) -> Vec<&'static str> {
    ALTERNATIVES
        .iter()
        .copied()
        .filter(|name| action.attr(name).is_present())
        .collect()
}

pub fn attribute(name: &str) -> AttributeBuilder {
    AttributeBuilder::nested(
        name,
        ObjectNestingMode::Single,
        vec![
            AttributeBuilder::nested(APC_MAPPING, ObjectNestingMode::Single, apc_mapping_attributes())
                .description("An authentication policy contract selection action.")
                .optional()
                .build(),
            AttributeBuilder::nested(AUTHN_SELECTOR, ObjectNestingMode::Single, authn_selector_attributes())
                .description("An authentication selector selection action.")
                .optional()
                .build(),
            AttributeBuilder::nested(AUTHN_SOURCE, ObjectNestingMode::Single, authn_source_attributes())
                .description("An authentication source selection action.")
                .optional()
                .build(),
            context_only(CONTINUE, "The continue selection action."),
            context_only(DONE, "The done selection action."),
            AttributeBuilder::nested(FRAGMENT, ObjectNestingMode::Single, fragment_attributes())
                .description("A authentication policy fragment selection action.")
                .optional()
                .build(),
            AttributeBuilder::nested(
                LOCAL_IDENTITY_MAPPING,
                ObjectNestingMode::Single,
                local_identity_mapping_attributes(),
            )
            .description("A local identity profile selection action.")
            .optional()
            .build(),
            context_only(RESTART, "The restart selection action."),
        ],
    )
    .description("The result action.")
    .validator(Box::new(OneActionPerNode))
}

pub fn from_plan(parent: &ObjectReader, name: &str) -> Result<PolicyAction, ConversionError> {
    let action = match parent.raw(name) {
        Dynamic::Null | Dynamic::Unknown => return Err(ConversionError::NullOrUnknown("policy action")),
        _ => parent.required_object(name)?,
    };

    if let Some(apc) = action.optional_object(APC_MAPPING)? {
        return Ok(PolicyAction::ApcMapping(ApcMappingPolicyAction {
            context: apc.optional_string("context")?,
            attribute_mapping: attribute_mapping::from_plan(&apc.required_object("attribute_mapping")?)?,
            authentication_policy_contract_ref: resource_link::required_from_plan(
                &apc,
                "authentication_policy_contract_ref",
            )?,
        }));
    }

    if let Some(selector) = action.optional_object(AUTHN_SELECTOR)? {
        return Ok(PolicyAction::AuthnSelector(AuthnSelectorPolicyAction {
            context: selector.optional_string("context")?,
            authentication_selector_ref: resource_link::required_from_plan(
                &selector,
                "authentication_selector_ref",
            )?,
        }));
    }

    if let Some(source) = action.optional_object(AUTHN_SOURCE)? {
        let authentication_source = source.required_object("authentication_source")?;
        let input_user_id_mapping = source
            .optional_object("input_user_id_mapping")?
            .map(|mapping| {
                Ok::<_, ConversionError>(InputUserIdMapping {
                    source: source_type_id_key::from_plan(&mapping.required_object("source")?)?,
                    value: mapping.required_string("value")?,
                })
            })
            .transpose()?;
        return Ok(PolicyAction::AuthnSource(AuthnSourcePolicyAction {
            context: source.optional_string("context")?,
            attribute_rules: attribute_rules::from_plan(&source, "attribute_rules")?,
            authentication_source: AuthenticationSource {
                source_type: authentication_source.required_string("type")?,
                source_ref: resource_link::required_from_plan(&authentication_source, "source_ref")?,
            },
            input_user_id_mapping,
            user_id_authenticated: source.optional_bool("user_id_authenticated")?,
        }));
    }

    if let Some(next) = action.optional_object(CONTINUE)? {
        return Ok(PolicyAction::Continue(simple_from_plan(&next)?));
    }

    if let Some(done) = action.optional_object(DONE)? {
        return Ok(PolicyAction::Done(simple_from_plan(&done)?));
    }

    if let Some(fragment) = action.optional_object(FRAGMENT)? {
        return Ok(PolicyAction::Fragment(FragmentPolicyAction {
            context: fragment.optional_string("context")?,
            attribute_rules: attribute_rules::from_plan(&fragment, "attribute_rules")?,
            fragment: resource_link::required_from_plan(&fragment, "fragment")?,
            fragment_mapping: fragment
                .optional_object("fragment_mapping")?
                .map(|mapping| attribute_mapping::fragment_from_plan(&mapping))
                .transpose()?,
        }));
    }

    if let Some(local) = action.optional_object(LOCAL_IDENTITY_MAPPING)? {
        return Ok(PolicyAction::LocalIdentityMapping(LocalIdentityMappingPolicyAction {
            context: local.optional_string("context")?,
            inbound_mapping: local
                .optional_object("inbound_mapping")?
                .map(|mapping| attribute_mapping::from_plan(&mapping))
                .transpose()?,
            local_identity_ref: resource_link::required_from_plan(&local, "local_identity_ref")?,
            outbound_attribute_mapping: attribute_mapping::from_plan(
                &local.required_object("outbound_attribute_mapping")?,
            )?,
        }));
    }

    if let Some(restart) = action.optional_object(RESTART)? {
        return Ok(PolicyAction::Restart(simple_from_plan(&restart)?));
    }

    Err(ConversionError::MissingVariant(NO_ACTION.to_string()))
}

fn simple_from_plan(object: &ObjectReader) -> Result<SimplePolicyAction, ConversionError> {
    Ok(SimplePolicyAction {
        context: object.optional_string("context")?,
    })
}

fn simple_to_state(action: &SimplePolicyAction) -> Dynamic {
    Dynamic::object([("context", Dynamic::from(action.context.clone()))])
}

/// State for `action`. An action kind this provider does not know yields
/// an error diagnostic and a null value.
pub fn to_state(action: &PolicyAction, path: &AttributePath, diagnostics: &mut Vec<Diagnostic>) -> Dynamic {
    let (name, value) = match action {
        PolicyAction::ApcMapping(apc) => (
            APC_MAPPING,
            Dynamic::object([
                ("context", Dynamic::from(apc.context.clone())),
                ("attribute_mapping", attribute_mapping::to_state(&apc.attribute_mapping)),
                (
                    "authentication_policy_contract_ref",
                    resource_link::to_state(&apc.authentication_policy_contract_ref),
                ),
            ]),
        ),
        PolicyAction::AuthnSelector(selector) => (
            AUTHN_SELECTOR,
            Dynamic::object([
                ("context", Dynamic::from(selector.context.clone())),
                (
                    "authentication_selector_ref",
                    resource_link::to_state(&selector.authentication_selector_ref),
                ),
            ]),
        ),
        PolicyAction::AuthnSource(source) => (
            AUTHN_SOURCE,
            Dynamic::object([
                ("context", Dynamic::from(source.context.clone())),
                ("attribute_rules", attribute_rules::to_state(source.attribute_rules.as_ref())),
                (
                    "authentication_source",
                    Dynamic::object([
                        ("source_ref", resource_link::to_state(&source.authentication_source.source_ref)),
                        ("type", Dynamic::from(source.authentication_source.source_type.clone())),
                    ]),
                ),
                (
                    "input_user_id_mapping",
                    source
                        .input_user_id_mapping
                        .as_ref()
                        .map(|mapping| {
                            Dynamic::object([
                                ("source", source_type_id_key::to_state(&mapping.source)),
                                ("value", Dynamic::from(mapping.value.clone())),
                            ])
                        })
                        .unwrap_or(Dynamic::Null),
                ),
                ("user_id_authenticated", Dynamic::from(source.user_id_authenticated)),
            ]),
        ),
        PolicyAction::Continue(next) => (CONTINUE, simple_to_state(next)),
        PolicyAction::Done(done) => (DONE, simple_to_state(done)),
        PolicyAction::Fragment(fragment) => (
            FRAGMENT,
            Dynamic::object([
                ("context", Dynamic::from(fragment.context.clone())),
                ("attribute_rules", attribute_rules::to_state(fragment.attribute_rules.as_ref())),
                ("fragment", resource_link::to_state(&fragment.fragment)),
                (
                    "fragment_mapping",
                    fragment
                        .fragment_mapping
                        .as_ref()
                        .map(attribute_mapping::fragment_to_state)
                        .unwrap_or(Dynamic::Null),
                ),
            ]),
        ),
        PolicyAction::LocalIdentityMapping(local) => (
            LOCAL_IDENTITY_MAPPING,
            Dynamic::object([
                ("context", Dynamic::from(local.context.clone())),
                (
                    "inbound_mapping",
                    local
                        .inbound_mapping
                        .as_ref()
                        .map(attribute_mapping::to_state)
                        .unwrap_or(Dynamic::Null),
                ),
                ("local_identity_ref", resource_link::to_state(&local.local_identity_ref)),
                (
                    "outbound_attribute_mapping",
                    attribute_mapping::to_state(&local.outbound_attribute_mapping),
                ),
            ]),
        ),
        PolicyAction::Restart(restart) => (RESTART, simple_to_state(restart)),
        PolicyAction::Unrecognized => {
            diagnostics.push(
                Diagnostic::error(
                    "Unable to read policy action",
                    "no valid non-nil policy action type found in struct",
                )
                .with_attribute(path.clone()),
            );
            return Dynamic::Null;
        }
    };

    Dynamic::object(ALTERNATIVES.iter().map(|alternative| {
        if *alternative == name {
            (*alternative, value.clone())
        } else {
            (*alternative, Dynamic::Null)
        }
    }))
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::api::common::{AttributeSource, ResourceLink};
    use crate::common::{attribute_sources, issuance_criteria};
    use tfplug::types::DynamicValue;

    fn node(action: Dynamic) -> Dynamic {
        Dynamic::object([("action", action)])
    }

    fn link(id: &str) -> Dynamic {
        Dynamic::object([("id", Dynamic::from(id)), ("location", Dynamic::Unknown)])
    }

    /// Link as it reads back from state before the server fills `location`
    fn state_link(id: &str) -> Dynamic {
        Dynamic::object([("id", Dynamic::from(id)), ("location", Dynamic::Null)])
    }

    fn key(source_type: &str, id: Option<&str>) -> Dynamic {
        Dynamic::object([
            ("type", Dynamic::from(source_type)),
            ("id", Dynamic::from(id.map(str::to_string))),
        ])
    }

    /// Action object with only `name` set
    fn only(name: &str, value: Dynamic) -> Dynamic {
        Dynamic::object(ALTERNATIVES.iter().map(|alternative| {
            if *alternative == name {
                (*alternative, value.clone())
            } else {
                (*alternative, Dynamic::Null)
            }
        }))
    }

    fn mapping(sources: Vec<Dynamic>) -> Dynamic {
        Dynamic::object([
            (
                "attribute_contract_fulfillment",
                Dynamic::object([(
                    "subject",
                    Dynamic::object([
                        ("source", key("CONTEXT", None)),
                        ("value", Dynamic::from("ClientIp")),
                    ]),
                )]),
            ),
            ("attribute_sources", Dynamic::List(sources)),
            ("issuance_criteria", issuance_criteria::default_value()),
        ])
    }

    /// Converts `value` set under `name`, renders it back and compares
    /// every member of the action with what was planned
    fn round_trip(name: &str, value: Dynamic) -> PolicyAction {
        let plan = node(only(name, value.clone()));
        let reader = ObjectReader::new(&plan, AttributePath::root());
        let converted = from_plan(&reader, "action").unwrap();

        let mut diagnostics = vec![];
        let state = to_state(&converted, &AttributePath::new("action"), &mut diagnostics);
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        assert_eq!(present_alternatives(&state), vec![name]);

        let Dynamic::Map(fields) = &value else {
            panic!("expected an object, got {:?}", value);
        };
        for (field, planned) in fields {
            assert_eq!(state.attr(name).attr(field), planned, "{}.{}", name, field);
        }
        assert_eq!(state, only(name, value));
        converted
    }

    #[test]
    fn apc_mapping_round_trips() {
        let value = Dynamic::object([
            ("context", Dynamic::from("Success")),
            ("attribute_mapping", mapping(vec![])),
            ("authentication_policy_contract_ref", state_link("apc1")),
        ]);
        match round_trip(APC_MAPPING, value) {
            PolicyAction::ApcMapping(apc) => {
                assert_eq!(apc.context.as_deref(), Some("Success"));
                assert_eq!(apc.authentication_policy_contract_ref, ResourceLink::new("apc1"));
                let subject = &apc.attribute_mapping.attribute_contract_fulfillment["subject"];
                assert_eq!(subject.value, "ClientIp");
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn authn_selector_round_trips() {
        let value = Dynamic::object([
            ("context", Dynamic::Null),
            ("authentication_selector_ref", state_link("selector1")),
        ]);
        match round_trip(AUTHN_SELECTOR, value) {
            PolicyAction::AuthnSelector(selector) => {
                assert_eq!(selector.context, None);
                assert_eq!(selector.authentication_selector_ref.id, "selector1");
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn authn_source_round_trips() {
        let value = Dynamic::object([
            ("context", Dynamic::from("Fail")),
            (
                "attribute_rules",
                Dynamic::object([
                    ("fallback_to_success", Dynamic::Bool(true)),
                    (
                        "items",
                        Dynamic::List(vec![Dynamic::object([
                            ("attribute_name", Dynamic::from("memberOf")),
                            ("attribute_source", key("ADAPTER", Some("htmlform"))),
                            ("condition", Dynamic::from("EQUALS")),
                            ("expected_value", Dynamic::from("admins")),
                            ("expression", Dynamic::Null),
                            ("result", Dynamic::from("admin")),
                        ])]),
                    ),
                ]),
            ),
            (
                "authentication_source",
                Dynamic::object([
                    ("source_ref", state_link("htmlform")),
                    ("type", Dynamic::from("IDP_ADAPTER")),
                ]),
            ),
            (
                "input_user_id_mapping",
                Dynamic::object([
                    ("source", key("CONTEXT", None)),
                    ("value", Dynamic::from("subject")),
                ]),
            ),
            ("user_id_authenticated", Dynamic::Bool(false)),
        ]);
        match round_trip(AUTHN_SOURCE, value) {
            PolicyAction::AuthnSource(source) => {
                let rules = source.attribute_rules.unwrap();
                assert_eq!(rules.fallback_to_success, Some(true));
                assert_eq!(rules.items.unwrap()[0].condition.as_deref(), Some("EQUALS"));
                assert_eq!(source.input_user_id_mapping.unwrap().value, "subject");
                assert_eq!(source.user_id_authenticated, Some(false));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn context_only_actions_round_trip() {
        for name in [CONTINUE, DONE, RESTART] {
            let value = Dynamic::object([("context", Dynamic::from("Success"))]);
            let expected = SimplePolicyAction {
                context: Some("Success".to_string()),
            };
            match (name, round_trip(name, value)) {
                (CONTINUE, PolicyAction::Continue(action))
                | (DONE, PolicyAction::Done(action))
                | (RESTART, PolicyAction::Restart(action)) => assert_eq!(action, expected),
                (_, other) => panic!("unexpected action {:?} for {}", other, name),
            }
        }
    }

    #[test]
    fn fragment_round_trips() {
        let value = Dynamic::object([
            ("context", Dynamic::Null),
            ("attribute_rules", Dynamic::Null),
            ("fragment", state_link("frag1")),
            (
                "fragment_mapping",
                Dynamic::object([
                    ("attribute_contract_fulfillment", Dynamic::Null),
                    ("attribute_sources", Dynamic::List(vec![])),
                    ("issuance_criteria", issuance_criteria::default_value()),
                ]),
            ),
        ]);
        match round_trip(FRAGMENT, value) {
            PolicyAction::Fragment(fragment) => {
                assert_eq!(fragment.fragment.id, "frag1");
                assert_eq!(fragment.attribute_rules, None);
                let mapping = fragment.fragment_mapping.unwrap();
                assert_eq!(mapping.attribute_contract_fulfillment, None);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn local_identity_mapping_round_trips() {
        let jdbc = Dynamic::object([
            (attribute_sources::CUSTOM, Dynamic::Null),
            (
                attribute_sources::JDBC,
                Dynamic::object([
                    ("data_store_ref", state_link("ProvisionerDS")),
                    ("id", Dynamic::from("users")),
                    ("description", Dynamic::from("User table")),
                    ("attribute_contract_fulfillment", Dynamic::Null),
                    ("type", Dynamic::from("JDBC")),
                    ("schema", Dynamic::from("PUBLIC")),
                    ("filter", Dynamic::from("uid = '${subject}'")),
                    ("table", Dynamic::from("USERS")),
                    ("column_names", Dynamic::List(vec![Dynamic::from("MAIL")])),
                ]),
            ),
            (attribute_sources::LDAP, Dynamic::Null),
        ]);
        let value = Dynamic::object([
            ("context", Dynamic::from("Success")),
            ("inbound_mapping", mapping(vec![jdbc])),
            ("local_identity_ref", state_link("regprofile")),
            ("outbound_attribute_mapping", mapping(vec![])),
        ]);
        match round_trip(LOCAL_IDENTITY_MAPPING, value) {
            PolicyAction::LocalIdentityMapping(local) => {
                assert_eq!(local.local_identity_ref.id, "regprofile");
                let inbound = local.inbound_mapping.unwrap();
                match &inbound.attribute_sources[0] {
                    AttributeSource::Jdbc(source) => {
                        assert_eq!(source.table, "USERS");
                        assert_eq!(source.column_names, Some(vec!["MAIL".to_string()]));
                    }
                    other => panic!("unexpected source {:?}", other),
                }
                assert!(local.outbound_attribute_mapping.attribute_sources.is_empty());
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn authn_source_action_converts() {
        let plan = node(Dynamic::object([(
            AUTHN_SOURCE,
            Dynamic::object([
                ("context", Dynamic::Null),
                (
                    "authentication_source",
                    Dynamic::object([
                        ("type", Dynamic::from("IDP_ADAPTER")),
                        ("source_ref", link("htmlform")),
                    ]),
                ),
                ("user_id_authenticated", Dynamic::Bool(true)),
            ]),
        )]));
        let reader = ObjectReader::new(&plan, AttributePath::new("root_node"));

        match from_plan(&reader, "action").unwrap() {
            PolicyAction::AuthnSource(source) => {
                assert_eq!(source.authentication_source.source_type, "IDP_ADAPTER");
                assert_eq!(source.authentication_source.source_ref, ResourceLink::new("htmlform"));
                assert_eq!(source.user_id_authenticated, Some(true));
                assert_eq!(source.attribute_rules, None);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn first_present_alternative_wins() {
        let plan = node(Dynamic::object([
            (DONE, Dynamic::object([("context", Dynamic::from("Success"))])),
            (CONTINUE, Dynamic::object([("context", Dynamic::from("Fail"))])),
        ]));
        let reader = ObjectReader::new(&plan, AttributePath::root());
        assert_eq!(
            from_plan(&reader, "action").unwrap(),
            PolicyAction::Continue(SimplePolicyAction {
                context: Some("Fail".to_string())
            })
        );
    }

    #[test]
    fn null_or_empty_action_is_rejected() {
        let plan = node(Dynamic::Unknown);
        let reader = ObjectReader::new(&plan, AttributePath::root());
        let err = from_plan(&reader, "action").unwrap_err();
        assert_eq!(err.to_string(), "provided policy action object is Null or Unknown");

        let plan = node(Dynamic::object([(DONE, Dynamic::Null)]));
        let reader = ObjectReader::new(&plan, AttributePath::root());
        let err = from_plan(&reader, "action").unwrap_err();
        assert_eq!(err, ConversionError::MissingVariant(NO_ACTION.to_string()));
    }

    #[test]
    fn state_sets_only_the_matching_alternative() {
        let action = PolicyAction::Fragment(FragmentPolicyAction {
            context: None,
            attribute_rules: None,
            fragment: ResourceLink {
                id: "frag1".to_string(),
                location: Some("https://pf/fragments/frag1".to_string()),
            },
            fragment_mapping: None,
        });
        let mut diagnostics = vec![];
        let state = to_state(&action, &AttributePath::new("action"), &mut diagnostics);

        assert!(diagnostics.is_empty());
        assert_eq!(present_alternatives(&state), vec![FRAGMENT]);
        let fragment = state.attr(FRAGMENT);
        assert_eq!(fragment.attr("fragment").attr("id").as_str(), Some("frag1"));
        assert!(fragment.attr("fragment_mapping").is_null());
        for alternative in ALTERNATIVES.iter().filter(|a| **a != FRAGMENT) {
            assert!(state.attr(alternative).is_null());
        }
    }

    #[test]
    fn unrecognized_action_reports_error() {
        let mut diagnostics = vec![];
        let state = to_state(
            &PolicyAction::Unrecognized,
            &AttributePath::new("root_node").attribute("action"),
            &mut diagnostics,
        );
        assert!(state.is_null());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].is_error());
        assert_eq!(
            diagnostics[0].detail,
            "no valid non-nil policy action type found in struct"
        );
    }

    #[test]
    fn validator_rejects_two_actions() {
        let attr = attribute("action").required().build();
        let value = Dynamic::object([
            (DONE, Dynamic::object([("context", Dynamic::Null)])),
            (RESTART, Dynamic::object([("context", Dynamic::Null)])),
        ]);
        let response = attr.validators[0].validate(ValidatorRequest {
            config_value: DynamicValue::new(value),
            path: AttributePath::new("root_node").attribute("action"),
        });
        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].summary, "Invalid policy action");
        assert!(response.diagnostics[0]
            .detail
            .starts_with("only one of apc_mapping_policy_action, authn_selector_policy_action"));
    }
}
