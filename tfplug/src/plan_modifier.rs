//! Attribute plan modifiers and schema-driven planning helpers

use crate::schema::{
    Attribute, DefaultRequest, ObjectNestingMode, PlanModifier, PlanModifierRequest,
    PlanModifierResponse, Schema,
};
use crate::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

/// Marks the resource for replacement when the attribute changes
pub struct RequiresReplace;

impl RequiresReplace {
    pub fn create() -> Box<dyn PlanModifier> {
        Box::new(Self)
    }
}

impl PlanModifier for RequiresReplace {
    fn description(&self) -> String {
        "changing this value forces a new resource".to_string()
    }

    fn modify(&self, request: PlanModifierRequest) -> PlanModifierResponse {
        let state = &request.state_value.value;
        let plan = &request.plan_value.value;
        // creation and unknown plans never force replacement
        let requires_replace =
            !state.is_null() && plan.is_present() && !values_equal(state, plan);

        PlanModifierResponse {
            plan_value: request.plan_value,
            requires_replace,
            diagnostics: vec![],
        }
    }
}

/// Copies the prior state value into an unknown plan value. Use on computed
/// attributes that do not change after creation.
pub struct UseStateForUnknown;

impl UseStateForUnknown {
    pub fn create() -> Box<dyn PlanModifier> {
        Box::new(Self)
    }
}

impl PlanModifier for UseStateForUnknown {
    fn description(&self) -> String {
        "once set, the value will not change".to_string()
    }

    fn modify(&self, request: PlanModifierRequest) -> PlanModifierResponse {
        let plan_value = if request.plan_value.is_unknown() && !request.state_value.is_null() {
            request.state_value
        } else {
            request.plan_value
        };

        PlanModifierResponse {
            plan_value,
            requires_replace: false,
            diagnostics: vec![],
        }
    }
}

/// Outcome of planning a value against its schema
pub struct PlannedValue {
    pub planned_state: DynamicValue,
    pub requires_replace: Vec<AttributePath>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Apply schema defaults to null config values, then run every attribute's
/// plan modifiers. Nested objects are walked wherever the plan holds one.
pub fn plan_schema(
    schema: &Schema,
    config: &DynamicValue,
    prior_state: &DynamicValue,
    proposed: &DynamicValue,
) -> PlannedValue {
    let mut planned = PlannedValue {
        planned_state: proposed.clone(),
        requires_replace: vec![],
        diagnostics: vec![],
    };
    if proposed.is_null() {
        return planned;
    }

    let mut plan = proposed.value.clone();
    plan_attributes(
        &schema.block.attributes,
        &config.value,
        &prior_state.value,
        &mut plan,
        &AttributePath::root(),
        &mut planned,
    );
    planned.planned_state = DynamicValue::new(plan);
    planned
}

fn plan_attributes(
    attributes: &[Attribute],
    config: &Dynamic,
    state: &Dynamic,
    plan: &mut Dynamic,
    path: &AttributePath,
    out: &mut PlannedValue,
) {
    let Dynamic::Map(plan_map) = plan else {
        return;
    };

    for attr in attributes {
        let attr_path = path.clone().attribute(&attr.name);
        let config_value = config.attr(&attr.name);
        let state_value = state.attr(&attr.name);
        let mut value = plan_map.remove(&attr.name).unwrap_or(Dynamic::Null);

        if config_value.is_null() {
            if let Some(default) = &attr.default {
                value = default
                    .default_value(DefaultRequest {
                        path: attr_path.clone(),
                    })
                    .value
                    .value;
            }
        }

        if let Some(nested) = &attr.nested_type {
            match (nested.nesting, &mut value) {
                (ObjectNestingMode::Single, single @ Dynamic::Map(_)) => plan_attributes(
                    &nested.attributes,
                    config_value,
                    state_value,
                    single,
                    &attr_path,
                    out,
                ),
                (ObjectNestingMode::List, Dynamic::List(items)) => {
                    for (i, item) in items.iter_mut().enumerate() {
                        plan_attributes(
                            &nested.attributes,
                            element(config_value, i),
                            element(state_value, i),
                            item,
                            &attr_path.clone().index(i as i64),
                            out,
                        );
                    }
                }
                (ObjectNestingMode::Map, Dynamic::Map(entries)) => {
                    for (key, item) in entries.iter_mut() {
                        plan_attributes(
                            &nested.attributes,
                            config_value.attr(key),
                            state_value.attr(key),
                            item,
                            &attr_path.clone().key(key),
                            out,
                        );
                    }
                }
                // set elements have no stable identity to pair with config or
                // prior state, so the element itself stands in for its config
                (ObjectNestingMode::Set, Dynamic::List(items)) => {
                    for (i, item) in items.iter_mut().enumerate() {
                        let config_item = unknown_as_null(item);
                        plan_attributes(
                            &nested.attributes,
                            &config_item,
                            &Dynamic::Null,
                            item,
                            &attr_path.clone().index(i as i64),
                            out,
                        );
                    }
                }
                _ => {}
            }
        }

        for modifier in &attr.plan_modifiers {
            let response = modifier.modify(PlanModifierRequest {
                config_value: DynamicValue::new(config_value.clone()),
                state_value: DynamicValue::new(state_value.clone()),
                plan_value: DynamicValue::new(value),
                path: attr_path.clone(),
            });
            value = response.plan_value.value;
            if response.requires_replace {
                tracing::debug!("Planned change to {} requires replacement", attr_path);
                out.requires_replace.push(attr_path.clone());
            }
            out.diagnostics.extend(response.diagnostics);
        }

        plan_map.insert(attr.name.clone(), value);
    }
}

fn unknown_as_null(value: &Dynamic) -> Dynamic {
    match value {
        Dynamic::Unknown => Dynamic::Null,
        Dynamic::List(items) => Dynamic::List(items.iter().map(unknown_as_null).collect()),
        Dynamic::Map(entries) => Dynamic::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), unknown_as_null(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn element(list: &Dynamic, index: usize) -> &Dynamic {
    static NULL: Dynamic = Dynamic::Null;
    list.as_list().and_then(|l| l.get(index)).unwrap_or(&NULL)
}

/// Structural equality with float tolerance
pub fn values_equal(a: &Dynamic, b: &Dynamic) -> bool {
    match (a, b) {
        (Dynamic::Null, Dynamic::Null) => true,
        (Dynamic::Unknown, Dynamic::Unknown) => true,
        (Dynamic::Bool(a), Dynamic::Bool(b)) => a == b,
        (Dynamic::Number(a), Dynamic::Number(b)) => (a - b).abs() < f64::EPSILON,
        (Dynamic::String(a), Dynamic::String(b)) => a == b,
        (Dynamic::List(a), Dynamic::List(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x, y))
        }
        (Dynamic::Map(a), Dynamic::Map(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).is_some_and(|v2| values_equal(v, v2)))
        }
        _ => false,
    }
}
