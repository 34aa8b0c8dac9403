//! Authentication policy trees
//!
//! A node holds one action and an ordered list of child nodes. The schema is
//! unrolled to a fixed depth, so every level below the root is a separate
//! nested attribute.

use super::{policy_action, ConversionError, ObjectReader};
use crate::api::authentication_policies::AuthenticationPolicyTreeNode;
use tfplug::defaults::StaticDefault;
use tfplug::schema::{Attribute, AttributeBuilder, ObjectNestingMode};
use tfplug::types::{AttributePath, Diagnostic, Dynamic};

/// Deepest node level a tree may have; the root is level 1
pub const MAX_POLICY_NODE_DEPTH: usize = 10;

fn too_deep(path: AttributePath) -> Diagnostic {
    Diagnostic::error(
        "Policy tree too deep",
        ConversionError::TooDeep {
            max: MAX_POLICY_NODE_DEPTH,
        }
        .to_string(),
    )
    .with_attribute(path)
}

fn node_attributes(depth: usize) -> Vec<Attribute> {
    let mut attributes = vec![policy_action::attribute("action").required().build()];
    if depth < MAX_POLICY_NODE_DEPTH {
        attributes.push(
            AttributeBuilder::nested("children", ObjectNestingMode::List, node_attributes(depth + 1))
                .description("The nodes inside the authentication policy tree node.")
                .optional()
                .computed()
                .default(StaticDefault::empty_list())
                .build(),
        );
    }
    attributes
}

/// Root node attribute; the caller decides its optionality
pub fn attribute(name: &str) -> AttributeBuilder {
    AttributeBuilder::nested(name, ObjectNestingMode::Single, node_attributes(1))
        .description("A node inside the authentication policy tree.")
}

pub fn from_plan(
    parent: &ObjectReader,
    name: &str,
) -> Result<AuthenticationPolicyTreeNode, ConversionError> {
    node_from_plan(&parent.required_object(name)?, 1)
}

fn node_from_plan(
    node: &ObjectReader,
    depth: usize,
) -> Result<AuthenticationPolicyTreeNode, ConversionError> {
    if depth > MAX_POLICY_NODE_DEPTH {
        return Err(ConversionError::TooDeep {
            max: MAX_POLICY_NODE_DEPTH,
        });
    }
    let action = policy_action::from_plan(node, "action")?;
    let children = node
        .optional_list("children")?
        .map(|children| {
            children
                .iter()
                .map(|child| node_from_plan(child, depth + 1))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;
    Ok(AuthenticationPolicyTreeNode { action, children })
}

/// State for a root node at `path`
pub fn to_state(
    node: &AuthenticationPolicyTreeNode,
    path: &AttributePath,
    diagnostics: &mut Vec<Diagnostic>,
) -> Dynamic {
    node_to_state(node, path, 1, diagnostics)
}

fn node_to_state(
    node: &AuthenticationPolicyTreeNode,
    path: &AttributePath,
    depth: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Dynamic {
    let action = policy_action::to_state(&node.action, &path.clone().attribute("action"), diagnostics);
    let children = node.children.as_deref().unwrap_or_default();

    if depth >= MAX_POLICY_NODE_DEPTH {
        if !children.is_empty() {
            diagnostics.push(too_deep(path.clone()));
        }
        return Dynamic::object([("action", action)]);
    }

    let children_path = path.clone().attribute("children");
    let children = children
        .iter()
        .enumerate()
        .map(|(i, child)| {
            node_to_state(child, &children_path.clone().index(i as i64), depth + 1, diagnostics)
        })
        .collect();
    Dynamic::object([("action", action), ("children", Dynamic::List(children))])
}

/// Reject configured trees deeper than the schema allows
pub fn validate(root: &Dynamic, path: &AttributePath) -> Vec<Diagnostic> {
    let mut diagnostics = vec![];
    validate_node(root, path, 1, &mut diagnostics);
    diagnostics
}

fn validate_node(node: &Dynamic, path: &AttributePath, depth: usize, diagnostics: &mut Vec<Diagnostic>) {
    let Some(children) = node.attr("children").as_list() else {
        return;
    };
    if children.is_empty() {
        return;
    }
    if depth >= MAX_POLICY_NODE_DEPTH {
        diagnostics.push(too_deep(path.clone()));
        return;
    }
    let children_path = path.clone().attribute("children");
    for (i, child) in children.iter().enumerate() {
        validate_node(child, &children_path.clone().index(i as i64), depth + 1, diagnostics);
    }
}
