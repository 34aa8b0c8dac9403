//! Conversion between Terraform values and Admin API models
//!
//! Each submodule owns one recurring configuration shape. It declares the
//! schema attributes for the shape, builds the API model from a planned value
//! (`from_plan`) and renders an API response back into state (`to_state`).

pub mod attribute_contract_fulfillment;
pub mod attribute_mapping;
pub mod attribute_rules;
pub mod attribute_sources;
pub mod issuance_criteria;
pub mod policy_action;
pub mod policy_tree;
pub mod resource_link;
pub mod source_type_id_key;

use std::collections::HashMap;
use tfplug::schema::{Attribute, NestedType};
use tfplug::types::{AttributePath, Dynamic};

/// Failure to turn a planned value into an API request model
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("{0}")]
    MissingVariant(String),

    #[error("provided {0} object is Null or Unknown")]
    NullOrUnknown(&'static str),

    #[error("{path}: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{0}: required attribute is not set")]
    MissingAttribute(String),

    #[error("authentication policy tree nodes may be nested at most {max} levels deep")]
    TooDeep { max: usize },

    #[error("{0}: expected a whole number")]
    NotAnInteger(String),
}

/// Typed access to the members of one object inside a planned value.
///
/// Optional members that are null or still unknown read as `None`.
#[derive(Debug, Clone)]
pub struct ObjectReader<'a> {
    value: &'a Dynamic,
    path: AttributePath,
}

impl<'a> ObjectReader<'a> {
    pub fn new(value: &'a Dynamic, path: AttributePath) -> Self {
        Self { value, path }
    }

    pub fn path(&self) -> &AttributePath {
        &self.path
    }

    pub fn value(&self) -> &'a Dynamic {
        self.value
    }

    pub fn raw(&self, name: &str) -> &'a Dynamic {
        self.value.attr(name)
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.raw(name).is_present()
    }

    fn member_path(&self, name: &str) -> AttributePath {
        self.path.clone().attribute(name)
    }

    fn mismatch(&self, name: &str, expected: &'static str, actual: &Dynamic) -> ConversionError {
        ConversionError::TypeMismatch {
            path: self.member_path(name).to_string(),
            expected,
            actual: actual.type_name(),
        }
    }

    fn require<T>(&self, name: &str, value: Option<T>) -> Result<T, ConversionError> {
        value.ok_or_else(|| ConversionError::MissingAttribute(self.member_path(name).to_string()))
    }

    pub fn optional_string(&self, name: &str) -> Result<Option<String>, ConversionError> {
        match self.raw(name) {
            Dynamic::Null | Dynamic::Unknown => Ok(None),
            Dynamic::String(s) => Ok(Some(s.clone())),
            other => Err(self.mismatch(name, "string", other)),
        }
    }

    pub fn required_string(&self, name: &str) -> Result<String, ConversionError> {
        let value = self.optional_string(name)?;
        self.require(name, value)
    }

    pub fn optional_bool(&self, name: &str) -> Result<Option<bool>, ConversionError> {
        match self.raw(name) {
            Dynamic::Null | Dynamic::Unknown => Ok(None),
            Dynamic::Bool(b) => Ok(Some(*b)),
            other => Err(self.mismatch(name, "bool", other)),
        }
    }

    pub fn optional_i64(&self, name: &str) -> Result<Option<i64>, ConversionError> {
        match self.raw(name) {
            Dynamic::Null | Dynamic::Unknown => Ok(None),
            Dynamic::Number(n) if n.fract() == 0.0 => Ok(Some(*n as i64)),
            Dynamic::Number(_) => Err(ConversionError::NotAnInteger(
                self.member_path(name).to_string(),
            )),
            other => Err(self.mismatch(name, "number", other)),
        }
    }

    pub fn optional_object(&self, name: &str) -> Result<Option<ObjectReader<'a>>, ConversionError> {
        match self.raw(name) {
            Dynamic::Null | Dynamic::Unknown => Ok(None),
            value @ Dynamic::Map(_) => Ok(Some(ObjectReader::new(value, self.member_path(name)))),
            other => Err(self.mismatch(name, "object", other)),
        }
    }

    pub fn required_object(&self, name: &str) -> Result<ObjectReader<'a>, ConversionError> {
        let value = self.optional_object(name)?;
        self.require(name, value)
    }

    /// Elements of a list or set of objects
    pub fn optional_list(&self, name: &str) -> Result<Option<Vec<ObjectReader<'a>>>, ConversionError> {
        match self.raw(name) {
            Dynamic::Null | Dynamic::Unknown => Ok(None),
            Dynamic::List(items) => {
                let path = self.member_path(name);
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| match item {
                        Dynamic::Map(_) => Ok(ObjectReader::new(item, path.clone().index(i as i64))),
                        other => Err(ConversionError::TypeMismatch {
                            path: path.clone().index(i as i64).to_string(),
                            expected: "object",
                            actual: other.type_name(),
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Some)
            }
            other => Err(self.mismatch(name, "list", other)),
        }
    }

    /// Entries of a map of objects, ordered by key
    pub fn optional_map(
        &self,
        name: &str,
    ) -> Result<Option<Vec<(String, ObjectReader<'a>)>>, ConversionError> {
        match self.raw(name) {
            Dynamic::Null | Dynamic::Unknown => Ok(None),
            Dynamic::Map(entries) => {
                let path = self.member_path(name);
                let mut keys: Vec<&String> = entries.keys().collect();
                keys.sort();
                keys.into_iter()
                    .map(|key| match &entries[key] {
                        item @ Dynamic::Map(_) => {
                            Ok((key.clone(), ObjectReader::new(item, path.clone().key(key))))
                        }
                        other => Err(ConversionError::TypeMismatch {
                            path: path.clone().key(key).to_string(),
                            expected: "object",
                            actual: other.type_name(),
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Some)
            }
            other => Err(self.mismatch(name, "map", other)),
        }
    }

    pub fn optional_string_list(&self, name: &str) -> Result<Option<Vec<String>>, ConversionError> {
        match self.raw(name) {
            Dynamic::Null | Dynamic::Unknown => Ok(None),
            Dynamic::List(items) => items
                .iter()
                .map(|item| match item {
                    Dynamic::String(s) => Ok(s.clone()),
                    other => Err(self.mismatch(name, "string", other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            other => Err(self.mismatch(name, "list", other)),
        }
    }

    pub fn optional_bool_map(&self, name: &str) -> Result<Option<HashMap<String, bool>>, ConversionError> {
        match self.raw(name) {
            Dynamic::Null | Dynamic::Unknown => Ok(None),
            Dynamic::Map(entries) => entries
                .iter()
                .map(|(k, v)| match v {
                    Dynamic::Bool(b) => Ok((k.clone(), *b)),
                    other => Err(self.mismatch(name, "bool", other)),
                })
                .collect::<Result<HashMap<_, _>, _>>()
                .map(Some),
            other => Err(self.mismatch(name, "map", other)),
        }
    }

    pub fn optional_string_map(
        &self,
        name: &str,
    ) -> Result<Option<HashMap<String, String>>, ConversionError> {
        match self.raw(name) {
            Dynamic::Null | Dynamic::Unknown => Ok(None),
            Dynamic::Map(entries) => entries
                .iter()
                .map(|(k, v)| match v {
                    Dynamic::String(s) => Ok((k.clone(), s.clone())),
                    other => Err(self.mismatch(name, "string", other)),
                })
                .collect::<Result<HashMap<_, _>, _>>()
                .map(Some),
            other => Err(self.mismatch(name, "map", other)),
        }
    }
}

/// Copy of `attr` with every level computed only, for data source schemas
pub fn computed_only(mut attr: Attribute) -> Attribute {
    attr.required = false;
    attr.optional = false;
    attr.computed = true;
    attr.validators.clear();
    attr.plan_modifiers.clear();
    attr.default = None;
    if let Some(nested) = attr.nested_type.take() {
        attr.nested_type = Some(NestedType::new(
            nested.nesting,
            nested.attributes.into_iter().map(computed_only).collect(),
        ));
    }
    attr
}

/// State value for an optional list of strings
pub fn string_list(values: Option<&Vec<String>>) -> Dynamic {
    match values {
        Some(values) => Dynamic::List(values.iter().cloned().map(Dynamic::String).collect()),
        None => Dynamic::Null,
    }
}

/// State value for an optional whole number
pub fn int64(value: Option<i64>) -> Dynamic {
    value.map(Dynamic::from).unwrap_or(Dynamic::Null)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use tfplug::schema::{AttributeBuilder, AttributeType, ObjectNestingMode};
    use tfplug::validator::StringLength;

    fn plan() -> Dynamic {
        Dynamic::object([
            ("name", Dynamic::from("profile")),
            ("enabled", Dynamic::Unknown),
            ("count", Dynamic::Number(2.5)),
            (
                "items",
                Dynamic::List(vec![Dynamic::object([("id", Dynamic::from("a"))]), Dynamic::from("x")]),
            ),
        ])
    }

    #[test]
    fn reader_treats_unknown_optional_as_absent() {
        let plan = plan();
        let reader = ObjectReader::new(&plan, AttributePath::root());
        assert_eq!(reader.optional_bool("enabled").unwrap(), None);
        assert_eq!(reader.optional_string("missing").unwrap(), None);
        assert_eq!(reader.required_string("name").unwrap(), "profile");
    }

    #[test]
    fn reader_reports_member_paths() {
        let plan = plan();
        let reader = ObjectReader::new(&plan, AttributePath::new("root_node"));

        let err = reader.required_string("missing").unwrap_err();
        assert_eq!(
            err,
            ConversionError::MissingAttribute("root_node.missing".to_string())
        );

        let err = reader.optional_i64("count").unwrap_err();
        assert_eq!(err, ConversionError::NotAnInteger("root_node.count".to_string()));

        match reader.optional_list("items").unwrap_err() {
            ConversionError::TypeMismatch { path, expected, actual } => {
                assert_eq!(path, "root_node.items[1]");
                assert_eq!(expected, "object");
                assert_eq!(actual, "string");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn computed_only_strips_requirements_recursively() {
        let attr = AttributeBuilder::nested(
            "apc_id",
            ObjectNestingMode::Single,
            vec![AttributeBuilder::new("id", AttributeType::String)
                .required()
                .validator(StringLength::at_least(1))
                .build()],
        )
        .required()
        .build();

        let attr = computed_only(attr);
        assert!(attr.computed && !attr.required && !attr.optional);
        let nested = attr.nested_type.unwrap();
        let id = nested.attribute("id").unwrap();
        assert!(id.computed && !id.required);
        assert!(id.validators.is_empty());
    }
}
