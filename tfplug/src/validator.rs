//! Reusable attribute validators
//!
//! Validators skip null and unknown values; Terraform enforces `required`
//! itself and unknown values are checked again at apply time.

use crate::schema::{
    Attribute, ObjectNestingMode, Schema, Validator, ValidatorRequest, ValidatorResponse,
};
use crate::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

/// Value must be one of a fixed set of strings
pub struct StringOneOf {
    values: Vec<String>,
}

impl StringOneOf {
    pub fn create<S: AsRef<str>>(values: &[S]) -> Box<dyn Validator> {
        Box::new(Self {
            values: values.iter().map(|v| v.as_ref().to_string()).collect(),
        })
    }
}

impl Validator for StringOneOf {
    fn description(&self) -> String {
        format!("value must be one of: {}", quoted(&self.values))
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = vec![];
        if let Some(s) = request.config_value.value.as_str() {
            if !self.values.iter().any(|v| v == s) {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid Attribute Value Match",
                        format!(
                            "Attribute {} value must be one of: [{}], got: \"{}\"",
                            request.path,
                            quoted(&self.values),
                            s
                        ),
                    )
                    .with_attribute(request.path),
                );
            }
        }
        ValidatorResponse { diagnostics }
    }
}

/// String length bounds, counted in characters
pub struct StringLength {
    min: Option<usize>,
    max: Option<usize>,
}

impl StringLength {
    pub fn at_least(min: usize) -> Box<dyn Validator> {
        Box::new(Self {
            min: Some(min),
            max: None,
        })
    }

    pub fn between(min: usize, max: usize) -> Box<dyn Validator> {
        Box::new(Self {
            min: Some(min),
            max: Some(max),
        })
    }
}

impl Validator for StringLength {
    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("string length must be between {} and {}", min, max),
            (Some(min), None) => format!("string length must be at least {}", min),
            (None, Some(max)) => format!("string length must be at most {}", max),
            (None, None) => "string length is unconstrained".to_string(),
        }
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = vec![];
        if let Some(s) = request.config_value.value.as_str() {
            let len = s.chars().count();
            let too_short = self.min.is_some_and(|min| len < min);
            let too_long = self.max.is_some_and(|max| len > max);
            if too_short || too_long {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid Attribute Value Length",
                        format!(
                            "Attribute {} {}, got: {}",
                            request.path,
                            self.description(),
                            len
                        ),
                    )
                    .with_attribute(request.path),
                );
            }
        }
        ValidatorResponse { diagnostics }
    }
}

/// String must match a regular expression
pub struct StringPattern {
    pattern: Result<regex::Regex, regex::Error>,
    message: String,
}

impl StringPattern {
    /// An invalid pattern surfaces as a diagnostic when the validator runs
    pub fn create(pattern: &str, message: &str) -> Box<dyn Validator> {
        Box::new(Self {
            pattern: regex::Regex::new(pattern),
            message: message.to_string(),
        })
    }
}

impl Validator for StringPattern {
    fn description(&self) -> String {
        self.message.clone()
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = vec![];
        if let Some(s) = request.config_value.value.as_str() {
            let pattern = match &self.pattern {
                Ok(pattern) => pattern,
                Err(e) => {
                    diagnostics.push(
                        Diagnostic::error("Invalid validator pattern", e.to_string())
                            .with_attribute(request.path),
                    );
                    return ValidatorResponse { diagnostics };
                }
            };
            if !pattern.is_match(s) {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid Attribute Value Match",
                        format!("Attribute {} {}, got: {}", request.path, self.message, s),
                    )
                    .with_attribute(request.path),
                );
            }
        }
        ValidatorResponse { diagnostics }
    }
}

/// Whole number within inclusive bounds
pub struct Int64Between {
    min: i64,
    max: i64,
}

impl Int64Between {
    pub fn create(min: i64, max: i64) -> Box<dyn Validator> {
        Box::new(Self { min, max })
    }
}

impl Validator for Int64Between {
    fn description(&self) -> String {
        format!("value must be between {} and {}", self.min, self.max)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = vec![];
        if let Some(n) = request.config_value.value.as_number() {
            if n.fract() != 0.0 || n < self.min as f64 || n > self.max as f64 {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid Attribute Value",
                        format!(
                            "Attribute {} {}, got: {}",
                            request.path,
                            self.description(),
                            n
                        ),
                    )
                    .with_attribute(request.path),
                );
            }
        }
        ValidatorResponse { diagnostics }
    }
}

/// Collection (list, set or map) must hold at least `min` elements
pub struct SizeAtLeast {
    min: usize,
}

impl SizeAtLeast {
    pub fn create(min: usize) -> Box<dyn Validator> {
        Box::new(Self { min })
    }
}

impl Validator for SizeAtLeast {
    fn description(&self) -> String {
        format!("collection must contain at least {} elements", self.min)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = vec![];
        let len = match &request.config_value.value {
            Dynamic::List(l) => Some(l.len()),
            Dynamic::Map(m) => Some(m.len()),
            _ => None,
        };
        if let Some(len) = len {
            if len < self.min {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid Attribute Value",
                        format!(
                            "Attribute {} must contain at least {} elements, got: {}",
                            request.path, self.min, len
                        ),
                    )
                    .with_attribute(request.path),
                );
            }
        }
        ValidatorResponse { diagnostics }
    }
}

/// Run every validator declared in `schema` against `config`, descending
/// into nested attributes.
pub fn validate_schema(schema: &Schema, config: &DynamicValue) -> Vec<Diagnostic> {
    let mut diagnostics = vec![];
    validate_attributes(
        &schema.block.attributes,
        &config.value,
        &AttributePath::root(),
        &mut diagnostics,
    );
    diagnostics
}

pub fn validate_attributes(
    attributes: &[Attribute],
    object: &Dynamic,
    path: &AttributePath,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for attr in attributes {
        let value = object.attr(&attr.name);
        let attr_path = path.clone().attribute(&attr.name);

        if value.is_present() {
            for validator in &attr.validators {
                let response = validator.validate(ValidatorRequest {
                    config_value: DynamicValue::new(value.clone()),
                    path: attr_path.clone(),
                });
                diagnostics.extend(response.diagnostics);
            }
        }

        let Some(nested) = &attr.nested_type else {
            continue;
        };
        match (nested.nesting, value) {
            (ObjectNestingMode::Single, Dynamic::Map(_)) => {
                validate_attributes(&nested.attributes, value, &attr_path, diagnostics)
            }
            (ObjectNestingMode::List | ObjectNestingMode::Set, Dynamic::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    validate_attributes(
                        &nested.attributes,
                        item,
                        &attr_path.clone().index(i as i64),
                        diagnostics,
                    );
                }
            }
            (ObjectNestingMode::Map, Dynamic::Map(entries)) => {
                for (key, item) in entries {
                    validate_attributes(
                        &nested.attributes,
                        item,
                        &attr_path.clone().key(key),
                        diagnostics,
                    );
                }
            }
            _ => {}
        }
    }
}

fn quoted(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("\"{}\"", v))
        .collect::<Vec<_>>()
        .join(" ")
}
