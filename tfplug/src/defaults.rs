//! Default value providers for attributes
//!
//! A default replaces the planned value when the attribute is null in
//! configuration. It never overrides a configured value.

use crate::schema::{Default, DefaultRequest, DefaultResponse};
use crate::types::{Dynamic, DynamicValue};

/// StaticDefault provides a fixed default value
pub struct StaticDefault {
    value: Dynamic,
}

impl StaticDefault {
    pub fn create(value: Dynamic) -> Box<dyn Default> {
        Box::new(Self { value })
    }

    pub fn string(value: &str) -> Box<dyn Default> {
        Self::create(Dynamic::String(value.to_string()))
    }

    pub fn number(value: f64) -> Box<dyn Default> {
        Self::create(Dynamic::Number(value))
    }

    pub fn bool(value: bool) -> Box<dyn Default> {
        Self::create(Dynamic::Bool(value))
    }

    /// Empty list, also used for sets
    pub fn empty_list() -> Box<dyn Default> {
        Self::create(Dynamic::List(vec![]))
    }

    /// Empty map
    pub fn empty_map() -> Box<dyn Default> {
        Self::create(Dynamic::Map(std::collections::HashMap::new()))
    }
}

impl Default for StaticDefault {
    fn description(&self) -> String {
        format!("value defaults to {:?}", self.value)
    }

    fn default_value(&self, _request: DefaultRequest) -> DefaultResponse {
        DefaultResponse {
            value: DynamicValue::new(self.value.clone()),
        }
    }
}
