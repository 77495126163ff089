//! Resource - Representing attribute values and resource state

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Attribute name of the injected region attribute
pub const ATTR_REGION: &str = "region";
/// Attribute name of the account identifier
pub const ATTR_ACCOUNT_ID: &str = "account_id";
/// Attribute name of the user-configured tags
pub const ATTR_TAGS: &str = "tags";
/// Attribute name of the effective tags (defaults merged with configured)
pub const ATTR_TAGS_ALL: &str = "tags_all";

/// Unique identifier for a resource instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    /// Resource type (e.g., "aws_s3_bucket")
    pub resource_type: String,
    /// Resource name (the instance name in configuration)
    pub name: String,
}

impl ResourceId {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }
}

/// Attribute value of a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Explicitly absent
    Null,
    String(String),
    Int(i64),
    Bool(bool),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
    /// Not yet known at plan time
    #[serde(skip)]
    Unknown,
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Build a map of string values
    pub fn string_map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the value's kind, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::String(_) => "string",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Unknown => "unknown",
        }
    }
}

/// Resource state as written into a response
///
/// Attributes that were never written are absent, which is distinct from
/// an attribute explicitly set to `Value::Null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub attributes: HashMap<String, Value>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Get a string attribute, treating empty strings as absent
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), Value::String(value.into()));
    }

    /// Region already fixed in this state, if any
    pub fn region(&self) -> Option<&str> {
        self.get_string(ATTR_REGION)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
