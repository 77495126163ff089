//! Schema - Identity attribute schemas and identity objects
//!
//! A resource identity is a small, flat object of string attributes. Its
//! schema is fixed when the resource type is registered and is used both to
//! validate inbound identities and to shape the identity written on import.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Schema for one identity attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAttribute {
    pub name: String,
    pub required: bool,
    pub description: Option<String>,
}

impl IdentityAttribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// Schema error for identity objects
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Required identity attribute '{name}' is missing")]
    MissingRequired { name: String },

    #[error("Unknown identity attribute '{name}'")]
    UnknownAttribute { name: String },
}

/// Ordered identity schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentitySchema {
    pub attributes: Vec<IdentityAttribute>,
}

impl IdentitySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, attribute: IdentityAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&IdentityAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    /// Validate an identity object against this schema
    pub fn validate(&self, identity: &IdentityData) -> Result<(), Vec<SchemaError>> {
        let mut errors = Vec::new();

        for attr in &self.attributes {
            if attr.required && identity.get(&attr.name).is_none() {
                errors.push(SchemaError::MissingRequired {
                    name: attr.name.clone(),
                });
            }
        }

        for name in identity.names() {
            if !self.contains(name) {
                errors.push(SchemaError::UnknownAttribute {
                    name: name.to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A structured identity object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityData(BTreeMap<String, String>);

impl IdentityData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Get an attribute, treating empty strings as absent
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for IdentityData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> IdentitySchema {
        IdentitySchema::new()
            .attribute(IdentityAttribute::new("account_id"))
            .attribute(IdentityAttribute::new("region"))
            .attribute(IdentityAttribute::new("name").required())
    }

    #[test]
    fn validate_identity() {
        let identity: IdentityData = [("name", "a_name"), ("region", "us-east-1")]
            .into_iter()
            .collect();
        assert!(schema().validate(&identity).is_ok());
    }

    #[test]
    fn missing_required_attribute() {
        let identity = IdentityData::new().with("region", "us-east-1");
        let errors = schema().validate(&identity).unwrap_err();
        assert_eq!(
            errors,
            vec![SchemaError::MissingRequired {
                name: "name".to_string()
            }]
        );
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let identity = IdentityData::new().with("name", "");
        assert!(schema().validate(&identity).is_err());
    }

    #[test]
    fn unknown_attribute() {
        let identity = IdentityData::new().with("name", "n").with("color", "blue");
        let errors = schema().validate(&identity).unwrap_err();
        assert!(matches!(
            &errors[0],
            SchemaError::UnknownAttribute { name } if name == "color"
        ));
    }

    #[test]
    fn names_in_declaration_order() {
        let binding = schema();
        let names: Vec<&str> = binding.names().collect();
        assert_eq!(names, vec!["account_id", "region", "name"]);
    }
}
