//! Composite import IDs
//!
//! A multi-parameter resource is imported with its parameters joined by
//! [`SEPARATOR`], in declaration order: `name,type`. There is no escaping, so
//! a parameter value containing the separator cannot be expressed as an
//! import ID and is rejected when an ID is created.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Separator between composite ID parts
pub const SEPARATOR: &str = ",";

/// Composite ID error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositeIdError {
    #[error(
        "unexpected format for ID ({id}), expected {expected} parts in the form \"{shape}\", \
         got {actual}"
    )]
    PartCount {
        id: String,
        expected: usize,
        actual: usize,
        shape: String,
    },

    #[error(
        "unexpected format for ID ({id}), all {expected} parts of \"{shape}\" must be non-empty"
    )]
    EmptyPart {
        id: String,
        expected: usize,
        shape: String,
    },

    #[error("cannot build an ID from {part:?}: parts must not contain \",\"")]
    SeparatorInPart { part: String },

    #[error("missing value for ID part {name:?}")]
    MissingPart { name: String },

    #[error("invalid ID ({id}): {message}")]
    Invalid { id: String, message: String },
}

/// Expected shape of a composite ID, e.g. `name,type`
pub fn shape(parameters: &[String]) -> String {
    parameters.join(SEPARATOR)
}

/// Split `id` into exactly `parameters.len()` parts
pub fn expand(
    id: &str,
    parameters: &[String],
    allow_empty_parts: bool,
) -> Result<Vec<String>, CompositeIdError> {
    let parts: Vec<&str> = id.split(SEPARATOR).collect();

    if parts.len() != parameters.len() {
        return Err(CompositeIdError::PartCount {
            id: id.to_string(),
            expected: parameters.len(),
            actual: parts.len(),
            shape: shape(parameters),
        });
    }

    if !allow_empty_parts && parts.iter().any(|p| p.is_empty()) {
        return Err(CompositeIdError::EmptyPart {
            id: id.to_string(),
            expected: parameters.len(),
            shape: shape(parameters),
        });
    }

    Ok(parts.into_iter().map(str::to_string).collect())
}

/// Join parts into a composite ID
pub fn flatten(parts: &[&str], allow_empty_parts: bool) -> Result<String, CompositeIdError> {
    for part in parts {
        if part.contains(SEPARATOR) {
            return Err(CompositeIdError::SeparatorInPart {
                part: part.to_string(),
            });
        }
    }

    let id = parts.join(SEPARATOR);
    if !allow_empty_parts && parts.iter().any(|p| p.is_empty()) {
        return Err(CompositeIdError::EmptyPart {
            id,
            expected: parts.len(),
            shape: parts.join(SEPARATOR),
        });
    }

    Ok(id)
}

/// Converts between an import ID and the parameter values it encodes
///
/// Resource types whose import IDs do not follow the plain comma convention
/// register their own parser on the `IdentitySpec`.
pub trait ImportIdParser: fmt::Debug + Send + Sync {
    /// Parse an import ID
    ///
    /// Returns the ID to store in duplicate attributes (which may be a
    /// normalised form of the input) and a value for every parameter.
    fn parse(
        &self,
        id: &str,
        parameters: &[String],
    ) -> Result<(String, BTreeMap<String, String>), CompositeIdError>;

    /// Build the import ID for a set of parameter values
    fn create(
        &self,
        values: &BTreeMap<String, String>,
        parameters: &[String],
    ) -> Result<String, CompositeIdError>;
}

/// The default `name,type` convention
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeIdParser {
    pub allow_empty_parts: bool,
}

impl CompositeIdParser {
    pub fn allowing_empty_parts() -> Self {
        Self {
            allow_empty_parts: true,
        }
    }
}

impl ImportIdParser for CompositeIdParser {
    fn parse(
        &self,
        id: &str,
        parameters: &[String],
    ) -> Result<(String, BTreeMap<String, String>), CompositeIdError> {
        let parts = expand(id, parameters, self.allow_empty_parts)?;
        let values = parameters.iter().cloned().zip(parts).collect();
        Ok((id.to_string(), values))
    }

    fn create(
        &self,
        values: &BTreeMap<String, String>,
        parameters: &[String],
    ) -> Result<String, CompositeIdError> {
        let parts = parameters
            .iter()
            .map(|name| {
                values
                    .get(name)
                    .map(String::as_str)
                    .ok_or_else(|| CompositeIdError::MissingPart { name: name.clone() })
            })
            .collect::<Result<Vec<_>, _>>()?;
        flatten(&parts, self.allow_empty_parts)
    }
}
