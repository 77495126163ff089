//! IdentitySpec - How a resource type's identity is shaped
//!
//! Built once when a resource type is registered and read-only afterwards.
//! The shape and scope are separate enums, so exactly one identity shape
//! applies to any spec.

use std::collections::BTreeSet;
use std::sync::Arc;

use lodestar_core::resource::{ATTR_ACCOUNT_ID, ATTR_REGION};
use lodestar_core::schema::{IdentityAttribute, IdentitySchema};

use crate::composite::{CompositeIdParser, ImportIdParser};

/// Whether the resource lives in a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Regional,
}

/// How the identity is expressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// The identity is an ARN held in `attribute`
    Arn { attribute: String },
    /// One instance per account (and region); no identifier at all
    Singleton,
    /// A single user-supplied parameter
    SingleParameter { attribute: String },
    /// Several parameters, imported as a composite ID
    MultipleParameters { attributes: Vec<String> },
}

/// Identity description for one resource type
#[derive(Debug, Clone)]
pub struct IdentitySpec {
    shape: Shape,
    scope: Scope,
    schema: IdentitySchema,
    duplicate_attributes: BTreeSet<String>,
    import_id_parser: Option<Arc<dyn ImportIdParser>>,
}

impl IdentitySpec {
    fn new(shape: Shape, scope: Scope) -> Self {
        let schema = build_schema(&shape, scope);
        Self {
            shape,
            scope,
            schema,
            duplicate_attributes: BTreeSet::new(),
            import_id_parser: None,
        }
    }

    pub fn regional_arn(attribute: impl Into<String>) -> Self {
        Self::new(
            Shape::Arn {
                attribute: attribute.into(),
            },
            Scope::Regional,
        )
    }

    pub fn global_arn(attribute: impl Into<String>) -> Self {
        Self::new(
            Shape::Arn {
                attribute: attribute.into(),
            },
            Scope::Global,
        )
    }

    pub fn regional_single_parameter(attribute: impl Into<String>) -> Self {
        Self::new(
            Shape::SingleParameter {
                attribute: attribute.into(),
            },
            Scope::Regional,
        )
    }

    pub fn global_single_parameter(attribute: impl Into<String>) -> Self {
        Self::new(
            Shape::SingleParameter {
                attribute: attribute.into(),
            },
            Scope::Global,
        )
    }

    pub fn regional_parameterized<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            Shape::MultipleParameters {
                attributes: attributes.into_iter().map(Into::into).collect(),
            },
            Scope::Regional,
        )
    }

    pub fn global_parameterized<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            Shape::MultipleParameters {
                attributes: attributes.into_iter().map(Into::into).collect(),
            },
            Scope::Global,
        )
    }

    pub fn regional_singleton() -> Self {
        Self::new(Shape::Singleton, Scope::Regional)
    }

    pub fn global_singleton() -> Self {
        Self::new(Shape::Singleton, Scope::Global)
    }

    /// Mirror the resolved identifier into an ordinary attribute (e.g. `id`)
    pub fn with_duplicate_attribute(mut self, name: impl Into<String>) -> Self {
        self.duplicate_attributes.insert(name.into());
        self
    }

    /// Use a custom import ID format for a multi-parameter identity
    pub fn with_import_id_parser(mut self, parser: impl ImportIdParser + 'static) -> Self {
        self.import_id_parser = Some(Arc::new(parser));
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn is_arn(&self) -> bool {
        matches!(self.shape, Shape::Arn { .. })
    }

    pub fn is_global_resource(&self) -> bool {
        self.scope == Scope::Global
    }

    pub fn is_singleton(&self) -> bool {
        matches!(self.shape, Shape::Singleton)
    }

    pub fn is_single_parameter(&self) -> bool {
        matches!(self.shape, Shape::SingleParameter { .. })
    }

    /// The identity schema, in declaration order
    pub fn schema(&self) -> &IdentitySchema {
        &self.schema
    }

    pub fn attributes(&self) -> &[IdentityAttribute] {
        &self.schema.attributes
    }

    pub fn duplicate_attributes(&self) -> &BTreeSet<String> {
        &self.duplicate_attributes
    }

    /// Parser for composite import IDs
    pub fn import_id_parser(&self) -> &dyn ImportIdParser {
        match &self.import_id_parser {
            Some(parser) => parser.as_ref(),
            None => &DEFAULT_PARSER,
        }
    }
}

static DEFAULT_PARSER: CompositeIdParser = CompositeIdParser {
    allow_empty_parts: false,
};

fn build_schema(shape: &Shape, scope: Scope) -> IdentitySchema {
    let mut schema = IdentitySchema::new();

    if let Shape::Arn { attribute } = shape {
        return schema.attribute(IdentityAttribute::new(attribute.as_str()).required());
    }

    schema = schema.attribute(
        IdentityAttribute::new(ATTR_ACCOUNT_ID)
            .with_description("AWS account ID. Defaults to the provider's account."),
    );
    if scope == Scope::Regional {
        schema = schema.attribute(
            IdentityAttribute::new(ATTR_REGION)
                .with_description("Region. Defaults to the provider's region."),
        );
    }

    match shape {
        Shape::SingleParameter { attribute } => {
            schema.attribute(IdentityAttribute::new(attribute.as_str()).required())
        }
        Shape::MultipleParameters { attributes } => attributes.iter().fold(schema, |s, name| {
            s.attribute(IdentityAttribute::new(name.as_str()).required())
        }),
        Shape::Singleton | Shape::Arn { .. } => schema,
    }
}
