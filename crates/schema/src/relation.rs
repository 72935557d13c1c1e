use std::fmt;

use crate::{Model, ModelClass, SchemaError, SchemaResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ToOne,
    ToMany,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::ToOne => f.write_str("to-one"),
            Cardinality::ToMany => f.write_str("to-many"),
        }
    }
}

/// Which model class(es) a relationship may point at.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationTarget {
    /// Every related resource maps onto this class.
    Single(ModelClass),
    /// Related resources are matched to a class by their resource type.
    Mixed(Vec<ModelClass>),
}

impl RelationTarget {
    pub fn classes(&self) -> &[ModelClass] {
        match self {
            RelationTarget::Single(class) => std::slice::from_ref(class),
            RelationTarget::Mixed(classes) => classes,
        }
    }

    /// Pick the class for a related resource of the given type. A single
    /// target always resolves; a mixed target resolves to the first class
    /// declaring that resource type.
    pub fn resolve(&self, resource_type: &str) -> Option<ModelClass> {
        match self {
            RelationTarget::Single(class) => Some(*class),
            RelationTarget::Mixed(classes) => classes
                .iter()
                .find(|class| class.resource_type() == resource_type)
                .copied(),
        }
    }
}

/// One row of a model's relationship table.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationDef {
    name: String,
    cardinality: Cardinality,
    target: RelationTarget,
}

impl RelationDef {
    pub fn new(name: impl Into<String>, cardinality: Cardinality, target: RelationTarget) -> Self {
        Self {
            name: name.into(),
            cardinality,
            target,
        }
    }

    pub fn has_one<M: Model>(name: impl Into<String>) -> Self {
        Self::new(
            name,
            Cardinality::ToOne,
            RelationTarget::Single(ModelClass::of::<M>()),
        )
    }

    pub fn has_many<M: Model>(name: impl Into<String>) -> Self {
        Self::new(
            name,
            Cardinality::ToMany,
            RelationTarget::Single(ModelClass::of::<M>()),
        )
    }

    pub fn has_one_mixed(name: impl Into<String>, classes: Vec<ModelClass>) -> Self {
        Self::new(name, Cardinality::ToOne, RelationTarget::Mixed(classes))
    }

    pub fn has_many_mixed(name: impl Into<String>, classes: Vec<ModelClass>) -> Self {
        Self::new(name, Cardinality::ToMany, RelationTarget::Mixed(classes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn target(&self) -> &RelationTarget {
        &self.target
    }

    pub fn is_to_many(&self) -> bool {
        self.cardinality == Cardinality::ToMany
    }

    pub fn is_mixed(&self) -> bool {
        matches!(self.target, RelationTarget::Mixed(_))
    }

    pub fn classes(&self) -> &[ModelClass] {
        self.target.classes()
    }

    pub fn validate(&self) -> SchemaResult<()> {
        if self.target.classes().is_empty() {
            return Err(SchemaError::EmptyClassList(self.name.clone()));
        }
        Ok(())
    }

    /// Fails when the relation is used with a cardinality it was not declared
    /// with.
    pub fn expect(&self, attempted: Cardinality) -> SchemaResult<()> {
        if self.cardinality != attempted {
            return Err(SchemaError::CardinalityMismatch {
                relation: self.name.clone(),
                declared: self.cardinality,
                attempted,
            });
        }
        Ok(())
    }
}
