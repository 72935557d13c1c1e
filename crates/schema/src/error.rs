use thiserror::Error;

use crate::Cardinality;

pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("resource type was not set for model {0}")]
    EmptyResourceType(String),

    #[error("trying to get the id of a {0} resource that is not loaded yet")]
    IdNotLoaded(String),

    #[error("no meta object available on {0}")]
    MissingMeta(String),

    #[error("resource identifier type cannot be empty")]
    EmptyIdentifierType,

    #[error("resource identifier id cannot be empty")]
    EmptyIdentifierId,

    #[error("relation `{relation}` is not declared on {resource_type}")]
    UnknownRelation {
        resource_type: String,
        relation: String,
    },

    #[error("relation `{relation}` is declared {declared} but was used as {attempted}")]
    CardinalityMismatch {
        relation: String,
        declared: Cardinality,
        attempted: Cardinality,
    },

    #[error("mixed relation `{0}` must declare at least one model class")]
    EmptyClassList(String),

    #[error("failed to convert attributes of {resource_type}: {message}")]
    Attributes {
        resource_type: String,
        message: String,
    },
}
