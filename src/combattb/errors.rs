use flexstr::ToSharedStr;
use thiserror::Error;

use crate::schema::Cardinality;
use crate::types::{KindName, FieldName, RelName, EdgeLabel};

pub type Result<T> = std::result::Result<T, SchemaError>;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("invalid {kind}.{field}: {reason}")]
    ValidationError { kind: KindName, field: FieldName, reason: String },

    #[error("{kind}.{field} must be unique but {value} is already stored")]
    UniquenessViolation { kind: KindName, field: FieldName, value: String },

    #[error("{kind}.{name} ({label}) expects {expected} but has {actual}")]
    CardinalityViolation {
        kind: KindName,
        name: RelName,
        label: EdgeLabel,
        expected: Cardinality,
        actual: usize,
    },

    #[error("unknown entity kind: {0}")]
    UnknownEntityKind(KindName),

    #[error("{kind} has no relationship named {name}")]
    UnknownRelationshipLabel { kind: KindName, name: RelName },

    #[error("conflicting definition of {0}")]
    DuplicateDefinition(String),

    #[error("fmin cannot be greater than fmax: {start} > {end}")]
    MalformedLocation { start: i64, end: i64 },

    #[error("a {kind} can't be the {endpoint} of {label}, expected a {expected}")]
    EndpointMismatch {
        label: EdgeLabel,
        endpoint: &'static str,
        kind: KindName,
        expected: KindName,
    },

    #[error("no such node: {0}")]
    UnknownNode(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemaError {
    pub fn invalid(kind: &str, field: &str, reason: impl Into<String>) -> SchemaError {
        SchemaError::ValidationError {
            kind: kind.to_shared_str(),
            field: field.to_shared_str(),
            reason: reason.into(),
        }
    }
}
