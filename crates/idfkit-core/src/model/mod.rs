//! Module: model
//! Responsibility: runtime schema metadata (object layouts, field kinds,
//! defaults, bounds) and the in-memory schema registry.
//! Does not own: record storage or validation policy.
//!
//! Invariants:
//! - A registered model has passed `ObjectModel::validate`.
//! - Models are immutable once shared behind `Arc`.

pub mod field;
pub mod object;
pub mod registry;

use crate::error::{ErrorClass, ErrorOrigin, InternalError};
use thiserror::Error as ThisError;

// re-exports
pub use field::{Bound, FieldKind, FieldModel};
pub use object::{ExtensiblePosition, ObjectModel};
pub use registry::SchemaRegistry;

///
/// SchemaError
///

#[derive(Debug, ThisError)]
pub enum SchemaError {
    #[error("object type name is empty")]
    EmptyObjectName,

    #[error("object type '{0}' already registered")]
    DuplicateObjectType(String),

    #[error("object type '{object_type}' declares name field {index}, which is not a fixed text field")]
    InvalidNameField { object_type: String, index: usize },

    #[error("object type '{object_type}' has inconsistent extensible group limits")]
    InvalidGroupLimits { object_type: String },

    #[error("choice field '{field}' of '{object_type}' has no keys")]
    ChoiceWithoutKeys { object_type: String, field: String },

    #[error("schema decode failed: {0}")]
    Decode(String),
}

impl SchemaError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::DuplicateObjectType(_) => ErrorClass::Conflict,
            Self::Decode(_) => ErrorClass::Corruption,
            Self::EmptyObjectName
            | Self::InvalidNameField { .. }
            | Self::InvalidGroupLimits { .. }
            | Self::ChoiceWithoutKeys { .. } => ErrorClass::InvariantViolation,
        }
    }
}

impl From<SchemaError> for InternalError {
    fn from(err: SchemaError) -> Self {
        Self::new(err.class(), ErrorOrigin::Schema, err.to_string())
    }
}
