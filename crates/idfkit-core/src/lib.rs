//! Core engine for idfkit: schema-typed positional records with extensible
//! groups, typed field access, reference resolution, validation, and change
//! notification.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod error;
pub mod model;
pub mod obs;
pub mod record;
pub mod traits;
pub mod types;
pub mod validate;
pub mod workspace;


///
/// Prelude
///
/// Prelude contains only the vocabulary used at translation call sites.
/// No errors, sinks, or registries are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{FieldKind, ObjectModel},
        record::{ExtensibleGroup, Record},
        traits::{ReferenceResolver, SchemaProvider},
        types::Handle,
        validate::StrictnessLevel,
        workspace::Workspace,
    };
}
