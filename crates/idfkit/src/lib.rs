//! ## Crate layout
//! - `core`: records, extensible groups, schema models, validation,
//!   workspaces, and change observability.
//!
//! The `prelude` module mirrors the surface used by model-editing code;
//! `schema` groups the helpers for building and loading object layouts.

pub use idfkit_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Errors
//

pub use crate::core::error::{ErrorClass, ErrorOrigin, InternalError as Error};

use crate::core::{model::SchemaRegistry, workspace::Workspace};
use std::sync::Arc;

/// Load a JSON schema document into a shared registry.
pub fn load_schema(json: &str) -> Result<Arc<SchemaRegistry>, Error> {
    let registry = SchemaRegistry::from_json(json)?;

    Ok(Arc::new(registry))
}

/// Empty workspace over a JSON schema document.
pub fn workspace_from_json(json: &str) -> Result<Workspace, Error> {
    let registry = load_schema(json)?;

    Ok(Workspace::new(registry))
}

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        model::{Bound, FieldKind, FieldModel, ObjectModel, SchemaRegistry},
        obs::{ChangeEvent, ChangeSink as _},
        record::{ExtensibleGroup, Record, RecordEdit},
        traits::{ReferenceResolver as _, SchemaProvider as _},
        types::Handle,
        validate::{DataError, DataErrorKind, StrictnessLevel, ValidityReport},
        workspace::Workspace,
    };
    pub use serde::{Deserialize, Serialize};
}

//
// Schema Prelude
// For code that defines object layouts rather than editing records.
//

pub mod schema {
    pub mod prelude {
        pub use crate::core::{
            model::{
                Bound, ExtensiblePosition, FieldKind, FieldModel, ObjectModel, SchemaError,
                SchemaRegistry,
            },
            traits::{ReferenceResolver, SchemaProvider},
        };
    }
}

///
/// TESTS
///
