use crate::{
    model::{FieldKind, ObjectModel},
    types::Handle,
};
use std::sync::Arc;

///
/// SchemaProvider
///
/// Read-only oracle describing object layouts.
/// Only `model` is required; the per-field queries are answered from it.
///

pub trait SchemaProvider {
    fn model(&self, object_type: &str) -> Option<Arc<ObjectModel>>;

    /// Number of fixed (non-extensible) fields.
    fn field_count(&self, object_type: &str) -> Option<usize> {
        self.model(object_type).map(|model| model.fixed_len())
    }

    fn is_extensible_field(&self, object_type: &str, index: usize) -> bool {
        self.model(object_type)
            .is_some_and(|model| model.is_extensible_field(index))
    }

    fn extensible_group_field_count(&self, object_type: &str) -> usize {
        self.model(object_type).map_or(0, |model| model.group_len())
    }

    fn field_default(&self, object_type: &str, index: usize) -> Option<String> {
        self.model(object_type)
            .and_then(|model| model.field_default(index).map(ToString::to_string))
    }

    fn field_value_kind(&self, object_type: &str, index: usize) -> Option<FieldKind> {
        self.model(object_type)
            .and_then(|model| model.field_kind(index))
    }
}

impl<P: SchemaProvider + ?Sized> SchemaProvider for Arc<P> {
    fn model(&self, object_type: &str) -> Option<Arc<ObjectModel>> {
        (**self).model(object_type)
    }
}

///
/// ReferenceResolver
///
/// Maps stored reference tokens to live display names and back.
/// Implementations must answer `None` for dangling tokens rather than
/// echoing the token.
///

pub trait ReferenceResolver {
    /// Current display name of the target named by `raw_token`.
    fn resolve(&self, raw_token: &str) -> Option<String>;

    /// Stable token for a target given its display name or handle text.
    fn raw_token_of(&self, name_or_handle: &str) -> Option<String>;

    /// Called by a record after its name field changed.
    fn on_rename(&self, _handle: Handle, _name: &str) {}

    /// Name to store when `handle` asks to be called `name`.
    fn unique_name(&self, _handle: Handle, _object_type: &str, name: &str) -> String {
        name.to_string()
    }
}
