//! Module: workspace
//! Responsibility: own a collection of records and resolve reference fields
//! between them by handle.
//! Does not own: record storage rules or schema definitions.
//!
//! Invariants:
//! - Every owned record has the shared index attached as its resolver.
//! - The index holds exactly the owned handles.
//! - Names are unique per object type, ignoring case.

mod index;


use crate::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    record::Record,
    traits::{ReferenceResolver, SchemaProvider},
    types::{Handle, HandleError},
};
use index::ObjectIndex;
use std::{collections::BTreeMap, fmt, rc::Rc, sync::Arc};
use thiserror::Error as ThisError;
use tracing::{debug, trace};

///
/// WorkspaceError
///

#[derive(Debug, ThisError)]
pub enum WorkspaceError {
    #[error("unknown object type '{0}'")]
    UnknownObjectType(String),

    #[error("handle {0} already present")]
    DuplicateHandle(Handle),

    #[error("record of type '{0}' was built from a different schema")]
    ForeignSchema(String),

    #[error(transparent)]
    Handle(#[from] HandleError),
}

impl From<WorkspaceError> for InternalError {
    fn from(err: WorkspaceError) -> Self {
        let class = match err {
            WorkspaceError::UnknownObjectType(_) => ErrorClass::NotFound,
            WorkspaceError::DuplicateHandle(_) | WorkspaceError::ForeignSchema(_) => {
                ErrorClass::Conflict
            }
            WorkspaceError::Handle(_) => ErrorClass::Internal,
        };

        Self::new(class, ErrorOrigin::Workspace, err.to_string())
    }
}

///
/// Workspace
///
/// Owning collection of records. Records inside a workspace store reference
/// fields as the target's handle text and read them back as the target's
/// current name.
///

pub struct Workspace {
    provider: Arc<dyn SchemaProvider>,
    records: BTreeMap<Handle, Record>,
    index: Rc<ObjectIndex>,
}

impl Workspace {
    #[must_use]
    pub fn new(provider: Arc<dyn SchemaProvider>) -> Self {
        Self {
            provider,
            records: BTreeMap::new(),
            index: Rc::new(ObjectIndex::default()),
        }
    }

    #[must_use]
    pub fn provider(&self) -> &Arc<dyn SchemaProvider> {
        &self.provider
    }

    /// Create an empty record of `object_type`.
    pub fn add_object(&mut self, object_type: &str) -> Result<Handle, WorkspaceError> {
        let model = self
            .provider
            .model(object_type)
            .ok_or_else(|| WorkspaceError::UnknownObjectType(object_type.to_string()))?;
        let handle = Handle::try_generate()?;

        self.insert_record(Record::with_handle(model, handle))
    }

    ///
    /// insert_record
    /// Take ownership of a record built elsewhere.
    ///
    /// The record's model must match this workspace's schema for its type.
    /// A clashing name gets a numeric suffix.
    ///
    pub fn insert_record(&mut self, mut record: Record) -> Result<Handle, WorkspaceError> {
        let object_type = record.object_type().to_string();
        let known = self
            .provider
            .model(&object_type)
            .ok_or_else(|| WorkspaceError::UnknownObjectType(object_type.clone()))?;

        if !Arc::ptr_eq(&known, record.model()) && *known != **record.model() {
            return Err(WorkspaceError::ForeignSchema(object_type));
        }

        let handle = record.handle();
        if self.records.contains_key(&handle) {
            return Err(WorkspaceError::DuplicateHandle(handle));
        }

        let name = record.name(false);
        self.index.insert(handle, &object_type, name.clone());

        let resolver: Rc<dyn ReferenceResolver> = self.index.clone();
        record.attach_resolver(resolver);

        if let Some(name) = name {
            let unique = self.index.unique_name(handle, &object_type, &name);
            if unique != name {
                debug!(object_type = %object_type, from = %name, to = %unique, "renamed on insert");
                record.set_name(&unique);
            }
        }

        trace!(object_type = %object_type, handle = %handle, "record inserted");
        self.records.insert(handle, record);

        Ok(handle)
    }

    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&Record> {
        self.records.get(&handle)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut Record> {
        self.records.get_mut(&handle)
    }

    /// Remove and detach a record. References to it become dangling.
    pub fn remove(&mut self, handle: Handle) -> Option<Record> {
        let mut record = self.records.remove(&handle)?;
        self.index.remove(handle);
        record.detach_resolver();

        trace!(object_type = %record.object_type(), handle = %handle, "record removed");

        Some(record)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in handle order.
    pub fn objects(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    #[must_use]
    pub fn objects_of_type(&self, object_type: &str) -> Vec<&Record> {
        self.records
            .values()
            .filter(|record| record.model().is_type(object_type))
            .collect()
    }

    /// Record with `name`, optionally restricted to one type.
    #[must_use]
    pub fn object_by_name(&self, object_type: Option<&str>, name: &str) -> Option<&Record> {
        let handle = self.index.find_by_name(object_type, name)?;

        self.records.get(&handle)
    }

    /// Records with at least one reference field pointing at `target`.
    #[must_use]
    pub fn sources(&self, target: Handle) -> Vec<Handle> {
        self.records
            .values()
            .filter(|record| {
                record
                    .reference_fields()
                    .into_iter()
                    .any(|index| record.get_target(index) == Some(target))
            })
            .map(Record::handle)
            .collect()
    }
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}
