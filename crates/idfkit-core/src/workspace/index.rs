use crate::{traits::ReferenceResolver, types::Handle};
use std::{cell::RefCell, collections::BTreeMap};

///
/// IndexEntry
///

#[derive(Clone, Debug)]
struct IndexEntry {
    object_type: String,
    name: Option<String>,
}

///
/// ObjectIndex
///
/// Handle → (type, name) map shared by a workspace and its records.
/// Names compare case-insensitively. Iteration is in handle order, so the
/// oldest object wins a name lookup that matches more than one type.
///

#[derive(Debug, Default)]
pub(crate) struct ObjectIndex {
    entries: RefCell<BTreeMap<Handle, IndexEntry>>,
}

impl ObjectIndex {
    pub(crate) fn insert(&self, handle: Handle, object_type: &str, name: Option<String>) {
        self.entries.borrow_mut().insert(
            handle,
            IndexEntry {
                object_type: object_type.to_string(),
                name: name.filter(|name| !name.is_empty()),
            },
        );
    }

    pub(crate) fn remove(&self, handle: Handle) {
        self.entries.borrow_mut().remove(&handle);
    }

    /// First handle whose name matches, optionally restricted to one type.
    pub(crate) fn find_by_name(&self, object_type: Option<&str>, name: &str) -> Option<Handle> {
        self.entries
            .borrow()
            .iter()
            .find(|(_, entry)| {
                object_type.is_none_or(|t| entry.object_type.eq_ignore_ascii_case(t))
                    && entry
                        .name
                        .as_deref()
                        .is_some_and(|n| n.eq_ignore_ascii_case(name))
            })
            .map(|(handle, _)| *handle)
    }

    fn name_taken(&self, except: Handle, object_type: &str, name: &str) -> bool {
        self.entries.borrow().iter().any(|(handle, entry)| {
            *handle != except
                && entry.object_type.eq_ignore_ascii_case(object_type)
                && entry
                    .name
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
    }
}

impl ReferenceResolver for ObjectIndex {
    fn resolve(&self, raw_token: &str) -> Option<String> {
        let handle = Handle::parse(raw_token).ok()?;
        let entries = self.entries.borrow();
        let entry = entries.get(&handle)?;

        // unnamed targets answer with their handle text
        Some(entry.name.clone().unwrap_or_else(|| handle.to_string()))
    }

    fn raw_token_of(&self, name_or_handle: &str) -> Option<String> {
        if let Ok(handle) = Handle::parse(name_or_handle)
            && self.entries.borrow().contains_key(&handle)
        {
            return Some(handle.to_string());
        }

        self.find_by_name(None, name_or_handle)
            .map(|handle| handle.to_string())
    }

    fn on_rename(&self, handle: Handle, name: &str) {
        if let Some(entry) = self.entries.borrow_mut().get_mut(&handle) {
            entry.name = (!name.is_empty()).then(|| name.to_string());
        }
    }

    fn unique_name(&self, handle: Handle, object_type: &str, name: &str) -> String {
        if name.is_empty() || !self.name_taken(handle, object_type, name) {
            return name.to_string();
        }

        (1..)
            .map(|n| format!("{name} {n}"))
            .find(|candidate| !self.name_taken(handle, object_type, candidate))
            .unwrap_or_else(|| name.to_string())
    }
}

///
/// TESTS
///
