use crate::{record::Record, types::Handle};
use std::hash::{Hash, Hasher};
use tracing::debug;

///
/// ExtensibleGroup
///
/// Detached key onto one extensible group of a record: the record handle,
/// the group index, and the slot id the group had when the view was made.
///
/// Field offsets are relative to the group. A default view is empty, and a
/// view whose group was erased or shifted by an insert or erase at or
/// before it is stale. Both behave as empty for every accessor.
/// `Record::refresh_group` re-locates a shifted view.
///
/// Equality is structural: same record handle and same group index.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct ExtensibleGroup {
    record: Option<Handle>,
    index: usize,
    slot: u64,
}

impl ExtensibleGroup {
    pub(crate) const fn new(record: Handle, index: usize, slot: u64) -> Self {
        Self {
            record: Some(record),
            index,
            slot,
        }
    }

    /// Handle of the viewed record; `None` for a default view.
    #[must_use]
    pub const fn record(&self) -> Option<Handle> {
        self.record
    }

    pub(crate) const fn slot(&self) -> u64 {
        self.slot
    }

    ///
    /// group_index
    /// Current index of the viewed group within `record`.
    ///
    /// # Panics
    /// Panics when the view is empty: a default view, a view of another
    /// record, or a view whose group was erased or shifted.
    ///
    #[must_use]
    pub fn group_index(&self, record: &Record) -> usize {
        assert!(
            self.is_live(record),
            "group_index called on an empty extensible group view"
        );

        self.index
    }

    /// True when this view still backs a group of `record`.
    #[must_use]
    pub fn is_live(&self, record: &Record) -> bool {
        self.record == Some(record.handle()) && record.slot_at(self.index) == Some(self.slot)
    }

    #[must_use]
    pub fn is_empty(&self, record: &Record) -> bool {
        !self.is_live(record)
    }

    /// Fields per group, or 0 when the view is empty.
    #[must_use]
    pub fn num_fields(&self, record: &Record) -> usize {
        if self.is_live(record) {
            record.model().group_len()
        } else {
            0
        }
    }

    fn absolute(&self, record: &Record, field: usize) -> Option<usize> {
        if !self.is_live(record) {
            return None;
        }

        record.model().index_of(self.index, field)
    }

    fn absolute_for_write(&self, record: &Record, field: usize) -> Option<usize> {
        let index = self.absolute(record, field);
        if index.is_none() {
            debug!(
                object_type = %record.object_type(),
                group = self.index,
                field,
                "write through an empty or stale group view"
            );
        }

        index
    }

    ///
    /// READS
    ///

    #[must_use]
    pub fn get_string(&self, record: &Record, field: usize, return_default: bool) -> Option<String> {
        record.get_string(self.absolute(record, field)?, return_default)
    }

    #[must_use]
    pub fn get_field(&self, record: &Record, field: usize, return_default: bool) -> Option<String> {
        record.get_field(self.absolute(record, field)?, return_default)
    }

    #[must_use]
    pub fn get_double(&self, record: &Record, field: usize, return_default: bool) -> Option<f64> {
        record.get_double(self.absolute(record, field)?, return_default)
    }

    #[must_use]
    pub fn get_int(&self, record: &Record, field: usize, return_default: bool) -> Option<i64> {
        record.get_int(self.absolute(record, field)?, return_default)
    }

    #[must_use]
    pub fn get_unsigned(&self, record: &Record, field: usize, return_default: bool) -> Option<u64> {
        record.get_unsigned(self.absolute(record, field)?, return_default)
    }

    #[must_use]
    pub fn get_target(&self, record: &Record, field: usize) -> Option<Handle> {
        record.get_target(self.absolute(record, field)?)
    }

    /// Display values of the group; empty when the view is empty.
    #[must_use]
    pub fn fields(&self, record: &Record, return_default: bool) -> Vec<String> {
        (0..self.num_fields(record))
            .map(|field| {
                self.get_string(record, field, return_default)
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Stored tokens of the group; references stay as handle text.
    #[must_use]
    pub fn fields_with_handles(&self, record: &Record, return_default: bool) -> Vec<String> {
        (0..self.num_fields(record))
            .map(|field| {
                self.get_field(record, field, return_default)
                    .unwrap_or_default()
            })
            .collect()
    }

    #[must_use]
    pub fn field_comment(
        &self,
        record: &Record,
        field: usize,
        return_default: bool,
    ) -> Option<String> {
        record.field_comment(self.absolute(record, field)?, return_default)
    }

    /// Stored comments of the group, unset ones as empty strings.
    #[must_use]
    pub fn field_comments(&self, record: &Record) -> Vec<String> {
        (0..self.num_fields(record))
            .map(|field| self.field_comment(record, field, false).unwrap_or_default())
            .collect()
    }

    ///
    /// WRITES
    ///

    pub fn set_string(&self, record: &mut Record, field: usize, value: &str) -> bool {
        self.set_string_with(record, field, value, true)
    }

    pub fn set_string_with(
        &self,
        record: &mut Record,
        field: usize,
        value: &str,
        check_validity: bool,
    ) -> bool {
        self.absolute_for_write(record, field)
            .is_some_and(|index| record.set_string_with(index, value, check_validity))
    }

    pub fn set_double(&self, record: &mut Record, field: usize, value: f64) -> bool {
        self.absolute_for_write(record, field)
            .is_some_and(|index| record.set_double(index, value))
    }

    pub fn set_int(&self, record: &mut Record, field: usize, value: i64) -> bool {
        self.absolute_for_write(record, field)
            .is_some_and(|index| record.set_int(index, value))
    }

    pub fn set_unsigned(&self, record: &mut Record, field: usize, value: u64) -> bool {
        self.absolute_for_write(record, field)
            .is_some_and(|index| record.set_unsigned(index, value))
    }

    pub fn set_pointer(&self, record: &mut Record, field: usize, target: Handle) -> bool {
        self.absolute_for_write(record, field)
            .is_some_and(|index| record.set_pointer(index, target))
    }

    pub fn set_field_comment(&self, record: &mut Record, field: usize, text: &str) -> bool {
        self.absolute_for_write(record, field)
            .is_some_and(|index| record.set_field_comment(index, text))
    }

    ///
    /// set_fields
    /// Replace every field of the group at once.
    ///
    /// All values are checked; on any failure the group is left exactly as
    /// it was.
    ///
    pub fn set_fields(&self, record: &mut Record, values: &[&str]) -> bool {
        if !self.is_live(record) || values.len() != record.model().group_len() {
            return false;
        }

        let start = record.group_start(self.index);
        let end = start + values.len();
        let previous = record.fields[start..end].to_vec();
        let pending = record.pending.clone();

        for (offset, value) in values.iter().enumerate() {
            if let Err(kind) = record.write_field(start + offset, value, true) {
                record.fields[start..end].clone_from_slice(&previous);
                record.pending = pending;
                record.reject(start + offset, kind);

                return false;
            }
        }

        record.emit_change_signals();

        true
    }

    ///
    /// CLONING
    ///

    /// Append a copy of this group's stored values; comments are not copied.
    pub fn push_clone(&self, record: &mut Record) -> Self {
        self.clone_into(record, None, false)
    }

    /// Append a copy of this group's stored values and field comments.
    pub fn push_clone_with_comments(&self, record: &mut Record) -> Self {
        self.clone_into(record, None, true)
    }

    /// Insert a copy of this group so it becomes group `group_index`.
    pub fn insert_clone(&self, record: &mut Record, group_index: usize) -> Self {
        self.clone_into(record, Some(group_index), false)
    }

    fn clone_into(&self, record: &mut Record, group_index: Option<usize>, comments: bool) -> Self {
        if !self.is_live(record) {
            return Self::default();
        }

        let values = self.fields_with_handles(record, false);
        let field_comments = self.field_comments(record);
        let at = group_index.unwrap_or_else(|| record.num_extensible_groups());

        let view = record.insert_group(at, &values, false);
        if view.record.is_none() {
            return view;
        }

        if comments {
            for (field, text) in field_comments.iter().enumerate() {
                if !text.is_empty() {
                    view.set_field_comment(record, field, text);
                }
            }
        }
        record.emit_change_signals();

        view
    }
}

impl PartialEq for ExtensibleGroup {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record && self.index == other.index
    }
}

impl Eq for ExtensibleGroup {}

impl Hash for ExtensibleGroup {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.record.hash(state);
        self.index.hash(state);
    }
}
