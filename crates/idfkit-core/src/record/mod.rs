//! Module: record
//! Responsibility: positional field storage for one schema-typed object,
//! typed access with default fallback, extensible group structure, and
//! change reporting.
//! Does not own: schema definitions, name resolution, or collection policy.
//!
//! Invariants:
//! - The fixed prefix is allocated at construction and never shrinks.
//! - The extensible region is always a whole number of groups.
//! - `slots` holds one id per group; ids are never reused within a record.
//! - `field_comments` is never longer than `fields`.

pub(crate) mod convert;
mod edit;
mod group;

#[cfg(test)]
mod tests;

use crate::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    model::{FieldKind, FieldModel, ObjectModel},
    obs::sink::{self, ChangeEvent},
    traits::{ReferenceResolver, SchemaProvider},
    types::Handle,
    validate::{self, DataErrorKind, StrictnessLevel, ValidityReport},
};
use std::{collections::BTreeSet, fmt, iter, rc::Rc, sync::Arc};
use thiserror::Error as ThisError;
use tracing::{debug, trace};

// re-exports
pub use edit::RecordEdit;
pub use group::ExtensibleGroup;

///
/// RecordError
///

#[derive(Debug, ThisError)]
pub enum RecordError {
    #[error("unknown object type '{0}'")]
    UnknownObjectType(String),

    #[error("'{object_type}' has no extensible groups but {count} values were given for {max} fields")]
    TooManyFields {
        object_type: String,
        count: usize,
        max: usize,
    },

    #[error("'{object_type}': {count} extensible values do not fill whole groups of {group_len}")]
    IncompleteGroup {
        object_type: String,
        count: usize,
        group_len: usize,
    },

    #[error("'{object_type}' allows at most {max} extensible groups, got {count}")]
    TooManyGroups {
        object_type: String,
        count: usize,
        max: usize,
    },
}

impl From<RecordError> for InternalError {
    fn from(err: RecordError) -> Self {
        let class = match err {
            RecordError::UnknownObjectType(_) => ErrorClass::NotFound,
            RecordError::TooManyFields { .. }
            | RecordError::IncompleteGroup { .. }
            | RecordError::TooManyGroups { .. } => ErrorClass::Corruption,
        };

        Self::new(class, ErrorOrigin::Record, err.to_string())
    }
}

///
/// PendingChanges
/// Diffs accumulated since the last flush.
///

#[derive(Clone, Debug, Default)]
struct PendingChanges {
    fields: BTreeSet<usize>,
    name: bool,
    structure: bool,
}

impl PendingChanges {
    /// Forget field diffs at or after `start`; their indices no longer hold.
    fn shift_from(&mut self, start: usize) {
        self.fields.retain(|&index| index < start);
        self.structure = true;
    }
}

///
/// Record
///
/// One schema-typed object: a fixed prefix of fields followed by zero or
/// more extensible groups. Every field is a raw string token; an empty
/// token means unset.
///
/// Field-level failures are soft. Getters answer `None` and setters answer
/// `false`, leaving the stored value untouched.
///

pub struct Record {
    handle: Handle,
    model: Arc<ObjectModel>,
    fields: Vec<String>,
    field_comments: Vec<String>,
    comment: String,
    slots: Vec<u64>,
    next_slot: u64,
    pending: PendingChanges,
    resolver: Option<Rc<dyn ReferenceResolver>>,
}

impl Record {
    ///
    /// CONSTRUCTION
    ///

    /// Empty record with a freshly generated handle.
    #[must_use]
    pub fn new(model: Arc<ObjectModel>) -> Self {
        Self::with_handle(model, Handle::generate())
    }

    #[must_use]
    pub fn with_handle(model: Arc<ObjectModel>, handle: Handle) -> Self {
        let fields = vec![String::new(); model.fixed_len()];

        Self {
            handle,
            model,
            fields,
            field_comments: Vec::new(),
            comment: String::new(),
            slots: Vec::new(),
            next_slot: 1,
            pending: PendingChanges::default(),
            resolver: None,
        }
    }

    /// Empty record of a type looked up through `provider`.
    pub fn of_type<P>(provider: &P, object_type: &str) -> Result<Self, RecordError>
    where
        P: SchemaProvider + ?Sized,
    {
        let model = provider
            .model(object_type)
            .ok_or_else(|| RecordError::UnknownObjectType(object_type.to_string()))?;

        Ok(Self::new(model))
    }

    ///
    /// from_fields
    /// Load raw tokens in declaration order.
    ///
    /// A short list is padded to the fixed prefix. Values past the prefix
    /// must fill whole extensible groups. Tokens are stored as given and
    /// no change events are emitted.
    ///
    pub fn from_fields<I, S>(model: Arc<ObjectModel>, values: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values: Vec<String> = values.into_iter().map(Into::into).collect();
        let fixed = model.fixed_len();
        let group_len = model.group_len();

        let groups = if values.len() <= fixed {
            values.resize(fixed, String::new());
            0
        } else if group_len == 0 {
            return Err(RecordError::TooManyFields {
                object_type: model.name.clone(),
                count: values.len(),
                max: fixed,
            });
        } else {
            let extra = values.len() - fixed;
            if extra % group_len != 0 {
                return Err(RecordError::IncompleteGroup {
                    object_type: model.name.clone(),
                    count: extra,
                    group_len,
                });
            }

            extra / group_len
        };

        if let Some(max) = model.max_groups.filter(|&max| groups > max) {
            return Err(RecordError::TooManyGroups {
                object_type: model.name.clone(),
                count: groups,
                max,
            });
        }

        let mut record = Self::new(model);
        record.fields = values;
        for _ in 0..groups {
            let slot = record.allocate_slot();
            record.slots.push(slot);
        }

        Ok(record)
    }

    /// Copy of this record with its own storage.
    ///
    /// The copy is detached: it has no resolver until it joins a
    /// workspace, so reference fields read back as raw handle text.
    #[must_use]
    pub fn clone_record(&self, keep_handle: bool) -> Self {
        let handle = if keep_handle {
            self.handle
        } else {
            Handle::generate()
        };

        Self {
            handle,
            model: Arc::clone(&self.model),
            fields: self.fields.clone(),
            field_comments: self.field_comments.clone(),
            comment: self.comment.clone(),
            slots: self.slots.clone(),
            next_slot: self.next_slot,
            pending: PendingChanges::default(),
            resolver: None,
        }
    }

    ///
    /// IDENTITY
    ///

    #[must_use]
    pub const fn handle(&self) -> Handle {
        self.handle
    }

    #[must_use]
    pub fn object_type(&self) -> &str {
        &self.model.name
    }

    #[must_use]
    pub const fn model(&self) -> &Arc<ObjectModel> {
        &self.model
    }

    pub(crate) fn attach_resolver(&mut self, resolver: Rc<dyn ReferenceResolver>) {
        self.resolver = Some(resolver);
    }

    pub(crate) fn detach_resolver(&mut self) {
        self.resolver = None;
    }

    fn resolver(&self) -> Option<&dyn ReferenceResolver> {
        self.resolver.as_deref()
    }

    /// Display name, when the type has a name field.
    #[must_use]
    pub fn name(&self, return_default: bool) -> Option<String> {
        let index = self.model.name_field?;

        self.get_string(index, return_default)
    }

    ///
    /// set_name
    /// Store a name and return the name actually stored.
    ///
    /// Inside a workspace the name is made unique among objects of the same
    /// type. `None` when the type has no name field.
    ///
    pub fn set_name(&mut self, name: &str) -> Option<String> {
        let index = self.model.name_field?;
        if !self.set_string(index, name) {
            return None;
        }

        Some(self.fields[index].clone())
    }

    ///
    /// SHAPE
    ///

    #[must_use]
    pub const fn num_fields(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn num_nonextensible_fields(&self) -> usize {
        self.model.fixed_len()
    }

    #[must_use]
    pub fn num_extensible_groups(&self) -> usize {
        match self.model.group_len() {
            0 => 0,
            len => (self.fields.len() - self.model.fixed_len()) / len,
        }
    }

    #[must_use]
    pub fn min_extensible_groups(&self) -> usize {
        self.model.min_groups
    }

    #[must_use]
    pub fn max_extensible_groups(&self) -> Option<usize> {
        self.model.max_groups
    }

    /// True for unset or out-of-range fields.
    #[must_use]
    pub fn is_empty(&self, index: usize) -> bool {
        self.fields.get(index).is_none_or(String::is_empty)
    }

    ///
    /// READS
    ///

    ///
    /// get_string
    /// Display value of one field.
    ///
    /// Reference fields resolve to the target's current name when a resolver
    /// is attached, and to nothing when the target is gone.
    ///
    #[must_use]
    pub fn get_string(&self, index: usize, return_default: bool) -> Option<String> {
        let token = self.fields.get(index)?;
        if token.is_empty() {
            return self.default_for(index, return_default);
        }

        match self.resolver() {
            Some(resolver) if self.model.is_reference_field(index) => resolver.resolve(token),
            _ => Some(token.clone()),
        }
    }

    /// Stored token of one field; never resolves references.
    #[must_use]
    pub fn get_field(&self, index: usize, return_default: bool) -> Option<String> {
        let token = self.fields.get(index)?;
        if token.is_empty() {
            return self.default_for(index, return_default);
        }

        Some(token.clone())
    }

    fn default_for(&self, index: usize, return_default: bool) -> Option<String> {
        if !return_default {
            return None;
        }

        self.model.field_default(index).map(ToString::to_string)
    }

    #[must_use]
    pub fn get_double(&self, index: usize, return_default: bool) -> Option<f64> {
        self.get_numeric(index, return_default, convert::parse_double)
    }

    #[must_use]
    pub fn get_int(&self, index: usize, return_default: bool) -> Option<i64> {
        self.get_numeric(index, return_default, convert::parse_int)
    }

    #[must_use]
    pub fn get_unsigned(&self, index: usize, return_default: bool) -> Option<u64> {
        self.get_numeric(index, return_default, convert::parse_unsigned)
    }

    fn get_numeric<T>(
        &self,
        index: usize,
        return_default: bool,
        parse: fn(&str) -> Option<T>,
    ) -> Option<T> {
        let token = self.get_field(index, return_default)?;
        let value = parse(&token);

        if value.is_none() && !convert::is_auto_keyword(&token) {
            debug!(
                object_type = %self.model.name,
                index,
                token = %token,
                "field token does not convert"
            );
        }

        value
    }

    /// Display values of every field, unset fields as empty strings.
    #[must_use]
    pub fn fields(&self, return_default: bool) -> Vec<String> {
        (0..self.fields.len())
            .map(|index| self.get_string(index, return_default).unwrap_or_default())
            .collect()
    }

    /// Stored tokens of every field; references stay as handle text.
    #[must_use]
    pub fn fields_with_handles(&self, return_default: bool) -> Vec<String> {
        (0..self.fields.len())
            .map(|index| self.get_field(index, return_default).unwrap_or_default())
            .collect()
    }

    ///
    /// WRITES
    ///

    /// Checked write; see `set_string_with`.
    pub fn set_string(&mut self, index: usize, value: &str) -> bool {
        self.set_string_with(index, value, true)
    }

    ///
    /// set_string_with
    /// Store one value.
    ///
    /// With `check_validity` the value must pass draft-level validation and
    /// change events are flushed immediately. Without it the literal is
    /// stored as given and events wait for `emit_change_signals`; the caller
    /// owns the follow-up validation pass.
    ///
    pub fn set_string_with(&mut self, index: usize, value: &str, check_validity: bool) -> bool {
        match self.write_field(index, value, check_validity) {
            Ok(()) => {
                if check_validity {
                    self.emit_change_signals();
                }
                true
            }
            Err(kind) => {
                self.reject(index, kind);
                false
            }
        }
    }

    pub fn set_double(&mut self, index: usize, value: f64) -> bool {
        match convert::format_double(value) {
            Some(token) => self.set_string(index, &token),
            None => {
                self.reject(index, DataErrorKind::DataType);
                false
            }
        }
    }

    pub fn set_int(&mut self, index: usize, value: i64) -> bool {
        self.set_string(index, &value.to_string())
    }

    pub fn set_unsigned(&mut self, index: usize, value: u64) -> bool {
        self.set_string(index, &value.to_string())
    }

    ///
    /// write_field
    /// Store one value without flushing events.
    ///
    /// Inside a workspace a name-field value is replaced by the resolver's
    /// unique variant before it is stored, on every write path.
    ///
    pub(crate) fn write_field(
        &mut self,
        index: usize,
        value: &str,
        check: bool,
    ) -> Result<(), DataErrorKind> {
        if index >= self.fields.len() {
            return Err(DataErrorKind::NoSchemaField);
        }

        let model = Arc::clone(&self.model);
        let field = model
            .field_model(index)
            .ok_or(DataErrorKind::NoSchemaField)?;
        let mut token = self.token_for(field, value, check)?;
        if model.is_name_field(index)
            && let Some(resolver) = self.resolver()
        {
            token = resolver.unique_name(self.handle, &model.name, &token);
        }

        if check {
            validate::check_value(field, &token, self.resolver())?;
        }

        if self.fields[index] == token {
            return Ok(());
        }

        self.fields[index] = token;
        self.pending.fields.insert(index);

        if model.is_name_field(index) {
            self.pending.name = true;
            if let Some(resolver) = self.resolver() {
                resolver.on_rename(self.handle, &self.fields[index]);
            }
        }

        Ok(())
    }

    /// Token to store for `value`; reference names become handle text.
    fn token_for(
        &self,
        field: &FieldModel,
        value: &str,
        check: bool,
    ) -> Result<String, DataErrorKind> {
        if field.kind != FieldKind::ObjectReference || value.is_empty() {
            return Ok(value.to_string());
        }

        let Some(resolver) = self.resolver() else {
            return Ok(value.to_string());
        };

        match resolver.raw_token_of(value) {
            Some(token) => Ok(token),
            None if check => Err(DataErrorKind::DanglingReference),
            None => Ok(value.to_string()),
        }
    }

    fn reject(&self, index: usize, kind: DataErrorKind) {
        debug!(
            object_type = %self.model.name,
            handle = %self.handle,
            index,
            reason = %kind,
            "field write rejected"
        );

        sink::record(ChangeEvent::WriteRejected {
            handle: self.handle,
            object_type: self.model.name.clone(),
            index,
        });
    }

    /// Staging guard for a batch of unchecked writes; see `RecordEdit`.
    pub fn edit(&mut self) -> RecordEdit<'_> {
        RecordEdit::new(self)
    }

    ///
    /// REFERENCES
    ///

    /// Absolute indices of reference fields that hold a token.
    #[must_use]
    pub fn reference_fields(&self) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(index, token)| !token.is_empty() && self.model.is_reference_field(*index))
            .map(|(index, _)| index)
            .collect()
    }

    /// Handle of a live reference target.
    #[must_use]
    pub fn get_target(&self, index: usize) -> Option<Handle> {
        if !self.model.is_reference_field(index) {
            return None;
        }

        let token = self.fields.get(index).filter(|token| !token.is_empty())?;
        let handle = Handle::parse(token).ok()?;

        match self.resolver() {
            Some(resolver) if resolver.resolve(token).is_none() => None,
            _ => Some(handle),
        }
    }

    /// Point a reference field at `target`.
    pub fn set_pointer(&mut self, index: usize, target: Handle) -> bool {
        if !self.model.is_reference_field(index) {
            self.reject(index, DataErrorKind::DataType);
            return false;
        }

        self.set_string(index, &target.to_string())
    }

    ///
    /// COMMENTS
    ///

    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        (!self.comment.is_empty()).then_some(self.comment.as_str())
    }

    pub fn set_comment(&mut self, text: &str) {
        self.comment = normalize_comment(text);
    }

    ///
    /// field_comment
    /// Comment attached to one field.
    ///
    /// The default comment is `! <field name>`, followed by the group number
    /// for extensible fields and `{units}` when the field has units.
    ///
    #[must_use]
    pub fn field_comment(&self, index: usize, return_default: bool) -> Option<String> {
        if index >= self.fields.len() {
            return None;
        }

        if let Some(comment) = self.field_comments.get(index).filter(|c| !c.is_empty()) {
            return Some(comment.clone());
        }

        if !return_default {
            return None;
        }

        let field = self.model.field_model(index)?;
        let group = self
            .model
            .extensible_position(index)
            .map(|position| format!(" {}", position.group + 1))
            .unwrap_or_default();
        let units = field
            .units
            .as_ref()
            .map(|units| format!(" {{{units}}}"))
            .unwrap_or_default();

        Some(format!("! {}{group}{units}", field.name))
    }

    pub fn set_field_comment(&mut self, index: usize, text: &str) -> bool {
        if index >= self.fields.len() {
            return false;
        }

        if self.field_comments.len() <= index {
            self.field_comments.resize(index + 1, String::new());
        }
        self.field_comments[index] = normalize_comment(text);

        true
    }

    ///
    /// EXTENSIBLE GROUPS
    ///

    /// Append an empty group.
    pub fn push_extensible_group(&mut self) -> ExtensibleGroup {
        self.insert_group(self.num_extensible_groups(), &[], true)
    }

    /// Append a group holding `values`; an empty slice appends empty fields.
    pub fn push_extensible_group_with(&mut self, values: &[&str]) -> ExtensibleGroup {
        let values = owned(values);

        self.insert_group(self.num_extensible_groups(), &values, true)
    }

    /// Insert an empty group at `group_index`, shifting later groups up.
    pub fn insert_extensible_group(&mut self, group_index: usize) -> ExtensibleGroup {
        self.insert_group(group_index, &[], true)
    }

    pub fn insert_extensible_group_with(
        &mut self,
        group_index: usize,
        values: &[&str],
    ) -> ExtensibleGroup {
        let values = owned(values);

        self.insert_group(group_index, &values, true)
    }

    ///
    /// insert_group
    /// Splice one group in at `group_index`.
    ///
    /// Any failed value rolls back the whole group, its slot, and the
    /// pending diffs. Events flush only when `check` is set.
    ///
    pub(crate) fn insert_group(
        &mut self,
        group_index: usize,
        values: &[String],
        check: bool,
    ) -> ExtensibleGroup {
        let group_len = self.model.group_len();
        let count = self.num_extensible_groups();
        let at_cap = self.model.max_groups.is_some_and(|max| count >= max);
        let bad_values = !values.is_empty() && values.len() != group_len;

        if group_len == 0 || group_index > count || at_cap || bad_values {
            debug!(
                object_type = %self.model.name,
                group_index,
                count,
                "extensible group insert refused"
            );
            return ExtensibleGroup::default();
        }

        let start = self.group_start(group_index);
        let pending = self.pending.clone();

        self.fields
            .splice(start..start, iter::repeat_n(String::new(), group_len));
        if self.field_comments.len() > start {
            self.field_comments
                .splice(start..start, iter::repeat_n(String::new(), group_len));
        }

        let slot = self.allocate_slot();
        self.slots.insert(group_index, slot);
        self.pending.shift_from(start);

        for (offset, value) in values.iter().enumerate() {
            if let Err(kind) = self.write_field(start + offset, value, check) {
                self.remove_group_storage(group_index);
                self.pending = pending;
                self.reject(start + offset, kind);

                return ExtensibleGroup::default();
            }
        }

        trace!(object_type = %self.model.name, group_index, "extensible group inserted");
        if check {
            self.emit_change_signals();
        }

        ExtensibleGroup::new(self.handle, group_index, slot)
    }

    /// Remove the group at `group_index`, shifting later groups down.
    pub fn erase_extensible_group(&mut self, group_index: usize) -> bool {
        self.take_group(group_index).is_some()
    }

    /// Remove the last group and return its stored tokens.
    pub fn pop_extensible_group(&mut self) -> Vec<String> {
        self.num_extensible_groups()
            .checked_sub(1)
            .and_then(|last| self.take_group(last))
            .unwrap_or_default()
    }

    /// Remove every group, returning their stored tokens in order.
    pub fn clear_extensible_groups(&mut self) -> Vec<Vec<String>> {
        let fixed = self.model.fixed_len();
        let group_len = self.model.group_len();
        if group_len == 0 || self.fields.len() == fixed {
            return Vec::new();
        }

        let removed = self
            .fields
            .split_off(fixed)
            .chunks(group_len)
            .map(<[String]>::to_vec)
            .collect();
        self.field_comments.truncate(fixed);
        self.slots.clear();
        self.pending.shift_from(fixed);

        trace!(object_type = %self.model.name, "extensible groups cleared");
        self.emit_change_signals();

        removed
    }

    fn take_group(&mut self, group_index: usize) -> Option<Vec<String>> {
        if group_index >= self.num_extensible_groups() {
            debug!(
                object_type = %self.model.name,
                group_index,
                "extensible group erase out of range"
            );
            return None;
        }

        let start = self.group_start(group_index);
        let removed = self.remove_group_storage(group_index);
        self.pending.shift_from(start);

        trace!(object_type = %self.model.name, group_index, "extensible group erased");
        self.emit_change_signals();

        Some(removed)
    }

    fn remove_group_storage(&mut self, group_index: usize) -> Vec<String> {
        let start = self.group_start(group_index);
        let end = start + self.model.group_len();

        let removed = self.fields.drain(start..end).collect();
        if self.field_comments.len() > start {
            let stop = end.min(self.field_comments.len());
            self.field_comments.drain(start..stop);
        }
        self.slots.remove(group_index);

        removed
    }

    fn group_start(&self, group_index: usize) -> usize {
        self.model.fixed_len() + group_index * self.model.group_len()
    }

    const fn allocate_slot(&mut self) -> u64 {
        let slot = self.next_slot;
        self.next_slot += 1;

        slot
    }

    /// View over the group at `group_index`; empty when out of range.
    #[must_use]
    pub fn extensible_group(&self, group_index: usize) -> ExtensibleGroup {
        self.slots
            .get(group_index)
            .map_or_else(ExtensibleGroup::default, |&slot| {
                ExtensibleGroup::new(self.handle, group_index, slot)
            })
    }

    #[must_use]
    pub fn extensible_groups(&self) -> Vec<ExtensibleGroup> {
        (0..self.slots.len())
            .map(|group_index| self.extensible_group(group_index))
            .collect()
    }

    /// Re-locate a view after structural changes; empty if its group is gone.
    #[must_use]
    pub fn refresh_group(&self, view: ExtensibleGroup) -> ExtensibleGroup {
        if view.record() != Some(self.handle) {
            return ExtensibleGroup::default();
        }

        self.slots
            .iter()
            .position(|&slot| slot == view.slot())
            .map_or_else(ExtensibleGroup::default, |group_index| {
                self.extensible_group(group_index)
            })
    }

    pub(crate) fn slot_at(&self, group_index: usize) -> Option<u64> {
        self.slots.get(group_index).copied()
    }

    ///
    /// COMPARISON & VALIDITY
    ///

    ///
    /// data_fields_equal
    /// Same type and same data, ignoring reference fields.
    ///
    /// Numeric fields compare by value, text compares case-insensitively,
    /// and the name field may differ only between copies of one handle.
    ///
    #[must_use]
    pub fn data_fields_equal(&self, other: &Self) -> bool {
        if !self.model.is_type(&other.model.name) || self.fields.len() != other.fields.len() {
            return false;
        }

        (0..self.fields.len()).all(|index| self.data_field_equal(other, index))
    }

    fn data_field_equal(&self, other: &Self, index: usize) -> bool {
        let mine = &self.fields[index];
        let theirs = &other.fields[index];
        let kind = self.model.field_kind(index);

        match kind {
            Some(FieldKind::ObjectReference) => return true,
            Some(FieldKind::Integer) => {
                match (convert::parse_int(mine), convert::parse_int(theirs)) {
                    (Some(a), Some(b)) => return a == b,
                    (None, None) => {}
                    _ => return false,
                }
            }
            Some(FieldKind::Real) => {
                match (convert::parse_double(mine), convert::parse_double(theirs)) {
                    (Some(a), Some(b)) => return convert::reals_equal(a, b),
                    (None, None) => {}
                    _ => return false,
                }
            }
            _ => {}
        }

        mine.eq_ignore_ascii_case(theirs)
            || (self.model.is_name_field(index) && self.handle == other.handle)
    }

    #[must_use]
    pub fn validity_report(&self, level: StrictnessLevel) -> ValidityReport {
        validate::validate_fields(&self.model, &self.fields, self.resolver(), level)
    }

    #[must_use]
    pub fn is_valid(&self, level: StrictnessLevel) -> bool {
        self.validity_report(level).is_valid()
    }

    ///
    /// emit_change_signals
    /// Flush accumulated diffs as change events, at most one of each kind.
    ///
    pub fn emit_change_signals(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        let object_type = &self.model.name;

        if pending.name {
            sink::record(ChangeEvent::NameChanged {
                handle: self.handle,
                object_type: object_type.clone(),
                name: self.name(false).unwrap_or_default(),
            });
        }

        if !pending.fields.is_empty() {
            sink::record(ChangeEvent::DataChanged {
                handle: self.handle,
                object_type: object_type.clone(),
                indices: pending.fields.into_iter().collect(),
            });
        }

        if pending.structure {
            sink::record(ChangeEvent::StructureChanged {
                handle: self.handle,
                object_type: object_type.clone(),
                groups: self.num_extensible_groups(),
            });
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("handle", &self.handle)
            .field("object_type", &self.model.name)
            .field("fields", &self.fields)
            .field("comment", &self.comment)
            .field("resolved", &self.resolver.is_some())
            .finish_non_exhaustive()
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn normalize_comment(text: &str) -> String {
    let text = text.trim();

    if text.is_empty() || text.starts_with('!') {
        text.to_string()
    } else {
        format!("! {text}")
    }
}
