use crate::{
    record::{ExtensibleGroup, Record, convert, owned},
    validate::{self, DataError, DataErrorKind, StrictnessLevel, ValidityReport},
};
use std::collections::BTreeSet;

///
/// RecordEdit
///
/// Two-phase staging guard over one record.
///
/// Writes made through the guard skip per-field validation and event
/// flushing. `commit` checks every touched field once and reports all
/// failures together; values are kept either way. Change events flush once
/// when the guard goes away, whether or not it was committed.
///

pub struct RecordEdit<'a> {
    record: &'a mut Record,
    touched: BTreeSet<usize>,
}

impl<'a> RecordEdit<'a> {
    pub(crate) fn new(record: &'a mut Record) -> Self {
        Self {
            record,
            touched: BTreeSet::new(),
        }
    }

    /// Read access to the record being edited.
    #[must_use]
    pub fn record(&self) -> &Record {
        self.record
    }

    /// Stage one value; fails only when `index` is out of range.
    pub fn set_string(&mut self, index: usize, value: &str) -> bool {
        if self.record.write_field(index, value, false).is_err() {
            return false;
        }

        self.touched.insert(index);
        true
    }

    pub fn set_double(&mut self, index: usize, value: f64) -> bool {
        convert::format_double(value).is_some_and(|token| self.set_string(index, &token))
    }

    pub fn set_int(&mut self, index: usize, value: i64) -> bool {
        self.set_string(index, &value.to_string())
    }

    pub fn set_unsigned(&mut self, index: usize, value: u64) -> bool {
        self.set_string(index, &value.to_string())
    }

    /// Stage a new trailing group holding `values`.
    pub fn push_extensible_group_with(&mut self, values: &[&str]) -> ExtensibleGroup {
        let group_index = self.record.num_extensible_groups();
        let view = self
            .record
            .insert_group(group_index, &owned(values), false);

        if view.record().is_some() {
            let start = self.record.group_start(group_index);
            self.touched
                .extend(start..start + self.record.model().group_len());
        }

        view
    }

    /// Absolute indices written so far.
    #[must_use]
    pub const fn touched(&self) -> &BTreeSet<usize> {
        &self.touched
    }

    ///
    /// commit
    /// Validate every touched field once.
    ///
    pub fn commit(self) -> Result<(), ValidityReport> {
        let model = self.record.model();
        let mut report = ValidityReport::new(model.name.clone(), StrictnessLevel::Draft);

        for &index in &self.touched {
            let Some(field) = model.field_model(index) else {
                report.push(DataError::field(index, DataErrorKind::NoSchemaField));
                continue;
            };

            let token = &self.record.fields[index];
            if let Err(kind) = validate::check_value(field, token, self.record.resolver()) {
                report.push(DataError::field(index, kind));
            }
        }

        report.into_result()
    }
}

impl Drop for RecordEdit<'_> {
    fn drop(&mut self) {
        self.record.emit_change_signals();
    }
}
