//! Module: validate
//! Responsibility: schema-level validity of single values and whole records.
//! Does not own: field storage or write policy (see `record`).
//!
//! Validation never fails at the traversal level. Every issue is collected
//! into a `ValidityReport` and the caller decides what to do with it.


use crate::{
    model::{FieldKind, FieldModel, ObjectModel},
    record::convert,
    traits::ReferenceResolver,
};
use derive_more::Deref;
use std::fmt;
use thiserror::Error as ThisError;

///
/// StrictnessLevel
///

#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub enum StrictnessLevel {
    /// Accept anything.
    None,

    /// Types, bounds, and reference targets.
    #[default]
    Draft,

    /// Draft plus required fields and the minimum group count.
    Final,
}

///
/// DataErrorKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DataErrorKind {
    NoSchemaField,
    DataType,
    NumericBound,
    NullAndRequired,
    NumberOfGroups,
    DanglingReference,
}

impl fmt::Display for DataErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NoSchemaField => "no schema field",
            Self::DataType => "data type",
            Self::NumericBound => "numeric bound",
            Self::NullAndRequired => "required field is empty",
            Self::NumberOfGroups => "number of extensible groups",
            Self::DanglingReference => "dangling reference",
        };
        write!(f, "{label}")
    }
}

///
/// DataError
/// One validity issue; `index` is `None` for object-level issues.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DataError {
    pub index: Option<usize>,
    pub kind: DataErrorKind,
}

impl DataError {
    #[must_use]
    pub const fn field(index: usize, kind: DataErrorKind) -> Self {
        Self {
            index: Some(index),
            kind,
        }
    }

    #[must_use]
    pub const fn object(kind: DataErrorKind) -> Self {
        Self { index: None, kind }
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "field {index}: {}", self.kind),
            None => write!(f, "object: {}", self.kind),
        }
    }
}

///
/// ValidityReport
///

#[derive(Clone, Debug, Default, Deref, Eq, PartialEq, ThisError)]
#[error("{} validity issue(s) for {object_type}", .errors.len())]
pub struct ValidityReport {
    pub object_type: String,
    pub level: StrictnessLevel,

    #[deref]
    pub errors: Vec<DataError>,
}

impl ValidityReport {
    #[must_use]
    pub fn new(object_type: impl Into<String>, level: StrictnessLevel) -> Self {
        Self {
            object_type: object_type.into(),
            level,
            errors: Vec::new(),
        }
    }

    pub fn push(&mut self, error: DataError) {
        self.errors.push(error);
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Issues attached to one absolute field index.
    pub fn for_field(&self, index: usize) -> impl Iterator<Item = &DataError> {
        self.errors
            .iter()
            .filter(move |error| error.index == Some(index))
    }

    /// Convert into a `Result`, keeping the report as the error payload.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_valid() { Ok(()) } else { Err(self) }
    }
}

///
/// check_value
/// Draft-level check of one raw token against its field.
///
/// Empty values always pass here; required-ness is a final-level concern.
///
pub fn check_value(
    field: &FieldModel,
    token: &str,
    resolver: Option<&dyn ReferenceResolver>,
) -> Result<(), DataErrorKind> {
    if token.is_empty() {
        return Ok(());
    }

    match field.kind {
        FieldKind::Text => Ok(()),
        FieldKind::Choice => {
            if field.has_key(token) {
                Ok(())
            } else {
                Err(DataErrorKind::DataType)
            }
        }
        FieldKind::Real | FieldKind::Integer => check_numeric(field, token),
        FieldKind::ObjectReference => match resolver {
            Some(resolver) if resolver.resolve(token).is_none() => {
                Err(DataErrorKind::DanglingReference)
            }
            _ => Ok(()),
        },
    }
}

fn check_numeric(field: &FieldModel, token: &str) -> Result<(), DataErrorKind> {
    if convert::is_auto_keyword(token) {
        return if field.accepts_auto_keyword(token) {
            Ok(())
        } else {
            Err(DataErrorKind::DataType)
        };
    }

    let value = convert::parse_double(token).ok_or(DataErrorKind::DataType)?;
    if field.kind == FieldKind::Integer && value.fract() != 0.0 {
        return Err(DataErrorKind::DataType);
    }

    if field.within_bounds(value) {
        Ok(())
    } else {
        Err(DataErrorKind::NumericBound)
    }
}

///
/// validate_fields
/// Build a report over raw tokens laid out per `model`.
///
pub(crate) fn validate_fields(
    model: &ObjectModel,
    tokens: &[String],
    resolver: Option<&dyn ReferenceResolver>,
    level: StrictnessLevel,
) -> ValidityReport {
    let mut report = ValidityReport::new(model.name.clone(), level);
    if level == StrictnessLevel::None {
        return report;
    }

    for (index, token) in tokens.iter().enumerate() {
        let Some(field) = model.field_model(index) else {
            report.push(DataError::field(index, DataErrorKind::NoSchemaField));
            continue;
        };

        if let Err(kind) = check_value(field, token, resolver) {
            report.push(DataError::field(index, kind));
            continue;
        }

        if level == StrictnessLevel::Final && field.required && token.is_empty() {
            report.push(DataError::field(index, DataErrorKind::NullAndRequired));
        }
    }

    if level == StrictnessLevel::Final && model.is_extensible() {
        let groups = tokens.len().saturating_sub(model.fixed_len()) / model.group_len();
        let too_many = model.max_groups.is_some_and(|max| groups > max);

        if groups < model.min_groups || too_many {
            report.push(DataError::object(DataErrorKind::NumberOfGroups));
        }
    }

    report
}
