use crate::model::{
    SchemaError,
    field::{FieldKind, FieldModel},
};
use serde::{Deserialize, Serialize};

///
/// ExtensiblePosition
/// Location of an absolute field index inside the extensible region.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExtensiblePosition {
    pub group: usize,
    pub field: usize,
}

///
/// ObjectModel
///
/// Field layout of one object type: a fixed prefix followed by zero or more
/// repetitions of the extensible group template.
///
/// Absolute index of field `f` in group `g` is
/// `fields.len() + g * extensible.len() + f`.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ObjectModel {
    /// Object type name, e.g. `Schedule:Week:Compact`.
    pub name: String,

    /// Fixed (non-extensible) fields in declaration order.
    pub fields: Vec<FieldModel>,

    /// Group template; empty when the type is not extensible.
    #[serde(default)]
    pub extensible: Vec<FieldModel>,

    /// Fixed index of the field holding the object's name.
    #[serde(default)]
    pub name_field: Option<usize>,

    /// Groups required for a record to pass final validation.
    #[serde(default)]
    pub min_groups: usize,

    /// Structural cap on group count.
    #[serde(default)]
    pub max_groups: Option<usize>,
}

impl ObjectModel {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            extensible: Vec::new(),
            name_field: None,
            min_groups: 0,
            max_groups: None,
        }
    }

    /// Append a fixed field.
    #[must_use]
    pub fn field(mut self, field: FieldModel) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a fixed text field and mark it as the name field.
    #[must_use]
    pub fn named(mut self, field_name: impl Into<String>) -> Self {
        self.name_field = Some(self.fields.len());
        self.fields.push(FieldModel::text(field_name));
        self
    }

    /// Append a field to the extensible group template.
    #[must_use]
    pub fn extensible_field(mut self, field: FieldModel) -> Self {
        self.extensible.push(field);
        self
    }

    #[must_use]
    pub const fn with_min_groups(mut self, min: usize) -> Self {
        self.min_groups = min;
        self
    }

    #[must_use]
    pub const fn with_max_groups(mut self, max: usize) -> Self {
        self.max_groups = Some(max);
        self
    }

    /// validate
    /// Check internal consistency before the model is handed to records.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyObjectName);
        }

        if let Some(index) = self.name_field {
            match self.fields.get(index) {
                Some(field) if field.kind == FieldKind::Text => {}
                _ => {
                    return Err(SchemaError::InvalidNameField {
                        object_type: self.name.clone(),
                        index,
                    });
                }
            }
        }

        if let Some(max) = self.max_groups {
            if self.extensible.is_empty() || max < self.min_groups {
                return Err(SchemaError::InvalidGroupLimits {
                    object_type: self.name.clone(),
                });
            }
        }

        if self.extensible.is_empty() && self.min_groups > 0 {
            return Err(SchemaError::InvalidGroupLimits {
                object_type: self.name.clone(),
            });
        }

        for field in self.fields.iter().chain(&self.extensible) {
            if field.kind == FieldKind::Choice && field.keys.is_empty() {
                return Err(SchemaError::ChoiceWithoutKeys {
                    object_type: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        Ok(())
    }

    ///
    /// LAYOUT
    ///

    /// Length of the fixed prefix.
    #[must_use]
    pub const fn fixed_len(&self) -> usize {
        self.fields.len()
    }

    /// Fields per extensible group (0 if the type is not extensible).
    #[must_use]
    pub const fn group_len(&self) -> usize {
        self.extensible.len()
    }

    #[must_use]
    pub const fn is_extensible(&self) -> bool {
        !self.extensible.is_empty()
    }

    #[must_use]
    pub const fn is_extensible_field(&self, index: usize) -> bool {
        self.is_extensible() && index >= self.fixed_len()
    }

    /// Map an absolute index into (group, field-in-group).
    #[must_use]
    pub const fn extensible_position(&self, index: usize) -> Option<ExtensiblePosition> {
        if !self.is_extensible_field(index) {
            return None;
        }

        let offset = index - self.fixed_len();
        let len = self.group_len();

        Some(ExtensiblePosition {
            group: offset / len,
            field: offset % len,
        })
    }

    /// Absolute index of `field` within `group`.
    #[must_use]
    pub const fn index_of(&self, group: usize, field: usize) -> Option<usize> {
        if field >= self.group_len() {
            return None;
        }

        Some(self.fixed_len() + group * self.group_len() + field)
    }

    /// Schema field for an absolute index; extensible indices repeat the
    /// template indefinitely.
    #[must_use]
    pub fn field_model(&self, index: usize) -> Option<&FieldModel> {
        match self.extensible_position(index) {
            Some(position) => self.extensible.get(position.field),
            None => self.fields.get(index),
        }
    }

    #[must_use]
    pub fn field_kind(&self, index: usize) -> Option<FieldKind> {
        self.field_model(index).map(|field| field.kind)
    }

    #[must_use]
    pub fn field_default(&self, index: usize) -> Option<&str> {
        self.field_model(index)
            .and_then(|field| field.default.as_deref())
    }

    #[must_use]
    pub fn is_reference_field(&self, index: usize) -> bool {
        self.field_model(index).is_some_and(FieldModel::is_reference)
    }

    #[must_use]
    pub const fn is_name_field(&self, index: usize) -> bool {
        matches!(self.name_field, Some(name) if name == index)
    }

    /// Same object type, compared case-insensitively.
    #[must_use]
    pub fn is_type(&self, object_type: &str) -> bool {
        self.name.eq_ignore_ascii_case(object_type)
    }
}

///
/// TESTS
///
