use serde::{Deserialize, Serialize};

///
/// FieldKind
///
/// Semantic type of one field slot.
/// Storage is always a string token; the kind only drives conversion,
/// validation, and reference resolution.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum FieldKind {
    Text,
    Real,
    Integer,
    ObjectReference,
    Choice,
}

impl FieldKind {
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Real | Self::Integer)
    }
}

///
/// Bound
///

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub enum Bound {
    Inclusive(f64),
    Exclusive(f64),
}

impl Bound {
    fn admits_above(self, value: f64) -> bool {
        match self {
            Self::Inclusive(min) => value >= min,
            Self::Exclusive(min) => value > min,
        }
    }

    fn admits_below(self, value: f64) -> bool {
        match self {
            Self::Inclusive(max) => value <= max,
            Self::Exclusive(max) => value < max,
        }
    }
}

///
/// FieldModel
/// Schema metadata for one field, fixed or extensible.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FieldModel {
    pub name: String,
    pub kind: FieldKind,

    #[serde(default)]
    pub default: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub autosizable: bool,

    #[serde(default)]
    pub autocalculatable: bool,

    #[serde(default)]
    pub min: Option<Bound>,

    #[serde(default)]
    pub max: Option<Bound>,

    /// Accepted keys for `Choice` fields, compared case-insensitively.
    #[serde(default)]
    pub keys: Vec<String>,

    #[serde(default)]
    pub units: Option<String>,
}

impl FieldModel {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            required: false,
            autosizable: false,
            autocalculatable: false,
            min: None,
            max: None,
            keys: Vec::new(),
            units: None,
        }
    }

    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    #[must_use]
    pub fn real(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Real)
    }

    #[must_use]
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::ObjectReference)
    }

    #[must_use]
    pub fn choice<I, S>(name: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            ..Self::new(name, FieldKind::Choice)
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub const fn autosizable(mut self) -> Self {
        self.autosizable = true;
        self
    }

    #[must_use]
    pub const fn autocalculatable(mut self) -> Self {
        self.autocalculatable = true;
        self
    }

    #[must_use]
    pub const fn with_min(mut self, bound: Bound) -> Self {
        self.min = Some(bound);
        self
    }

    #[must_use]
    pub const fn with_max(mut self, bound: Bound) -> Self {
        self.max = Some(bound);
        self
    }

    #[must_use]
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self.kind, FieldKind::ObjectReference)
    }

    /// Case-insensitive key membership for choice fields.
    #[must_use]
    pub fn has_key(&self, value: &str) -> bool {
        self.keys.iter().any(|key| key.eq_ignore_ascii_case(value))
    }

    /// True when `value` is `autosize` or `autocalculate` and the field
    /// accepts either keyword.
    #[must_use]
    pub fn accepts_auto_keyword(&self, value: &str) -> bool {
        let is_keyword =
            value.eq_ignore_ascii_case("autosize") || value.eq_ignore_ascii_case("autocalculate");

        is_keyword && (self.autosizable || self.autocalculatable)
    }

    #[must_use]
    pub fn within_bounds(&self, value: f64) -> bool {
        self.min.is_none_or(|min| min.admits_above(value))
            && self.max.is_none_or(|max| max.admits_below(value))
    }
}

///
/// TESTS
///
