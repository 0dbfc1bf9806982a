pub(crate) mod generator;

use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize, Serializer, de::Deserializer};
use std::str::FromStr;
use thiserror::Error as ThisError;
use ulid::Ulid;

///
/// HandleError
///

#[derive(Debug, ThisError)]
pub enum HandleError {
    #[error("invalid handle string")]
    InvalidString,

    #[error("monotonic error - overflow")]
    GeneratorOverflow,
}

///
/// Handle
///
/// Stable identity of one record.
/// Reference fields store the handle text, so it must never change for the
/// lifetime of the record it names.
///

#[derive(Clone, Copy, Debug, Deref, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Handle(Ulid);

impl Handle {
    #[must_use]
    pub const fn nil() -> Self {
        Self(Ulid::nil())
    }

    #[must_use]
    pub const fn from_parts(timestamp_ms: u64, random: u128) -> Self {
        Self(Ulid::from_parts(timestamp_ms, random))
    }

    /// generate
    /// Generate a handle from the process-wide monotonic generator.
    /// On overflow the handle is drawn fresh, so it is never nil.
    #[must_use]
    pub fn generate() -> Self {
        generator::generate_or_fresh()
    }

    /// try_generate
    /// Monotonic generation that reports overflow instead of drawing fresh.
    pub fn try_generate() -> Result<Self, HandleError> {
        generator::generate()
    }

    /// Monotonic increment; returns `None` on overflow.
    #[must_use]
    pub fn increment(&self) -> Option<Self> {
        self.0.increment().map(Self)
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0 == Ulid::nil()
    }

    /// parse
    /// Parse the canonical 26-character text form.
    pub fn parse(text: &str) -> Result<Self, HandleError> {
        Ulid::from_string(text)
            .map(Self)
            .map_err(|_| HandleError::InvalidString)
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::nil()
    }
}

impl From<Ulid> for Handle {
    fn from(ulid: Ulid) -> Self {
        Self(ulid)
    }
}

impl FromStr for Handle {
    type Err = HandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ulid's serde impls sit behind its `serde` feature, which stays off here.
impl Serialize for Handle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Handle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;

        Self::parse(&text).map_err(|_| serde::de::Error::custom("invalid handle string"))
    }
}

///
/// TESTS
///
