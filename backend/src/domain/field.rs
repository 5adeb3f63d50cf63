//! Presence-aware wrapper for partially supplied payload fields.
//!
//! JSON bodies distinguish three states for a key: missing, `null`, and a
//! value. Plain `Option<T>` folds the first two together, which loses the
//! difference between "leave this column alone" and "clear this column".

use serde::{Deserialize, Deserializer};

/// A payload field that may be absent, explicitly null, or present.
///
/// Mark struct fields with `#[serde(default)]` so a missing key becomes
/// [`Field::Absent`]; a JSON `null` deserialises to [`Field::Null`].
///
/// # Examples
/// ```
/// use product_service::domain::Field;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Patch {
///     #[serde(default)]
///     unit: Field<String>,
/// }
///
/// let missing: Patch = serde_json::from_str("{}").expect("valid JSON");
/// let cleared: Patch = serde_json::from_str(r#"{"unit":null}"#).expect("valid JSON");
/// assert!(missing.unit.is_absent());
/// assert_eq!(cleared.unit, Field::Null);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    /// The key was not supplied.
    Absent,
    /// The key was supplied with `null`.
    Null,
    /// The key was supplied with a value.
    Present(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Field<T> {
    /// Whether the key was missing from the payload.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Borrow the supplied value, if any.
    pub fn as_present(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }

    /// Borrowing view of the field.
    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Self::Absent => Field::Absent,
            Self::Null => Field::Null,
            Self::Present(value) => Field::Present(value),
        }
    }

    /// Transform a present value, keeping absent and null as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Self::Absent => Field::Absent,
            Self::Null => Field::Null,
            Self::Present(value) => Field::Present(f(value)),
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Present)
    }
}

impl<'de, T> Deserialize<'de> for Field<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}
