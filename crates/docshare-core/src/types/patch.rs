//! Tri-state field for partial updates.
//!
//! `Option<T>` cannot tell "leave the field alone" apart from "clear the
//! field". [`Patch`] keeps the two apart:
//!
//! | JSON input          | Value            |
//! |---------------------|------------------|
//! | key absent          | `Patch::Keep`    |
//! | `"key": null`       | `Patch::Clear`   |
//! | `"key": <value>`    | `Patch::Set(v)`  |
//!
//! Fields must carry `#[serde(default)]` for the absent case to become
//! `Keep`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A partial-update instruction for a nullable field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// Leave the current value unchanged.
    #[default]
    Keep,
    /// Remove the current value.
    Clear,
    /// Replace the current value.
    Set(T),
}

impl<T> Patch<T> {
    /// Build a patch from a value that is always supplied, where `None`
    /// means clear.
    pub fn from_nullable(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Set(v),
            None => Self::Clear,
        }
    }

    /// Resolve the patch against the current value.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Keep => current,
            Self::Clear => None,
            Self::Set(v) => Some(v),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from_nullable)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Set(v) => serializer.serialize_some(v),
            Self::Keep | Self::Clear => serializer.serialize_none(),
        }
    }
}
