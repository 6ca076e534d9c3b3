//! Optional values with an explicit "not available" sentinel.
//!
//! Manifests are frequently incomplete, so every extracted field may be
//! missing. Consumers of an analysis expect every key to be present, so a
//! missing value is carried as [`Field::NotAvailable`] and rendered as
//! [`NOT_AVAILABLE`] instead of being omitted.

use serde::{Serialize, Serializer};
use std::fmt;

/// Text shown and serialized for a missing value.
pub const NOT_AVAILABLE: &str = "N/A";

/// A value extracted from a manifest, or the "not available" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field<T> {
    /// The value was found in the manifest
    Present(T),
    /// The node or attribute was absent or empty
    NotAvailable,
}

impl<T> Field<T> {
    /// Check whether a value is present.
    #[inline]
    pub fn is_available(&self) -> bool {
        matches!(self, Field::Present(_))
    }

    /// Borrow the value, if present.
    #[inline]
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Field::Present(value) => Some(value),
            Field::NotAvailable => None,
        }
    }

    /// Convert into a standard `Option`.
    #[inline]
    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Present(value) => Some(value),
            Field::NotAvailable => None,
        }
    }

    /// Map the contained value.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Field<U> {
        match self {
            Field::Present(value) => Field::Present(f(value)),
            Field::NotAvailable => Field::NotAvailable,
        }
    }

    /// Return the value or the given fallback.
    #[inline]
    pub fn unwrap_or(self, fallback: T) -> T {
        self.into_option().unwrap_or(fallback)
    }
}

impl Field<String> {
    /// Build a text field, treating empty or whitespace-only text as missing.
    ///
    /// Surrounding whitespace is trimmed.
    pub fn text(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(text) if !text.is_empty() => Field::Present(text.to_string()),
            _ => Field::NotAvailable,
        }
    }

    /// Borrow the text, or the sentinel when missing.
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            Field::Present(value) => value.as_str(),
            Field::NotAvailable => NOT_AVAILABLE,
        }
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::NotAvailable
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Field::Present(value),
            None => Field::NotAvailable,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Present(value) => value.fmt(f),
            Field::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Field::Present(value) => value.serialize(serializer),
            Field::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}
