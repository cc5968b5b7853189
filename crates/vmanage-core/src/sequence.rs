//! Typed result collections.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Ordered collection returned by list endpoints.
///
/// Serializes as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSequence<T> {
    items: Vec<T>,
}

impl<T> DataSequence<T> {
    /// Wrap an existing vector.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// First element, if any.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// The only element, `None` when empty or when more than one element is present.
    #[must_use]
    pub fn single_or_default(&self) -> Option<&T> {
        match self.items.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Keep the elements matching `predicate`.
    #[must_use]
    pub fn filter<P>(self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        Self {
            items: self.items.into_iter().filter(|item| predicate(item)).collect(),
        }
    }

    /// Unwrap into the inner vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for DataSequence<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Deref for DataSequence<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T> From<Vec<T>> for DataSequence<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for DataSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for DataSequence<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a DataSequence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
