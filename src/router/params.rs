//! Path parameters produced by a single lookup.
//!
//! Param names use `Arc<str>` shared with the tree (an O(1) clone per match)
//! while values are owned per-request data cut from the URL. Storage is a
//! `SmallVec`, so routes with up to [`MAX_INLINE_PARAMS`] wildcards never
//! touch the heap for the container itself.

use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum number of parameters stored inline before spilling to the heap.
pub const MAX_INLINE_PARAMS: usize = 8;

/// A single URL parameter: the wildcard name and the matched value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub key: Arc<str>,
    pub value: String,
}

/// Ordered parameters of one match. The first wildcard in the path is the
/// first entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: SmallVec<[Param; MAX_INLINE_PARAMS]>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer able to hold `capacity` parameters.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: SmallVec::with_capacity(capacity),
        }
    }

    /// Value of the first parameter called `name`.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|p| p.key.as_ref() == name)
            .map(|p| p.value.as_str())
    }

    /// Like [`Params::get`], but returns an empty string for a missing name.
    #[inline]
    #[must_use]
    pub fn by_name(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.inner.iter()
    }

    /// Empties the buffer, keeping its capacity for the next lookup.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Converts to `(name, value)` pairs.
    /// Note: this allocates; prefer [`Params::get`] on hot paths.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.inner
            .iter()
            .map(|p| (p.key.to_string(), p.value.clone()))
            .collect()
    }

    #[inline]
    pub(crate) fn push(&mut self, key: &Arc<str>, value: &str) {
        self.inner.push(Param {
            key: Arc::clone(key),
            value: value.to_owned(),
        });
    }

    #[inline]
    pub(crate) fn truncate(&mut self, len: usize) {
        self.inner.truncate(len);
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
