use std::collections::HashMap;
use std::collections::hash_map;

use crate::value::FromIniValue;

/// A named group of `key = value` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: HashMap<String, String>,
}

impl Section {
    #[must_use]
    pub(crate) fn new(name: String, capacity: usize) -> Self {
        Self {
            name,
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// The trimmed text between the brackets of the header, or `""` for the implicit section.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw (trimmed, comment-stripped) value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Converts the value stored for `key` into `T`, or returns `default`.
    ///
    /// See [`Ini::read`](crate::Ini::read) for the conversion rules.
    #[must_use]
    pub fn read<T: FromIniValue>(&self, key: &str, default: T) -> T {
        self.read_with(key, default, false)
    }

    /// Same as [`Section::read`], lowercasing text values when `fold_case` is set.
    #[must_use]
    pub fn read_with<T: FromIniValue>(&self, key: &str, default: T, fold_case: bool) -> T {
        match self.get(key) {
            Some(raw) => T::from_ini_value(raw, fold_case).unwrap_or(default),
            None => default,
        }
    }

    /// Iterates over `(key, raw value)` pairs in unspecified order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Last write wins.
    pub(crate) fn insert(&mut self, key: String, value: String) {
        self.entries.insert(key, value);
    }
}

/// Iterator over the entries of a [`Section`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: hash_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Section {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
