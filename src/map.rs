//! Ordered field map for document maps.
//!
//! [`DocMap`] wraps an [`IndexMap`] so that fields serialize in the order they
//! were first written. Re-inserting an existing field replaces its value but
//! keeps the field where it was, which makes the rendered output of a writer
//! depend only on the sequence of first writes per field.
//!
//! ## Examples
//!
//! ```rust
//! use typed_doc::{DocMap, Value};
//!
//! let mut map = DocMap::new();
//! map.insert("a".to_string(), Value::from(1i64));
//! map.insert("b".to_string(), Value::from(2i64));
//! map.insert("a".to_string(), Value::from(3i64));
//!
//! let keys: Vec<_> = map.keys().cloned().collect();
//! assert_eq!(keys, vec!["a", "b"]);
//! assert_eq!(map.get("a"), Some(&Value::Long(3)));
//! ```

use crate::Value;
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// An insertion-ordered map of field names to document values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocMap(IndexMap<String, Value>);

impl DocMap {
    #[must_use]
    pub fn new() -> Self {
        DocMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        DocMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a field, returning the previous value if the name was present.
    ///
    /// An existing field keeps its position; only its value changes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_doc::{DocMap, Value};
    ///
    /// let mut map = DocMap::new();
    /// assert!(map.insert("key".to_string(), Value::from(42i64)).is_none());
    /// assert_eq!(map.insert("key".to_string(), Value::from(43i64)), Some(Value::Long(42)));
    /// ```
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the position of a field in insertion order.
    #[must_use]
    pub fn position(&self, key: &str) -> Option<usize> {
        self.0.get_index_of(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the field names, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the fields, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl IntoIterator for DocMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DocMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for DocMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        DocMap(IndexMap::from_iter(iter))
    }
}

impl Serialize for DocMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
