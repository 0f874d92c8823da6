//! Ordered key/value table primitive.
//!
//! Inspection collections (headers, parameters, cookies) preserve wire order
//! and allow duplicate keys, so they are backed by an insertion-ordered
//! multimap rather than a hash map. Keys compare ASCII case-insensitively,
//! matching header and parameter lookup semantics.

use bytes::Bytes;

use crate::error::AllocError;

/// An insertion-ordered multimap with case-insensitive byte-string keys.
#[derive(Debug, Default)]
pub struct Table<V> {
    entries: Vec<(Bytes, V)>,
}

impl<V> Table<V> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Creates an empty table with space reserved for `capacity` entries.
    ///
    /// Reservation is fallible so that callers building many tables at once
    /// can surface allocation failure instead of aborting.
    pub fn with_capacity(capacity: usize) -> Result<Self, AllocError> {
        let mut entries = Vec::new();
        entries.try_reserve(capacity)?;
        Ok(Self { entries })
    }

    /// Appends an entry. Existing entries with the same key are kept.
    pub fn add(&mut self, key: Bytes, value: V) {
        self.entries.push((key, value));
    }

    /// Returns the first value whose key matches `key`, ignoring ASCII case.
    pub fn get(&self, key: &[u8]) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)).map(|(_, v)| v)
    }

    /// Returns the entry at `index` in insertion order.
    pub fn get_index(&self, index: usize) -> Option<(&Bytes, &V)> {
        self.entries.get(index).map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Bytes, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl<'a, V> IntoIterator for &'a Table<V> {
    type Item = &'a (Bytes, V);
    type IntoIter = std::slice::Iter<'a, (Bytes, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_ascii_case() {
        let mut table = Table::new();
        table.add(Bytes::from_static(b"Content-Type"), Bytes::from_static(b"text/html"));

        assert_eq!(table.get(b"content-type"), Some(&Bytes::from_static(b"text/html")));
        assert_eq!(table.get(b"CONTENT-TYPE"), Some(&Bytes::from_static(b"text/html")));
        assert_eq!(table.get(b"content-length"), None);
    }

    #[test]
    fn duplicate_keys_preserve_order() {
        let mut table = Table::new();
        table.add(Bytes::from_static(b"a"), 1);
        table.add(Bytes::from_static(b"b"), 2);
        table.add(Bytes::from_static(b"a"), 3);

        assert_eq!(table.len(), 3);
        // first match wins for lookup
        assert_eq!(table.get(b"a"), Some(&1));

        let values: Vec<i32> = table.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn with_capacity_rejects_absurd_reservation() {
        assert!(Table::<Bytes>::with_capacity(usize::MAX).is_err());
        assert!(Table::<Bytes>::with_capacity(32).is_ok());
    }

    #[test]
    fn get_index_follows_insertion_order() {
        let mut table = Table::new();
        table.add(Bytes::from_static(b"x"), 10);
        table.add(Bytes::from_static(b"y"), 20);

        let (key, value) = table.get_index(1).unwrap();
        assert_eq!(key, &Bytes::from_static(b"y"));
        assert_eq!(value, &20);
        assert!(table.get_index(2).is_none());
    }
}
