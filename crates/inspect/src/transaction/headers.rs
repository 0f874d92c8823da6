//! Header records and the collections that own them.
//!
//! A [`HeaderTable`] is the single owner of every parsed [`Header`] for one
//! message side. Raw wire lines are kept separately as [`HeaderLine`]s; a
//! line points back at its parsed header through a [`HeaderId`] index, so
//! releasing the line sequence can never release a header. Headers are
//! released exactly once, when their table drops.

use bytes::Bytes;

use crate::error::AllocError;
use crate::table::Table;

/// A parsed header name/value pair.
#[derive(Debug)]
pub struct Header {
    pub name: Bytes,
    pub value: Bytes,
}

impl Header {
    pub fn new(name: Bytes, value: Bytes) -> Self {
        Self { name, value }
    }
}

/// Non-owning handle to a [`Header`] inside its owning [`HeaderTable`].
///
/// An index, not a reference: a `HeaderId` supports lookup but confers no
/// release responsibility, and dropping one is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderId(usize);

/// The single owner of all parsed [`Header`] records for one message side.
#[derive(Debug)]
pub struct HeaderTable {
    inner: Table<Header>,
}

impl HeaderTable {
    pub fn with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Ok(Self { inner: Table::with_capacity(capacity)? })
    }

    /// Takes ownership of `header` and returns the handle for it.
    pub fn add(&mut self, header: Header) -> HeaderId {
        let id = HeaderId(self.inner.len());
        let name = header.name.clone();
        self.inner.add(name, header);
        id
    }

    /// Returns the first header whose name matches, ignoring ASCII case.
    pub fn get(&self, name: &[u8]) -> Option<&Header> {
        self.inner.get(name)
    }

    /// Resolves a handle previously returned by [`HeaderTable::add`].
    pub fn resolve(&self, id: HeaderId) -> Option<&Header> {
        self.inner.get_index(id.0).map(|(_, header)| header)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates headers in wire order.
    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.inner.iter().map(|(_, header)| header)
    }
}

/// One raw header line as it appeared on the wire.
///
/// `line` is owned; `header` borrows the parsed record from the header
/// table. Lines for folded continuations or unparsable input carry no
/// header at all.
#[derive(Debug)]
pub struct HeaderLine {
    pub line: Bytes,
    pub header: Option<HeaderId>,
}

impl HeaderLine {
    pub fn new(line: Bytes, header: Option<HeaderId>) -> Self {
        Self { line, header }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_lookup() {
        let mut headers = HeaderTable::with_capacity(4).unwrap();
        headers.add(Header::new(Bytes::from_static(b"Host"), Bytes::from_static(b"example.com")));

        let header = headers.get(b"host").unwrap();
        assert_eq!(header.value, Bytes::from_static(b"example.com"));
        assert!(headers.get(b"cookie").is_none());
    }

    #[test]
    fn resolve_returns_the_added_header() {
        let mut headers = HeaderTable::with_capacity(4).unwrap();
        let host = headers.add(Header::new(Bytes::from_static(b"Host"), Bytes::from_static(b"a")));
        let agent = headers.add(Header::new(Bytes::from_static(b"User-Agent"), Bytes::from_static(b"b")));

        assert_eq!(headers.resolve(host).unwrap().name, Bytes::from_static(b"Host"));
        assert_eq!(headers.resolve(agent).unwrap().name, Bytes::from_static(b"User-Agent"));
    }

    #[test]
    fn lines_survive_independently_of_their_header_handles() {
        let mut headers = HeaderTable::with_capacity(4).unwrap();
        let id = headers.add(Header::new(Bytes::from_static(b"Host"), Bytes::from_static(b"a")));

        let lines = vec![
            HeaderLine::new(Bytes::from_static(b"Host: a\r\n"), Some(id)),
            HeaderLine::new(Bytes::from_static(b"X-Broken\r\n"), None),
        ];

        // dropping the raw lines releases only the lines themselves
        drop(lines);
        assert_eq!(headers.resolve(id).unwrap().value, Bytes::from_static(b"a"));
    }
}
