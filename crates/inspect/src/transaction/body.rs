//! Opaque body-parser state owned by a transaction.
//!
//! The URL-encoded and multipart parsers live in the parsing layer; the
//! lifecycle core only owns their per-transaction state and guarantees it is
//! released exactly once, with the transaction, whatever point parsing had
//! reached. Both tolerate being dropped with partial state.

use bytes::Bytes;
use tracing::trace;

use crate::table::Table;

/// Per-transaction state of the URL-encoded parameter parser.
#[derive(Debug, Default)]
pub struct UrlencodedParser {
    params: Table<Bytes>,
    pending: Option<Bytes>,
    complete: bool,
}

impl UrlencodedParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters decoded so far, in wire order.
    pub fn params(&self) -> &Table<Bytes> {
        &self.params
    }

    /// Records one decoded parameter.
    pub fn add_param(&mut self, name: Bytes, value: Bytes) {
        self.params.add(name, value);
    }

    /// Buffers an incomplete trailing field between chunks.
    pub fn set_pending(&mut self, pending: Option<Bytes>) {
        self.pending = pending;
    }

    /// Marks the input as fully consumed.
    pub fn finalize(&mut self) {
        self.pending = None;
        self.complete = true;
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

impl Drop for UrlencodedParser {
    fn drop(&mut self) {
        trace!(params = self.params.len(), complete = self.complete, "urlencoded parser state released");
    }
}

/// Per-transaction state of the multipart body parser.
#[derive(Debug)]
pub struct MultipartParser {
    boundary: Bytes,
    parts_seen: usize,
    pending: Option<Bytes>,
}

impl MultipartParser {
    pub fn new(boundary: Bytes) -> Self {
        Self { boundary, parts_seen: 0, pending: None }
    }

    pub fn boundary(&self) -> &Bytes {
        &self.boundary
    }

    /// Records one completed part.
    pub fn add_part(&mut self) {
        self.parts_seen += 1;
    }

    pub fn parts_seen(&self) -> usize {
        self.parts_seen
    }

    /// Buffers bytes that straddle a chunk boundary.
    pub fn set_pending(&mut self, pending: Option<Bytes>) {
        self.pending = pending;
    }
}

impl Drop for MultipartParser {
    fn drop(&mut self) {
        trace!(parts = self.parts_seen, "multipart parser state released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencoded_state_accumulates_params() {
        let mut urlenp = UrlencodedParser::new();
        urlenp.add_param(Bytes::from_static(b"a"), Bytes::from_static(b"1"));
        urlenp.set_pending(Some(Bytes::from_static(b"b=")));

        assert_eq!(urlenp.params().len(), 1);
        assert!(!urlenp.is_complete());

        urlenp.finalize();
        assert!(urlenp.is_complete());
    }

    #[test]
    fn multipart_state_tolerates_partial_input() {
        let mut mpartp = MultipartParser::new(Bytes::from_static(b"----boundary"));
        mpartp.add_part();
        mpartp.set_pending(Some(Bytes::from_static(b"--")));

        assert_eq!(mpartp.parts_seen(), 1);
        assert_eq!(mpartp.boundary(), &Bytes::from_static(b"----boundary"));
        // dropped here with pending bytes still buffered
    }
}
