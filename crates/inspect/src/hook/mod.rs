//! Per-transaction body-data hooks.
//!
//! A transaction carries one optional hook registry per event kind
//! (request body data, response body data). The streaming parser invokes the
//! registry for every body chunk it decodes; callbacks run in registration
//! order and receive a [`BodyData`] view holding the transaction handle and
//! the chunk.
//!
//! Registries are created lazily on first registration and released with the
//! transaction. The registry owns only its bookkeeping; the callbacks are
//! plain function values with no resource of their own.

use std::cell::RefCell;
use std::fmt;

use bytes::Bytes;

use crate::error::HookError;
use crate::transaction::Tx;

/// The data view handed to a body-data callback.
pub struct BodyData {
    tx: Tx,
    chunk: Option<Bytes>,
}

impl BodyData {
    pub(crate) fn new(tx: Tx, chunk: Option<Bytes>) -> Self {
        Self { tx, chunk }
    }

    /// The transaction whose body produced this data.
    pub fn tx(&self) -> &Tx {
        &self.tx
    }

    /// The body chunk, or `None` on the final call for this body.
    pub fn chunk(&self) -> Option<&Bytes> {
        self.chunk.as_ref()
    }
}

impl fmt::Debug for BodyData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyData")
            .field("tx", &self.tx.id())
            .field("chunk_len", &self.chunk.as_ref().map(Bytes::len))
            .finish()
    }
}

/// Callback signature for body-data hooks.
pub type DataHookFn = Box<dyn Fn(&BodyData) -> Result<(), HookError>>;

/// An ordered list of callbacks for one event kind.
#[derive(Default)]
pub struct DataHook {
    callbacks: RefCell<Vec<DataHookFn>>,
}

impl DataHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a callback.
    ///
    /// Registration order is preserved and duplicates are allowed.
    /// Registering from inside a running callback of the same registry is
    /// not supported.
    pub fn register(&self, callback: DataHookFn) {
        self.callbacks.borrow_mut().push(callback);
    }

    pub fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.borrow().is_empty()
    }

    /// Runs every callback in registration order with the same data view.
    ///
    /// The first callback error stops the run and is returned. A callback
    /// may destroy the transaction carried by `data`; the run finishes on
    /// the registry handle the caller holds.
    pub fn run(&self, data: &BodyData) -> Result<(), HookError> {
        let callbacks = self.callbacks.borrow();
        for callback in callbacks.iter() {
            callback(data)?;
        }
        Ok(())
    }
}

impl fmt::Debug for DataHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataHook").field("callbacks", &self.len()).finish()
    }
}
