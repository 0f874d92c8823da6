//! Connection-side transaction tracking and the parser's active slot.
//!
//! A [`Connection`] keeps the list of transactions currently alive on one
//! inspected connection; the streaming parser registers a transaction after
//! creating it and the destruction protocol deregisters it. A
//! [`ParserContext`] models the parser's single mutable "currently active
//! transaction" slot, which destruction clears so the parser never observes a
//! destroyed transaction when control returns to it.
//!
//! Both structures are deliberately weak from the transaction's point of
//! view: they track [`TxId`]s, not owning references, so a stale entry can
//! never keep a transaction alive or be dereferenced after its release.

use std::cell::{Cell, RefCell};

use tracing::trace;

/// Identifier of one transaction within its owning connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxId(u64);

/// A connection's view of its live transactions.
#[derive(Debug, Default)]
pub struct Connection {
    next_id: Cell<u64>,
    transactions: RefCell<Vec<TxId>>,
}

impl Connection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the identifier for the next transaction created on this
    /// connection. Allocating an id does not register the transaction.
    pub(crate) fn next_tx_id(&self) -> TxId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        TxId(id)
    }

    /// Adds a transaction to this connection's tracking list.
    pub fn register_transaction(&self, id: TxId) {
        self.transactions.borrow_mut().push(id);
        trace!(?id, "transaction registered with connection");
    }

    /// Removes a transaction from the tracking list.
    ///
    /// Removing an id that is not tracked is a no-op, so the destruction
    /// protocol may notify an already-detached connection safely.
    pub fn remove_transaction(&self, id: TxId) {
        self.transactions.borrow_mut().retain(|tracked| *tracked != id);
        trace!(?id, "transaction removed from connection");
    }

    /// Returns whether `id` is currently tracked.
    pub fn contains(&self, id: TxId) -> bool {
        self.transactions.borrow().contains(&id)
    }

    /// Number of transactions currently tracked.
    pub fn transaction_count(&self) -> usize {
        self.transactions.borrow().len()
    }
}

/// The external parser's single "currently active transaction" slot.
///
/// The parser points this slot at the transaction whose output it is
/// processing. Destruction clears the slot when it designates the
/// transaction being destroyed, which is what makes it safe to destroy a
/// transaction from inside a hook callback that transaction is invoking:
/// when control returns to the parser, the slot reads as absent.
#[derive(Debug, Default)]
pub struct ParserContext {
    active: Cell<Option<TxId>>,
}

impl ParserContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points the slot at `id`.
    pub fn set_active(&self, id: TxId) {
        self.active.set(Some(id));
    }

    /// The transaction currently designated, if any.
    pub fn active(&self) -> Option<TxId> {
        self.active.get()
    }

    /// Clears the slot, but only if it currently designates `id`.
    ///
    /// Clearing a slot that designates another transaction, or nothing,
    /// is a no-op.
    pub fn clear_active(&self, id: TxId) {
        if self.active.get() == Some(id) {
            self.active.set(None);
            trace!(?id, "active transaction slot cleared");
        }
    }
}
