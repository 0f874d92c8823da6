//! Transaction lifecycle core for a streaming protocol-inspection engine
//!
//! This crate provides the data model and lifecycle protocol for a single
//! inspected request/response exchange (a *transaction*). A transaction
//! aggregates many independently-populated sub-structures — header
//! collections, a parsed URI, parameter tables, body-parser state,
//! per-transaction event hooks — that an external streaming parser fills in
//! incrementally as bytes arrive, and that must be released exactly once, in
//! a safe order, even when release is triggered from inside a callback the
//! transaction itself invoked.
//!
//! # Features
//!
//! - Incremental, field-by-field population by an external parser
//! - Single-owner release of every aggregated sub-structure
//! - Non-owning back-references (connection, active-parser slot) that can
//!   never dangle
//! - Tagged value ownership for parameter tables shared with another owner
//! - Per-transaction body-data hooks with ordered, repeatable invocation
//! - Destruction that is safe to trigger from inside a running hook callback
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use std::sync::Arc;
//!
//! use bytes::Bytes;
//! use tracing::Level;
//! use tracing_subscriber::FmtSubscriber;
//!
//! use micro_inspect::config::Config;
//! use micro_inspect::connection::{Connection, ParserContext};
//! use micro_inspect::transaction::Transaction;
//!
//! // Initialize logging
//! let subscriber = FmtSubscriber::builder()
//!     .with_max_level(Level::WARN)
//!     .finish();
//! tracing::subscriber::set_global_default(subscriber)
//!     .expect("setting default subscriber failed");
//!
//! let cfg = Arc::new(Config::default());
//! let conn = Rc::new(Connection::new());
//! let parser = Rc::new(ParserContext::new());
//!
//! let tx = Transaction::create(Arc::clone(&cfg), true, &conn).expect("out of memory");
//! conn.register_transaction(tx.id());
//! tx.borrow_mut().bind_parser(&parser);
//! parser.set_active(tx.id());
//!
//! // The parsing layer populates fields as it consumes input.
//! tx.borrow_mut().request_method = Some(Bytes::from_static(b"GET"));
//! tx.borrow_mut().request_uri = Some(Bytes::from_static(b"/index.html"));
//!
//! // Hooks observe body data as it streams in.
//! tx.borrow_mut().register_request_body_data(Box::new(|data| {
//!     assert!(data.chunk().is_some());
//!     Ok(())
//! }));
//! tx.run_request_body_data(Some(Bytes::from_static(b"a=1&b=2"))).unwrap();
//!
//! // Destruction clears both back-references before it returns.
//! tx.destroy();
//! assert!(parser.active().is_none());
//! assert_eq!(conn.transaction_count(), 0);
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`transaction`]: The transaction aggregate, its ownership rules, and the
//!   creation/destruction protocol
//! - [`connection`]: The connection-side tracking structure and the external
//!   parser's active-transaction slot
//! - [`hook`]: Per-transaction body-data hook registries
//! - [`table`]: The ordered key/value table primitive behind header,
//!   parameter, and cookie collections
//! - [`config`]: The shared, externally-owned inspection configuration
//!
//! # Ownership model
//!
//! Every sub-structure of a transaction has exactly one responsible releaser:
//!
//! - Owned byte strings, URI records, header collections, body-parser state
//!   and hook registries are released with the transaction record itself.
//! - [`transaction::HeaderLine`] points at its parsed header through a
//!   [`transaction::HeaderId`] index, never an owning reference, so releasing
//!   a line cannot release the header.
//! - [`transaction::ParamTable`] distinguishes tables that own their values
//!   from tables whose values are shared with another owner; dropping a
//!   shared table never releases the backing storage.
//! - The owning connection and the parser's active-transaction slot are weak
//!   back-references: the destruction protocol clears both before any owned
//!   memory is released, so a transaction destroyed from inside one of its
//!   own hook callbacks leaves no dangling reference behind.
//!
//! # Concurrency
//!
//! The engine drives one transaction from one logical thread of control at a
//! time, so handles are cheap [`std::rc::Rc`] clones and no locking exists
//! anywhere in this crate.

pub mod config;
pub mod connection;
pub mod hook;
pub mod table;
pub mod transaction;

mod error;
pub use error::AllocError;
pub use error::HookError;
