//! The transaction aggregate and its lifecycle.
//!
//! This module holds the core of the engine's data model:
//!
//! - **Aggregate root** ([`tx`]): [`Transaction`] and its shared handle
//!   [`Tx`], with the creation and destruction protocol
//! - **Headers** ([`headers`]): [`Header`] records, the [`HeaderTable`] that
//!   owns them, and the non-owning [`HeaderLine`] → [`HeaderId`] relation
//! - **URI** ([`uri`]): the [`ParsedUri`] record of optional components
//! - **Parameters** ([`params`]): [`ParamTable`] with tagged value ownership
//! - **Body parsers** ([`body`]): opaque per-transaction parser state,
//!   released with the transaction
//!
//! The ownership rules are deliberately structural: everything a transaction
//! owns is released by dropping the record, non-owning relations are index
//! handles or weak references, and the only explicit destruction logic left
//! is the clearing of back-references before release.

mod body;
pub use body::MultipartParser;
pub use body::UrlencodedParser;

mod headers;
pub use headers::Header;
pub use headers::HeaderId;
pub use headers::HeaderLine;
pub use headers::HeaderTable;

mod params;
pub use params::ParamTable;

mod tx;
pub use tx::Transaction;
pub use tx::Tx;
pub use tx::WeakTx;

mod uri;
pub use uri::ParsedUri;
