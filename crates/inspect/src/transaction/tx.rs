//! The transaction aggregate root and its creation/destruction protocol.

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use bytes::Bytes;
use tracing::trace;

use crate::config::Config;
use crate::connection::{Connection, ParserContext, TxId};
use crate::error::{AllocError, HookError};
use crate::hook::{BodyData, DataHook, DataHookFn};
use crate::table::Table;

use super::body::{MultipartParser, UrlencodedParser};
use super::headers::{HeaderLine, HeaderTable};
use super::params::ParamTable;
use super::uri::ParsedUri;

/// One parsed request/response exchange within a connection.
///
/// A transaction is created empty and populated field by field as the
/// streaming parser consumes input; every optional field may still be absent
/// when the transaction is destroyed. The transaction owns everything it
/// aggregates except:
///
/// - `cfg`, which is shared with (or, when `is_cfg_shared` is false, owned
///   on behalf of) the external configuration owner and never released here
/// - the connection and active-parser back-references, which are weak
/// - `user_data`, an opaque externally-owned handle
///
/// Release of the owned fields happens when the record drops; the only
/// explicit destruction logic is [`Transaction::detach`], which clears both
/// back-references first.
pub struct Transaction {
    cfg: Arc<Config>,
    is_cfg_shared: bool,

    id: TxId,
    conn: Weak<Connection>,
    parser: Weak<ParserContext>,

    /// Request line as processed (nullable until the parser reaches it,
    /// like every other owned byte-string field below).
    pub request_line: Option<Bytes>,
    pub request_line_raw: Option<Bytes>,
    pub request_method: Option<Bytes>,
    pub request_uri: Option<Bytes>,
    pub request_uri_normalized: Option<Bytes>,
    pub request_protocol: Option<Bytes>,
    pub request_headers_sep: Option<Bytes>,
    /// Raw header block; captured separately from the parsed collections.
    pub request_headers_raw: Option<Bytes>,
    pub request_content_type: Option<Bytes>,

    /// Raw header lines in wire order; entries borrow their parsed header
    /// from `request_headers` by index.
    pub request_header_lines: Vec<HeaderLine>,
    /// The single owner of all parsed request headers.
    pub request_headers: HeaderTable,

    pub parsed_uri: Option<Box<ParsedUri>>,
    pub parsed_uri_incomplete: Option<Box<ParsedUri>>,

    pub response_line: Option<Bytes>,
    pub response_protocol: Option<Bytes>,
    pub response_status: Option<Bytes>,
    pub response_message: Option<Bytes>,
    pub response_headers_sep: Option<Bytes>,
    pub response_header_lines: Vec<HeaderLine>,
    pub response_headers: HeaderTable,

    pub request_urlenp_query: Option<UrlencodedParser>,
    pub request_urlenp_body: Option<UrlencodedParser>,
    pub request_mpartp: Option<MultipartParser>,

    pub request_params_query: Option<ParamTable>,
    pub request_params_body: Option<ParamTable>,
    pub request_cookies: Option<Table<Bytes>>,

    hook_request_body_data: Option<Rc<DataHook>>,
    hook_response_body_data: Option<Rc<DataHook>>,

    /// Protocol version as a number (e.g. 101 for 1.1); -1 while unknown.
    pub request_protocol_number: i32,
    /// Offset of an embedded NUL in the request line; -1 when none found.
    pub request_line_nul_offset: i64,

    user_data: Option<Rc<dyn Any>>,
}

impl Transaction {
    /// Creates a new, empty transaction on `conn`.
    ///
    /// The header collections are reserved up front using the configured
    /// capacity hint; if any reservation fails, everything allocated so far
    /// is released and the failure is returned, so no partial transaction
    /// escapes. The connection is recorded as a weak back-reference only;
    /// registering the transaction into the connection's tracking list is
    /// the caller's responsibility.
    pub fn create(cfg: Arc<Config>, is_cfg_shared: bool, conn: &Rc<Connection>) -> Result<Tx, AllocError> {
        let capacity = cfg.header_capacity_hint;

        let mut request_header_lines = Vec::new();
        request_header_lines.try_reserve(capacity)?;
        let mut response_header_lines = Vec::new();
        response_header_lines.try_reserve(capacity)?;

        let request_headers = HeaderTable::with_capacity(capacity)?;
        let response_headers = HeaderTable::with_capacity(capacity)?;

        let id = conn.next_tx_id();
        let tx = Transaction {
            cfg,
            is_cfg_shared,
            id,
            conn: Rc::downgrade(conn),
            parser: Weak::new(),
            request_line: None,
            request_line_raw: None,
            request_method: None,
            request_uri: None,
            request_uri_normalized: None,
            request_protocol: None,
            request_headers_sep: None,
            request_headers_raw: None,
            request_content_type: None,
            request_header_lines,
            request_headers,
            parsed_uri: Some(Box::default()),
            parsed_uri_incomplete: Some(Box::default()),
            response_line: None,
            response_protocol: None,
            response_status: None,
            response_message: None,
            response_headers_sep: None,
            response_header_lines,
            response_headers,
            request_urlenp_query: None,
            request_urlenp_body: None,
            request_mpartp: None,
            request_params_query: None,
            request_params_body: None,
            request_cookies: None,
            hook_request_body_data: None,
            hook_response_body_data: None,
            request_protocol_number: -1,
            request_line_nul_offset: -1,
            user_data: None,
        };

        trace!(?id, "transaction created");
        Ok(Tx { inner: Rc::new(RefCell::new(tx)) })
    }

    pub fn id(&self) -> TxId {
        self.id
    }

    pub fn cfg(&self) -> &Arc<Config> {
        &self.cfg
    }

    pub fn is_cfg_shared(&self) -> bool {
        self.is_cfg_shared
    }

    /// Replaces the configuration for this transaction. Last write wins;
    /// the previous configuration is untouched and remains its external
    /// owner's responsibility.
    pub fn set_cfg(&mut self, cfg: Arc<Config>, is_cfg_shared: bool) {
        self.cfg = cfg;
        self.is_cfg_shared = is_cfg_shared;
    }

    /// The opaque user data associated with this transaction, if any.
    pub fn user_data(&self) -> Option<&Rc<dyn Any>> {
        self.user_data.as_ref()
    }

    /// Associates opaque user data with this transaction. The transaction
    /// holds a shared handle and never releases the data itself.
    pub fn set_user_data(&mut self, user_data: Rc<dyn Any>) {
        self.user_data = Some(user_data);
    }

    /// Records the parser context whose active slot may designate this
    /// transaction, as a weak reference.
    pub fn bind_parser(&mut self, parser: &Rc<ParserContext>) {
        self.parser = Rc::downgrade(parser);
    }

    /// Registers a callback on the request-body-data hook, creating the
    /// registry on first use.
    pub fn register_request_body_data(&mut self, callback: DataHookFn) {
        self.hook_request_body_data.get_or_insert_with(|| Rc::new(DataHook::new())).register(callback);
    }

    /// Registers a callback on the response-body-data hook, creating the
    /// registry on first use.
    pub fn register_response_body_data(&mut self, callback: DataHookFn) {
        self.hook_response_body_data.get_or_insert_with(|| Rc::new(DataHook::new())).register(callback);
    }

    fn request_body_hook(&self) -> Option<Rc<DataHook>> {
        self.hook_request_body_data.as_ref().map(Rc::clone)
    }

    fn response_body_hook(&self) -> Option<Rc<DataHook>> {
        self.hook_response_body_data.as_ref().map(Rc::clone)
    }

    /// Clears both back-references: deregisters from the owning connection
    /// and nulls the active-parser slot if it designates this transaction.
    ///
    /// Idempotent, and safe to call from inside a hook callback this
    /// transaction is currently invoking. Also run when the record drops,
    /// so a plainly dropped transaction never leaves a dangling reference.
    pub fn detach(&mut self) {
        if let Some(conn) = self.conn.upgrade() {
            conn.remove_transaction(self.id);
        }
        self.conn = Weak::new();

        if let Some(parser) = self.parser.upgrade() {
            parser.clear_active(self.id);
        }
        self.parser = Weak::new();

        trace!(id = ?self.id, "transaction detached");
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        // Back-references go first; the owned fields drop right after.
        self.detach();
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("is_cfg_shared", &self.is_cfg_shared)
            .field("request_method", &self.request_method)
            .field("request_uri", &self.request_uri)
            .field("request_headers", &self.request_headers.len())
            .field("response_headers", &self.response_headers.len())
            .field("request_protocol_number", &self.request_protocol_number)
            .finish_non_exhaustive()
    }
}

/// Shared handle to a [`Transaction`].
///
/// The engine is single-threaded, so a handle is a cheap `Rc` clone. The
/// driving parser holds strong handles while a transaction is being
/// processed; the connection's tracking list and the active-parser slot hold
/// only [`TxId`]s, so they can neither keep a destroyed transaction alive
/// nor be dereferenced after its release.
#[derive(Clone)]
pub struct Tx {
    inner: Rc<RefCell<Transaction>>,
}

impl Tx {
    pub fn borrow(&self) -> Ref<'_, Transaction> {
        self.inner.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Transaction> {
        self.inner.borrow_mut()
    }

    pub fn id(&self) -> TxId {
        self.inner.borrow().id
    }

    /// Creates a non-owning handle to this transaction.
    pub fn downgrade(&self) -> WeakTx {
        WeakTx { inner: Rc::downgrade(&self.inner) }
    }

    /// Destroys the transaction.
    ///
    /// Both back-references are cleared before this call returns: the owning
    /// connection drops the transaction from its tracking list and the
    /// active-parser slot is nulled if it designates this transaction. The
    /// owned sub-resources are then released as the record drops, once the
    /// final handle is gone.
    ///
    /// Callable from inside a hook callback this transaction is invoking:
    /// the run in progress holds its own registry handle and data view, so
    /// it finishes safely and the record is released right after.
    pub fn destroy(self) {
        self.inner.borrow_mut().detach();
        drop(self.inner);
    }

    /// Runs the request-body-data hook for one chunk; `None` marks the
    /// final call. Without a registry this is a no-op.
    pub fn run_request_body_data(&self, chunk: Option<Bytes>) -> Result<(), HookError> {
        let hook = self.inner.borrow().request_body_hook();
        match hook {
            // the registry handle is cloned out above, so no borrow of the
            // transaction is held while callbacks run
            Some(hook) => hook.run(&BodyData::new(self.clone(), chunk)),
            None => Ok(()),
        }
    }

    /// Runs the response-body-data hook for one chunk; `None` marks the
    /// final call. Without a registry this is a no-op.
    pub fn run_response_body_data(&self, chunk: Option<Bytes>) -> Result<(), HookError> {
        let hook = self.inner.borrow().response_body_hook();
        match hook {
            Some(hook) => hook.run(&BodyData::new(self.clone(), chunk)),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Tx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(tx) => f.debug_tuple("Tx").field(&tx.id).finish(),
            Err(_) => f.write_str("Tx(<borrowed>)"),
        }
    }
}

/// Non-owning handle to a [`Transaction`], for slots that must never keep
/// one alive.
#[derive(Debug, Clone, Default)]
pub struct WeakTx {
    inner: Weak<RefCell<Transaction>>,
}

impl WeakTx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upgrades to a strong handle if the transaction is still alive.
    pub fn upgrade(&self) -> Option<Tx> {
        self.inner.upgrade().map(|inner| Tx { inner })
    }
}
