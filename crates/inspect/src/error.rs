use std::collections::TryReserveError;
use thiserror::Error;

/// Allocation failure reported by transaction creation.
///
/// Creation reserves the header collections up front; if any reservation
/// cannot be satisfied, the partially built transaction is released and this
/// error is returned instead.
#[derive(Debug, Error)]
pub enum AllocError {
    #[error("allocation failure: {source}")]
    Reserve {
        #[from]
        source: TryReserveError,
    },
}

/// Failure reported by a body-data hook callback.
///
/// A failing callback stops the hook run; callbacks registered after it are
/// not invoked for that chunk.
#[derive(Error, Debug)]
pub enum HookError {
    #[error("hook callback failed: {reason}")]
    Callback { reason: String },
}

impl HookError {
    pub fn callback<S: ToString>(str: S) -> Self {
        Self::Callback { reason: str.to_string() }
    }
}
