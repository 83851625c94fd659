//! Error types for ferry-sync.

use thiserror::Error;

use ferry_core::StoreError;
use ferry_remote::RemoteError;

/// Fatal errors that abort a run.
///
/// Item-level create/update failures are deliberately *not* represented
/// here: they are caught at the call site, recorded in the run report, and
/// never rethrown.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The top-level remote inventory (collections or flows) could not be
    /// enumerated. Without it every create-vs-update decision would be a
    /// guess, so the whole run aborts.
    #[error("failed to enumerate remote inventory: {0}")]
    Fetch(#[source] RemoteError),

    /// Local definition files could not be read or written.
    #[error("definition store error: {0}")]
    Store(#[from] StoreError),
}
