//! # ferry-sync
//!
//! The reconciliation engine behind `ferry push` and `ferry pull`.
//!
//! Call [`push`] to reconcile local definition files into the remote
//! (create-vs-update-vs-skip per item, dependency-ordered operation
//! uploads), or [`pull::pull_collections`] / [`pull::pull_flows`] to
//! download remote state back into the files.

pub mod diff;
pub mod error;
pub mod pull;
pub mod push;
pub mod sequence;
pub mod snapshot;

pub use error::SyncError;
pub use pull::PullOutcome;
pub use push::{push, ItemKind, PushReport, PushScope, UpsertResult};
pub use snapshot::RemoteSnapshot;
