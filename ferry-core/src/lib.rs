//! Ferry core library — definition record types, sanitization, store.
//!
//! Public API surface:
//! - [`types`] — schema and flow definition records
//! - [`sanitize`] — denylist-driven upload-body construction
//! - [`store`] — load / save of per-record JSON definition files
//! - [`error`] — [`StoreError`]

pub mod error;
pub mod sanitize;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use types::{Collection, CollectionMeta, Field, Flow, Operation, Relation};
