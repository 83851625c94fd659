//! Immutable snapshot of the remote inventory.
//!
//! Built once per run from the top-level listings and threaded through the
//! orchestrator as an explicit parameter; never refreshed or mutated after
//! construction. Concurrent modification of the remote during a run is a
//! known race this design does not cover.

use std::collections::{BTreeMap, BTreeSet};

use ferry_remote::{FlowListing, Remote};

use crate::error::SyncError;

/// Remote collection names and flows (with their recorded operation ids)
/// as of the start of the run.
#[derive(Debug, Clone, Default)]
pub struct RemoteSnapshot {
    collections: BTreeSet<String>,
    flows: BTreeMap<String, FlowListing>,
}

impl RemoteSnapshot {
    /// Enumerate remote collections and flows.
    ///
    /// A failure here aborts the run: without the inventory, every
    /// create-vs-update decision would be a guess.
    pub fn fetch(remote: &dyn Remote) -> Result<Self, SyncError> {
        let collections = remote
            .list_collections()
            .map_err(SyncError::Fetch)?
            .into_iter()
            .map(|c| c.collection)
            .collect();
        let flows = remote
            .list_flows()
            .map_err(SyncError::Fetch)?
            .into_iter()
            .map(|f| (f.id.clone(), f))
            .collect();
        tracing::debug!("remote snapshot ready");
        Ok(Self { collections, flows })
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.collections.contains(name)
    }

    pub fn has_flow(&self, id: &str) -> bool {
        self.flows.contains_key(id)
    }

    /// Whether the remote flow already records this operation id. A flow
    /// unknown to the snapshot has no operations by definition.
    pub fn flow_has_operation(&self, flow_id: &str, operation_id: &str) -> bool {
        self.flows
            .get(flow_id)
            .map(|f| f.has_operation(operation_id))
            .unwrap_or(false)
    }
}
