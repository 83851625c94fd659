//! The pull direction: download remote state into definition files.
//!
//! A straight pull, one listing at a time: collections (with their field
//! and relation inventories embedded) and flows (with the full operation
//! records embedded over the remote's id list). Files are written through
//! the content-gated atomic save, so an unchanged record never touches
//! disk.

use std::path::{Path, PathBuf};

use ferry_core::store::{self, SaveOutcome};
use ferry_remote::Remote;

use crate::error::SyncError;

/// Outcome of downloading a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullOutcome {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File already matches the remote record.
    Unchanged { path: PathBuf },
    /// System collections are excluded from all processing.
    SkippedSystem { name: String },
    /// This record could not be downloaded or written; the run continues.
    Failed { name: String, error: String },
}

/// Download every collection into `<dir>/<name>.json`.
///
/// Field and relation inventories are fetched only for collections that
/// own a schema; alias collections are written as-is.
pub fn pull_collections(dir: &Path, remote: &dyn Remote) -> Result<Vec<PullOutcome>, SyncError> {
    let collections = remote.list_collections().map_err(SyncError::Fetch)?;

    let mut outcomes = Vec::new();
    for mut collection in collections {
        let name = collection.collection.clone();
        if collection.is_system() {
            tracing::debug!("excluding system collection {name}");
            outcomes.push(PullOutcome::SkippedSystem { name });
            continue;
        }

        if collection.has_schema() {
            collection.fields = match remote.list_fields(&name) {
                Ok(fields) => fields,
                Err(err) => {
                    // Writing the record without its fields would shrink
                    // the local definition; leave the file alone instead.
                    tracing::warn!("cannot list fields for {name}: {err}");
                    outcomes.push(PullOutcome::Failed {
                        name,
                        error: err.to_string(),
                    });
                    continue;
                }
            };
            collection.relations = match remote.list_relations(&name) {
                Ok(relations) => relations,
                Err(err) => {
                    tracing::warn!("cannot list relations for {name}: {err}");
                    outcomes.push(PullOutcome::Failed {
                        name,
                        error: err.to_string(),
                    });
                    continue;
                }
            };
        }

        outcomes.push(save_outcome(name, store::save_collection(dir, &collection)));
    }
    Ok(outcomes)
}

/// Download every flow into `<dir>/<id>.json`, operations embedded.
pub fn pull_flows(dir: &Path, remote: &dyn Remote) -> Result<Vec<PullOutcome>, SyncError> {
    let flows = remote.list_flows().map_err(SyncError::Fetch)?;

    let mut outcomes = Vec::new();
    for listing in flows {
        let id = listing.id.clone();

        let operations = match remote.list_operations(&id) {
            Ok(operations) => operations,
            Err(err) => {
                tracing::warn!("cannot list operations for flow {id}: {err}");
                outcomes.push(PullOutcome::Failed {
                    name: id,
                    error: err.to_string(),
                });
                continue;
            }
        };

        let flow = match listing.into_flow(operations) {
            Ok(flow) => flow,
            Err(err) => {
                tracing::warn!("flow {id} record does not assemble: {err}");
                outcomes.push(PullOutcome::Failed {
                    name: id,
                    error: err.to_string(),
                });
                continue;
            }
        };

        outcomes.push(save_outcome(id, store::save_flow(dir, &flow)));
    }
    Ok(outcomes)
}

fn save_outcome(name: String, result: Result<SaveOutcome, ferry_core::StoreError>) -> PullOutcome {
    match result {
        Ok(SaveOutcome::Written { path }) => PullOutcome::Written { path },
        Ok(SaveOutcome::Unchanged { path }) => PullOutcome::Unchanged { path },
        Err(err) => {
            tracing::warn!("cannot write definition for {name}: {err}");
            PullOutcome::Failed {
                name,
                error: err.to_string(),
            }
        }
    }
}
