//! The push orchestrator: reconcile local definitions into the remote.
//!
//! Order of effects for one run:
//! 1. Clear the remote cache (failure is logged, never fatal).
//! 2. Fetch the [`RemoteSnapshot`] — top-level listing failures abort.
//! 3. Collections: create absent collections, diff-and-create missing
//!    fields, then reconcile relations only after every collection and
//!    field has been processed.
//! 4. Flows: create-or-update each flow, then its operations in dependency
//!    order with the dangling-reject filter applied.
//!
//! Every remote call completes before the next begins; the ordering
//! guarantees above depend on it. Item-level failures are recorded in the
//! report and the run continues.

use std::fmt;
use std::path::Path;

use ferry_core::types::{Collection, Flow, Operation, Relation};
use ferry_core::{sanitize, store};
use ferry_remote::{Remote, RemoteError};

use crate::error::SyncError;
use crate::snapshot::RemoteSnapshot;
use crate::{diff, sequence};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// What a single reconciled item was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Collection,
    Field,
    Relation,
    Flow,
    Operation,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Collection => write!(f, "collection"),
            ItemKind::Field => write!(f, "field"),
            ItemKind::Relation => write!(f, "relation"),
            ItemKind::Flow => write!(f, "flow"),
            ItemKind::Operation => write!(f, "operation"),
        }
    }
}

/// Outcome of reconciling one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertResult {
    /// Item was absent remotely and has been created.
    Created { kind: ItemKind, id: String },
    /// Item was present remotely and has been updated (flows, operations).
    Updated { kind: ItemKind, id: String },
    /// Item is already present; this kind is never updated in place.
    Unchanged { kind: ItemKind, id: String },
    /// Dry-run decision: the item *would* be created.
    WouldCreate { kind: ItemKind, id: String },
    /// Dry-run decision: the item *would* be updated.
    WouldUpdate { kind: ItemKind, id: String },
    /// Operation whose `reject` names no operation in its flow; excluded
    /// from upload so the remote never sees the dangling reference.
    SkippedDanglingReject { id: String, missing: String },
    /// System collections are excluded from all processing.
    SkippedSystem { id: String },
    /// Item-level failure: recorded, the run continues with the next item.
    Failed {
        kind: ItemKind,
        id: String,
        error: String,
    },
}

/// Everything one push run decided, in decision order.
#[derive(Debug, Default)]
pub struct PushReport {
    pub items: Vec<UpsertResult>,
}

impl PushReport {
    pub fn created(&self) -> usize {
        self.count(|i| matches!(i, UpsertResult::Created { .. } | UpsertResult::WouldCreate { .. }))
    }

    pub fn updated(&self) -> usize {
        self.count(|i| matches!(i, UpsertResult::Updated { .. } | UpsertResult::WouldUpdate { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|i| matches!(i, UpsertResult::Unchanged { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|i| {
            matches!(
                i,
                UpsertResult::SkippedDanglingReject { .. } | UpsertResult::SkippedSystem { .. }
            )
        })
    }

    pub fn failed(&self) -> usize {
        self.count(|i| matches!(i, UpsertResult::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&UpsertResult) -> bool) -> usize {
        self.items.iter().filter(|i| pred(i)).count()
    }
}

/// Scope for a push run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushScope {
    /// Collections first, then flows.
    All,
    Collections,
    Flows,
}

impl PushScope {
    pub fn includes_collections(&self) -> bool {
        matches!(self, PushScope::All | PushScope::Collections)
    }

    pub fn includes_flows(&self) -> bool {
        matches!(self, PushScope::All | PushScope::Flows)
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Run the full reconciliation.
///
/// Local definitions are loaded before the first remote call, so an
/// unreadable store aborts with no remote side effect. With `dry_run` the
/// decision logic runs against real listings but no mutating call is
/// issued; decisions surface as would-create/would-update.
pub fn push(
    collections_dir: &Path,
    flows_dir: &Path,
    remote: &dyn Remote,
    scope: PushScope,
    dry_run: bool,
) -> Result<PushReport, SyncError> {
    let collections = if scope.includes_collections() {
        store::load_collections(collections_dir)?
    } else {
        Vec::new()
    };
    let flows = if scope.includes_flows() {
        store::load_flows(flows_dir)?
    } else {
        Vec::new()
    };

    if dry_run {
        tracing::debug!("[dry-run] cache clear suppressed");
    } else if let Err(err) = remote.clear_cache() {
        tracing::warn!("cache clear failed: {err}");
    }

    let snapshot = RemoteSnapshot::fetch(remote)?;

    let mut report = PushReport::default();
    push_collections(&collections, remote, &snapshot, dry_run, &mut report);
    push_flows(&flows, remote, &snapshot, dry_run, &mut report);
    Ok(report)
}

// ---------------------------------------------------------------------------
// Collections phase
// ---------------------------------------------------------------------------

struct DeferredRelations<'a> {
    collection: &'a str,
    relations: &'a [Relation],
    /// Whether the remote inventory for this collection can be listed:
    /// the collection pre-existed or its create just succeeded.
    listable: bool,
}

fn push_collections(
    collections: &[Collection],
    remote: &dyn Remote,
    snapshot: &RemoteSnapshot,
    dry_run: bool,
    report: &mut PushReport,
) {
    let mut deferred: Vec<DeferredRelations<'_>> = Vec::new();

    for collection in collections {
        let name = collection.collection.as_str();
        if collection.is_system() {
            tracing::debug!("excluding system collection {name}");
            report.items.push(UpsertResult::SkippedSystem {
                id: name.to_string(),
            });
            continue;
        }

        let known = snapshot.has_collection(name);
        let mut listable = known;

        if known {
            report.items.push(UpsertResult::Unchanged {
                kind: ItemKind::Collection,
                id: name.to_string(),
            });
        } else if dry_run {
            report.items.push(UpsertResult::WouldCreate {
                kind: ItemKind::Collection,
                id: name.to_string(),
            });
        } else {
            // The create body embeds the collection's fields, so a fresh
            // collection needs no per-field calls afterwards.
            match remote.create_collection(&sanitize::collection_upload_body(collection)) {
                Ok(()) => {
                    tracing::info!("created collection {name}");
                    listable = true;
                    report.items.push(UpsertResult::Created {
                        kind: ItemKind::Collection,
                        id: name.to_string(),
                    });
                }
                Err(err) => {
                    tracing::warn!("failed to create collection {name}: {err}");
                    report.items.push(failed(ItemKind::Collection, name, &err));
                }
            }
        }

        if !collection.fields.is_empty() && listable {
            reconcile_fields(remote, collection, dry_run, report);
        }

        if !collection.relations.is_empty() {
            deferred.push(DeferredRelations {
                collection: name,
                relations: &collection.relations,
                listable,
            });
        }
    }

    // Relations last: both end points must exist before a link between
    // them is created.
    for entry in deferred {
        reconcile_relations(remote, &entry, dry_run, report);
    }
}

fn reconcile_fields(
    remote: &dyn Remote,
    collection: &Collection,
    dry_run: bool,
    report: &mut PushReport,
) {
    let name = collection.collection.as_str();
    let remote_fields = match remote.list_fields(name) {
        Ok(fields) => fields,
        Err(err) => {
            // Diffing against an unknown inventory would re-create every
            // field, so this collection's sub-elements sit the run out.
            tracing::warn!("cannot list fields for {name}: {err}");
            report.items.push(failed(ItemKind::Field, name, &err));
            return;
        }
    };

    for field in diff::missing_fields(&collection.fields, &remote_fields) {
        let id = format!("{name}.{}", field.field);
        if dry_run {
            report.items.push(UpsertResult::WouldCreate {
                kind: ItemKind::Field,
                id,
            });
            continue;
        }
        match remote.create_field(name, &sanitize::field_upload_body(field)) {
            Ok(()) => {
                tracing::info!("created field {id}");
                report.items.push(UpsertResult::Created {
                    kind: ItemKind::Field,
                    id,
                });
            }
            Err(err) => {
                tracing::warn!("failed to create field {id}: {err}");
                report.items.push(failed(ItemKind::Field, &id, &err));
            }
        }
    }
}

fn reconcile_relations(
    remote: &dyn Remote,
    entry: &DeferredRelations<'_>,
    dry_run: bool,
    report: &mut PushReport,
) {
    let name = entry.collection;
    let remote_relations = if entry.listable {
        match remote.list_relations(name) {
            Ok(relations) => relations,
            Err(err) => {
                tracing::warn!("cannot list relations for {name}: {err}");
                report.items.push(failed(ItemKind::Relation, name, &err));
                return;
            }
        }
    } else if dry_run {
        // The collection does not exist yet, so neither do its relations.
        Vec::new()
    } else {
        tracing::debug!("skipping relations for {name}: collection create failed");
        return;
    };

    for relation in diff::missing_relations(entry.relations, &remote_relations) {
        let id = relation_label(name, relation);
        if dry_run {
            report.items.push(UpsertResult::WouldCreate {
                kind: ItemKind::Relation,
                id,
            });
            continue;
        }
        match remote.create_relation(&sanitize::relation_upload_body(relation)) {
            Ok(()) => {
                tracing::info!("created relation {id}");
                report.items.push(UpsertResult::Created {
                    kind: ItemKind::Relation,
                    id,
                });
            }
            Err(err) => {
                tracing::warn!("failed to create relation {id}: {err}");
                report.items.push(failed(ItemKind::Relation, &id, &err));
            }
        }
    }
}

fn relation_label(collection: &str, relation: &Relation) -> String {
    match relation.related_collection.as_deref() {
        Some(related) => format!("{collection}.{} -> {related}", relation.field),
        None => format!("{collection}.{}", relation.field),
    }
}

// ---------------------------------------------------------------------------
// Flows phase
// ---------------------------------------------------------------------------

fn push_flows(
    flows: &[Flow],
    remote: &dyn Remote,
    snapshot: &RemoteSnapshot,
    dry_run: bool,
    report: &mut PushReport,
) {
    for flow in flows {
        let exists = snapshot.has_flow(&flow.id);
        let body = sanitize::flow_upload_body(flow);

        if dry_run {
            report.items.push(if exists {
                UpsertResult::WouldUpdate {
                    kind: ItemKind::Flow,
                    id: flow.id.clone(),
                }
            } else {
                UpsertResult::WouldCreate {
                    kind: ItemKind::Flow,
                    id: flow.id.clone(),
                }
            });
        } else {
            let call = if exists {
                remote.update_flow(&flow.id, &body)
            } else {
                remote.create_flow(&body)
            };
            match call {
                Ok(()) if exists => {
                    tracing::info!("updated flow {}", flow.id);
                    report.items.push(UpsertResult::Updated {
                        kind: ItemKind::Flow,
                        id: flow.id.clone(),
                    });
                }
                Ok(()) => {
                    tracing::info!("created flow {}", flow.id);
                    report.items.push(UpsertResult::Created {
                        kind: ItemKind::Flow,
                        id: flow.id.clone(),
                    });
                }
                Err(err) => {
                    // Its operations would reference a flow the remote
                    // never accepted; move on to the next flow.
                    tracing::warn!("failed to upsert flow {}: {err}", flow.id);
                    report.items.push(failed(ItemKind::Flow, &flow.id, &err));
                    continue;
                }
            }
        }

        push_operations(remote, flow.id.as_str(), &flow.operations, snapshot, dry_run, report);
    }
}

fn push_operations(
    remote: &dyn Remote,
    flow_id: &str,
    operations: &[Operation],
    snapshot: &RemoteSnapshot,
    dry_run: bool,
    report: &mut PushReport,
) {
    for operation in sequence::sequence(operations) {
        if let Some(missing) = sequence::dangling_reject(operation, operations) {
            tracing::info!(
                "operation {} in flow {flow_id} rejects to nonexistent {missing}; skipping upload",
                operation.id
            );
            report.items.push(UpsertResult::SkippedDanglingReject {
                id: operation.id.clone(),
                missing: missing.to_string(),
            });
            continue;
        }

        let exists = snapshot.flow_has_operation(flow_id, &operation.id);
        if dry_run {
            report.items.push(if exists {
                UpsertResult::WouldUpdate {
                    kind: ItemKind::Operation,
                    id: operation.id.clone(),
                }
            } else {
                UpsertResult::WouldCreate {
                    kind: ItemKind::Operation,
                    id: operation.id.clone(),
                }
            });
            continue;
        }

        let body = sanitize::operation_upload_body(operation, flow_id);
        let call = if exists {
            remote.update_operation(&operation.id, &body)
        } else {
            remote.create_operation(&body)
        };
        match call {
            Ok(()) if exists => {
                tracing::info!("updated operation {} in flow {flow_id}", operation.id);
                report.items.push(UpsertResult::Updated {
                    kind: ItemKind::Operation,
                    id: operation.id.clone(),
                });
            }
            Ok(()) => {
                tracing::info!("created operation {} in flow {flow_id}", operation.id);
                report.items.push(UpsertResult::Created {
                    kind: ItemKind::Operation,
                    id: operation.id.clone(),
                });
            }
            Err(err) => {
                tracing::warn!("failed to upsert operation {}: {err}", operation.id);
                report.items.push(failed(ItemKind::Operation, &operation.id, &err));
            }
        }
    }
}

fn failed(kind: ItemKind, id: &str, err: &RemoteError) -> UpsertResult {
    UpsertResult::Failed {
        kind,
        id: id.to_string(),
        error: err.to_string(),
    }
}
