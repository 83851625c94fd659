//! Upload-body construction.
//!
//! Remote-assigned attributes (field `meta.id`, creator references) must not
//! be replayed on create/update. Sanitization is a pure transformation: it
//! produces a new JSON value with an explicit denylist of dotted attribute
//! paths removed, never mutating the caller's loaded record.

use serde::Serialize;
use serde_json::Value;

use crate::types::{Collection, Field, Flow, Operation, Relation};

/// Dropped from field records before upload.
const FIELD_DENYLIST: &[&str] = &["meta.id"];

/// Dropped from flow records before upload; operations travel separately.
const FLOW_DENYLIST: &[&str] = &["operations", "user_created"];

/// Dropped from operation records before upload.
const OPERATION_DENYLIST: &[&str] = &["user_created"];

/// Copy `record` with every denylisted path removed.
///
/// A path segment that does not exist (or is not an object) is a no-op.
pub fn sanitize(record: &Value, denylist: &[&str]) -> Value {
    let mut out = record.clone();
    for path in denylist {
        remove_path(&mut out, path);
    }
    out
}

fn remove_path(value: &mut Value, path: &str) {
    let Value::Object(map) = value else {
        return;
    };
    match path.split_once('.') {
        None => {
            map.remove(path);
        }
        Some((head, rest)) => {
            if let Some(child) = map.get_mut(head) {
                remove_path(child, rest);
            }
        }
    }
}

// Our record types serialize infallibly (string keys throughout).
fn to_json(record: &impl Serialize) -> Value {
    serde_json::to_value(record).expect("definition records serialize to JSON")
}

/// Create body for a collection, with the remote-assigned `meta.id` stripped
/// from every embedded field.
pub fn collection_upload_body(collection: &Collection) -> Value {
    let mut body = to_json(collection);
    if let Some(fields) = body.get_mut("fields").and_then(Value::as_array_mut) {
        for field in fields {
            remove_path(field, "meta.id");
        }
    }
    body
}

/// Create body for a single field.
pub fn field_upload_body(field: &Field) -> Value {
    sanitize(&to_json(field), FIELD_DENYLIST)
}

/// Create body for a relation. Sent verbatim: relation existence is
/// decided by the `(field, related_collection)` identity upstream, and the
/// remote ignores replayed bookkeeping on create.
pub fn relation_upload_body(relation: &Relation) -> Value {
    to_json(relation)
}

/// Create/update body for a flow, minus its embedded operations.
pub fn flow_upload_body(flow: &Flow) -> Value {
    sanitize(&to_json(flow), FLOW_DENYLIST)
}

/// Create/update body for an operation. The `flow` reference is always set
/// to the owning flow's id, overriding any stale value in the record.
pub fn operation_upload_body(operation: &Operation, flow_id: &str) -> Value {
    let mut body = sanitize(&to_json(operation), OPERATION_DENYLIST);
    if let Value::Object(map) = &mut body {
        map.insert("flow".to_string(), Value::String(flow_id.to_string()));
    }
    body
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
