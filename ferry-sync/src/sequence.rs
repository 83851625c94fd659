//! Dependency ordering for a flow's operation graph.
//!
//! `resolve` and `reject` form two labeled directed edges between
//! operations of the same flow. Uploading a dependent before its target
//! would hand the remote a reference to a record that does not exist yet,
//! so operations are sequenced depth-first: edge targets land at or before
//! the operations that point at them.
//!
//! The graph may contain cycles; ordering under a cycle is best effort
//! (visitation order) and must terminate. An operation is marked visited
//! *before* its edges are followed, which makes re-entry through a cycle a
//! no-op rather than infinite recursion.

use std::collections::{HashMap, HashSet};

use ferry_core::types::Operation;

/// Linearize `operations` so that every in-set `resolve`/`reject` target
/// appears at or before its dependent, each operation exactly once.
///
/// Edges pointing outside the set are ignored here; the upload-time
/// dangling-reject filter is [`dangling_reject`].
pub fn sequence(operations: &[Operation]) -> Vec<&Operation> {
    let by_id: HashMap<&str, &Operation> =
        operations.iter().map(|op| (op.id.as_str(), op)).collect();

    let mut seen: HashSet<&str> = HashSet::with_capacity(operations.len());
    let mut ordered: Vec<&Operation> = Vec::with_capacity(operations.len());
    for op in operations {
        visit(op, &by_id, &mut seen, &mut ordered);
    }
    ordered
}

fn visit<'a>(
    op: &'a Operation,
    by_id: &HashMap<&str, &'a Operation>,
    seen: &mut HashSet<&'a str>,
    ordered: &mut Vec<&'a Operation>,
) {
    if !seen.insert(op.id.as_str()) {
        return;
    }
    for edge in [&op.resolve, &op.reject] {
        if let Some(target) = edge.as_deref().and_then(|id| by_id.get(id).copied()) {
            visit(target, by_id, seen, ordered);
        }
    }
    ordered.push(op);
}

/// The id a dangling `reject` edge points at, if any.
///
/// An operation whose `reject` names no operation in its flow is excluded
/// from upload entirely — the remote would otherwise be handed a reference
/// to a nonexistent record. A dangling `resolve` is not filtered; the
/// remote rejects it and the failure is recorded per item.
pub fn dangling_reject<'a>(operation: &'a Operation, operations: &[Operation]) -> Option<&'a str> {
    let reject = operation.reject.as_deref()?;
    if operations.iter().any(|op| op.id == reject) {
        None
    } else {
        Some(reject)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn op(id: &str, resolve: Option<&str>, reject: Option<&str>) -> Operation {
        serde_json::from_value(json!({
            "id": id,
            "name": format!("op {id}"),
            "resolve": resolve,
            "reject": reject
        }))
        .expect("operation")
    }

    fn ids(ordered: &[&Operation]) -> Vec<String> {
        ordered.iter().map(|o| o.id.clone()).collect()
    }

    fn position(ordered: &[&Operation], id: &str) -> usize {
        ordered
            .iter()
            .position(|o| o.id == id)
            .unwrap_or_else(|| panic!("{id} missing from sequence"))
    }

    #[test]
    fn dependency_lands_before_dependent() {
        let operations = vec![op("a", Some("b"), None), op("b", None, None)];
        let ordered = sequence(&operations);
        assert_eq!(ids(&ordered), ["b", "a"]);
    }

    #[test]
    fn both_edge_kinds_are_honored() {
        let operations = vec![
            op("a", Some("b"), Some("c")),
            op("b", None, None),
            op("c", None, None),
        ];
        let ordered = sequence(&operations);
        assert!(position(&ordered, "b") < position(&ordered, "a"));
        assert!(position(&ordered, "c") < position(&ordered, "a"));
        assert_eq!(ordered.len(), 3);
    }

    #[test]
    fn chain_sequences_deepest_first() {
        let operations = vec![
            op("a", Some("b"), None),
            op("b", Some("c"), None),
            op("c", None, None),
        ];
        let ordered = sequence(&operations);
        assert_eq!(ids(&ordered), ["c", "b", "a"]);
    }

    #[test]
    fn mutual_cycle_terminates_with_each_exactly_once() {
        let operations = vec![op("a", Some("b"), None), op("b", Some("a"), None)];
        let ordered = sequence(&operations);

        let mut sorted = ids(&ordered);
        sorted.sort();
        assert_eq!(sorted, ["a", "b"]);
    }

    #[test]
    fn self_cycle_terminates() {
        let operations = vec![op("a", Some("a"), Some("a"))];
        let ordered = sequence(&operations);
        assert_eq!(ids(&ordered), ["a"]);
    }

    #[test]
    fn shared_dependency_appears_once() {
        let operations = vec![
            op("a", Some("c"), None),
            op("b", Some("c"), None),
            op("c", None, None),
        ];
        let ordered = sequence(&operations);
        assert_eq!(ordered.len(), 3);
        assert!(position(&ordered, "c") < position(&ordered, "a"));
        assert!(position(&ordered, "c") < position(&ordered, "b"));
    }

    #[test]
    fn out_of_set_edges_do_not_disturb_sequencing() {
        let operations = vec![op("a", Some("ghost"), None), op("b", None, None)];
        let ordered = sequence(&operations);
        assert_eq!(ids(&ordered), ["a", "b"]);
    }

    #[test]
    fn dangling_reject_names_the_missing_id() {
        let operations = vec![op("c", None, Some("z")), op("b", None, None)];
        assert_eq!(dangling_reject(&operations[0], &operations), Some("z"));
        assert_eq!(dangling_reject(&operations[1], &operations), None);
    }

    #[test]
    fn present_reject_is_not_dangling() {
        let operations = vec![op("c", None, Some("b")), op("b", None, None)];
        assert_eq!(dangling_reject(&operations[0], &operations), None);
    }
}
