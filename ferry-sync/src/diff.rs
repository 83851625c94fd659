//! Existence diff between local definitions and the remote inventory.
//!
//! Sub-elements (fields, relations) are reconciled create-only: the diff
//! decides presence by identity alone and never compares attributes, so an
//! element that exists remotely with different attributes is left untouched.
//! Collections and flows, which support full update, are decided elsewhere.

use std::collections::HashSet;

use ferry_core::types::{Field, Relation};

/// The subset of `local` fields not present in `remote`, by field name.
///
/// Pure: neither input is mutated; local order is preserved.
pub fn missing_fields<'a>(local: &'a [Field], remote: &[Field]) -> Vec<&'a Field> {
    let existing: HashSet<&str> = remote.iter().map(|f| f.field.as_str()).collect();
    local
        .iter()
        .filter(|f| !existing.contains(f.field.as_str()))
        .collect()
}

/// The subset of `local` relations not present in `remote`.
///
/// Identity is the `(field, related_collection)` pair and nothing else —
/// a remote relation sharing the pair counts as existing no matter how its
/// other attributes diverge.
pub fn missing_relations<'a>(local: &'a [Relation], remote: &[Relation]) -> Vec<&'a Relation> {
    local
        .iter()
        .filter(|r| !remote.iter().any(|e| e.identity() == r.identity()))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
