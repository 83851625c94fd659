//! Definition record types.
//!
//! Records are loaded from JSON files and round-trip through serde; every
//! struct carries a flattened `extra` map so attributes this tool does not
//! interpret survive a pull → push cycle untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// Metadata attached to a collection. Only the `system` marker is
/// interpreted; everything else is carried opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CollectionMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named data schema definition, stored one per file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Unique collection name; also the definition filename stem.
    pub collection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<CollectionMeta>,
    /// `null` for alias/folder collections that own no table.
    #[serde(default)]
    pub schema: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<Relation>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Collection {
    /// System collections are excluded from all processing.
    pub fn is_system(&self) -> bool {
        self.meta
            .as_ref()
            .and_then(|m| m.system)
            .unwrap_or(false)
    }

    /// Whether the collection owns a table (fields and relations only make
    /// sense when it does).
    pub fn has_schema(&self) -> bool {
        !self.schema.is_null()
    }
}

/// An attribute definition belonging to a collection.
///
/// `meta` may carry a remote-assigned `id`; it is stripped before upload
/// (see [`crate::sanitize`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A link definition between a field and a related collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub field: String,
    /// `None` for relations that point at no single collection.
    #[serde(default)]
    pub related_collection: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Relation {
    /// Existence identity: the `(field, related_collection)` pair. All other
    /// attributes are deliberately ignored when checking "already exists".
    pub fn identity(&self) -> (&str, Option<&str>) {
        (self.field.as_str(), self.related_collection.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Flows
// ---------------------------------------------------------------------------

/// A named automation definition composed of operations, stored one per
/// file with its operations embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    /// Unique flow id; also the definition filename stem.
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<Operation>,
    /// Remote-assigned creator reference; stripped before upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_created: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single step in a flow.
///
/// `resolve` and `reject` optionally name another operation in the same
/// flow, forming the success-path and failure-path edges of the operation
/// graph. The model does not forbid cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub resolve: Option<String>,
    #[serde(default)]
    pub reject: Option<String>,
    /// Owning flow id; overwritten immediately before upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    /// Remote-assigned creator reference; stripped before upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_created: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn collection_roundtrip_preserves_unknown_attributes() {
        let raw = json!({
            "collection": "articles",
            "meta": { "system": false, "icon": "article", "note": null },
            "schema": { "name": "articles" },
            "fields": [
                { "field": "title", "type": "string", "meta": { "id": 7 } }
            ],
            "relations": [],
            "custom_top_level": "kept"
        });

        let collection: Collection = serde_json::from_value(raw.clone()).expect("parse");
        assert_eq!(collection.collection, "articles");
        assert_eq!(collection.fields.len(), 1);
        assert_eq!(collection.extra.get("custom_top_level"), Some(&json!("kept")));

        let back = serde_json::to_value(&collection).expect("serialize");
        assert_eq!(back["meta"]["icon"], json!("article"));
        assert_eq!(back["fields"][0]["type"], json!("string"));
        assert_eq!(back["custom_top_level"], json!("kept"));
    }

    #[test]
    fn system_flag_defaults_to_false() {
        let plain: Collection =
            serde_json::from_value(json!({ "collection": "articles" })).expect("parse");
        assert!(!plain.is_system());

        let system: Collection = serde_json::from_value(json!({
            "collection": "service_users",
            "meta": { "system": true }
        }))
        .expect("parse");
        assert!(system.is_system());
    }

    #[test]
    fn alias_collection_has_no_schema() {
        let alias: Collection = serde_json::from_value(json!({
            "collection": "grouping",
            "schema": null
        }))
        .expect("parse");
        assert!(!alias.has_schema());
    }

    #[test]
    fn relation_identity_ignores_other_attributes() {
        let a: Relation = serde_json::from_value(json!({
            "field": "author",
            "related_collection": "users",
            "meta": { "one_deselect_action": "nullify" }
        }))
        .expect("parse");
        let b: Relation = serde_json::from_value(json!({
            "field": "author",
            "related_collection": "users",
            "schema": { "on_delete": "SET NULL" }
        }))
        .expect("parse");
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn flow_roundtrip_with_embedded_operations() {
        let raw = json!({
            "id": "f1",
            "name": "Notify",
            "status": "active",
            "user_created": "7d5a-uuid",
            "operations": [
                { "id": "a", "name": "log", "resolve": "b", "reject": null },
                { "id": "b", "name": "mail", "resolve": null, "reject": null }
            ]
        });

        let flow: Flow = serde_json::from_value(raw).expect("parse");
        assert_eq!(flow.operations.len(), 2);
        assert_eq!(flow.operations[0].resolve.as_deref(), Some("b"));
        assert_eq!(flow.extra.get("status"), Some(&serde_json::json!("active")));

        let back = serde_json::to_value(&flow).expect("serialize");
        assert_eq!(back["operations"][1]["id"], serde_json::json!("b"));
        assert_eq!(back["user_created"], serde_json::json!("7d5a-uuid"));
    }
}
