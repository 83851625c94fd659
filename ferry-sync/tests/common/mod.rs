//! In-memory remote double shared by the sync integration tests.
//!
//! Listings answer from canned data; every call is recorded as a short
//! label (`"create-field articles.summary"`) so tests can assert on the
//! exact call sequence. Labels listed in `fail_on` answer HTTP 500.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use ferry_core::types::{Collection, Field, Operation, Relation};
use ferry_remote::{FlowListing, Remote, RemoteError};

#[derive(Default)]
pub struct FakeRemote {
    collections: Vec<Collection>,
    fields: HashMap<String, Vec<Field>>,
    relations: HashMap<String, Vec<Relation>>,
    flows: Vec<FlowListing>,
    operations: HashMap<String, Vec<Operation>>,
    fail_on: Vec<String>,
    calls: RefCell<Vec<String>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, record: Value) -> Self {
        self.collections
            .push(serde_json::from_value(record).expect("collection fixture"));
        self
    }

    pub fn with_fields(mut self, collection: &str, records: Value) -> Self {
        self.fields.insert(
            collection.to_string(),
            serde_json::from_value(records).expect("fields fixture"),
        );
        self
    }

    pub fn with_relations(mut self, collection: &str, records: Value) -> Self {
        self.relations.insert(
            collection.to_string(),
            serde_json::from_value(records).expect("relations fixture"),
        );
        self
    }

    pub fn with_flow(mut self, record: Value) -> Self {
        self.flows
            .push(serde_json::from_value(record).expect("flow fixture"));
        self
    }

    pub fn with_operations(mut self, flow_id: &str, records: Value) -> Self {
        self.operations.insert(
            flow_id.to_string(),
            serde_json::from_value(records).expect("operations fixture"),
        );
        self
    }

    /// Answer HTTP 500 whenever this exact call label comes in.
    pub fn fail_on(mut self, label: &str) -> Self {
        self.fail_on.push(label.to_string());
        self
    }

    /// Every call made, in order, as labels.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Only the calls that mutate remote state.
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| {
                c.starts_with("create-") || c.starts_with("update-") || c == "clear-cache"
            })
            .collect()
    }

    pub fn position(&self, label: &str) -> usize {
        self.calls()
            .iter()
            .position(|c| c == label)
            .unwrap_or_else(|| panic!("call '{label}' never happened; calls: {:?}", self.calls()))
    }

    fn record(&self, label: String) -> Result<(), RemoteError> {
        let failing = self.fail_on.contains(&label);
        self.calls.borrow_mut().push(label.clone());
        if failing {
            return Err(RemoteError::Status {
                endpoint: label,
                status: 500,
            });
        }
        Ok(())
    }
}

fn body_str<'a>(body: &'a Value, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or("?")
}

impl Remote for FakeRemote {
    fn list_collections(&self) -> Result<Vec<Collection>, RemoteError> {
        self.record("list-collections".to_string())?;
        Ok(self.collections.clone())
    }

    fn list_fields(&self, collection: &str) -> Result<Vec<Field>, RemoteError> {
        self.record(format!("list-fields {collection}"))?;
        Ok(self.fields.get(collection).cloned().unwrap_or_default())
    }

    fn list_relations(&self, collection: &str) -> Result<Vec<Relation>, RemoteError> {
        self.record(format!("list-relations {collection}"))?;
        Ok(self.relations.get(collection).cloned().unwrap_or_default())
    }

    fn list_flows(&self) -> Result<Vec<FlowListing>, RemoteError> {
        self.record("list-flows".to_string())?;
        Ok(self.flows.clone())
    }

    fn list_operations(&self, flow_id: &str) -> Result<Vec<Operation>, RemoteError> {
        self.record(format!("list-operations {flow_id}"))?;
        Ok(self.operations.get(flow_id).cloned().unwrap_or_default())
    }

    fn create_collection(&self, body: &Value) -> Result<(), RemoteError> {
        self.record(format!("create-collection {}", body_str(body, "collection")))
    }

    fn create_field(&self, collection: &str, body: &Value) -> Result<(), RemoteError> {
        self.record(format!("create-field {collection}.{}", body_str(body, "field")))
    }

    fn create_relation(&self, body: &Value) -> Result<(), RemoteError> {
        self.record(format!("create-relation {}", body_str(body, "field")))
    }

    fn create_flow(&self, body: &Value) -> Result<(), RemoteError> {
        self.record(format!("create-flow {}", body_str(body, "id")))
    }

    fn update_flow(&self, id: &str, _body: &Value) -> Result<(), RemoteError> {
        self.record(format!("update-flow {id}"))
    }

    fn create_operation(&self, body: &Value) -> Result<(), RemoteError> {
        self.record(format!("create-operation {}", body_str(body, "id")))
    }

    fn update_operation(&self, id: &str, _body: &Value) -> Result<(), RemoteError> {
        self.record(format!("update-operation {id}"))
    }

    fn clear_cache(&self) -> Result<(), RemoteError> {
        self.record("clear-cache".to_string())
    }
}
