//! The remote gateway: the [`Remote`] trait and its blocking HTTP
//! implementation.
//!
//! The service wraps every response in a `{"data": ...}` envelope; all
//! listings decode through it. Mutating calls POST/PATCH a JSON body and
//! only care about the status line.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use ferry_core::types::{Collection, Field, Flow, Operation, Relation};

use crate::config::Config;
use crate::error::RemoteError;

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

pub(crate) fn fields_endpoint(collection: &str) -> String {
    format!("/fields/{collection}")
}

pub(crate) fn relations_endpoint(collection: &str) -> String {
    format!("/relations/{collection}")
}

pub(crate) fn operations_endpoint(flow_id: &str) -> String {
    format!("/operations?filter[flow]={flow_id}")
}

pub(crate) fn flow_endpoint(id: &str) -> String {
    format!("/flows/{id}")
}

pub(crate) fn operation_endpoint(id: &str) -> String {
    format!("/operations/{id}")
}

// ---------------------------------------------------------------------------
// Remote trait
// ---------------------------------------------------------------------------

/// A flow as the remote lists it: the record itself plus the ids of the
/// operations it currently owns (the full operation records live behind
/// a separate listing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowListing {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub operations: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FlowListing {
    /// Whether the remote flow already records this operation id.
    pub fn has_operation(&self, operation_id: &str) -> bool {
        self.operations.iter().any(|id| id == operation_id)
    }

    /// Rebuild a full flow record by replacing the operation-id list with
    /// the fetched operation records (the pull direction).
    pub fn into_flow(self, operations: Vec<Operation>) -> Result<Flow, serde_json::Error> {
        let mut record = serde_json::to_value(&self)?;
        record["operations"] = serde_json::to_value(operations)?;
        serde_json::from_value(record)
    }
}

/// Authenticated operations against the remote schema-management service.
///
/// Every mutating call changes remote state; implementations perform no
/// retries. This is the seam the sync engine is tested through.
pub trait Remote {
    fn list_collections(&self) -> Result<Vec<Collection>, RemoteError>;
    fn list_fields(&self, collection: &str) -> Result<Vec<Field>, RemoteError>;
    fn list_relations(&self, collection: &str) -> Result<Vec<Relation>, RemoteError>;
    fn list_flows(&self) -> Result<Vec<FlowListing>, RemoteError>;
    fn list_operations(&self, flow_id: &str) -> Result<Vec<Operation>, RemoteError>;

    fn create_collection(&self, body: &Value) -> Result<(), RemoteError>;
    fn create_field(&self, collection: &str, body: &Value) -> Result<(), RemoteError>;
    fn create_relation(&self, body: &Value) -> Result<(), RemoteError>;
    fn create_flow(&self, body: &Value) -> Result<(), RemoteError>;
    fn update_flow(&self, id: &str, body: &Value) -> Result<(), RemoteError>;
    fn create_operation(&self, body: &Value) -> Result<(), RemoteError>;
    fn update_operation(&self, id: &str, body: &Value) -> Result<(), RemoteError>;

    fn clear_cache(&self) -> Result<(), RemoteError>;
}

// ---------------------------------------------------------------------------
// Gateway — blocking ureq implementation
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Blocking HTTP gateway carrying the bearer token on every call.
pub struct Gateway {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

impl Gateway {
    pub fn new(config: Config) -> Self {
        Self {
            agent: ureq::agent(),
            base_url: config.base_url,
            token: config.token,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }

    fn get_data<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, RemoteError> {
        log::debug!("GET {endpoint}");
        let response = self
            .agent
            .get(&self.url(endpoint))
            .set("Authorization", &self.authorization())
            .call()
            .map_err(|e| RemoteError::from_ureq(endpoint, e))?;
        let envelope: Envelope<T> =
            response.into_json().map_err(|e| RemoteError::Decode {
                endpoint: endpoint.to_string(),
                source: e,
            })?;
        Ok(envelope.data)
    }

    fn send(&self, method: &str, endpoint: &str, body: &Value) -> Result<(), RemoteError> {
        log::debug!("{method} {endpoint}");
        self.agent
            .request(method, &self.url(endpoint))
            .set("Authorization", &self.authorization())
            .send_json(body)
            .map_err(|e| RemoteError::from_ureq(endpoint, e))?;
        Ok(())
    }
}

impl Remote for Gateway {
    fn list_collections(&self) -> Result<Vec<Collection>, RemoteError> {
        self.get_data("/collections")
    }

    fn list_fields(&self, collection: &str) -> Result<Vec<Field>, RemoteError> {
        self.get_data(&fields_endpoint(collection))
    }

    fn list_relations(&self, collection: &str) -> Result<Vec<Relation>, RemoteError> {
        self.get_data(&relations_endpoint(collection))
    }

    fn list_flows(&self) -> Result<Vec<FlowListing>, RemoteError> {
        self.get_data("/flows")
    }

    fn list_operations(&self, flow_id: &str) -> Result<Vec<Operation>, RemoteError> {
        self.get_data(&operations_endpoint(flow_id))
    }

    fn create_collection(&self, body: &Value) -> Result<(), RemoteError> {
        self.send("POST", "/collections", body)
    }

    fn create_field(&self, collection: &str, body: &Value) -> Result<(), RemoteError> {
        self.send("POST", &fields_endpoint(collection), body)
    }

    fn create_relation(&self, body: &Value) -> Result<(), RemoteError> {
        self.send("POST", "/relations", body)
    }

    fn create_flow(&self, body: &Value) -> Result<(), RemoteError> {
        self.send("POST", "/flows", body)
    }

    fn update_flow(&self, id: &str, body: &Value) -> Result<(), RemoteError> {
        self.send("PATCH", &flow_endpoint(id), body)
    }

    fn create_operation(&self, body: &Value) -> Result<(), RemoteError> {
        self.send("POST", "/operations", body)
    }

    fn update_operation(&self, id: &str, body: &Value) -> Result<(), RemoteError> {
        self.send("PATCH", &operation_endpoint(id), body)
    }

    fn clear_cache(&self) -> Result<(), RemoteError> {
        let endpoint = "/utils/cache/clear";
        log::debug!("POST {endpoint}");
        self.agent
            .post(&self.url(endpoint))
            .set("Authorization", &self.authorization())
            .call()
            .map_err(|e| RemoteError::from_ureq(endpoint, e))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
