//! Error types for ferry-remote.

use thiserror::Error;

/// A failed remote call. No retries happen at this layer — retry policy,
/// if any, belongs to the caller.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The service answered with a non-success HTTP status.
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// The call never produced an HTTP response (DNS, connect, TLS, ...).
    #[error("transport failure calling {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    /// The response body was not the expected JSON envelope.
    #[error("invalid payload from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },
}

impl RemoteError {
    /// The endpoint the failing call was addressed to.
    pub fn endpoint(&self) -> &str {
        match self {
            RemoteError::Status { endpoint, .. }
            | RemoteError::Transport { endpoint, .. }
            | RemoteError::Decode { endpoint, .. } => endpoint,
        }
    }

    pub(crate) fn from_ureq(endpoint: &str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, _) => RemoteError::Status {
                endpoint: endpoint.to_string(),
                status,
            },
            ureq::Error::Transport(transport) => RemoteError::Transport {
                endpoint: endpoint.to_string(),
                source: Box::new(transport),
            },
        }
    }
}
