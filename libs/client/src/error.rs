use thiserror::Error;

use crate::connection::ClientState;
use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum VexdbError {
    /// Operation attempted while the client is not in the Connected state
    #[error("Client is {0}; call connect() before issuing operations")]
    Lifecycle(ClientState),

    /// Caller-supplied input rejected before any network I/O
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Transport-level failure: unreachable endpoint, TLS, timeout
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server returned a non-success status for a well-formed request
    #[error("Request failed with status {status}: {message}")]
    Request { status: u16, message: String },

    /// A response field this client depends on is missing or has the wrong shape
    #[error("Could not decode server response: {0}")]
    Decode(String),

    /// The connected server version does not support the requested capability
    #[error("{feature} requires server {requires} or newer, connected server is {server}")]
    Unsupported {
        feature: String,
        requires: String,
        server: String,
    },
}

pub type VexdbResult<T> = Result<T, VexdbError>;

impl From<TransportError> for VexdbError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connection(msg) => VexdbError::Connection(msg),
            TransportError::Status { status, message } => VexdbError::Request { status, message },
        }
    }
}

impl From<vexdb_grpc::GrpcError> for VexdbError {
    fn from(err: vexdb_grpc::GrpcError) -> Self {
        VexdbError::Connection(err.to_string())
    }
}

impl From<serde_json::Error> for VexdbError {
    fn from(err: serde_json::Error) -> Self {
        VexdbError::Decode(format!("JSON error: {}", err))
    }
}

impl From<prost::DecodeError> for VexdbError {
    fn from(err: prost::DecodeError) -> Self {
        VexdbError::Decode(format!("protobuf error: {}", err))
    }
}

impl VexdbError {
    /// Whether the failure points at caller input rather than the environment
    pub fn is_usage_error(&self) -> bool {
        matches!(self, VexdbError::Lifecycle(_) | VexdbError::Validation(_))
    }
}
