use thiserror::Error;

pub type GrpcResult<T> = Result<T, GrpcError>;

/// Errors raised while creating or configuring a gRPC channel
#[derive(Error, Debug)]
pub enum GrpcError {
  /// Invalid URI provided for the gRPC endpoint
  #[error("Invalid URI: {0}")]
  InvalidUri(tonic::transport::Error),

  /// Failed to establish the connection
  #[error("Connection failed: {0}")]
  ConnectionFailed(tonic::transport::Error),

  /// A header key or value could not be encoded as gRPC metadata
  #[error("Invalid metadata: {0}")]
  InvalidMetadata(String),
}
