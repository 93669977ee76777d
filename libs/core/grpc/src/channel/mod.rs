pub mod config;

pub use config::ChannelConfig;

use crate::error::{GrpcError, GrpcResult};
use tonic::transport::{Channel, Endpoint};

/// Creates a gRPC channel to a VexDB node and waits for it to connect
///
/// ## Example
/// ```ignore
/// use vexdb_grpc::create_channel;
///
/// let channel = create_channel("http://localhost:50051").await?;
/// ```
pub async fn create_channel(addr: impl Into<String>) -> GrpcResult<Channel> {
  create_channel_with_config(addr, ChannelConfig::default()).await
}

/// Creates a lazy gRPC channel that connects on first request
///
/// Returns immediately without establishing a connection; the connection is
/// made when the first RPC is dispatched. The client's `connect()` uses this
/// together with the REST readiness probe, so a node that accepts HTTP but
/// has not yet opened its gRPC port does not fail channel creation.
pub fn create_channel_lazy(addr: impl Into<String>) -> GrpcResult<Channel> {
  create_channel_lazy_with_config(addr, ChannelConfig::default())
}

/// Creates a lazy gRPC channel with custom configuration
pub fn create_channel_lazy_with_config(
  addr: impl Into<String>,
  config: ChannelConfig,
) -> GrpcResult<Channel> {
  let addr_string = addr.into();

  let endpoint = Endpoint::from_shared(addr_string.clone()).map_err(|e| {
    tracing::error!(target: "vexdb_grpc", addr = %addr_string, error = ?e, "Invalid URI");
    GrpcError::InvalidUri(e)
  })?;

  let endpoint = config.apply_to_endpoint(endpoint);

  tracing::debug!(
        target: "vexdb_grpc",
        addr = %addr_string,
        "Creating lazy gRPC channel (connects on first request)"
    );

  Ok(endpoint.connect_lazy())
}

/// Creates a gRPC channel with custom configuration
///
/// ## Example
/// ```ignore
/// use vexdb_grpc::{create_channel_with_config, ChannelConfig};
/// use std::time::Duration;
///
/// let config = ChannelConfig::default()
///     .with_connect_timeout(Duration::from_secs(10))
///     .with_request_timeout(Duration::from_secs(120));
///
/// let channel = create_channel_with_config("http://localhost:50051", config).await?;
/// ```
pub async fn create_channel_with_config(
  addr: impl Into<String>,
  config: ChannelConfig,
) -> GrpcResult<Channel> {
  let addr_string = addr.into();

  let endpoint = Endpoint::from_shared(addr_string.clone()).map_err(|e| {
    tracing::error!(target: "vexdb_grpc", addr = %addr_string, error = ?e, "Invalid URI");
    GrpcError::InvalidUri(e)
  })?;

  let endpoint = config.apply_to_endpoint(endpoint);

  tracing::debug!(
        target: "vexdb_grpc",
        addr = %addr_string,
        "Creating gRPC channel"
    );

  endpoint.connect().await.map_err(|e| {
    tracing::error!(
            target: "vexdb_grpc",
            addr = %addr_string,
            error = ?e,
            "Failed to connect to VexDB gRPC endpoint"
        );
    GrpcError::ConnectionFailed(e)
  })
}
