use std::time::Duration;
use tonic::transport::Endpoint;

/// Configuration for gRPC channel creation
///
/// Builder for the HTTP/2 and TCP settings applied to the VexDB gRPC
/// endpoint. The defaults are sized for vector workloads: 1MB flow-control
/// windows so large search replies and batch requests stream without
/// stalling, and keep-alive tuned to survive idle periods between queries.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
  // HTTP/2 keep-alive
  pub http2_keep_alive_interval: Option<Duration>,
  pub keep_alive_timeout: Duration,
  pub keep_alive_while_idle: bool,

  // Connection settings
  pub connect_timeout: Duration,
  pub timeout: Duration,

  // Window sizes (HTTP/2 flow control)
  pub initial_connection_window_size: Option<u32>,
  pub initial_stream_window_size: Option<u32>,
  pub http2_adaptive_window: bool,

  // TCP settings
  pub tcp_nodelay: bool,
  pub tcp_keepalive: Option<Duration>,
}

impl Default for ChannelConfig {
  fn default() -> Self {
    Self {
      http2_keep_alive_interval: Some(Duration::from_secs(30)),
      keep_alive_timeout: Duration::from_secs(10),
      keep_alive_while_idle: true,
      connect_timeout: Duration::from_secs(5),
      timeout: Duration::from_secs(30),
      initial_connection_window_size: Some(1024 * 1024), // 1MB
      initial_stream_window_size: Some(1024 * 1024),     // 1MB
      http2_adaptive_window: true,
      tcp_nodelay: true,
      tcp_keepalive: Some(Duration::from_secs(30)),
    }
  }
}

impl ChannelConfig {
  /// Create a new configuration with the default tuning
  pub fn new() -> Self {
    Self::default()
  }

  /// Set the connection timeout
  pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
    self.connect_timeout = timeout;
    self
  }

  /// Set the request timeout for individual RPCs
  ///
  /// Per-call deadlines passed through the client override this value for
  /// that call only.
  pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  /// Set the HTTP/2 keep-alive interval
  pub fn with_keep_alive_interval(mut self, interval: Duration) -> Self {
    self.http2_keep_alive_interval = Some(interval);
    self
  }

  /// Disable HTTP/2 keep-alive
  pub fn without_keep_alive(mut self) -> Self {
    self.http2_keep_alive_interval = None;
    self
  }

  /// Set both connection and stream window sizes to the same value
  ///
  /// Raise this when batch inserts routinely carry multi-megabyte payloads.
  pub fn with_window_size(mut self, size: u32) -> Self {
    self.initial_connection_window_size = Some(size);
    self.initial_stream_window_size = Some(size);
    self
  }

  /// Apply this configuration to a tonic Endpoint
  pub(crate) fn apply_to_endpoint(self, mut endpoint: Endpoint) -> Endpoint {
    if let Some(interval) = self.http2_keep_alive_interval {
      endpoint = endpoint.http2_keep_alive_interval(interval);
    }
    endpoint = endpoint
      .keep_alive_timeout(self.keep_alive_timeout)
      .keep_alive_while_idle(self.keep_alive_while_idle);

    endpoint = endpoint
      .connect_timeout(self.connect_timeout)
      .timeout(self.timeout);

    if let Some(size) = self.initial_connection_window_size {
      endpoint = endpoint.initial_connection_window_size(size);
    }
    if let Some(size) = self.initial_stream_window_size {
      endpoint = endpoint.initial_stream_window_size(size);
    }
    endpoint = endpoint.http2_adaptive_window(self.http2_adaptive_window);

    endpoint = endpoint.tcp_nodelay(self.tcp_nodelay);
    if let Some(keepalive) = self.tcp_keepalive {
      endpoint = endpoint.tcp_keepalive(Some(keepalive));
    }

    endpoint
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_config() {
    let config = ChannelConfig::default();
    assert_eq!(config.connect_timeout, Duration::from_secs(5));
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.initial_connection_window_size, Some(1024 * 1024));
    assert_eq!(config.initial_stream_window_size, Some(1024 * 1024));
    assert!(config.tcp_nodelay);
    assert!(config.http2_adaptive_window);
  }

  #[test]
  fn test_builder_pattern() {
    let config = ChannelConfig::new()
      .with_connect_timeout(Duration::from_secs(10))
      .with_request_timeout(Duration::from_secs(120))
      .with_window_size(2 * 1024 * 1024);

    assert_eq!(config.connect_timeout, Duration::from_secs(10));
    assert_eq!(config.timeout, Duration::from_secs(120));
    assert_eq!(config.initial_connection_window_size, Some(2 * 1024 * 1024));
    assert_eq!(config.initial_stream_window_size, Some(2 * 1024 * 1024));
  }

  #[test]
  fn test_disable_keep_alive() {
    let config = ChannelConfig::new().without_keep_alive();
    assert_eq!(config.http2_keep_alive_interval, None);
  }
}
