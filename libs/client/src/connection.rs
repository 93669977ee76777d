use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use http::Method;

use crate::config::ClientConfig;
use crate::error::{VexdbError, VexdbResult};
use crate::executor::expect_rest;
use crate::models::{Meta, ServerVersion};
use crate::transport::{HttpTransport, Transport, WireRequest, WireResponse};

pub(crate) const READY_PATH: &str = "/v1/.well-known/ready";
pub(crate) const LIVE_PATH: &str = "/v1/.well-known/live";
pub(crate) const META_PATH: &str = "/v1/meta";

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lifecycle state of a client
///
/// `Unconnected -> Connected -> Closed`; `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Unconnected,
    Connected,
    Closed,
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientState::Unconnected => write!(f, "unconnected"),
            ClientState::Connected => write!(f, "connected"),
            ClientState::Closed => write!(f, "closed"),
        }
    }
}

pub(crate) struct ServerMeta {
    pub version: ServerVersion,
    pub raw: Meta,
}

/// Owns the transport session shared by all resource facades
///
/// Either fully usable (Connected) or fully unusable; `perform` fails fast
/// with a lifecycle error in every other state. Only `connect` and `close`
/// mutate the session; response parsing never does.
pub(crate) struct Connection {
    config: ClientConfig,
    /// Transport supplied at construction instead of the built-in one
    injected: Option<Arc<dyn Transport>>,
    state: RwLock<ClientState>,
    transport: RwLock<Option<Arc<dyn Transport>>>,
    meta: OnceLock<ServerMeta>,
}

impl Connection {
    pub fn new(config: ClientConfig, injected: Option<Arc<dyn Transport>>) -> Self {
        Self {
            config,
            injected,
            state: RwLock::new(ClientState::Unconnected),
            transport: RwLock::new(None),
            meta: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> ClientState {
        match self.state.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ClientState::Connected
    }

    /// Open the session: build the transport, wait for readiness, cache meta
    ///
    /// Calling `connect` on an already-open connection is a no-op returning
    /// `Ok`. Calling it on a closed connection is a lifecycle error; a closed
    /// client never reconnects.
    pub async fn connect(&self) -> VexdbResult<()> {
        match self.state() {
            ClientState::Connected => {
                tracing::debug!(target: "vexdb_client", "connect() on an open client is a no-op");
                return Ok(());
            }
            ClientState::Closed => return Err(VexdbError::Lifecycle(ClientState::Closed)),
            ClientState::Unconnected => {}
        }

        let transport: Arc<dyn Transport> = match &self.injected {
            Some(transport) => transport.clone(),
            None => Arc::new(HttpTransport::new(&self.config)?),
        };

        self.wait_for_ready(transport.as_ref()).await?;

        let meta = self.fetch_meta(transport.as_ref()).await?;
        let version = meta.version.clone();
        let _ = self.meta.set(meta);

        {
            let mut slot = match self.transport.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            *slot = Some(transport);
        }
        self.set_state(ClientState::Connected);

        tracing::debug!(
            target: "vexdb_client",
            rest = %self.config.rest_url,
            grpc = %self.config.grpc_url,
            server = %version,
            "Connected to VexDB"
        );
        Ok(())
    }

    /// Release the session; safe to call any number of times
    pub fn close(&self) {
        if self.state() == ClientState::Closed {
            return;
        }
        {
            let mut slot = match self.transport.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            *slot = None;
        }
        self.set_state(ClientState::Closed);
        tracing::debug!(target: "vexdb_client", "Connection closed");
    }

    /// Send one request; no retries, no lifecycle side effects
    pub async fn perform(&self, request: WireRequest) -> VexdbResult<WireResponse> {
        // Clone the transport handle out so no lock is held across the await
        let transport = {
            match self.state() {
                ClientState::Connected => {}
                other => return Err(VexdbError::Lifecycle(other)),
            }
            let guard = match self.transport.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.clone()
        };

        match transport {
            Some(transport) => Ok(transport.send(request).await?),
            // close() raced between the state check and the transport read
            None => Err(VexdbError::Lifecycle(self.state())),
        }
    }

    pub fn server_version(&self) -> Option<&ServerVersion> {
        self.meta.get().map(|meta| &meta.version)
    }

    pub fn cached_meta(&self) -> Option<&Meta> {
        self.meta.get().map(|meta| &meta.raw)
    }

    /// Fail with Unsupported when the connected server is older than required
    pub fn require_version(&self, feature: &str, requires: ServerVersion) -> VexdbResult<()> {
        match self.meta.get() {
            Some(meta) if meta.version >= requires => Ok(()),
            Some(meta) => Err(VexdbError::Unsupported {
                feature: feature.to_string(),
                requires: requires.to_string(),
                server: meta.version.to_string(),
            }),
            None => Err(VexdbError::Lifecycle(self.state())),
        }
    }

    fn set_state(&self, state: ClientState) {
        let mut guard = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = state;
    }

    async fn wait_for_ready(&self, transport: &dyn Transport) -> VexdbResult<()> {
        let deadline = Instant::now() + self.config.startup_timeout;
        let mut last_failure = String::from("no response");

        loop {
            let request = WireRequest::rest(Method::GET, READY_PATH, None);
            match transport.send(request).await {
                Ok(WireResponse::Rest { status, .. }) if (200..300).contains(&status) => {
                    return Ok(());
                }
                Ok(WireResponse::Rest { status, .. }) => {
                    last_failure = format!("readiness probe returned status {}", status);
                }
                Ok(WireResponse::Grpc { .. }) => {
                    last_failure = "readiness probe returned a gRPC frame".to_string();
                }
                Err(err) => {
                    last_failure = err.to_string();
                }
            }

            if Instant::now() >= deadline {
                return Err(VexdbError::Connection(format!(
                    "server not ready within {:?}: {}",
                    self.config.startup_timeout, last_failure
                )));
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }

    async fn fetch_meta(&self, transport: &dyn Transport) -> VexdbResult<ServerMeta> {
        let request = WireRequest::rest(Method::GET, META_PATH, None);
        let response = transport.send(request).await.map_err(VexdbError::from)?;
        let body = expect_rest(response, &[200])?;

        let raw: Meta = serde_json::from_value(body)?;
        let version = ServerVersion::parse(&raw.version)?;
        Ok(ServerMeta { version, raw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MockTransport, TransportError};
    use mockall::Sequence;
    use serde_json::json;
    use std::time::Duration;

    fn config() -> ClientConfig {
        ClientConfig::local().with_startup_timeout(Duration::from_secs(1))
    }

    fn rest_ok(body: serde_json::Value) -> WireResponse {
        WireResponse::Rest { status: 200, body }
    }

    #[tokio::test]
    async fn test_connect_polls_until_ready() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(TransportError::Connection("connection refused".into())));
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(rest_ok(json!(null))));
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(rest_ok(json!({"version": "1.34.0"}))));

        let connection = Connection::new(config(), Some(Arc::new(transport)));
        connection.connect().await.unwrap();
        assert!(connection.is_connected());
        assert_eq!(
            connection.server_version().unwrap().to_string(),
            "1.34.0"
        );
    }

    #[tokio::test]
    async fn test_connect_gives_up_after_startup_window() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Err(TransportError::Connection("connection refused".into())));

        let connection = Connection::new(
            ClientConfig::local().with_startup_timeout(Duration::from_millis(50)),
            Some(Arc::new(transport)),
        );
        let err = connection.connect().await.unwrap_err();
        assert!(matches!(err, VexdbError::Connection(_)));
        assert!(err.to_string().contains("connection refused"));
        assert!(!connection.is_connected());
    }

    #[tokio::test]
    async fn test_connect_is_idempotent_when_open() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(rest_ok(json!(null))));
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(rest_ok(json!({"version": "1.34.0"}))));

        let connection = Connection::new(config(), Some(Arc::new(transport)));
        connection.connect().await.unwrap();
        // Second connect must not touch the transport again
        connection.connect().await.unwrap();
        assert!(connection.is_connected());
    }

    #[tokio::test]
    async fn test_closed_connection_never_reconnects() {
        let transport = MockTransport::new();
        let connection = Connection::new(config(), Some(Arc::new(transport)));
        connection.close();
        let err = connection.connect().await.unwrap_err();
        assert!(matches!(err, VexdbError::Lifecycle(ClientState::Closed)));
    }

    #[tokio::test]
    async fn test_bad_meta_version_is_a_decode_error() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(rest_ok(json!(null))));
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(rest_ok(json!({"version": "not-a-version"}))));

        let connection = Connection::new(config(), Some(Arc::new(transport)));
        let err = connection.connect().await.unwrap_err();
        assert!(matches!(err, VexdbError::Decode(_)));
    }

    #[tokio::test]
    async fn test_require_version_gates_old_servers() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(rest_ok(json!(null))));
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(rest_ok(json!({"version": "1.20.3"}))));

        let connection = Connection::new(config(), Some(Arc::new(transport)));
        connection.connect().await.unwrap();

        let err = connection
            .require_version("replication", ServerVersion::new(1, 32, 0))
            .unwrap_err();
        match err {
            VexdbError::Unsupported { server, .. } => assert_eq!(server, "1.20.3"),
            other => panic!("expected Unsupported, got {:?}", other),
        }

        connection
            .require_version("tenants", ServerVersion::new(1, 18, 0))
            .unwrap();
    }
}
