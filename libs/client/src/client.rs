//! Async entry point

use std::sync::Arc;

use http::Method;

use crate::api::{
    Backup, Batch, Cluster, Collections, Data, Debug, Query, Rbac, Replication, Tenants,
};
use crate::config::ClientConfig;
use crate::connection::{ClientState, Connection, LIVE_PATH, READY_PATH};
use crate::error::VexdbResult;
use crate::executor::Executor;
use crate::models::Meta;
use crate::transport::{Transport, WireRequest, WireResponse};

/// Async VexDB client
///
/// Cheap to clone; all clones share one connection and its lifecycle. Call
/// [`connect`](Self::connect) before issuing operations and
/// [`close`](Self::close) when done; a closed client cannot be reopened.
///
/// ```no_run
/// use vexdb_client::{ClientConfig, VexdbClient};
///
/// # async fn run() -> Result<(), vexdb_client::VexdbError> {
/// let client = VexdbClient::new(ClientConfig::local())?;
/// client.connect().await?;
/// let collections = client.collections().list().await?;
/// client.close();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct VexdbClient {
    connection: Arc<Connection>,
    executor: Executor,
}

impl VexdbClient {
    pub fn new(config: ClientConfig) -> VexdbResult<Self> {
        Ok(Self::build(config, None))
    }

    /// Construct a client and connect it in one step
    pub async fn open(config: ClientConfig) -> VexdbResult<Self> {
        let client = Self::new(config)?;
        client.connect().await?;
        Ok(client)
    }

    /// Build a client over a caller-supplied transport
    ///
    /// The readiness probe and meta fetch go through the given transport,
    /// so it must answer the well-known endpoints during `connect`.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self::build(config, Some(transport))
    }

    fn build(config: ClientConfig, injected: Option<Arc<dyn Transport>>) -> Self {
        let connection = Arc::new(Connection::new(config, injected));
        let executor = Executor::new(connection.clone());
        Self {
            connection,
            executor,
        }
    }

    /// Establish the session: wait for readiness, then fetch server meta
    ///
    /// Idempotent while open; fails on a closed client.
    pub async fn connect(&self) -> VexdbResult<()> {
        self.connection.connect().await
    }

    /// Tear the session down; safe to call more than once
    pub fn close(&self) {
        self.connection.close();
    }

    pub fn state(&self) -> ClientState {
        self.connection.state()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Server meta captured during `connect`
    pub fn meta(&self) -> Option<Meta> {
        self.connection.cached_meta().cloned()
    }

    pub async fn is_live(&self) -> VexdbResult<bool> {
        self.probe(LIVE_PATH).await
    }

    pub async fn is_ready(&self) -> VexdbResult<bool> {
        self.probe(READY_PATH).await
    }

    async fn probe(&self, path: &str) -> VexdbResult<bool> {
        let request = WireRequest::rest(Method::GET, path, None);
        match self.connection.perform(request).await {
            Ok(WireResponse::Rest { status, .. }) => Ok((200..300).contains(&status)),
            Ok(WireResponse::Grpc { .. }) => Ok(false),
            Err(crate::error::VexdbError::Connection(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub fn collections(&self) -> Collections {
        Collections::new(self.executor.clone())
    }

    pub fn data(&self) -> Data {
        Data::new(self.executor.clone())
    }

    pub fn batch(&self) -> Batch {
        Batch::new(self.executor.clone())
    }

    pub fn query(&self) -> Query {
        Query::new(self.executor.clone())
    }

    pub fn tenants(&self) -> Tenants {
        Tenants::new(self.executor.clone())
    }

    pub fn backup(&self) -> Backup {
        Backup::new(self.executor.clone())
    }

    pub fn rbac(&self) -> Rbac {
        Rbac::new(self.executor.clone())
    }

    pub fn cluster(&self) -> Cluster {
        Cluster::new(self.executor.clone())
    }

    pub fn replication(&self) -> Replication {
        Replication::new(self.executor.clone())
    }

    pub fn debug(&self) -> Debug {
        Debug::new(self.executor.clone())
    }
}
