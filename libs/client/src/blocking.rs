//! Blocking entry point
//!
//! Thin wrappers over the async facades: each call drives the matching
//! async operation to completion on a client-owned current-thread runtime,
//! so both calling modes run the exact same operation bodies. Do not use
//! these types from inside an async context; they block the calling thread.

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};
use uuid::Uuid;

use crate::api;
use crate::config::ClientConfig;
use crate::connection::ClientState;
use crate::error::{VexdbError, VexdbResult};
use crate::filter::Filter;
use crate::models::{
    BackupBackend, BackupRequest, BackupStatus, BatchDeleteResult, BatchInsertResult, BatchOptions,
    ClusterStatistics, CollectionConfig, DataObject, Meta, NodeStatus, Permission, QueryObject,
    QueryOptions, ReplicateRequest, ReplicationOperation, Role, ShardDebugInfo, StoredObject,
    Tenant, TenantActivityStatus, User,
};
use crate::transport::Transport;

fn new_runtime() -> VexdbResult<Arc<Runtime>> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map(Arc::new)
        .map_err(|e| VexdbError::Connection(format!("failed to start client runtime: {}", e)))
}

/// Blocking VexDB client
///
/// Same surface as [`crate::VexdbClient`] with the `async` removed. Clones
/// share the runtime and the connection.
#[derive(Clone)]
pub struct VexdbClient {
    inner: crate::client::VexdbClient,
    runtime: Arc<Runtime>,
}

impl VexdbClient {
    pub fn new(config: ClientConfig) -> VexdbResult<Self> {
        Ok(Self {
            inner: crate::client::VexdbClient::new(config)?,
            runtime: new_runtime()?,
        })
    }

    /// Construct a client and connect it in one step
    pub fn open(config: ClientConfig) -> VexdbResult<Self> {
        let client = Self::new(config)?;
        client.connect()?;
        Ok(client)
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> VexdbResult<Self> {
        Ok(Self {
            inner: crate::client::VexdbClient::with_transport(config, transport),
            runtime: new_runtime()?,
        })
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn connect(&self) -> VexdbResult<()> {
        self.block_on(self.inner.connect())
    }

    pub fn close(&self) {
        self.inner.close();
    }

    pub fn state(&self) -> ClientState {
        self.inner.state()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    pub fn meta(&self) -> Option<Meta> {
        self.inner.meta()
    }

    pub fn is_live(&self) -> VexdbResult<bool> {
        self.block_on(self.inner.is_live())
    }

    pub fn is_ready(&self) -> VexdbResult<bool> {
        self.block_on(self.inner.is_ready())
    }

    pub fn collections(&self) -> Collections {
        Collections {
            inner: self.inner.collections(),
            runtime: self.runtime.clone(),
        }
    }

    pub fn data(&self) -> Data {
        Data {
            inner: self.inner.data(),
            runtime: self.runtime.clone(),
        }
    }

    pub fn batch(&self) -> Batch {
        Batch {
            inner: self.inner.batch(),
            runtime: self.runtime.clone(),
        }
    }

    pub fn query(&self) -> Query {
        Query {
            inner: self.inner.query(),
            runtime: self.runtime.clone(),
        }
    }

    pub fn tenants(&self) -> Tenants {
        Tenants {
            inner: self.inner.tenants(),
            runtime: self.runtime.clone(),
        }
    }

    pub fn backup(&self) -> Backup {
        Backup {
            inner: self.inner.backup(),
            runtime: self.runtime.clone(),
        }
    }

    pub fn rbac(&self) -> Rbac {
        Rbac {
            inner: self.inner.rbac(),
            runtime: self.runtime.clone(),
        }
    }

    pub fn cluster(&self) -> Cluster {
        Cluster {
            inner: self.inner.cluster(),
            runtime: self.runtime.clone(),
        }
    }

    pub fn replication(&self) -> Replication {
        Replication {
            inner: self.inner.replication(),
            runtime: self.runtime.clone(),
        }
    }

    pub fn debug(&self) -> Debug {
        Debug {
            inner: self.inner.debug(),
            runtime: self.runtime.clone(),
        }
    }
}

#[derive(Clone)]
pub struct Collections {
    inner: api::Collections,
    runtime: Arc<Runtime>,
}

impl Collections {
    pub fn create(&self, config: &CollectionConfig) -> VexdbResult<CollectionConfig> {
        self.runtime.block_on(self.inner.create(config))
    }

    pub fn get(&self, name: &str) -> VexdbResult<CollectionConfig> {
        self.runtime.block_on(self.inner.get(name))
    }

    pub fn list(&self) -> VexdbResult<Vec<CollectionConfig>> {
        self.runtime.block_on(self.inner.list())
    }

    pub fn exists(&self, name: &str) -> VexdbResult<bool> {
        self.runtime.block_on(self.inner.exists(name))
    }

    pub fn add_property(&self, name: &str, property: &crate::models::Property) -> VexdbResult<()> {
        self.runtime.block_on(self.inner.add_property(name, property))
    }

    pub fn update(&self, config: &CollectionConfig) -> VexdbResult<CollectionConfig> {
        self.runtime.block_on(self.inner.update(config))
    }

    pub fn delete(&self, name: &str) -> VexdbResult<()> {
        self.runtime.block_on(self.inner.delete(name))
    }
}

#[derive(Clone)]
pub struct Data {
    inner: api::Data,
    runtime: Arc<Runtime>,
}

impl Data {
    pub fn insert(
        &self,
        collection: &str,
        object: &DataObject,
        tenant: Option<&str>,
    ) -> VexdbResult<Uuid> {
        self.runtime
            .block_on(self.inner.insert(collection, object, tenant))
    }

    pub fn get(&self, collection: &str, id: Uuid, tenant: Option<&str>) -> VexdbResult<StoredObject> {
        self.runtime.block_on(self.inner.get(collection, id, tenant))
    }

    pub fn get_with_vector(
        &self,
        collection: &str,
        id: Uuid,
        tenant: Option<&str>,
    ) -> VexdbResult<StoredObject> {
        self.runtime
            .block_on(self.inner.get_with_vector(collection, id, tenant))
    }

    pub fn exists(&self, collection: &str, id: Uuid, tenant: Option<&str>) -> VexdbResult<bool> {
        self.runtime
            .block_on(self.inner.exists(collection, id, tenant))
    }

    pub fn replace(
        &self,
        collection: &str,
        id: Uuid,
        object: &DataObject,
        tenant: Option<&str>,
    ) -> VexdbResult<StoredObject> {
        self.runtime
            .block_on(self.inner.replace(collection, id, object, tenant))
    }

    pub fn update(
        &self,
        collection: &str,
        id: Uuid,
        properties: serde_json::Value,
        tenant: Option<&str>,
    ) -> VexdbResult<()> {
        self.runtime
            .block_on(self.inner.update(collection, id, properties, tenant))
    }

    pub fn delete(&self, collection: &str, id: Uuid, tenant: Option<&str>) -> VexdbResult<()> {
        self.runtime
            .block_on(self.inner.delete(collection, id, tenant))
    }
}

#[derive(Clone)]
pub struct Batch {
    inner: api::Batch,
    runtime: Arc<Runtime>,
}

impl Batch {
    pub fn insert_objects(
        &self,
        collection: &str,
        objects: &[DataObject],
        options: &BatchOptions,
    ) -> VexdbResult<BatchInsertResult> {
        self.runtime
            .block_on(self.inner.insert_objects(collection, objects, options))
    }

    pub fn delete_objects(
        &self,
        collection: &str,
        filter: &Filter,
        options: &BatchOptions,
    ) -> VexdbResult<BatchDeleteResult> {
        self.runtime
            .block_on(self.inner.delete_objects(collection, filter, options))
    }
}

#[derive(Clone)]
pub struct Query {
    inner: api::Query,
    runtime: Arc<Runtime>,
}

impl Query {
    pub fn fetch_objects(
        &self,
        collection: &str,
        options: &QueryOptions,
    ) -> VexdbResult<Vec<QueryObject>> {
        self.runtime
            .block_on(self.inner.fetch_objects(collection, options))
    }

    pub fn near_vector(
        &self,
        collection: &str,
        vector: Vec<f32>,
        options: &QueryOptions,
    ) -> VexdbResult<Vec<QueryObject>> {
        self.runtime
            .block_on(self.inner.near_vector(collection, vector, options))
    }

    pub fn bm25(
        &self,
        collection: &str,
        query: &str,
        options: &QueryOptions,
    ) -> VexdbResult<Vec<QueryObject>> {
        self.runtime
            .block_on(self.inner.bm25(collection, query, options))
    }

    pub fn bm25_on_properties(
        &self,
        collection: &str,
        query: &str,
        properties: &[String],
        options: &QueryOptions,
    ) -> VexdbResult<Vec<QueryObject>> {
        self.runtime
            .block_on(self.inner.bm25_on_properties(collection, query, properties, options))
    }
}

#[derive(Clone)]
pub struct Tenants {
    inner: api::Tenants,
    runtime: Arc<Runtime>,
}

impl Tenants {
    pub fn create(&self, collection: &str, tenants: &[Tenant]) -> VexdbResult<Vec<Tenant>> {
        self.runtime.block_on(self.inner.create(collection, tenants))
    }

    pub fn list(&self, collection: &str) -> VexdbResult<Vec<Tenant>> {
        self.runtime.block_on(self.inner.list(collection))
    }

    pub fn exists(&self, collection: &str, name: &str) -> VexdbResult<bool> {
        self.runtime.block_on(self.inner.exists(collection, name))
    }

    pub fn update_status(
        &self,
        collection: &str,
        names: &[String],
        status: TenantActivityStatus,
    ) -> VexdbResult<Vec<Tenant>> {
        self.runtime
            .block_on(self.inner.update_status(collection, names, status))
    }

    pub fn delete(&self, collection: &str, names: &[String]) -> VexdbResult<()> {
        self.runtime.block_on(self.inner.delete(collection, names))
    }
}

#[derive(Clone)]
pub struct Backup {
    inner: api::Backup,
    runtime: Arc<Runtime>,
}

impl Backup {
    pub fn create(&self, backend: BackupBackend, request: &BackupRequest) -> VexdbResult<BackupStatus> {
        self.runtime.block_on(self.inner.create(backend, request))
    }

    pub fn status(&self, backend: BackupBackend, id: &str) -> VexdbResult<BackupStatus> {
        self.runtime.block_on(self.inner.status(backend, id))
    }

    pub fn restore(&self, backend: BackupBackend, id: &str) -> VexdbResult<BackupStatus> {
        self.runtime.block_on(self.inner.restore(backend, id))
    }

    pub fn restore_status(&self, backend: BackupBackend, id: &str) -> VexdbResult<BackupStatus> {
        self.runtime.block_on(self.inner.restore_status(backend, id))
    }

    pub fn cancel(&self, backend: BackupBackend, id: &str) -> VexdbResult<()> {
        self.runtime.block_on(self.inner.cancel(backend, id))
    }
}

#[derive(Clone)]
pub struct Rbac {
    inner: api::Rbac,
    runtime: Arc<Runtime>,
}

impl Rbac {
    pub fn create_role(&self, role: &Role) -> VexdbResult<()> {
        self.runtime.block_on(self.inner.create_role(role))
    }

    pub fn get_role(&self, name: &str) -> VexdbResult<Role> {
        self.runtime.block_on(self.inner.get_role(name))
    }

    pub fn list_roles(&self) -> VexdbResult<Vec<Role>> {
        self.runtime.block_on(self.inner.list_roles())
    }

    pub fn role_exists(&self, name: &str) -> VexdbResult<bool> {
        self.runtime.block_on(self.inner.role_exists(name))
    }

    pub fn add_permissions(&self, name: &str, permissions: &[Permission]) -> VexdbResult<()> {
        self.runtime
            .block_on(self.inner.add_permissions(name, permissions))
    }

    pub fn delete_role(&self, name: &str) -> VexdbResult<()> {
        self.runtime.block_on(self.inner.delete_role(name))
    }

    pub fn assign_role(&self, user_id: &str, role: &str) -> VexdbResult<()> {
        self.runtime.block_on(self.inner.assign_role(user_id, role))
    }

    pub fn revoke_role(&self, user_id: &str, role: &str) -> VexdbResult<()> {
        self.runtime.block_on(self.inner.revoke_role(user_id, role))
    }

    pub fn assigned_users(&self, role: &str) -> VexdbResult<Vec<String>> {
        self.runtime.block_on(self.inner.assigned_users(role))
    }

    pub fn list_users(&self) -> VexdbResult<Vec<User>> {
        self.runtime.block_on(self.inner.list_users())
    }

    pub fn get_my_user(&self) -> VexdbResult<User> {
        self.runtime.block_on(self.inner.get_my_user())
    }

    pub fn get_user(&self, user_id: &str) -> VexdbResult<User> {
        self.runtime.block_on(self.inner.get_user(user_id))
    }
}

#[derive(Clone)]
pub struct Cluster {
    inner: api::Cluster,
    runtime: Arc<Runtime>,
}

impl Cluster {
    pub fn nodes(&self) -> VexdbResult<Vec<NodeStatus>> {
        self.runtime.block_on(self.inner.nodes())
    }

    pub fn nodes_for_collection(&self, collection: &str) -> VexdbResult<Vec<NodeStatus>> {
        self.runtime
            .block_on(self.inner.nodes_for_collection(collection))
    }

    pub fn statistics(&self) -> VexdbResult<ClusterStatistics> {
        self.runtime.block_on(self.inner.statistics())
    }
}

#[derive(Clone)]
pub struct Replication {
    inner: api::Replication,
    runtime: Arc<Runtime>,
}

impl Replication {
    pub fn replicate(&self, request: &ReplicateRequest) -> VexdbResult<Uuid> {
        self.runtime.block_on(self.inner.replicate(request))
    }

    pub fn get(&self, id: Uuid) -> VexdbResult<ReplicationOperation> {
        self.runtime.block_on(self.inner.get(id))
    }

    pub fn list(&self) -> VexdbResult<Vec<ReplicationOperation>> {
        self.runtime.block_on(self.inner.list())
    }

    pub fn cancel(&self, id: Uuid) -> VexdbResult<()> {
        self.runtime.block_on(self.inner.cancel(id))
    }

    pub fn delete(&self, id: Uuid) -> VexdbResult<()> {
        self.runtime.block_on(self.inner.delete(id))
    }
}

#[derive(Clone)]
pub struct Debug {
    inner: api::Debug,
    runtime: Arc<Runtime>,
}

impl Debug {
    pub fn shard_info(&self, collection: &str, shard: &str) -> VexdbResult<ShardDebugInfo> {
        self.runtime.block_on(self.inner.shard_info(collection, shard))
    }
}
