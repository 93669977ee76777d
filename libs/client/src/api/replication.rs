//! Shard replica movement over `/v1/replication`
//!
//! Requires server 1.32 or newer; operations on older servers fail with
//! `VexdbError::Unsupported` before any traffic.

use http::Method;
use uuid::Uuid;

use crate::error::VexdbResult;
use crate::executor::{Executor, expect_rest};
use crate::models::{ReplicateRequest, ReplicationOperation, ServerVersion};
use crate::transport::WireRequest;
use crate::validate;

const REPLICATION_MIN_VERSION: ServerVersion = ServerVersion {
    major: 1,
    minor: 32,
    patch: 0,
};

#[derive(Clone)]
pub struct Replication {
    executor: Executor,
}

impl Replication {
    pub(crate) fn new(executor: Executor) -> Self {
        Self { executor }
    }

    fn check_supported(&self) -> VexdbResult<()> {
        self.executor
            .connection()
            .require_version("replication", REPLICATION_MIN_VERSION)
    }

    /// Start copying or moving a shard replica; returns the operation id
    pub async fn replicate(&self, request: &ReplicateRequest) -> VexdbResult<Uuid> {
        self.check_supported()?;
        validate::collection_name(&request.collection)?;
        validate::non_empty(&request.shard, "shard name")?;
        validate::non_empty(&request.source_node, "source node")?;
        validate::non_empty(&request.target_node, "target node")?;
        let body = serde_json::to_value(request)?;
        let wire = WireRequest::rest(Method::POST, "/v1/replication/replicate", Some(body));
        let body = expect_rest(self.executor.send(wire).await?, &[200, 201])?;
        let id = body
            .get("id")
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| {
                crate::error::VexdbError::Decode("replicate reply without an id".to_string())
            })?;
        Ok(id)
    }

    pub async fn get(&self, id: Uuid) -> VexdbResult<ReplicationOperation> {
        self.check_supported()?;
        let path = format!("/v1/replication/replicate/{}", id);
        let wire = WireRequest::rest(Method::GET, path, None);
        let body = expect_rest(self.executor.send(wire).await?, &[200])?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn list(&self) -> VexdbResult<Vec<ReplicationOperation>> {
        self.check_supported()?;
        let wire = WireRequest::rest(Method::GET, "/v1/replication/replicate/list", None);
        let body = expect_rest(self.executor.send(wire).await?, &[200])?;
        Ok(serde_json::from_value(body)?)
    }

    /// Cancel an in-flight operation; completed operations stay untouched
    pub async fn cancel(&self, id: Uuid) -> VexdbResult<()> {
        self.check_supported()?;
        let path = format!("/v1/replication/replicate/{}/cancel", id);
        let wire = WireRequest::rest(Method::POST, path, None);
        expect_rest(self.executor.send(wire).await?, &[204])?;
        Ok(())
    }

    /// Remove the operation record; cancels it first if still running
    pub async fn delete(&self, id: Uuid) -> VexdbResult<()> {
        self.check_supported()?;
        let path = format!("/v1/replication/replicate/{}", id);
        let wire = WireRequest::rest(Method::DELETE, path, None);
        expect_rest(self.executor.send(wire).await?, &[204, 404])?;
        Ok(())
    }
}
