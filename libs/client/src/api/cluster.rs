//! Cluster introspection over `/v1/nodes` and `/v1/cluster`

use http::Method;

use crate::error::VexdbResult;
use crate::executor::{Executor, expect_rest};
use crate::models::{ClusterStatistics, NodeStatus};
use crate::transport::WireRequest;
use crate::validate;

#[derive(Clone)]
pub struct Cluster {
    executor: Executor,
}

impl Cluster {
    pub(crate) fn new(executor: Executor) -> Self {
        Self { executor }
    }

    pub async fn nodes(&self) -> VexdbResult<Vec<NodeStatus>> {
        let request = WireRequest::rest(Method::GET, "/v1/nodes?output=verbose", None);
        let body = expect_rest(self.executor.send(request).await?, &[200])?;
        let nodes = body
            .get("nodes")
            .cloned()
            .unwrap_or(serde_json::Value::Array(Vec::new()));
        Ok(serde_json::from_value(nodes)?)
    }

    /// Node status filtered to shards of one collection
    pub async fn nodes_for_collection(&self, collection: &str) -> VexdbResult<Vec<NodeStatus>> {
        validate::collection_name(collection)?;
        let path = format!("/v1/nodes/{}?output=verbose", collection);
        let request = WireRequest::rest(Method::GET, path, None);
        let body = expect_rest(self.executor.send(request).await?, &[200])?;
        let nodes = body
            .get("nodes")
            .cloned()
            .unwrap_or(serde_json::Value::Array(Vec::new()));
        Ok(serde_json::from_value(nodes)?)
    }

    /// Raft consensus statistics across the cluster
    pub async fn statistics(&self) -> VexdbResult<ClusterStatistics> {
        let request = WireRequest::rest(Method::GET, "/v1/cluster/statistics", None);
        let body = expect_rest(self.executor.send(request).await?, &[200])?;
        Ok(serde_json::from_value(body)?)
    }
}
