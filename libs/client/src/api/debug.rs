//! Shard-level index introspection over `/v1/debug`

use http::Method;

use crate::error::VexdbResult;
use crate::executor::{Executor, expect_rest};
use crate::models::ShardDebugInfo;
use crate::transport::WireRequest;
use crate::validate;

#[derive(Clone)]
pub struct Debug {
    executor: Executor,
}

impl Debug {
    pub(crate) fn new(executor: Executor) -> Self {
        Self { executor }
    }

    pub async fn shard_info(&self, collection: &str, shard: &str) -> VexdbResult<ShardDebugInfo> {
        validate::collection_name(collection)?;
        validate::non_empty(shard, "shard name")?;
        let path = format!("/v1/debug/index/{}/{}", collection, shard);
        let request = WireRequest::rest(Method::GET, path, None);
        let body = expect_rest(self.executor.send(request).await?, &[200])?;
        Ok(serde_json::from_value(body)?)
    }
}
