//! Collection schema management over `/v1/schema`

use http::Method;

use crate::error::VexdbResult;
use crate::executor::{Executor, expect_rest};
use crate::models::CollectionConfig;
use crate::transport::WireRequest;
use crate::validate;

#[derive(Clone)]
pub struct Collections {
    executor: Executor,
}

impl Collections {
    pub(crate) fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Create a collection; fails with a Request error if it already exists
    pub async fn create(&self, config: &CollectionConfig) -> VexdbResult<CollectionConfig> {
        validate::collection_name(&config.name)?;
        let body = serde_json::to_value(config)?;
        let request = WireRequest::rest(Method::POST, "/v1/schema", Some(body));
        let body = expect_rest(self.executor.send(request).await?, &[200, 201])?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn get(&self, name: &str) -> VexdbResult<CollectionConfig> {
        validate::collection_name(name)?;
        let request = WireRequest::rest(Method::GET, format!("/v1/schema/{}", name), None);
        let body = expect_rest(self.executor.send(request).await?, &[200])?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn list(&self) -> VexdbResult<Vec<CollectionConfig>> {
        let request = WireRequest::rest(Method::GET, "/v1/schema", None);
        let body = expect_rest(self.executor.send(request).await?, &[200])?;
        // the server wraps the list in {"collections": [...]}
        let collections = body
            .get("collections")
            .cloned()
            .unwrap_or(serde_json::Value::Array(Vec::new()));
        Ok(serde_json::from_value(collections)?)
    }

    /// Distinguishes absence (404 → false) from other failures
    pub async fn exists(&self, name: &str) -> VexdbResult<bool> {
        validate::collection_name(name)?;
        let request = WireRequest::rest(Method::GET, format!("/v1/schema/{}", name), None);
        match self.executor.send(request).await? {
            crate::transport::WireResponse::Rest { status: 200, .. } => Ok(true),
            crate::transport::WireResponse::Rest { status: 404, .. } => Ok(false),
            other => {
                expect_rest(other, &[200, 404])?;
                Ok(false)
            }
        }
    }

    /// Replace mutable parts of a collection definition
    pub async fn update(&self, config: &CollectionConfig) -> VexdbResult<CollectionConfig> {
        validate::collection_name(&config.name)?;
        let body = serde_json::to_value(config)?;
        let request = WireRequest::rest(
            Method::PUT,
            format!("/v1/schema/{}", config.name),
            Some(body),
        );
        let body = expect_rest(self.executor.send(request).await?, &[200])?;
        Ok(serde_json::from_value(body)?)
    }

    /// Append a property to an existing collection's schema
    pub async fn add_property(
        &self,
        name: &str,
        property: &crate::models::Property,
    ) -> VexdbResult<()> {
        validate::collection_name(name)?;
        validate::non_empty(&property.name, "property name")?;
        let body = serde_json::to_value(property)?;
        let request = WireRequest::rest(
            Method::POST,
            format!("/v1/schema/{}/properties", name),
            Some(body),
        );
        expect_rest(self.executor.send(request).await?, &[200, 201])?;
        Ok(())
    }

    /// Deleting an absent collection is not an error
    pub async fn delete(&self, name: &str) -> VexdbResult<()> {
        validate::collection_name(name)?;
        let request = WireRequest::rest(Method::DELETE, format!("/v1/schema/{}", name), None);
        expect_rest(self.executor.send(request).await?, &[200, 204, 404])?;
        Ok(())
    }
}
