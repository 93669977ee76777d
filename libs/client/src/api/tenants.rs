//! Tenant management for multi-tenant collections

use http::Method;
use serde_json::json;

use crate::error::VexdbResult;
use crate::executor::{Executor, expect_rest};
use crate::models::{Tenant, TenantActivityStatus};
use crate::transport::{WireRequest, WireResponse};
use crate::validate;

#[derive(Clone)]
pub struct Tenants {
    executor: Executor,
}

impl Tenants {
    pub(crate) fn new(executor: Executor) -> Self {
        Self { executor }
    }

    fn base_path(collection: &str) -> String {
        format!("/v1/schema/{}/tenants", collection)
    }

    pub async fn create(&self, collection: &str, tenants: &[Tenant]) -> VexdbResult<Vec<Tenant>> {
        validate::collection_name(collection)?;
        for tenant in tenants {
            validate::non_empty(&tenant.name, "tenant name")?;
        }
        let body = serde_json::to_value(tenants)?;
        let request = WireRequest::rest(Method::POST, Self::base_path(collection), Some(body));
        let body = expect_rest(self.executor.send(request).await?, &[200, 201])?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn list(&self, collection: &str) -> VexdbResult<Vec<Tenant>> {
        validate::collection_name(collection)?;
        let request = WireRequest::rest(Method::GET, Self::base_path(collection), None);
        let body = expect_rest(self.executor.send(request).await?, &[200])?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn exists(&self, collection: &str, name: &str) -> VexdbResult<bool> {
        validate::collection_name(collection)?;
        validate::non_empty(name, "tenant name")?;
        let path = format!("{}/{}", Self::base_path(collection), name);
        let request = WireRequest::rest(Method::HEAD, path, None);
        match self.executor.send(request).await? {
            WireResponse::Rest { status: 200, .. } | WireResponse::Rest { status: 204, .. } => {
                Ok(true)
            }
            WireResponse::Rest { status: 404, .. } => Ok(false),
            other => {
                expect_rest(other, &[200, 204, 404])?;
                Ok(false)
            }
        }
    }

    /// Activate, deactivate or offload tenants
    pub async fn update_status(
        &self,
        collection: &str,
        names: &[String],
        status: TenantActivityStatus,
    ) -> VexdbResult<Vec<Tenant>> {
        validate::collection_name(collection)?;
        let body: Vec<_> = names
            .iter()
            .map(|name| json!({"name": name, "activityStatus": status}))
            .collect();
        let request = WireRequest::rest(
            Method::PUT,
            Self::base_path(collection),
            Some(serde_json::Value::Array(body)),
        );
        let body = expect_rest(self.executor.send(request).await?, &[200])?;
        Ok(serde_json::from_value(body)?)
    }

    /// Removes the tenants and all their objects
    pub async fn delete(&self, collection: &str, names: &[String]) -> VexdbResult<()> {
        validate::collection_name(collection)?;
        let body = serde_json::to_value(names)?;
        let request = WireRequest::rest(Method::DELETE, Self::base_path(collection), Some(body));
        expect_rest(self.executor.send(request).await?, &[200, 204])?;
        Ok(())
    }
}
