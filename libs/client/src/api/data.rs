//! Single-object CRUD over `/v1/objects`

use http::Method;
use serde_json::json;
use uuid::Uuid;

use crate::error::VexdbResult;
use crate::executor::{Executor, expect_rest};
use crate::models::{DataObject, StoredObject};
use crate::transport::{WireRequest, WireResponse};
use crate::validate;

#[derive(Clone)]
pub struct Data {
    executor: Executor,
}

impl Data {
    pub(crate) fn new(executor: Executor) -> Self {
        Self { executor }
    }

    fn object_body(collection: &str, object: &DataObject) -> VexdbResult<serde_json::Value> {
        validate::object_properties(&object.properties)?;
        let mut body = json!({
            "collection": collection,
            "properties": object.properties,
        });
        if let Some(id) = object.id {
            body["id"] = json!(id);
        }
        if let Some(vector) = &object.vector {
            body["vector"] = json!(vector);
        }
        if !object.references.is_empty() {
            body["references"] = serde_json::to_value(&object.references)?;
        }
        Ok(body)
    }

    fn object_path(
        collection: &str,
        id: Uuid,
        tenant: Option<&str>,
        include_vector: bool,
    ) -> String {
        let mut path = format!("/v1/objects/{}/{}", collection, id);
        let mut params = Vec::new();
        if include_vector {
            params.push("include=vector".to_string());
        }
        if let Some(tenant) = tenant {
            params.push(format!("tenant={}", tenant));
        }
        if !params.is_empty() {
            path.push('?');
            path.push_str(&params.join("&"));
        }
        path
    }

    /// Insert one object and return the identifier it was stored under
    pub async fn insert(
        &self,
        collection: &str,
        object: &DataObject,
        tenant: Option<&str>,
    ) -> VexdbResult<Uuid> {
        validate::collection_name(collection)?;
        let mut body = Self::object_body(collection, object)?;
        if let Some(tenant) = tenant {
            body["tenant"] = json!(tenant);
        }
        let request = WireRequest::rest(Method::POST, "/v1/objects", Some(body));
        let body = expect_rest(self.executor.send(request).await?, &[200, 201])?;
        let stored: StoredObject = serde_json::from_value(body)?;
        Ok(stored.id)
    }

    pub async fn get(
        &self,
        collection: &str,
        id: Uuid,
        tenant: Option<&str>,
    ) -> VexdbResult<StoredObject> {
        self.get_inner(collection, id, tenant, false).await
    }

    /// Like [`get`](Self::get) but asks the server to include the vector
    pub async fn get_with_vector(
        &self,
        collection: &str,
        id: Uuid,
        tenant: Option<&str>,
    ) -> VexdbResult<StoredObject> {
        self.get_inner(collection, id, tenant, true).await
    }

    async fn get_inner(
        &self,
        collection: &str,
        id: Uuid,
        tenant: Option<&str>,
        include_vector: bool,
    ) -> VexdbResult<StoredObject> {
        validate::collection_name(collection)?;
        let path = Self::object_path(collection, id, tenant, include_vector);
        let request = WireRequest::rest(Method::GET, path, None);
        let body = expect_rest(self.executor.send(request).await?, &[200])?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn exists(
        &self,
        collection: &str,
        id: Uuid,
        tenant: Option<&str>,
    ) -> VexdbResult<bool> {
        validate::collection_name(collection)?;
        let path = Self::object_path(collection, id, tenant, false);
        let request = WireRequest::rest(Method::HEAD, path, None);
        match self.executor.send(request).await? {
            WireResponse::Rest { status: 204, .. } | WireResponse::Rest { status: 200, .. } => {
                Ok(true)
            }
            WireResponse::Rest { status: 404, .. } => Ok(false),
            other => {
                expect_rest(other, &[200, 204, 404])?;
                Ok(false)
            }
        }
    }

    /// Full replacement of properties and vector
    pub async fn replace(
        &self,
        collection: &str,
        id: Uuid,
        object: &DataObject,
        tenant: Option<&str>,
    ) -> VexdbResult<StoredObject> {
        validate::collection_name(collection)?;
        let mut body = Self::object_body(collection, object)?;
        body["id"] = json!(id);
        let path = Self::object_path(collection, id, tenant, false);
        let request = WireRequest::rest(Method::PUT, path, Some(body));
        let body = expect_rest(self.executor.send(request).await?, &[200])?;
        Ok(serde_json::from_value(body)?)
    }

    /// Merge the given properties into the stored object
    pub async fn update(
        &self,
        collection: &str,
        id: Uuid,
        properties: serde_json::Value,
        tenant: Option<&str>,
    ) -> VexdbResult<()> {
        validate::collection_name(collection)?;
        validate::object_properties(&properties)?;
        let body = json!({
            "collection": collection,
            "id": id,
            "properties": properties,
        });
        let path = Self::object_path(collection, id, tenant, false);
        let request = WireRequest::rest(Method::PATCH, path, Some(body));
        expect_rest(self.executor.send(request).await?, &[200, 204])?;
        Ok(())
    }

    pub async fn delete(
        &self,
        collection: &str,
        id: Uuid,
        tenant: Option<&str>,
    ) -> VexdbResult<()> {
        validate::collection_name(collection)?;
        let path = Self::object_path(collection, id, tenant, false);
        let request = WireRequest::rest(Method::DELETE, path, None);
        expect_rest(self.executor.send(request).await?, &[204, 404])?;
        Ok(())
    }
}
