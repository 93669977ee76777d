//! Read queries over the gRPC search endpoint
//!
//! All three entry points share one request builder; they differ only in
//! which search clause they attach. Results come back as typed
//! [`QueryObject`]s with metadata populated according to the options.

use uuid::Uuid;

use crate::error::{VexdbError, VexdbResult};
use crate::executor::{Executor, decode_grpc};
use crate::models::{QueryMetadata, QueryObject, QueryOptions};
use crate::transport::WireRequest;
use crate::validate;
use vexdb_rpc::struct_to_json;
use vexdb_rpc::v1;

const DEFAULT_LIMIT: u32 = 100;

#[derive(Clone)]
pub struct Query {
    executor: Executor,
}

impl Query {
    pub(crate) fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Plain object listing, ordered by the server
    pub async fn fetch_objects(
        &self,
        collection: &str,
        options: &QueryOptions,
    ) -> VexdbResult<Vec<QueryObject>> {
        let request = Self::base_request(collection, options)?;
        self.run(request, options).await
    }

    /// Vector similarity search
    pub async fn near_vector(
        &self,
        collection: &str,
        vector: Vec<f32>,
        options: &QueryOptions,
    ) -> VexdbResult<Vec<QueryObject>> {
        if vector.is_empty() {
            return Err(VexdbError::Validation(
                "search vector must not be empty".to_string(),
            ));
        }
        let mut request = Self::base_request(collection, options)?;
        request.near_vector = Some(v1::NearVector {
            vector,
            certainty: options.certainty,
            distance: options.distance,
        });
        self.run(request, options).await
    }

    /// Keyword search ranked by BM25 across all text properties
    pub async fn bm25(
        &self,
        collection: &str,
        query: &str,
        options: &QueryOptions,
    ) -> VexdbResult<Vec<QueryObject>> {
        self.bm25_on_properties(collection, query, &[], options).await
    }

    /// BM25 restricted to the given properties
    pub async fn bm25_on_properties(
        &self,
        collection: &str,
        query: &str,
        properties: &[String],
        options: &QueryOptions,
    ) -> VexdbResult<Vec<QueryObject>> {
        validate::non_empty(query, "bm25 query")?;
        let mut request = Self::base_request(collection, options)?;
        request.bm25 = Some(v1::Bm25 {
            query: query.to_string(),
            properties: properties.to_vec(),
        });
        self.run(request, options).await
    }

    fn base_request(collection: &str, options: &QueryOptions) -> VexdbResult<v1::SearchRequest> {
        validate::collection_name(collection)?;
        let filters = match &options.filter {
            Some(filter) => Some(filter.to_proto()?),
            None => None,
        };
        Ok(v1::SearchRequest {
            collection: collection.to_string(),
            tenant: options.tenant.clone().unwrap_or_default(),
            limit: options.limit.unwrap_or(DEFAULT_LIMIT),
            offset: options.offset.unwrap_or(0),
            near_vector: None,
            bm25: None,
            filters,
            metadata: Some(v1::MetadataRequest {
                uuid: true,
                vector: options.include_vector,
                distance: options.return_metadata,
                certainty: options.return_metadata,
                score: options.return_metadata,
                creation_time_unix: options.return_metadata,
                last_update_time_unix: options.return_metadata,
            }),
            properties: options
                .return_properties
                .as_ref()
                .map(|names| v1::PropertiesRequest {
                    names: names.clone(),
                }),
        })
    }

    async fn run(
        &self,
        request: v1::SearchRequest,
        options: &QueryOptions,
    ) -> VexdbResult<Vec<QueryObject>> {
        let mut wire = WireRequest::grpc(v1::paths::SEARCH, &request);
        if let Some(timeout) = options.timeout {
            wire = wire.with_timeout(timeout);
        }
        let reply: v1::SearchReply = decode_grpc(self.executor.send(wire).await?)?;
        reply.results.into_iter().map(Self::into_object).collect()
    }

    fn into_object(result: v1::SearchResult) -> VexdbResult<QueryObject> {
        let metadata = result
            .metadata
            .ok_or_else(|| VexdbError::Decode("search result without metadata".to_string()))?;
        let id = Uuid::parse_str(&metadata.id)
            .map_err(|e| VexdbError::Decode(format!("bad object id '{}': {}", metadata.id, e)))?;

        let properties = result
            .properties
            .map(|s| struct_to_json(&s))
            .unwrap_or(serde_json::Value::Null);

        Ok(QueryObject {
            id,
            properties,
            vector: if metadata.vector.is_empty() {
                None
            } else {
                Some(metadata.vector)
            },
            metadata: QueryMetadata {
                distance: metadata.distance,
                certainty: metadata.certainty,
                score: metadata.score,
                creation_time_unix: (metadata.creation_time_unix != 0)
                    .then_some(metadata.creation_time_unix),
                last_update_time_unix: (metadata.last_update_time_unix != 0)
                    .then_some(metadata.last_update_time_unix),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;

    #[test]
    fn test_base_request_applies_options() {
        let options = QueryOptions::new()
            .with_limit(5)
            .with_offset(10)
            .with_tenant("acme")
            .with_filter(Filter::by_property("published").eq(true))
            .include_vector();
        let request = Query::base_request("Books", &options).unwrap();
        assert_eq!(request.limit, 5);
        assert_eq!(request.offset, 10);
        assert_eq!(request.tenant, "acme");
        assert!(request.filters.is_some());
        let metadata = request.metadata.unwrap();
        assert!(metadata.uuid);
        assert!(metadata.vector);
        assert!(!metadata.distance);
    }

    #[test]
    fn test_base_request_defaults() {
        let request = Query::base_request("Books", &QueryOptions::new()).unwrap();
        assert_eq!(request.limit, DEFAULT_LIMIT);
        assert_eq!(request.offset, 0);
        assert!(request.filters.is_none());
        assert!(request.properties.is_none());
    }

    #[test]
    fn test_result_conversion() {
        let id = Uuid::new_v4();
        let result = v1::SearchResult {
            properties: vexdb_rpc::json_to_struct(&serde_json::json!({"title": "rust"})),
            metadata: Some(v1::MetadataResult {
                id: id.to_string(),
                vector: vec![0.1, 0.2],
                distance: Some(0.3),
                certainty: None,
                score: None,
                creation_time_unix: 1700000000,
                last_update_time_unix: 0,
            }),
        };
        let object = Query::into_object(result).unwrap();
        assert_eq!(object.id, id);
        assert_eq!(object.properties["title"], "rust");
        assert_eq!(object.vector, Some(vec![0.1, 0.2]));
        assert_eq!(object.metadata.distance, Some(0.3));
        assert_eq!(object.metadata.creation_time_unix, Some(1700000000));
        assert!(object.metadata.last_update_time_unix.is_none());
    }

    #[test]
    fn test_bad_id_is_decode_error() {
        let result = v1::SearchResult {
            properties: None,
            metadata: Some(v1::MetadataResult {
                id: "not-a-uuid".to_string(),
                ..Default::default()
            }),
        };
        assert!(matches!(
            Query::into_object(result),
            Err(VexdbError::Decode(_))
        ));
    }
}
