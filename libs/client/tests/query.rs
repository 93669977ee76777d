//! Query facade behavior against a scripted transport

use std::sync::Arc;

use test_utils::ScriptedTransport;
use uuid::Uuid;
use vexdb_client::transport::WireRequest;
use vexdb_client::{ClientConfig, Filter, QueryOptions, VexdbClient, VexdbError};
use vexdb_rpc::v1;

async fn connected_client(transport: Arc<ScriptedTransport>) -> VexdbClient {
    let client = VexdbClient::with_transport(ClientConfig::local(), transport);
    client.connect().await.unwrap();
    client
}

fn decode_search_request(request: &WireRequest) -> v1::SearchRequest {
    match request {
        WireRequest::Grpc { path, message, .. } => {
            assert_eq!(*path, v1::paths::SEARCH);
            prost::Message::decode(message.clone()).unwrap()
        }
        other => panic!("expected a gRPC request, got {:?}", other),
    }
}

fn search_reply(ids: &[Uuid]) -> v1::SearchReply {
    v1::SearchReply {
        took: 0.01,
        results: ids
            .iter()
            .enumerate()
            .map(|(i, id)| v1::SearchResult {
                properties: vexdb_rpc::json_to_struct(&serde_json::json!({"rank": i})),
                metadata: Some(v1::MetadataResult {
                    id: id.to_string(),
                    distance: Some(i as f32 / 10.0),
                    ..Default::default()
                }),
            })
            .collect(),
    }
}

#[tokio::test]
async fn test_near_vector_builds_the_expected_request() {
    let transport = Arc::new(ScriptedTransport::with_connect_script("1.30.0"));
    transport.push_grpc(&search_reply(&[Uuid::new_v4()]));
    let client = connected_client(transport.clone()).await;

    let options = QueryOptions::new()
        .with_limit(3)
        .with_distance(0.4)
        .with_filter(Filter::by_property("lang").eq("en"));
    client
        .query()
        .near_vector("Books", vec![0.5, 0.5], &options)
        .await
        .unwrap();

    let request = decode_search_request(&transport.requests()[2]);
    assert_eq!(request.collection, "Books");
    assert_eq!(request.limit, 3);
    let near = request.near_vector.unwrap();
    assert_eq!(near.vector, vec![0.5, 0.5]);
    assert_eq!(near.distance, Some(0.4));
    assert!(near.certainty.is_none());
    assert!(request.bm25.is_none());
    assert!(request.filters.is_some());
}

#[tokio::test]
async fn test_bm25_builds_the_expected_request() {
    let transport = Arc::new(ScriptedTransport::with_connect_script("1.30.0"));
    transport.push_grpc(&search_reply(&[]));
    let client = connected_client(transport.clone()).await;

    client
        .query()
        .bm25("Books", "rust async", &QueryOptions::new())
        .await
        .unwrap();

    let request = decode_search_request(&transport.requests()[2]);
    assert_eq!(request.bm25.unwrap().query, "rust async");
    assert!(request.near_vector.is_none());
}

#[tokio::test]
async fn test_results_keep_server_order() {
    let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
    let transport = Arc::new(ScriptedTransport::with_connect_script("1.30.0"));
    transport.push_grpc(&search_reply(&ids));
    let client = connected_client(transport).await;

    let objects = client
        .query()
        .fetch_objects("Books", &QueryOptions::new())
        .await
        .unwrap();

    assert_eq!(objects.iter().map(|o| o.id).collect::<Vec<_>>(), ids);
    assert_eq!(objects[2].properties["rank"], 2);
    assert_eq!(objects[2].metadata.distance, Some(0.2));
}

#[tokio::test]
async fn test_empty_vector_is_rejected_before_io() {
    let transport = Arc::new(ScriptedTransport::with_connect_script("1.30.0"));
    let client = connected_client(transport.clone()).await;

    let err = client
        .query()
        .near_vector("Books", vec![], &QueryOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, VexdbError::Validation(_)));
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_invalid_collection_name_is_rejected_before_io() {
    let transport = Arc::new(ScriptedTransport::with_connect_script("1.30.0"));
    let client = connected_client(transport.clone()).await;

    let err = client
        .query()
        .fetch_objects("lowercase", &QueryOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, VexdbError::Validation(_)));
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_missing_collection_surfaces_request_error() {
    let transport = Arc::new(ScriptedTransport::with_connect_script("1.30.0"));
    transport.push_rest(404, serde_json::json!({"error": "collection Books not found"}));
    let client = connected_client(transport).await;

    let err = client.collections().get("Books").await.unwrap_err();
    match err {
        VexdbError::Request { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "collection Books not found");
        }
        other => panic!("expected a request error, got {:?}", other),
    }
}
