//! Async and blocking surfaces must produce identical wire traffic

use std::sync::Arc;

use test_utils::{ScriptedTransport, sample_objects};
use vexdb_client::{blocking, BatchOptions, ClientConfig, CollectionConfig, QueryOptions, VexdbClient};
use vexdb_rpc::v1;

fn scripted() -> Arc<ScriptedTransport> {
    let transport = ScriptedTransport::with_connect_script("1.32.0");
    transport.push_rest(200, serde_json::json!({"collections": []}));
    transport.push_rest(
        201,
        serde_json::json!({"name": "Books", "vectorIndex": {"distance": "cosine"}}),
    );
    transport.push_grpc(&v1::BatchObjectsReply {
        took: 0.1,
        errors: Vec::new(),
    });
    transport.push_grpc(&v1::SearchReply {
        took: 0.1,
        results: Vec::new(),
    });
    Arc::new(transport)
}

async fn drive_async(transport: Arc<ScriptedTransport>) {
    let client = VexdbClient::with_transport(ClientConfig::local(), transport);
    client.connect().await.unwrap();
    client.collections().list().await.unwrap();
    client
        .collections()
        .create(&CollectionConfig::new("Books"))
        .await
        .unwrap();
    client
        .batch()
        .insert_objects("Books", &sample_objects(3), &BatchOptions::new())
        .await
        .unwrap();
    client
        .query()
        .near_vector("Books", vec![0.1, 0.2], &QueryOptions::new().with_limit(5))
        .await
        .unwrap();
    client.close();
}

fn drive_blocking(transport: Arc<ScriptedTransport>) {
    let client = blocking::VexdbClient::with_transport(ClientConfig::local(), transport).unwrap();
    client.connect().unwrap();
    client.collections().list().unwrap();
    client
        .collections()
        .create(&CollectionConfig::new("Books"))
        .unwrap();
    client
        .batch()
        .insert_objects("Books", &sample_objects(3), &BatchOptions::new())
        .unwrap();
    client
        .query()
        .near_vector("Books", vec![0.1, 0.2], &QueryOptions::new().with_limit(5))
        .unwrap();
    client.close();
}

#[test]
fn test_both_modes_send_identical_requests() {
    let async_transport = scripted();
    let blocking_transport = scripted();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(drive_async(async_transport.clone()));

    drive_blocking(blocking_transport.clone());

    assert_eq!(async_transport.requests(), blocking_transport.requests());
    assert_eq!(async_transport.request_count(), 6);
}

#[test]
fn test_blocking_lifecycle_matches_async_semantics() {
    let transport = Arc::new(ScriptedTransport::with_connect_script("1.30.0"));
    let client =
        blocking::VexdbClient::with_transport(ClientConfig::local(), transport).unwrap();

    assert!(!client.is_connected());
    client.connect().unwrap();
    client.connect().unwrap();
    assert!(client.is_connected());
    assert_eq!(client.meta().unwrap().version, "1.30.0");

    client.close();
    let err = client.connect().unwrap_err();
    assert!(matches!(
        err,
        vexdb_client::VexdbError::Lifecycle(vexdb_client::ClientState::Closed)
    ));
}
