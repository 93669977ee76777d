//! Batch partitioning and per-item error semantics

use std::sync::Arc;

use serde_json::json;
use test_utils::{ScriptedTransport, sample_objects};
use vexdb_client::transport::WireRequest;
use vexdb_client::{
    BatchOptions, ClientConfig, DataObject, Filter, MAX_BATCH_OBJECTS, VexdbClient,
};
use vexdb_rpc::v1;

async fn connected_client(transport: Arc<ScriptedTransport>) -> VexdbClient {
    let client = VexdbClient::with_transport(ClientConfig::local(), transport);
    client.connect().await.unwrap();
    client
}

fn decode_batch_request(request: &WireRequest) -> v1::BatchObjectsRequest {
    match request {
        WireRequest::Grpc { path, message, .. } => {
            assert_eq!(*path, v1::paths::BATCH_OBJECTS);
            prost::Message::decode(message.clone()).unwrap()
        }
        other => panic!("expected a gRPC request, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_batch_sends_nothing() {
    let transport = Arc::new(ScriptedTransport::with_connect_script("1.30.0"));
    let client = connected_client(transport.clone()).await;

    let result = client
        .batch()
        .insert_objects("Books", &[], &BatchOptions::new())
        .await
        .unwrap();

    assert!(result.ids.is_empty());
    assert!(result.errors.is_empty());
    // only the connect traffic
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_large_batch_is_partitioned_in_order() {
    let transport = Arc::new(ScriptedTransport::with_connect_script("1.30.0"));
    let reply = v1::BatchObjectsReply {
        took: 0.5,
        errors: Vec::new(),
    };
    transport.push_grpc(&reply);
    transport.push_grpc(&reply);
    transport.push_grpc(&reply);
    let client = connected_client(transport.clone()).await;

    let objects = sample_objects(2500);
    let result = client
        .batch()
        .insert_objects("Books", &objects, &BatchOptions::new())
        .await
        .unwrap();

    assert_eq!(result.successes(), 2500);
    assert_eq!(result.failures(), 0);
    assert!((result.took - 1.5).abs() < f32::EPSILON);

    let requests = transport.requests();
    let batches: Vec<_> = requests[2..].iter().map(decode_batch_request).collect();
    assert_eq!(batches.len(), 3);
    assert_eq!(batches[0].objects.len(), MAX_BATCH_OBJECTS);
    assert_eq!(batches[1].objects.len(), MAX_BATCH_OBJECTS);
    assert_eq!(batches[2].objects.len(), 500);

    // input order survives partitioning
    let sent_ids: Vec<&str> = batches
        .iter()
        .flat_map(|b| b.objects.iter().map(|o| o.uuid.as_str()))
        .collect();
    let expected: Vec<String> = objects
        .iter()
        .map(|o| o.id.unwrap().to_string())
        .collect();
    assert_eq!(sent_ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_server_item_errors_are_remapped_to_input_indices() {
    let transport = Arc::new(ScriptedTransport::with_connect_script("1.30.0"));
    transport.push_grpc(&v1::BatchObjectsReply {
        took: 0.1,
        errors: Vec::new(),
    });
    // second partition: its local item 3 failed
    transport.push_grpc(&v1::BatchObjectsReply {
        took: 0.1,
        errors: vec![v1::BatchObjectsError {
            index: 3,
            error: "vector dimension mismatch".to_string(),
        }],
    });
    let client = connected_client(transport.clone()).await;

    let objects = sample_objects(1200);
    let result = client
        .batch()
        .insert_objects("Books", &objects, &BatchOptions::new())
        .await
        .unwrap();

    assert_eq!(result.failures(), 1);
    let error = &result.errors[0];
    assert_eq!(error.index, 1003);
    assert_eq!(error.message, "vector dimension mismatch");
    assert!(result.ids[1003].is_none());
    assert!(result.ids[1002].is_some());
    assert_eq!(result.successes(), 1199);
}

#[tokio::test]
async fn test_invalid_items_fail_locally_without_aborting_siblings() {
    let transport = Arc::new(ScriptedTransport::with_connect_script("1.30.0"));
    transport.push_grpc(&v1::BatchObjectsReply {
        took: 0.1,
        errors: Vec::new(),
    });
    let client = connected_client(transport.clone()).await;

    let objects = vec![
        sample_objects(1).remove(0),
        DataObject::new(json!("not an object")),
        sample_objects(3).remove(2),
    ];
    let result = client
        .batch()
        .insert_objects("Books", &objects, &BatchOptions::new())
        .await
        .unwrap();

    assert_eq!(result.successes(), 2);
    assert_eq!(result.errors[0].index, 1);
    assert!(result.ids[1].is_none());

    // the bad item never reached the wire
    let batch = decode_batch_request(&transport.requests()[2]);
    assert_eq!(batch.objects.len(), 2);
}

#[tokio::test]
async fn test_transport_failure_fails_the_whole_call() {
    let transport = Arc::new(ScriptedTransport::with_connect_script("1.30.0"));
    transport.push_connection_error("stream reset");
    let client = connected_client(transport).await;

    let err = client
        .batch()
        .insert_objects("Books", &sample_objects(10), &BatchOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, vexdb_client::VexdbError::Connection(_)));
}

#[tokio::test]
async fn test_batch_options_flow_to_the_wire() {
    let transport = Arc::new(ScriptedTransport::with_connect_script("1.30.0"));
    transport.push_grpc(&v1::BatchObjectsReply {
        took: 0.1,
        errors: Vec::new(),
    });
    let client = connected_client(transport.clone()).await;

    let options = BatchOptions::new()
        .with_tenant("acme")
        .with_consistency_level(vexdb_client::ConsistencyLevel::Quorum);
    client
        .batch()
        .insert_objects("Books", &sample_objects(2), &options)
        .await
        .unwrap();

    let batch = decode_batch_request(&transport.requests()[2]);
    assert_eq!(batch.tenant, "acme");
    assert_eq!(batch.consistency_level, v1::ConsistencyLevel::Quorum as i32);
}

#[tokio::test]
async fn test_delete_objects_sends_lowered_filter() {
    let transport = Arc::new(ScriptedTransport::with_connect_script("1.30.0"));
    transport.push_grpc(&v1::BatchDeleteReply {
        took: 0.2,
        matches: 7,
        successful: 7,
        failed: 0,
    });
    let client = connected_client(transport.clone()).await;

    let filter = Filter::by_property("obsolete").eq(true);
    let result = client
        .batch()
        .delete_objects("Books", &filter, &BatchOptions::new())
        .await
        .unwrap();

    assert_eq!(result.matches, 7);
    assert_eq!(result.successful, 7);

    match &transport.requests()[2] {
        WireRequest::Grpc { path, message, .. } => {
            assert_eq!(*path, v1::paths::BATCH_DELETE);
            let request: v1::BatchDeleteRequest = prost::Message::decode(message.clone()).unwrap();
            let filters = request.filters.unwrap();
            assert_eq!(filters.operator, v1::filters::Operator::Equal as i32);
            assert_eq!(filters.on, vec!["obsolete".to_string()]);
        }
        other => panic!("expected a gRPC request, got {:?}", other),
    }
}
