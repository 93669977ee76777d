//! Connection lifecycle behavior through the public client surface

use std::sync::Arc;

use test_utils::{ScriptedTransport, meta_body};
use vexdb_client::{ClientConfig, ClientState, VexdbClient, VexdbError};

#[tokio::test]
async fn test_operations_before_connect_fail_fast() {
    let transport = Arc::new(ScriptedTransport::new());
    let client = VexdbClient::with_transport(ClientConfig::local(), transport.clone());

    let err = client.collections().list().await.unwrap_err();
    assert!(matches!(
        err,
        VexdbError::Lifecycle(ClientState::Unconnected)
    ));
    // nothing reached the wire
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_connect_probes_then_fetches_meta() {
    let transport = Arc::new(ScriptedTransport::with_connect_script("1.32.1"));
    let client = VexdbClient::with_transport(ClientConfig::local(), transport.clone());

    client.connect().await.unwrap();

    assert_eq!(client.state(), ClientState::Connected);
    assert_eq!(client.meta().unwrap().version, "1.32.1");

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    for (request, expected) in requests.iter().zip(["/v1/.well-known/ready", "/v1/meta"]) {
        match request {
            vexdb_client::transport::WireRequest::Rest { path, .. } => {
                assert_eq!(path, expected);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_connect_is_idempotent_while_open() {
    let transport = Arc::new(ScriptedTransport::with_connect_script("1.30.0"));
    let client = VexdbClient::with_transport(ClientConfig::local(), transport.clone());

    client.connect().await.unwrap();
    client.connect().await.unwrap();
    client.connect().await.unwrap();

    // the second and third connect consumed nothing
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_closed_client_is_terminal() {
    let transport = Arc::new(ScriptedTransport::with_connect_script("1.30.0"));
    let client = VexdbClient::with_transport(ClientConfig::local(), transport.clone());

    client.connect().await.unwrap();
    client.close();
    client.close(); // idempotent

    assert_eq!(client.state(), ClientState::Closed);

    let err = client.connect().await.unwrap_err();
    assert!(matches!(err, VexdbError::Lifecycle(ClientState::Closed)));

    let err = client.collections().list().await.unwrap_err();
    assert!(matches!(err, VexdbError::Lifecycle(ClientState::Closed)));
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_connect_gives_up_after_startup_window() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .with_fallback(|_| Err(vexdb_client::transport::TransportError::Connection(
                "connection refused".to_string(),
            ))),
    );
    let mut config = ClientConfig::local();
    config.startup_timeout = std::time::Duration::from_millis(250);
    let client = VexdbClient::with_transport(config, transport.clone());

    let err = client.connect().await.unwrap_err();
    match err {
        VexdbError::Connection(message) => {
            assert!(message.contains("connection refused"), "{}", message);
        }
        other => panic!("expected a connection error, got {:?}", other),
    }
    assert_eq!(client.state(), ClientState::Unconnected);
    // polled more than once within the window
    assert!(transport.request_count() >= 2);
}

#[tokio::test]
async fn test_probe_helpers_reflect_server_answers() {
    let transport = Arc::new(ScriptedTransport::with_connect_script("1.30.0"));
    let client = VexdbClient::with_transport(ClientConfig::local(), transport.clone());
    client.connect().await.unwrap();

    transport.push_rest(200, serde_json::json!({}));
    assert!(client.is_live().await.unwrap());

    transport.push_rest(503, serde_json::Value::Null);
    assert!(!client.is_ready().await.unwrap());

    transport.push_connection_error("connection reset");
    assert!(!client.is_ready().await.unwrap());
}

#[tokio::test]
async fn test_bad_meta_version_fails_connect() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_rest(200, serde_json::json!({}));
    transport.push_rest(200, meta_body("not-a-version"));
    let client = VexdbClient::with_transport(ClientConfig::local(), transport);

    let err = client.connect().await.unwrap_err();
    assert!(matches!(err, VexdbError::Decode(_)));
}
