//! Shared test utilities for client integration tests
//!
//! The centerpiece is [`ScriptedTransport`], an in-memory transport that
//! answers wire requests from a pre-loaded script while logging everything
//! it receives. Tests assert on both the responses the client surfaces and
//! the exact requests it sent.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use test_utils::ScriptedTransport;
//! use vexdb_client::{ClientConfig, VexdbClient};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let transport = Arc::new(ScriptedTransport::with_connect_script("1.32.0"));
//!     let client = VexdbClient::with_transport(ClientConfig::local(), transport.clone());
//!     client.connect().await.unwrap();
//!     assert_eq!(transport.requests().len(), 2);
//! }
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use vexdb_client::DataObject;
use vexdb_client::transport::{Transport, TransportError, TransportResult, WireRequest, WireResponse};

type Responder = Box<dyn Fn(&WireRequest) -> TransportResult<WireResponse> + Send + Sync>;

/// Transport double that replays a scripted response sequence
///
/// Responses are consumed in FIFO order. When the script runs dry the
/// fallback responder answers instead, if one was installed; otherwise the
/// call fails with a connection error naming the unexpected request.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<TransportResult<WireResponse>>>,
    requests: Mutex<Vec<WireRequest>>,
    fallback: Option<Responder>,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            fallback: None,
        }
    }

    /// A transport pre-loaded with the two responses `connect` consumes:
    /// a ready probe and a meta fetch reporting the given version
    pub fn with_connect_script(version: &str) -> Self {
        let transport = Self::new();
        transport.push_rest(200, json!({}));
        transport.push_rest(200, meta_body(version));
        transport
    }

    /// Answer unscripted requests with the given closure
    pub fn with_fallback(
        mut self,
        responder: impl Fn(&WireRequest) -> TransportResult<WireResponse> + Send + Sync + 'static,
    ) -> Self {
        self.fallback = Some(Box::new(responder));
        self
    }

    pub fn push(&self, response: TransportResult<WireResponse>) {
        self.lock_script().push_back(response);
    }

    pub fn push_rest(&self, status: u16, body: serde_json::Value) {
        self.push(Ok(WireResponse::Rest { status, body }));
    }

    pub fn push_grpc<M: prost::Message>(&self, message: &M) {
        self.push(Ok(WireResponse::Grpc {
            message: message.encode_to_vec().into(),
        }));
    }

    pub fn push_connection_error(&self, message: &str) {
        self.push(Err(TransportError::Connection(message.to_string())));
    }

    /// Every request seen so far, in arrival order
    pub fn requests(&self) -> Vec<WireRequest> {
        self.lock_requests().clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock_requests().len()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<TransportResult<WireResponse>>> {
        match self.script.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<WireRequest>> {
        match self.requests.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: WireRequest) -> TransportResult<WireResponse> {
        self.lock_requests().push(request.clone());
        if let Some(response) = self.lock_script().pop_front() {
            return response;
        }
        if let Some(fallback) = &self.fallback {
            return fallback(&request);
        }
        Err(TransportError::Connection(format!(
            "no scripted response for {:?}",
            request
        )))
    }
}

/// `/v1/meta` body reporting the given server version
pub fn meta_body(version: &str) -> serde_json::Value {
    json!({
        "version": version,
        "gitHash": "0000000",
        "modules": {},
    })
}

/// A small object with a deterministic id derived from `seed`
pub fn sample_object(seed: u32) -> DataObject {
    let id = Uuid::from_u128(u128::from(seed) + 1);
    DataObject::new(json!({
        "title": format!("object-{seed}"),
        "rank": seed,
    }))
    .with_id(id)
    .with_vector(vec![seed as f32, 1.0, 0.0])
}

/// `count` sample objects with distinct ids
pub fn sample_objects(count: u32) -> Vec<DataObject> {
    (0..count).map(sample_object).collect()
}
