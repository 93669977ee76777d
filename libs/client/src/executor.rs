use std::sync::Arc;

use crate::connection::Connection;
use crate::error::{VexdbError, VexdbResult};
use crate::transport::{WireRequest, WireResponse};

/// Shared request pipeline used by every resource facade
///
/// Each operation is one pass through build → send → parse: the facade builds
/// an immutable [`WireRequest`] (raising validation errors before any I/O),
/// the executor hands it to the connection, and the facade parses the raw
/// response through the helpers below. The blocking surface delegates to the
/// same facade bodies, so both calling modes run identical logic.
#[derive(Clone)]
pub(crate) struct Executor {
    connection: Arc<Connection>,
}

impl Executor {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub async fn send(&self, request: WireRequest) -> VexdbResult<WireResponse> {
        match &request {
            WireRequest::Rest { method, path, .. } => {
                tracing::debug!(target: "vexdb_client", %method, path = %path, "REST request");
            }
            WireRequest::Grpc { path, message, .. } => {
                tracing::debug!(target: "vexdb_client", path = %path, bytes = message.len(), "gRPC request");
            }
        }
        self.connection.perform(request).await
    }
}

/// Check a REST response against the allowed statuses and return its body
///
/// Any other status becomes a Request error carrying the server's message.
pub(crate) fn expect_rest(
    response: WireResponse,
    expected: &[u16],
) -> VexdbResult<serde_json::Value> {
    match response {
        WireResponse::Rest { status, body } => {
            if expected.contains(&status) {
                Ok(body)
            } else {
                Err(VexdbError::Request {
                    status,
                    message: rest_error_message(&body),
                })
            }
        }
        WireResponse::Grpc { .. } => Err(VexdbError::Decode(
            "expected a REST response but got a gRPC frame".to_string(),
        )),
    }
}

/// Decode a gRPC response frame into the expected reply message
pub(crate) fn decode_grpc<M: prost::Message + Default>(response: WireResponse) -> VexdbResult<M> {
    match response {
        WireResponse::Grpc { message } => Ok(M::decode(message)?),
        WireResponse::Rest { .. } => Err(VexdbError::Decode(
            "expected a gRPC frame but got a REST response".to_string(),
        )),
    }
}

/// Pull a human-readable message out of a REST error body
///
/// The server reports errors either as `{"error": "..."}` or as
/// `{"error": [{"message": "..."}]}`.
pub(crate) fn rest_error_message(body: &serde_json::Value) -> String {
    match body.get("error") {
        Some(serde_json::Value::String(message)) => message.clone(),
        Some(serde_json::Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("message").and_then(|m| m.as_str()))
                .collect();
            if messages.is_empty() {
                body.to_string()
            } else {
                messages.join("; ")
            }
        }
        _ if body.is_null() => "no error detail provided".to_string(),
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expect_rest_passes_allowed_status() {
        let response = WireResponse::Rest {
            status: 200,
            body: json!({"ok": true}),
        };
        let body = expect_rest(response, &[200, 204]).unwrap();
        assert_eq!(body, json!({"ok": true}));
    }

    #[test]
    fn test_expect_rest_surfaces_server_message() {
        let response = WireResponse::Rest {
            status: 404,
            body: json!({"error": "collection not found"}),
        };
        let err = expect_rest(response, &[200]).unwrap_err();
        match err {
            VexdbError::Request { status, message } => {
                assert_eq!(status, 404);
                assert!(message.contains("collection not found"));
            }
            other => panic!("expected Request, got {:?}", other),
        }
    }

    #[test]
    fn test_error_message_from_list_shape() {
        let body = json!({"error": [{"message": "first"}, {"message": "second"}]});
        assert_eq!(rest_error_message(&body), "first; second");
    }

    #[test]
    fn test_error_message_from_empty_body() {
        assert_eq!(
            rest_error_message(&serde_json::Value::Null),
            "no error detail provided"
        );
    }

    #[test]
    fn test_decode_grpc_rejects_rest_frame() {
        let response = WireResponse::Rest {
            status: 200,
            body: json!(null),
        };
        let err = decode_grpc::<vexdb_rpc::v1::SearchReply>(response).unwrap_err();
        assert!(matches!(err, VexdbError::Decode(_)));
    }
}
