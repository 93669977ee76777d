use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use http::uri::PathAndQuery;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;
use tonic::Code;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::Channel;
use vexdb_grpc::{HeadersInterceptor, RawCodec};

use crate::config::ClientConfig;
use crate::error::{VexdbError, VexdbResult};

/// Upper bound for gRPC messages in either direction
const MAX_GRPC_MESSAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB

pub type TransportResult<T> = Result<T, TransportError>;

/// Failures below the request/response layer
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a server verdict: refused, TLS, deadline
    #[error("transport failure: {0}")]
    Connection(String),

    /// The server answered with a non-success gRPC status
    ///
    /// REST responses are returned with their status code intact instead and
    /// classified by the response parser.
    #[error("status {status}: {message}")]
    Status { status: u16, message: String },
}

/// Immutable description of one wire operation
///
/// Built by resource facades, consumed exactly once by a [`Transport`].
/// Building a descriptor never touches the network, so validation failures
/// surface before any I/O.
#[derive(Debug, Clone, PartialEq)]
pub enum WireRequest {
    Rest {
        method: Method,
        /// Path under the REST endpoint, e.g. `/v1/schema`
        path: String,
        body: Option<serde_json::Value>,
        timeout: Option<Duration>,
    },
    Grpc {
        /// Full RPC path, e.g. `/vexdb.v1.VectorService/Search`
        path: &'static str,
        /// prost-encoded request message
        message: Bytes,
        timeout: Option<Duration>,
    },
}

impl WireRequest {
    pub fn rest(method: Method, path: impl Into<String>, body: Option<serde_json::Value>) -> Self {
        WireRequest::Rest {
            method,
            path: path.into(),
            body,
            timeout: None,
        }
    }

    pub fn grpc<M: prost::Message>(path: &'static str, message: &M) -> Self {
        WireRequest::Grpc {
            path,
            message: Bytes::from(message.encode_to_vec()),
            timeout: None,
        }
    }

    /// Override the connection's default deadline for this call only
    pub fn with_timeout(mut self, deadline: Duration) -> Self {
        match &mut self {
            WireRequest::Rest { timeout, .. } | WireRequest::Grpc { timeout, .. } => {
                *timeout = Some(deadline);
            }
        }
        self
    }
}

/// Raw response paired with [`WireRequest`]
#[derive(Debug, Clone, PartialEq)]
pub enum WireResponse {
    Rest {
        status: u16,
        /// Decoded JSON body; `Null` when the body was empty
        body: serde_json::Value,
    },
    Grpc {
        message: Bytes,
    },
}

/// One-request-at-a-time transport primitive shared by all facades
///
/// Implementations must tolerate arbitrary concurrent use on one instance;
/// no call may block or corrupt unrelated concurrent calls. The production
/// implementation is [`HttpTransport`]; tests substitute scripted fakes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: WireRequest) -> TransportResult<WireResponse>;
}

/// Production transport: reqwest for REST, a raw tonic unary call for gRPC
///
/// The HTTP client and the gRPC channel are both cheap to clone per call, so
/// concurrent requests multiplex over the shared connections without any
/// client-side locking.
pub struct HttpTransport {
    http: reqwest::Client,
    rest_base: String,
    grpc: InterceptedService<Channel, HeadersInterceptor>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> VexdbResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(credential) = &config.credential {
            let value = HeaderValue::from_str(&credential.header_value())
                .map_err(|_| VexdbError::Validation("credential is not a valid header".into()))?;
            headers.insert(AUTHORIZATION, value);
        }
        for (key, value) in &config.headers {
            let key = HeaderName::from_str(key)
                .map_err(|_| VexdbError::Validation(format!("bad header key: {}", key)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| VexdbError::Validation(format!("bad header value for {}", key)))?;
            headers.insert(key, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| VexdbError::Connection(format!("failed to build HTTP client: {}", e)))?;

        let channel =
            vexdb_grpc::create_channel_lazy_with_config(&config.grpc_url, config.channel.clone())?;

        let mut interceptor = match &config.credential {
            Some(credential) => HeadersInterceptor::api_key(credential.header_value())?,
            None => HeadersInterceptor::new(),
        };
        for (key, value) in &config.headers {
            interceptor = interceptor.with_header(key, value)?;
        }

        Ok(Self {
            http,
            rest_base: config.rest_url.clone(),
            grpc: InterceptedService::new(channel, interceptor),
        })
    }

    async fn send_rest(
        &self,
        method: Method,
        path: String,
        body: Option<serde_json::Value>,
        timeout: Option<Duration>,
    ) -> TransportResult<WireResponse> {
        let url = format!("{}{}", self.rest_base, path);

        let mut request = self.http.request(method, &url);
        if let Some(deadline) = timeout {
            request = request.timeout(deadline);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(target: "vexdb_client", url = %url, error = %e, "REST request failed");
            TransportError::Connection(e.to_string())
        })?;

        let status = response.status().as_u16();
        let raw = response
            .bytes()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        let body = if raw.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&raw).unwrap_or(serde_json::Value::Null)
        };

        Ok(WireResponse::Rest { status, body })
    }

    async fn send_grpc(
        &self,
        path: &'static str,
        message: Bytes,
        timeout: Option<Duration>,
    ) -> TransportResult<WireResponse> {
        let mut grpc = tonic::client::Grpc::new(self.grpc.clone())
            .max_decoding_message_size(MAX_GRPC_MESSAGE_SIZE)
            .max_encoding_message_size(MAX_GRPC_MESSAGE_SIZE);

        grpc.ready()
            .await
            .map_err(|e| TransportError::Connection(format!("gRPC channel not ready: {}", e)))?;

        let mut request = tonic::Request::new(message);
        if let Some(deadline) = timeout {
            request.set_timeout(deadline);
        }

        let response = grpc
            .unary(request, PathAndQuery::from_static(path), RawCodec)
            .await
            .map_err(classify_status)?;

        Ok(WireResponse::Grpc {
            message: response.into_inner(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: WireRequest) -> TransportResult<WireResponse> {
        match request {
            WireRequest::Rest {
                method,
                path,
                body,
                timeout,
            } => self.send_rest(method, path, body, timeout).await,
            WireRequest::Grpc {
                path,
                message,
                timeout,
            } => self.send_grpc(path, message, timeout).await,
        }
    }
}

/// Split tonic statuses into environment failures and server verdicts
fn classify_status(status: tonic::Status) -> TransportError {
    match status.code() {
        Code::Unavailable | Code::DeadlineExceeded => TransportError::Connection(format!(
            "{}: {}",
            status.code(),
            status.message()
        )),
        code => TransportError::Status {
            status: code as u16,
            message: status.message().to_string(),
        },
    }
}
