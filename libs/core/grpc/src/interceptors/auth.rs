use tonic::metadata::{AsciiMetadataKey, AsciiMetadataValue};
use tonic::{Request, Status};

use crate::error::{GrpcError, GrpcResult};

/// Interceptor that attaches authentication and static headers to every RPC
///
/// Headers are parsed into gRPC metadata once at construction, so a bad key
/// or value is reported when the client is built instead of failing every
/// call.
///
/// # Example
/// ```ignore
/// use vexdb_grpc::HeadersInterceptor;
///
/// let auth = HeadersInterceptor::bearer("my-api-key")?
///     .with_header("x-vexdb-cluster", "eu-west")?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct HeadersInterceptor {
    headers: Vec<(AsciiMetadataKey, AsciiMetadataValue)>,
}

impl HeadersInterceptor {
    /// Create an interceptor with no headers
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an interceptor with a Bearer token
    pub fn bearer(token: impl AsRef<str>) -> GrpcResult<Self> {
        Self::new().with_header("authorization", format!("Bearer {}", token.as_ref()))
    }

    /// Create an interceptor with a raw API key in the authorization header
    pub fn api_key(key: impl AsRef<str>) -> GrpcResult<Self> {
        Self::new().with_header("authorization", key)
    }

    /// Attach an additional static header to every request
    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> GrpcResult<Self> {
        let key = key
            .as_ref()
            .parse::<AsciiMetadataKey>()
            .map_err(|_| GrpcError::InvalidMetadata(format!("bad header key: {}", key.as_ref())))?;
        let value = value
            .as_ref()
            .parse::<AsciiMetadataValue>()
            .map_err(|_| GrpcError::InvalidMetadata(format!("bad header value for {}", key)))?;
        self.headers.push((key, value));
        Ok(self)
    }

    /// Whether any headers are configured
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

impl tonic::service::Interceptor for HeadersInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        for (key, value) in &self.headers {
            request.metadata_mut().insert(key.clone(), value.clone());
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::service::Interceptor;

    #[test]
    fn test_bearer_token() {
        let mut auth = HeadersInterceptor::bearer("test-key").unwrap();
        let request = Request::new(());
        let req = auth.call(request).unwrap();
        let auth_header = req.metadata().get("authorization").unwrap();
        assert_eq!(auth_header, "Bearer test-key");
    }

    #[test]
    fn test_api_key() {
        let mut auth = HeadersInterceptor::api_key("my-key").unwrap();
        let request = Request::new(());
        let req = auth.call(request).unwrap();
        let auth_header = req.metadata().get("authorization").unwrap();
        assert_eq!(auth_header, "my-key");
    }

    #[test]
    fn test_extra_headers() {
        let mut auth = HeadersInterceptor::new()
            .with_header("x-vexdb-cluster", "eu-west")
            .unwrap();
        let req = auth.call(Request::new(())).unwrap();
        assert_eq!(req.metadata().get("x-vexdb-cluster").unwrap(), "eu-west");
    }

    #[test]
    fn test_invalid_header_key() {
        let result = HeadersInterceptor::new().with_header("bad key", "value");
        assert!(matches!(result, Err(GrpcError::InvalidMetadata(_))));
    }
}
