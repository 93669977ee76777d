use std::env;
use std::time::Duration;

use vexdb_grpc::ChannelConfig;

use crate::error::{VexdbError, VexdbResult};

/// Authentication material attached to every request on both protocols
#[derive(Debug, Clone)]
pub enum Credential {
    /// Raw API key sent as the authorization header value
    ApiKey(String),
    /// Bearer token (`Authorization: Bearer ...`)
    Bearer(String),
}

impl Credential {
    pub(crate) fn header_value(&self) -> String {
        match self {
            Credential::ApiKey(key) => key.clone(),
            Credential::Bearer(token) => format!("Bearer {}", token),
        }
    }
}

/// VexDB client configuration
///
/// Endpoints, credential, timeouts, and static headers, chosen once at client
/// construction. The REST endpoint serves configuration and object CRUD; the
/// gRPC endpoint serves search and batch traffic.
///
/// # Example
/// ```ignore
/// use std::time::Duration;
/// use vexdb_client::ClientConfig;
///
/// let config = ClientConfig::new("http://localhost:8080", "http://localhost:50051")?
///     .with_api_key("my-key")
///     .with_timeout(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub rest_url: String,
    pub grpc_url: String,
    pub credential: Option<Credential>,
    /// Default per-call deadline; individual calls may override it
    pub timeout: Duration,
    /// How long connect() waits for the node to report readiness
    pub startup_timeout: Duration,
    /// Static headers attached to every request on both protocols
    pub headers: Vec<(String, String)>,
    pub channel: ChannelConfig,
}

impl ClientConfig {
    pub fn new(rest_url: impl Into<String>, grpc_url: impl Into<String>) -> VexdbResult<Self> {
        let rest_url = normalize_url(rest_url.into())?;
        let grpc_url = normalize_url(grpc_url.into())?;

        Ok(Self {
            rest_url,
            grpc_url,
            credential: None,
            timeout: Duration::from_secs(30),
            startup_timeout: Duration::from_secs(5),
            headers: Vec::new(),
            channel: ChannelConfig::default(),
        })
    }

    /// Configuration for a local single-node VexDB on the default ports
    pub fn local() -> Self {
        Self {
            rest_url: "http://localhost:8080".to_string(),
            grpc_url: "http://localhost:50051".to_string(),
            credential: None,
            timeout: Duration::from_secs(30),
            startup_timeout: Duration::from_secs(5),
            headers: Vec::new(),
            channel: ChannelConfig::default(),
        }
    }

    /// Load configuration from `VEXDB_*` environment variables
    ///
    /// Recognized: `VEXDB_REST_URL`, `VEXDB_GRPC_URL`, `VEXDB_API_KEY`,
    /// `VEXDB_TIMEOUT_SECS`, `VEXDB_STARTUP_TIMEOUT_SECS`.
    pub fn from_env() -> VexdbResult<Self> {
        let rest_url =
            env::var("VEXDB_REST_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
        let grpc_url =
            env::var("VEXDB_GRPC_URL").unwrap_or_else(|_| "http://localhost:50051".to_string());

        let mut config = Self::new(rest_url, grpc_url)?;

        if let Ok(key) = env::var("VEXDB_API_KEY") {
            config.credential = Some(Credential::ApiKey(key));
        }
        if let Some(secs) = parse_env_secs("VEXDB_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_env_secs("VEXDB_STARTUP_TIMEOUT_SECS")? {
            config.startup_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.credential = Some(Credential::ApiKey(key.into()));
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.credential = Some(Credential::Bearer(token.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn with_channel(mut self, channel: ChannelConfig) -> Self {
        self.channel = channel;
        self
    }
}

fn normalize_url(url: String) -> VexdbResult<String> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(VexdbError::Validation(format!(
            "endpoint URL must start with http:// or https://, got '{}'",
            url
        )));
    }
    Ok(url.trim_end_matches('/').to_string())
}

fn parse_env_secs(key: &str) -> VexdbResult<Option<u64>> {
    match env::var(key) {
        Ok(raw) => raw.parse::<u64>().map(Some).map_err(|_| {
            VexdbError::Validation(format!("{} must be a number of seconds, got '{}'", key, raw))
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        assert!(ClientConfig::new("localhost:8080", "http://localhost:50051").is_err());
        assert!(ClientConfig::new("http://localhost:8080", "grpc://x").is_err());
        assert!(ClientConfig::new("https://db.example.com", "http://db.example.com:50051").is_ok());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ClientConfig::new("http://localhost:8080/", "http://localhost:50051").unwrap();
        assert_eq!(config.rest_url, "http://localhost:8080");
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::local()
            .with_api_key("secret")
            .with_timeout(Duration::from_secs(90))
            .with_header("x-vexdb-cluster", "eu-west");

        assert!(matches!(config.credential, Some(Credential::ApiKey(_))));
        assert_eq!(config.timeout, Duration::from_secs(90));
        assert_eq!(config.headers.len(), 1);
    }

    #[test]
    fn test_bearer_header_value() {
        let cred = Credential::Bearer("tok".to_string());
        assert_eq!(cred.header_value(), "Bearer tok");
        let cred = Credential::ApiKey("key".to_string());
        assert_eq!(cred.header_value(), "key");
    }
}
