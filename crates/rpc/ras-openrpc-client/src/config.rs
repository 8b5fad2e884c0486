//! Configuration types for the OpenRPC client

use bon::Builder;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Authentication configuration for the client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// No authentication
    #[default]
    None,
    /// Token sent as `Authorization: Bearer <token>` during the handshake
    Bearer { token: String },
}

/// Client configuration
#[derive(Debug, Clone, Builder)]
pub struct ClientConfig {
    /// WebSocket URL to connect to
    #[builder(into)]
    pub url: String,

    /// Authentication configuration
    #[builder(default)]
    pub auth: AuthConfig,

    /// Custom headers to send with the WebSocket handshake
    #[builder(default)]
    pub custom_headers: HashMap<String, String>,

    /// Connection timeout
    #[builder(default = Duration::from_secs(10))]
    pub connection_timeout: Duration,

    /// Capacity of the transport event channel
    #[builder(default = 1024)]
    pub event_buffer_size: usize,
}

impl ClientConfig {
    /// Create a new client configuration with the given URL
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            auth: AuthConfig::default(),
            custom_headers: HashMap::new(),
            connection_timeout: Duration::from_secs(10),
            event_buffer_size: 1024,
        }
    }

    /// Authenticate with a bearer token
    pub fn with_bearer_token<S: Into<String>>(mut self, token: S) -> Self {
        self.auth = AuthConfig::Bearer {
            token: token.into(),
        };
        self
    }

    /// Add a custom handshake header
    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.custom_headers.insert(key.into(), value.into());
        self
    }

    /// Get connection headers including authentication if needed
    pub fn connection_headers(&self) -> HashMap<String, String> {
        let mut headers = self.custom_headers.clone();

        if let AuthConfig::Bearer { token } = &self.auth {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }

        headers
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.url).map_err(|e| format!("Invalid URL: {}", e))?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(format!(
                "URL scheme must be ws or wss, got '{}'",
                url.scheme()
            ));
        }

        if self.connection_timeout.is_zero() {
            return Err("Connection timeout must be greater than zero".to_string());
        }

        if self.event_buffer_size == 0 {
            return Err("Event buffer size must be greater than zero".to_string());
        }

        if let AuthConfig::Bearer { token } = &self.auth {
            if token.is_empty() {
                return Err("Bearer token must not be empty".to_string());
            }
        }

        Ok(())
    }
}
