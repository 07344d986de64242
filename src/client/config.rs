//! Client configuration options.

use std::time::Duration;

use crate::Environment;

/// Default cap on concurrently in-flight requests.
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 8;

/// Configuration for the TeamSpace client.
///
/// # Example
///
/// ```
/// use teamspace_rs::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_concurrent_requests(4)
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API environment to talk to.
    pub environment: Environment,
    /// Base URL override; takes precedence over `environment` when set.
    pub base_url: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Cap on concurrently in-flight requests across the whole client.
    pub concurrent_requests: usize,
    /// Dump masked request/response records at `debug` level.
    pub verbose_logging: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            base_url: None,
            timeout: Duration::from_secs(30),
            user_agent: format!("teamspace-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
            verbose_logging: false,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the API environment.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Override the base URL entirely (mainly for tests and proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the cap on concurrently in-flight requests.
    ///
    /// Values below 1 are rejected when the client is built.
    pub fn with_concurrent_requests(mut self, n: usize) -> Self {
        self.concurrent_requests = n;
        self
    }

    /// Enable or disable masked request/response dumping.
    pub fn with_verbose_logging(mut self, enabled: bool) -> Self {
        self.verbose_logging = enabled;
        self
    }

    /// The effective base URL, with any trailing slash trimmed.
    pub(crate) fn effective_base_url(&self) -> String {
        let base = self
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.api_base_url());
        base.trim_end_matches('/').to_string()
    }
}
