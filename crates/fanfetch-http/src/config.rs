//! Public configuration for the HTTP retriever.

use std::time::Duration;

/// Configuration for [`HttpRetriever`](crate::HttpRetriever).
///
/// Use the builder pattern methods to customize the retriever.
///
/// # Example
///
/// ```
/// use fanfetch_http::HttpRetrieverConfig;
/// use std::time::Duration;
///
/// let config = HttpRetrieverConfig::new()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0")
///     .with_error_for_status(true);
/// ```
#[derive(Debug, Clone)]
pub struct HttpRetrieverConfig {
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Whole-request timeout, body included
    pub(crate) timeout: Option<Duration>,
    /// Connection establishment timeout
    pub(crate) connect_timeout: Duration,
    /// Treat non-2xx responses as failures
    pub(crate) error_for_status: bool,
}

impl Default for HttpRetrieverConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("fanfetch/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Duration::from_secs(10),
            error_for_status: false,
        }
    }
}

impl HttpRetrieverConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the whole-request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Remove the whole-request timeout.
    #[must_use]
    pub const fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Set the connect timeout.
    ///
    /// Defaults to 10 seconds.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Fail retrievals whose response status is not 2xx.
    ///
    /// Off by default: any response body is counted.
    #[must_use]
    pub const fn with_error_for_status(mut self, enabled: bool) -> Self {
        self.error_for_status = enabled;
        self
    }
}
