//! HTTP client setup and middleware configuration.
//!
//! Every client built here traces its requests through
//! [`TracingMiddleware`]. Retries are opt-in: the transfer pipelines never
//! retry on their own, so the default policy sends each request once.
//!
//! # Examples
//!
//! ```rust
//! use bulkport::http::{create_http_client, HttpClientConfig};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpClientConfig {
//!     timeout: Some(Duration::from_secs(300)),
//!     ..HttpClientConfig::default()
//! };
//! let client = create_http_client(config)?;
//! # Ok(())
//! # }
//! ```

use reqwest::{header::HeaderMap, Proxy};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::time::Duration;

/// Configuration for HTTP client setup.
#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
    /// Number of retries for transient failures. `0` disables the retry
    /// middleware entirely.
    pub retries: u32,
    /// Optional proxy configuration.
    pub proxy: Option<Proxy>,
    /// Default headers to include with all requests, e.g. credentials.
    pub headers: Option<HeaderMap>,
    /// Deadline for a whole request, body transfer included.
    pub timeout: Option<Duration>,
}

/// Creates an HTTP client with middleware configuration.
///
/// This function sets up a reqwest client with:
/// - Tracing middleware for request/response logging
/// - Retry middleware with exponential backoff, when `retries > 0`
/// - Optional proxy, default headers and timeout
pub fn create_http_client(
    config: HttpClientConfig,
) -> Result<ClientWithMiddleware, reqwest::Error> {
    let retries = config.retries;
    let inner = build_inner_client(config)?;
    Ok(with_middleware(inner, retries))
}

/// Builds the plain reqwest client shared by all middleware stacks.
pub(crate) fn build_inner_client(config: HttpClientConfig) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder();

    if let Some(proxy) = config.proxy {
        builder = builder.proxy(proxy);
    }

    if let Some(headers) = config.headers {
        builder = builder.default_headers(headers);
    }

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    builder.build()
}

/// Wraps `inner` with tracing and, if requested, retries.
///
/// Requests with streamed bodies cannot be replayed, so clients used for
/// uploads must be built with `retries == 0`.
pub(crate) fn with_middleware(inner: reqwest::Client, retries: u32) -> ClientWithMiddleware {
    // Trace HTTP requests. See the tracing crate to make use of these traces.
    let builder = ClientBuilder::new(inner).with(TracingMiddleware::default());

    if retries == 0 {
        return builder.build();
    }

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(retries);
    builder
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build()
}
