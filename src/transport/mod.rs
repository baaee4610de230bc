//! Delivery of SQL statements to the datastore endpoint.
//!
//! Two mechanisms exist: an in-process HTTP client ([`HttpTransport`]) and an
//! external `curl` process ([`CurlTransport`]). [`SqlTransport`] picks one of
//! them from [`TransportOptions`].

pub mod curl;
pub mod error;
pub mod http;

#[cfg(test)]
pub(crate) mod stub;

use crate::error::LvMeteoError;
use crate::types::resources::API_BASE_URL;
use bon::Builder;
use serde_json::Value;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

pub use curl::CurlTransport;
pub use http::HttpTransport;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_PROCESS_TIMEOUT: Duration = Duration::from_secs(400);

/// Sends one SQL statement and returns the decoded JSON body.
///
/// Implementations do not retry. The statement has already been checked to be
/// non-empty when `execute` is called.
pub trait Transport: Send + Sync {
    fn execute(&self, sql: &str) -> impl Future<Output = Result<Value, LvMeteoError>> + Send;
}

/// Settings for reaching the datastore.
///
/// # Examples
///
/// ```rust
/// use lvmeteo::TransportOptions;
/// use std::time::Duration;
///
/// let options = TransportOptions::builder()
///     .use_curl(true)
///     .process_timeout(Duration::from_secs(120))
///     .build();
/// assert_eq!(options.timeout, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct TransportOptions {
    /// Run requests through an external `curl` process instead of the HTTP client.
    #[builder(default)]
    pub use_curl: bool,

    /// Per-request timeout of the HTTP client.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,

    /// Hard limit on the lifetime of the `curl` process.
    #[builder(default = DEFAULT_PROCESS_TIMEOUT)]
    pub process_timeout: Duration,

    #[builder(into, default = PathBuf::from("curl"))]
    pub curl_path: PathBuf,

    #[builder(into, default = API_BASE_URL.to_string())]
    pub base_url: String,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TransportOptions {
    /// Defaults overridden by the `LVMETEO_*` environment variables:
    ///
    /// * `LVMETEO_BASE_URL`
    /// * `LVMETEO_TIMEOUT_SECS`
    /// * `LVMETEO_PROCESS_TIMEOUT_SECS`
    /// * `LVMETEO_USE_CURL` (`true`/`false`/`1`/`0`)
    /// * `LVMETEO_CURL_PATH`
    ///
    /// # Errors
    ///
    /// [`LvMeteoError::Configuration`] if a variable is set to a value that
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, LvMeteoError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LvMeteoError> {
        let mut options = Self::default();
        if let Some(url) = lookup("LVMETEO_BASE_URL") {
            options.base_url = url;
        }
        if let Some(secs) = lookup("LVMETEO_TIMEOUT_SECS") {
            options.timeout = parse_secs("LVMETEO_TIMEOUT_SECS", &secs)?;
        }
        if let Some(secs) = lookup("LVMETEO_PROCESS_TIMEOUT_SECS") {
            options.process_timeout = parse_secs("LVMETEO_PROCESS_TIMEOUT_SECS", &secs)?;
        }
        if let Some(flag) = lookup("LVMETEO_USE_CURL") {
            options.use_curl = match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                other => {
                    return Err(LvMeteoError::Configuration(format!(
                        "LVMETEO_USE_CURL must be a boolean, got '{}'",
                        other
                    )))
                }
            };
        }
        if let Some(path) = lookup("LVMETEO_CURL_PATH") {
            options.curl_path = PathBuf::from(path);
        }
        Ok(options)
    }
}

fn parse_secs(key: &str, value: &str) -> Result<Duration, LvMeteoError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(Duration::from_secs_f64)
        .ok_or_else(|| {
            LvMeteoError::Configuration(format!(
                "{} must be a positive number of seconds, got '{}'",
                key, value
            ))
        })
}

/// The transport selected by [`TransportOptions::use_curl`].
#[derive(Debug, Clone)]
pub enum SqlTransport {
    Http(HttpTransport),
    Curl(CurlTransport),
}

impl SqlTransport {
    pub fn new(options: &TransportOptions) -> Self {
        if options.use_curl {
            SqlTransport::Curl(CurlTransport::new(options))
        } else {
            SqlTransport::Http(HttpTransport::new(options))
        }
    }
}

impl Transport for SqlTransport {
    async fn execute(&self, sql: &str) -> Result<Value, LvMeteoError> {
        match self {
            SqlTransport::Http(transport) => transport.execute(sql).await,
            SqlTransport::Curl(transport) => transport.execute(sql).await,
        }
    }
}
