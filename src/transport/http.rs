use crate::error::LvMeteoError;
use crate::transport::error::ApiError;
use crate::transport::{Transport, TransportOptions};
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Sends statements as `GET <base_url>?sql=<statement>` with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(options: &TransportOptions) -> Self {
        Self::with_client(Client::new(), &options.base_url, options.timeout)
    }

    /// Uses an existing client, e.g. one with custom proxy or TLS settings.
    pub fn with_client(client: Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            timeout,
        }
    }

    fn request_error(&self, source: reqwest::Error) -> ApiError {
        if source.is_timeout() {
            ApiError::RequestTimeout {
                url: self.base_url.clone(),
                timeout: self.timeout,
                source,
            }
        } else {
            ApiError::NetworkRequest {
                url: self.base_url.clone(),
                source,
            }
        }
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, sql: &str) -> Result<Value, LvMeteoError> {
        debug!("GET {}", self.base_url);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("sql", sql)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("HTTP error for {}: {}", self.base_url, status);
            return Err(ApiError::HttpStatus { status, body }.into());
        }

        let body = response.text().await.map_err(|e| self.request_error(e))?;
        Ok(serde_json::from_str(&body)?)
    }
}
