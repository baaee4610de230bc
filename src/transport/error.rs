use polars::error::PolarsError;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network request failed for {url}")]
    NetworkRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} timed out after {timeout:?}")]
    RequestTimeout {
        url: String,
        timeout: Duration,
        #[source]
        source: reqwest::Error,
    },

    #[error("API request failed with status {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to launch curl executable '{0}'")]
    ProcessSpawn(PathBuf, #[source] std::io::Error),

    #[error("Request timed out: curl did not finish within {0:?}")]
    ProcessTimeout(Duration),

    #[error("Curl command failed with {status}: {stderr}")]
    ProcessFailed { status: ExitStatus, stderr: String },

    #[error("Failed to parse JSON response")]
    JsonParse(#[from] serde_json::Error),

    #[error("API returned unsuccessful response: {0}")]
    Unsuccessful(String),

    #[error("Failed processing DataFrame: {0}")]
    DataFrame(#[from] PolarsError),
}
