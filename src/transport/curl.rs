use crate::error::LvMeteoError;
use crate::transport::error::ApiError;
use crate::transport::{Transport, TransportOptions};
use log::{debug, warn};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Sends statements through an external `curl` executable.
///
/// Runs `curl -sS -G --data-urlencode sql=<statement> <base_url>` and decodes
/// its standard output. The process is killed if it outlives the configured
/// timeout. Useful where the in-process HTTP client cannot reach the portal,
/// or for very slow archive queries.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    curl_path: PathBuf,
    base_url: String,
    timeout: Duration,
}

impl CurlTransport {
    pub fn new(options: &TransportOptions) -> Self {
        Self {
            curl_path: options.curl_path.clone(),
            base_url: options.base_url.clone(),
            timeout: options.process_timeout,
        }
    }

    pub fn curl_path(&self) -> &Path {
        &self.curl_path
    }
}

impl Transport for CurlTransport {
    async fn execute(&self, sql: &str) -> Result<Value, LvMeteoError> {
        debug!("Running {:?} for {}", self.curl_path, self.base_url);
        let child = Command::new(&self.curl_path)
            .arg("-sS")
            .arg("-G")
            .arg("--data-urlencode")
            .arg(format!("sql={}", sql))
            .arg(&self.base_url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ApiError::ProcessSpawn(self.curl_path.clone(), e))?;

        // Dropping the child on timeout kills it.
        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output.map_err(|e| ApiError::ProcessSpawn(self.curl_path.clone(), e))?,
            Err(_) => {
                warn!("curl did not finish within {:?}", self.timeout);
                return Err(ApiError::ProcessTimeout(self.timeout).into());
            }
        };

        if !output.status.success() {
            return Err(ApiError::ProcessFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}
