/*!
 * Job result records and the channels that carry them.
 *
 * Every job, successful or not, produces exactly one `ResultRecord`.
 * Sinks:
 * - `JsonLinesResultSink`: one JSON object per line, to a file or stdout
 * - `WebhookResultSink`: HTTP POST of the record to a configured endpoint
 */

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use reqwest::Client;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;
use uuid::Uuid;

use crate::correction::Correction;
use crate::errors::{AppError, ResultChannelError};

pub const SUCCESS_MESSAGE: &str = "Adjusted SCC file successfully imported";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Failure,
}

/// Outcome report for one job
#[derive(Debug, Clone, Serialize)]
pub struct ResultRecord {
    /// Unique id of this record
    pub message_id: String,
    /// RFC 3339 creation time
    pub timestamp: String,
    pub status: ResultStatus,
    pub status_code: u16,
    /// Upstream job id; absent when the event was too malformed to carry one
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Written object, `s3://bucket/key`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub corrections: Vec<Correction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    /// Result channel name
    pub queue: String,
}

impl ResultRecord {
    pub fn success(job_id: &str, output: String, corrections: Vec<Correction>, queue: &str) -> Self {
        Self {
            message: Some(SUCCESS_MESSAGE.to_string()),
            output: Some(output),
            corrections,
            ..Self::base(ResultStatus::Success, 200, Some(job_id.to_string()), queue)
        }
    }

    pub fn failure(job_id: Option<&str>, error: &AppError, queue: &str) -> Self {
        let detail = match error {
            AppError::Correction(inner) => inner.to_string(),
            other => other.to_string(),
        };
        Self {
            error: Some(format!("SCC correction failed. Error: {}", detail)),
            error_kind: Some(error.kind().to_string()),
            ..Self::base(ResultStatus::Failure, 500, job_id.map(str::to_string), queue)
        }
    }

    fn base(status: ResultStatus, status_code: u16, job_id: Option<String>, queue: &str) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339(),
            status,
            status_code,
            job_id,
            message: None,
            output: None,
            corrections: Vec::new(),
            error: None,
            error_kind: None,
            queue: queue.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }

    pub fn to_json(&self) -> Result<String, ResultChannelError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Destination for result records
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn publish(&self, record: &ResultRecord) -> Result<(), ResultChannelError>;
}

/// Appends records as JSON lines
pub struct JsonLinesResultSink {
    path: Option<PathBuf>,
    lock: Mutex<()>,
}

impl JsonLinesResultSink {
    /// Append to a file, creating it if needed
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            lock: Mutex::new(()),
        }
    }

    pub fn to_stdout() -> Self {
        Self {
            path: None,
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl ResultSink for JsonLinesResultSink {
    async fn publish(&self, record: &ResultRecord) -> Result<(), ResultChannelError> {
        let line = record.to_json()?;
        let path = self.path.clone();
        let _guard = self.lock.lock().await;

        tokio::task::spawn_blocking(move || append_line(path.as_deref(), &line))
            .await
            .map_err(|e| ResultChannelError::Delivery(e.to_string()))?
            .map_err(|e| ResultChannelError::Delivery(e.to_string()))
    }
}

fn append_line(path: Option<&Path>, line: &str) -> io::Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            writeln!(file, "{}", line)
        }
        None => writeln!(io::stdout(), "{}", line),
    }
}

/// Posts records to an HTTP endpoint
pub struct WebhookResultSink {
    client: Client,
    endpoint: Url,
}

impl WebhookResultSink {
    pub fn new(endpoint: Url, timeout_secs: u64) -> Result<Self, ResultChannelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ResultChannelError::Delivery(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ResultSink for WebhookResultSink {
    async fn publish(&self, record: &ResultRecord) -> Result<(), ResultChannelError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(record)
            .send()
            .await
            .map_err(|e| ResultChannelError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ResultChannelError::Rejected {
                status_code: status.as_u16(),
                message,
            });
        }

        debug!("Result {} delivered to {}", record.message_id, self.endpoint);
        Ok(())
    }
}
