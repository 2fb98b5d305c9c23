//! Summary service clients.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use jcr_types::ChangeKind;

use crate::error::{AiError, AiResult};
use crate::output::AiOutput;
use crate::request::{AiPayload, AiRequest, OutputMode};
use crate::tables::deterministic_output;

/// Where and how to reach the summary service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://127.0.0.1:8000/generate".into(),
            timeout_secs: 60,
        }
    }
}

/// Produces narrative or tabular output for a request.
#[async_trait]
pub trait SummaryService: Send + Sync {
    async fn generate(&self, request: &AiRequest) -> AiResult<AiOutput>;
}

/// Calls the summary service over HTTP.
pub struct HttpSummaryService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSummaryService {
    pub fn new(config: &AiConfig) -> AiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl SummaryService for HttpSummaryService {
    async fn generate(&self, request: &AiRequest) -> AiResult<AiOutput> {
        debug!(endpoint = %self.endpoint, output = %request.output, "calling summary service");
        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            warn!(status = status.as_u16(), %message, "summary service failed");
            return Err(AiError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;
        Ok(AiOutput::from_envelope(body))
    }
}

/// Offline service: deterministic tables and a counting summary, no model.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalSummaryService;

#[async_trait]
impl SummaryService for LocalSummaryService {
    async fn generate(&self, request: &AiRequest) -> AiResult<AiOutput> {
        if let Some(output) = deterministic_output(request) {
            return Ok(output);
        }
        match (&request.payload, request.output) {
            (AiPayload::Changes { changes, title, .. }, OutputMode::Summary) => {
                let count = |kind: ChangeKind| {
                    changes
                        .iter()
                        .filter(|c| c.kind() == kind)
                        .count()
                };
                let mut files: Vec<&str> = changes.iter().map(|c| c.file.as_str()).collect();
                files.sort_unstable();
                files.dedup();
                let mut output = AiOutput::summary(format!(
                    "{} changes across {} files: {} added, {} modified, {} removed.",
                    changes.len(),
                    files.len(),
                    count(ChangeKind::Added),
                    count(ChangeKind::Modified),
                    count(ChangeKind::Removed),
                ));
                output.title = title.clone();
                Ok(output)
            }
            (_, mode) => Err(AiError::Unsupported(mode.to_string())),
        }
    }
}
