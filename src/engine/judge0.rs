//! Judge0 client (RapidAPI-hosted or self-hosted CE)
//!
//! Submission is asynchronous on the Judge0 side:
//! 1. `POST /submissions?wait=false` returns a token
//! 2. `GET /submissions/{token}` is polled until the status leaves
//!    "In Queue" / "Processing"

use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::core::config::Judge0Config;
use crate::core::verdict::RunStatus;
use crate::engine::executer::{ExecutionReport, ExecutorError, RemoteExecutor, Submission};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct CreateSubmission<'a> {
    source_code: Cow<'a, str>,
    language_id: &'a str,
    stdin: Cow<'a, str>,
}

#[derive(Debug, Deserialize)]
struct CreateSubmissionResponse {
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmissionStatus {
    id: u32,
}

#[derive(Debug, Deserialize)]
struct SubmissionResponse {
    stdout: Option<String>,
    stderr: Option<String>,
    compile_output: Option<String>,
    message: Option<String>,
    status: Option<SubmissionStatus>,
    /// Seconds, sent as a decimal string
    time: Option<String>,
    memory: Option<u64>,
}

impl SubmissionResponse {
    fn status(&self) -> RunStatus {
        // No status object means Judge0 has nothing more to report
        self.status
            .as_ref()
            .map(|s| RunStatus::from_judge0_id(s.id))
            .unwrap_or(RunStatus::Unknown(0))
    }
}

/// HTTP client for the Judge0 submissions API
#[derive(Clone)]
pub struct Judge0Client {
    http: reqwest::Client,
    config: Judge0Config,
}

impl Judge0Client {
    pub fn new(config: Judge0Config) -> Result<Self, ExecutorError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http, config })
    }

    fn with_headers(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("X-RapidAPI-Host", &self.config.api_host);
        match &self.config.api_key {
            Some(key) => request.header("X-RapidAPI-Key", key),
            None => request,
        }
    }

    fn encode<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.config.base64_encoded {
            Cow::Owned(general_purpose::STANDARD.encode(text))
        } else {
            Cow::Borrowed(text)
        }
    }

    fn decode(
        &self,
        field: &'static str,
        value: Option<String>,
    ) -> Result<Option<String>, ExecutorError> {
        match value {
            Some(encoded) if self.config.base64_encoded => {
                // Judge0 wraps base64 output at 60 columns
                let compact: String = encoded.split_whitespace().collect();
                let bytes = general_purpose::STANDARD
                    .decode(compact)
                    .map_err(|source| ExecutorError::Decode { field, source })?;
                Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
            }
            other => Ok(other),
        }
    }

    /// Create a submission and return its token
    pub async fn submit(&self, submission: &Submission) -> Result<String, ExecutorError> {
        let url = format!(
            "{}/submissions?base64_encoded={}&wait=false",
            self.config.base_url, self.config.base64_encoded
        );
        let body = CreateSubmission {
            source_code: self.encode(&submission.source_code),
            language_id: &submission.language_id,
            stdin: self.encode(&submission.stdin),
        };

        let response = self.with_headers(self.http.post(&url)).json(&body).send().await?;
        let response = ensure_success(response).await?;
        let created: CreateSubmissionResponse = response.json().await?;

        created
            .token
            .filter(|token| !token.is_empty())
            .ok_or(ExecutorError::MissingToken)
    }

    async fn fetch(&self, token: &str) -> Result<SubmissionResponse, ExecutorError> {
        let url = format!(
            "{}/submissions/{}?base64_encoded={}",
            self.config.base_url, token, self.config.base64_encoded
        );
        let response = self.with_headers(self.http.get(&url)).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    /// Poll a submission until it leaves the pending states
    pub async fn wait_for(&self, token: &str) -> Result<ExecutionReport, ExecutorError> {
        for poll in 1..=self.config.max_polls {
            let result = self.fetch(token).await?;
            let status = result.status();

            if status.is_pending() {
                debug!("token={} poll={} status={}", token, poll, status);
                sleep(self.config.poll_interval).await;
                continue;
            }

            return Ok(ExecutionReport {
                token: token.to_string(),
                status,
                stdout: self.decode("stdout", result.stdout)?,
                stderr: self.decode("stderr", result.stderr)?,
                compile_output: self.decode("compile_output", result.compile_output)?,
                message: self.decode("message", result.message)?,
                time_secs: result.time.and_then(|t| t.trim().parse().ok()),
                memory_kb: result.memory,
            });
        }

        warn!(
            "Giving up on token={} after {} polls",
            token, self.config.max_polls
        );
        Err(ExecutorError::PollTimeout {
            token: token.to_string(),
            polls: self.config.max_polls,
        })
    }
}

#[async_trait]
impl RemoteExecutor for Judge0Client {
    async fn execute(&self, submission: &Submission) -> Result<ExecutionReport, ExecutorError> {
        let token = self.submit(submission).await?;
        info!(
            "Submitted to Judge0: language_id={}, token={}",
            submission.language_id, token
        );

        let report = self.wait_for(&token).await?;
        info!("Judge0 finished: token={}, status={}", token, report.status);
        Ok(report)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ExecutorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ExecutorError::Status {
        status: status.as_u16(),
        body,
    })
}
