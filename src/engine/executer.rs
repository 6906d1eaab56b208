use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::verdict::RunStatus;

/// Shown when a finished run produced no stdout, stderr or compiler output
pub const NO_OUTPUT: &str = "No output";

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("request to execution service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("execution service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("execution service did not return a submission token")]
    MissingToken,
    #[error("submission {token} still pending after {polls} polls")]
    PollTimeout { token: String, polls: u32 },
    #[error("invalid base64 in field {field}: {source}")]
    Decode {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },
}

/// What to run remotely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub source_code: String,
    /// Judge0 language id
    pub language_id: String,
    pub stdin: String,
}

impl Submission {
    pub fn new(source_code: impl Into<String>, language_id: impl Into<String>) -> Self {
        Self {
            source_code: source_code.into(),
            language_id: language_id.into(),
            stdin: String::new(),
        }
    }

    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = stdin.into();
        self
    }
}

/// Finished remote execution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionReport {
    pub token: String,
    pub status: RunStatus,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
    /// Judge0 status message (e.g., the signal description)
    pub message: Option<String>,
    /// Wall time reported by Judge0 in seconds
    pub time_secs: Option<f64>,
    /// Peak memory in KB
    pub memory_kb: Option<u64>,
}

impl ExecutionReport {
    /// First non-empty of stdout, stderr and compiler output
    pub fn display_output(&self) -> &str {
        [&self.stdout, &self.stderr, &self.compile_output]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|text| !text.is_empty())
            .unwrap_or(NO_OUTPUT)
    }
}

/// Remote compile-and-run service
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Submit, wait for completion, and return the finished report
    async fn execute(&self, submission: &Submission) -> Result<ExecutionReport, ExecutorError>;
}
