//! Playground - validate, estimate and run one editor submission

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::{estimate, ComplexityEstimate};
use crate::core::config::AppConfig;
use crate::core::languages::LanguageTable;
use crate::core::verdict::RunStatus;
use crate::engine::{ExecutorError, RemoteExecutor, Submission};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("source code is empty")]
    EmptySource,
    #[error("source code is {size} bytes, limit is {limit}")]
    SourceTooLarge { size: usize, limit: usize },
    #[error("stdin is {size} bytes, limit is {limit}")]
    StdinTooLarge { size: usize, limit: usize },
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

impl RunError {
    /// Rejected before anything was sent to Judge0
    pub fn is_validation(&self) -> bool {
        !matches!(self, RunError::Executor(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    pub code: String,
    /// Judge0 id or alias; the table default when omitted
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stdin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EstimateRequest {
    pub code: String,
}

/// Editor footer numbers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SourceStats {
    pub lines: usize,
    pub characters: usize,
}

impl SourceStats {
    pub fn of(code: &str) -> Self {
        Self {
            lines: code.split('\n').count(),
            characters: code.chars().count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EstimateResult {
    pub complexity: ComplexityEstimate,
    pub stats: SourceStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub language_id: String,
    pub success: bool,
    pub status: RunStatus,
    /// stdout, else stderr, else compiler output, else "No output"
    pub output: String,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
    pub message: Option<String>,
    pub time_secs: Option<f64>,
    pub memory_kb: Option<u64>,
    pub complexity: ComplexityEstimate,
    pub stats: SourceStats,
}

/// Size limits applied to every request
#[derive(Debug, Clone, Copy)]
pub struct InputLimits {
    pub max_source_bytes: usize,
    pub max_stdin_bytes: usize,
}

impl From<&AppConfig> for InputLimits {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_source_bytes: config.max_source_bytes,
            max_stdin_bytes: config.max_stdin_bytes,
        }
    }
}

pub struct Playground {
    languages: Arc<LanguageTable>,
    executor: Arc<dyn RemoteExecutor>,
    limits: InputLimits,
}

impl Playground {
    pub fn new(
        languages: Arc<LanguageTable>,
        executor: Arc<dyn RemoteExecutor>,
        limits: InputLimits,
    ) -> Self {
        Self {
            languages,
            executor,
            limits,
        }
    }

    pub fn languages(&self) -> &LanguageTable {
        &self.languages
    }

    fn check_source_size(&self, code: &str) -> Result<(), RunError> {
        if code.len() > self.limits.max_source_bytes {
            return Err(RunError::SourceTooLarge {
                size: code.len(),
                limit: self.limits.max_source_bytes,
            });
        }
        Ok(())
    }

    /// Complexity estimate and stats without running anything
    pub fn estimate_request(&self, request: &EstimateRequest) -> Result<EstimateResult, RunError> {
        self.check_source_size(&request.code)?;
        Ok(EstimateResult {
            complexity: estimate(&request.code),
            stats: SourceStats::of(&request.code),
        })
    }

    /// Validate a run request and resolve its Judge0 language id
    pub fn validate(&self, request: &RunRequest) -> Result<String, RunError> {
        if request.code.trim().is_empty() {
            return Err(RunError::EmptySource);
        }
        self.check_source_size(&request.code)?;
        if request.stdin.len() > self.limits.max_stdin_bytes {
            return Err(RunError::StdinTooLarge {
                size: request.stdin.len(),
                limit: self.limits.max_stdin_bytes,
            });
        }

        let language = match request.language.as_deref() {
            Some(key) => self
                .languages
                .get(key)
                .ok_or_else(|| RunError::UnsupportedLanguage(key.to_string()))?,
            None => self.languages.default_language(),
        };
        Ok(language.id.clone())
    }

    pub async fn process_run_request(&self, request: &RunRequest) -> Result<RunResult, RunError> {
        let language_id = self.validate(request)?;
        let complexity = estimate(&request.code);
        let stats = SourceStats::of(&request.code);

        info!(
            "Run request: language_id={}, lines={}, time={}, space={}",
            language_id, stats.lines, complexity.time, complexity.space
        );

        let submission = Submission::new(request.code.as_str(), language_id.as_str())
            .with_stdin(request.stdin.as_str());
        let report = match self.executor.execute(&submission).await {
            Ok(report) => report,
            Err(e) => {
                warn!("Execution failed: language_id={}, error={}", language_id, e);
                return Err(e.into());
            }
        };

        Ok(RunResult {
            language_id,
            success: report.status.is_success(),
            status: report.status,
            output: report.display_output().to_string(),
            stdout: report.stdout,
            stderr: report.stderr,
            compile_output: report.compile_output,
            message: report.message,
            time_secs: report.time_secs,
            memory_kb: report.memory_kb,
            complexity,
            stats,
        })
    }
}
