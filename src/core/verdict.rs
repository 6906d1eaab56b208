use serde::{Deserialize, Serialize};
use std::fmt;

/// Submission status reported by Judge0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    InQueue,
    Processing,
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    CompileError,
    RuntimeError(RuntimeSignal),
    InternalError,
    ExecFormatError,
    Unknown(u32),
}

/// Runtime error flavour (Judge0 status ids 7..=12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeSignal {
    Sigsegv,
    Sigxfsz,
    Sigfpe,
    Sigabrt,
    Nzec,
    Other,
}

impl RunStatus {
    /// Map a Judge0 `status.id`
    pub fn from_judge0_id(id: u32) -> Self {
        match id {
            1 => RunStatus::InQueue,
            2 => RunStatus::Processing,
            3 => RunStatus::Accepted,
            4 => RunStatus::WrongAnswer,
            5 => RunStatus::TimeLimitExceeded,
            6 => RunStatus::CompileError,
            7 => RunStatus::RuntimeError(RuntimeSignal::Sigsegv),
            8 => RunStatus::RuntimeError(RuntimeSignal::Sigxfsz),
            9 => RunStatus::RuntimeError(RuntimeSignal::Sigfpe),
            10 => RunStatus::RuntimeError(RuntimeSignal::Sigabrt),
            11 => RunStatus::RuntimeError(RuntimeSignal::Nzec),
            12 => RunStatus::RuntimeError(RuntimeSignal::Other),
            13 => RunStatus::InternalError,
            14 => RunStatus::ExecFormatError,
            other => RunStatus::Unknown(other),
        }
    }

    /// Still queued or running; keep polling
    pub fn is_pending(&self) -> bool {
        matches!(self, RunStatus::InQueue | RunStatus::Processing)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Accepted)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::InQueue => "in_queue",
            RunStatus::Processing => "processing",
            RunStatus::Accepted => "accepted",
            RunStatus::WrongAnswer => "wrong_answer",
            RunStatus::TimeLimitExceeded => "time_limit_exceeded",
            RunStatus::CompileError => "compile_error",
            RunStatus::RuntimeError(RuntimeSignal::Sigsegv) => "runtime_error_sigsegv",
            RunStatus::RuntimeError(RuntimeSignal::Sigxfsz) => "runtime_error_sigxfsz",
            RunStatus::RuntimeError(RuntimeSignal::Sigfpe) => "runtime_error_sigfpe",
            RunStatus::RuntimeError(RuntimeSignal::Sigabrt) => "runtime_error_sigabrt",
            RunStatus::RuntimeError(RuntimeSignal::Nzec) => "runtime_error_nzec",
            RunStatus::RuntimeError(RuntimeSignal::Other) => "runtime_error",
            RunStatus::InternalError => "internal_error",
            RunStatus::ExecFormatError => "exec_format_error",
            RunStatus::Unknown(_) => "unknown",
        };
        write!(f, "{}", s)
    }
}
