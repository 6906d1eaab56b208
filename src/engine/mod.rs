//! Engine module - remote execution
//!
//! Programs are never run locally; they are handed to a Judge0 instance.
//!
//! The engine module does NOT:
//! - Estimate complexity
//! - Validate requests against the language table
//! - Format output for the editor

pub mod executer;
pub mod judge0;

pub use executer::{ExecutorError, RemoteExecutor, Submission};
pub use judge0::Judge0Client;
