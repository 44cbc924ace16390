//! The error taxonomy every fallible ByteLog operation funnels through.

use thiserror::Error;

/// Errors that can arise while loading or running a ByteLog program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ByteLogError {
    /// A lexical or grammatical error while reading source text.
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// A rule was rejected at registration time: an unbound register, an
    /// empty body, or a malformed first operation.
    #[error("rule compile error at line {line}, column {column}: {message}")]
    RuleCompile {
        line: usize,
        column: usize,
        message: String,
    },

    /// SOLVE did not reach a fixpoint within the configured round budget.
    /// The fact store may be left in a partially-derived state; callers
    /// should treat it as invalid.
    #[error("fixpoint did not stabilize after {rounds} rounds")]
    FixpointIterationCapExceeded { rounds: u64 },

    /// Reading the source file failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ByteLogError {
    fn from(value: std::io::Error) -> Self {
        ByteLogError::Io(value.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type ByteLogResult<T> = Result<T, ByteLogError>;
