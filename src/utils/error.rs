//! Error types for the batch compression orchestrator.
//!
//! Provides a single application error enum using `thiserror`. Failures are
//! terminal at the orchestrator boundary: callers turn them into a user
//! notice or a results entry, they are never propagated further up.

use std::io;
use thiserror::Error;

/// Main error type for the orchestrator.
#[derive(Error, Debug)]
pub enum CompressorError {
    /// User input failed a precondition (empty file set, missing output
    /// directory, out-of-range options).
    #[error("Validation error: {0}")]
    Validation(String),

    /// An intake sweep or a compression job is already in flight. The
    /// request is dropped, not queued.
    #[error("Busy: {0}")]
    Busy(String),

    /// The external compression engine could not be invoked, or produced
    /// output this layer cannot understand.
    #[error("Engine error: {0}")]
    Engine(String),

    /// File IO error
    #[error("IO error: {0}")]
    IO(String),
}

/// Convenience result type for orchestrator operations.
pub type CompressorResult<T> = Result<T, CompressorError>;

// Helper methods for error creation
impl CompressorError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    pub fn busy<T: Into<String>>(msg: T) -> Self {
        Self::Busy(msg.into())
    }

    pub fn engine<T: Into<String>>(msg: T) -> Self {
        Self::Engine(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        Self::IO(msg.into())
    }

    /// True for the concurrent-request rejection produced by the job slot.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy(_))
    }
}

// Convert std::io::Error to CompressorError
impl From<io::Error> for CompressorError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}
