//! Error types for the auto-profiler component

use thiserror::Error;

/// Errors that can occur in auto-profiler operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutoProfilerError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Profiler has not been started
    #[error("Profiler has not been started")]
    NotStarted,

    /// Profiler was destroyed and cannot be used again
    #[error("Profiler has been destroyed")]
    ProfilerDestroyed,
}

/// Result type for auto-profiler operations
pub type Result<T> = std::result::Result<T, AutoProfilerError>;
