//! Tool invocation errors.
//!
//! These describe failures of the invocation itself (unknown tool, bad
//! arguments). Failures of the XDB API behind a tool are rendered into the
//! tool's result text instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Parameter validation failed: {0}")]
    ValidationFailed(String),

    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),
}
