//! Tool execution context.

use std::path::{Path, PathBuf};

/// Context for a single tool invocation.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Conversation or CLI session issuing the call.
    pub session_id: String,

    /// Correlation ID for tracing.
    pub correlation_id: String,

    /// Base directory for relative file paths (transcripts).
    pub work_dir: PathBuf,
}

impl ToolContext {
    pub fn new(session_id: impl Into<String>, work_dir: PathBuf) -> Self {
        Self {
            session_id: session_id.into(),
            correlation_id: uuid::Uuid::new_v4().to_string(),
            work_dir,
        }
    }

    /// Resolve a caller-supplied path against the working directory.
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.work_dir.join(path)
        }
    }
}
