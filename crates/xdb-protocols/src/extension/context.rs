//! Extension context for initialization.

use std::path::PathBuf;
use std::sync::Arc;

use super::ToolRegistryAccess;

/// Context passed to extensions during initialization.
#[derive(Clone)]
pub struct ExtensionContext {
    /// Registry for registering tools.
    pub tool_registry: Arc<dyn ToolRegistryAccess>,

    pub work_dir: PathBuf,
}

impl ExtensionContext {
    pub fn new(tool_registry: Arc<dyn ToolRegistryAccess>, work_dir: PathBuf) -> Self {
        Self {
            tool_registry,
            work_dir,
        }
    }
}
