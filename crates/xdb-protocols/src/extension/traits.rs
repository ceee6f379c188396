//! Extension trait definition.

use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

use super::{ExtensionContext, ExtensionManifest};
use crate::error::ExtensionError;
use crate::tool::Tool;

/// Core trait for all extensions.
#[async_trait]
pub trait Extension: Send + Sync + 'static {
    /// Returns the extension manifest.
    fn manifest(&self) -> &ExtensionManifest;

    /// Register tools and acquire resources.
    async fn initialize(&mut self, ctx: ExtensionContext) -> Result<(), ExtensionError>;

    /// Returns a reference to the extension as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Registration surface handed to extensions during initialization.
pub trait ToolRegistryAccess: Send + Sync {
    fn register_tool(&self, tool: Arc<dyn Tool>) -> Result<(), ExtensionError>;

    fn unregister_tool(&self, tool_id: &str) -> Result<(), ExtensionError>;
}
