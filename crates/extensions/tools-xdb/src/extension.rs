//! XDB tools extension definition.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use xdb_client::{RsaDecryptor, XdbApi};
use xdb_protocols::error::ExtensionError;
use xdb_protocols::extension::{Extension, ExtensionContext, ExtensionManifest, Provides};
use xdb_protocols::tool::Tool;
use xdb_protocols::types::Version;

use crate::tools::{
    CreateMemoryTool, CreateReminderTool, EXTENSION_ID, HealthCheckTool, ListMemoriesTool,
    ProcessTranscriptTool,
};

/// Registers one tool per XDB client operation.
pub struct XdbToolsExtension {
    manifest: ExtensionManifest,
    api: Arc<dyn XdbApi>,
    decryptor: Option<Arc<RsaDecryptor>>,
}

impl XdbToolsExtension {
    pub fn new(api: Arc<dyn XdbApi>, decryptor: Option<Arc<RsaDecryptor>>) -> Self {
        let mut manifest = ExtensionManifest::new(EXTENSION_ID, "XDB Tools", Version::new(0, 1, 0))
            .with_description("Memory, reminder and transcript tools backed by the XDB API");
        manifest.provides = Provides {
            tools: vec![
                "list_memories".to_string(),
                "create_memory".to_string(),
                "create_reminder".to_string(),
                "process_transcript".to_string(),
                "health_check".to_string(),
            ],
        };

        Self {
            manifest,
            api,
            decryptor,
        }
    }

    /// The tools this extension registers, in manifest order.
    pub fn tools(&self) -> Vec<Arc<dyn Tool>> {
        vec![
            Arc::new(ListMemoriesTool::new(
                self.api.clone(),
                self.decryptor.clone(),
            )),
            Arc::new(CreateMemoryTool::new(self.api.clone())),
            Arc::new(CreateReminderTool::new(self.api.clone())),
            Arc::new(ProcessTranscriptTool::new(self.api.clone())),
            Arc::new(HealthCheckTool::new(self.api.clone())),
        ]
    }
}

#[async_trait]
impl Extension for XdbToolsExtension {
    fn manifest(&self) -> &ExtensionManifest {
        &self.manifest
    }

    async fn initialize(&mut self, ctx: ExtensionContext) -> Result<(), ExtensionError> {
        for tool in self.tools() {
            ctx.tool_registry.register_tool(tool)?;
        }
        info!(
            extension = %self.manifest.id,
            tools = self.manifest.provides.tools.len(),
            decryption = self.decryptor.is_some(),
            "Extension initialized"
        );
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
