//! Tool registry and call dispatch.

use std::sync::Arc;

use tracing::{debug, warn};
use xdb_protocols::error::{ExtensionError, ToolError};
use xdb_protocols::extension::ToolRegistryAccess;
use xdb_protocols::tool::{Tool, ToolContext, ToolDefinition, ToolResult};

use super::base::{BaseRegistry, Registerable};

impl Registerable for dyn Tool {
    fn registry_id(&self) -> &str {
        &self.definition().id
    }
}

/// Registry of the tools an agent may call.
pub struct ToolRegistry {
    inner: BaseRegistry<dyn Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            inner: BaseRegistry::new(),
        }
    }

    pub fn register(&self, tool: Arc<dyn Tool>) -> Result<(), ExtensionError> {
        debug!(tool = %tool.definition().id, "Registering tool");
        self.inner.register(tool)
    }

    pub fn unregister(&self, id: &str) -> Result<(), ExtensionError> {
        self.inner.unregister(id).map(|_| ())
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Tool>> {
        self.inner.get(id)
    }

    /// Tool definitions ordered by id, so advertised tool lists are stable.
    pub fn list(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> =
            self.inner.iter().map(|t| t.definition().clone()).collect();
        defs.sort_by(|a, b| a.id.cmp(&b.id));
        defs
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Look up, validate and run one tool call.
    pub async fn call(
        &self,
        id: &str,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let tool = self
            .get(id)
            .ok_or_else(|| ToolError::NotFound(id.to_string()))?;

        tool.validate(&params)?;

        debug!(
            tool = %id,
            session_id = %ctx.session_id,
            correlation_id = %ctx.correlation_id,
            risk = ?tool.risk_level(),
            "Executing tool"
        );
        let result = tool.execute(params, ctx).await;
        if let Err(ref e) = result {
            warn!(tool = %id, error = %e, "Tool call failed");
        }
        result
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistryAccess for ToolRegistry {
    fn register_tool(&self, tool: Arc<dyn Tool>) -> Result<(), ExtensionError> {
        self.register(tool)
    }

    fn unregister_tool(&self, tool_id: &str) -> Result<(), ExtensionError> {
        self.unregister(tool_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::PathBuf;

    struct UpperTool {
        definition: ToolDefinition,
    }

    impl UpperTool {
        fn new(id: &str) -> Self {
            Self {
                definition: ToolDefinition::new(id, "Upper", "Uppercase the text parameter")
                    .with_parameters_schema(serde_json::json!({
                        "type": "object",
                        "properties": {"text": {"type": "string"}},
                        "required": ["text"]
                    })),
            }
        }
    }

    #[async_trait]
    impl Tool for UpperTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(
            &self,
            params: serde_json::Value,
            _ctx: ToolContext,
        ) -> Result<ToolResult, ToolError> {
            let text = params["text"]
                .as_str()
                .ok_or_else(|| ToolError::InvalidParameters("text must be a string".into()))?;
            Ok(ToolResult::success(text.to_uppercase()))
        }
    }

    struct SessionTool {
        definition: ToolDefinition,
    }

    #[async_trait]
    impl Tool for SessionTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(
            &self,
            _params: serde_json::Value,
            ctx: ToolContext,
        ) -> Result<ToolResult, ToolError> {
            Ok(ToolResult::success(ctx.session_id))
        }
    }

    fn ctx() -> ToolContext {
        ToolContext::new("test", PathBuf::from("/tmp"))
    }

    #[test]
    fn test_register_and_list_sorted() {
        let registry = ToolRegistry::default();
        registry.register(Arc::new(UpperTool::new("zeta"))).unwrap();
        registry.register(Arc::new(UpperTool::new("alpha"))).unwrap();

        let ids: Vec<String> = registry.list().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_duplicate() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(UpperTool::new("upper"))).unwrap();
        assert!(registry.register(Arc::new(UpperTool::new("upper"))).is_err());
    }

    #[test]
    fn test_registry_access_trait() {
        let registry = ToolRegistry::new();
        registry.register_tool(Arc::new(UpperTool::new("upper"))).unwrap();
        assert!(registry.get("upper").is_some());
        registry.unregister_tool("upper").unwrap();
        assert!(registry.is_empty());
        assert!(registry.unregister_tool("upper").is_err());
    }

    #[tokio::test]
    async fn test_call_runs_tool() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(UpperTool::new("upper"))).unwrap();

        let result = registry
            .call("upper", serde_json::json!({"text": "hi"}), ctx())
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.content, "HI");
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry
            .call("missing", serde_json::json!({}), ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_call_validates_before_execute() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(UpperTool::new("upper"))).unwrap();

        let err = registry
            .call("upper", serde_json::json!({}), ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn test_call_passes_session_to_tool() {
        let registry = ToolRegistry::new();
        registry
            .register(Arc::new(SessionTool {
                definition: ToolDefinition::new("whoami", "Who Am I", "Echo the session id")
                    .with_risk_level(xdb_protocols::types::RiskLevel::Medium),
            }))
            .unwrap();

        let ctx = ToolContext::new("agent-7", PathBuf::from("/tmp"));
        let result = registry
            .call("whoami", serde_json::json!({}), ctx)
            .await
            .unwrap();
        assert_eq!(result.content, "agent-7");
        assert_eq!(
            registry.get("whoami").unwrap().risk_level(),
            xdb_protocols::types::RiskLevel::Medium
        );
    }
}
