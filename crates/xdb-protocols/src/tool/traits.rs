//! Tool trait definition.

use async_trait::async_trait;

use super::{ToolContext, ToolDefinition, ToolResult};
use crate::error::ToolError;
use crate::types::RiskLevel;

/// Core trait for tools.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool definition.
    fn definition(&self) -> &ToolDefinition;

    /// Execute the tool with the given parameters.
    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError>;

    /// Validate the parameters before execution.
    ///
    /// Only the top-level shape is checked here; field-level decoding happens
    /// inside `execute`.
    fn validate(&self, params: &serde_json::Value) -> Result<(), ToolError> {
        let schema = match &self.definition().parameters_schema {
            Some(schema) => schema,
            None => return Ok(()),
        };
        if schema.get("type") == Some(&serde_json::json!("object")) && !params.is_object() {
            return Err(ToolError::ValidationFailed(
                "Parameters must be an object".to_string(),
            ));
        }
        if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
            for field in required.iter().filter_map(|f| f.as_str()) {
                if params.get(field).is_none() {
                    return Err(ToolError::ValidationFailed(format!(
                        "Missing required parameter: {}",
                        field
                    )));
                }
            }
        }
        Ok(())
    }

    /// Returns the risk level of this tool.
    fn risk_level(&self) -> RiskLevel {
        self.definition().risk_level
    }
}
