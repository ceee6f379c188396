use super::*;

#[test]
fn test_tool_result_success() {
    let result = ToolResult::success("Memory created successfully!");
    assert!(result.success);
    assert_eq!(result.content, "Memory created successfully!");
    assert!(result.error.is_none());
    assert!(result.structured_output.is_none());
}

#[test]
fn test_tool_result_success_json() {
    let output = serde_json::json!({"status": "Success"});
    let result = ToolResult::success_json("ok", output);
    assert!(result.success);
    assert_eq!(result.structured_output.as_ref().unwrap()["status"], "Success");
}

#[test]
fn test_tool_result_error() {
    let result = ToolResult::error("Error listing memories: timeout");
    assert!(!result.success);
    assert!(result.content.is_empty());
    assert_eq!(result.error.as_deref(), Some("Error listing memories: timeout"));
}

#[test]
fn test_tool_result_text_prefers_error_on_failure() {
    let failed = ToolResult::error("boom");
    assert_eq!(failed.text(), "boom");

    let ok = ToolResult::success("fine");
    assert_eq!(ok.text(), "fine");
}

#[test]
fn test_tool_result_with_metadata() {
    let result = ToolResult::success("OK").with_metadata("memory_count", serde_json::json!(3));
    assert_eq!(result.metadata.get("memory_count"), Some(&serde_json::json!(3)));
}

#[test]
fn test_tool_result_serialization_skips_empty_fields() {
    let json = serde_json::to_string(&ToolResult::success("OK")).unwrap();
    assert!(json.contains("\"success\":true"));
    assert!(!json.contains("structured_output"));
    assert!(!json.contains("\"error\""));
}
