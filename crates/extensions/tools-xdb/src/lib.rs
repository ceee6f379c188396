//! # XDB Tools Extension
//!
//! Exposes the XDB memory API to agents as `list_memories`,
//! `create_memory`, `create_reminder`, `process_transcript` and
//! `health_check`. Client failures come back as error text in the
//! [`ToolResult`](xdb_protocols::ToolResult), never as a `ToolError`.

pub mod extension;
pub mod presenter;
pub mod tools;

pub use extension::XdbToolsExtension;
pub use presenter::describe_error;
pub use tools::{
    CreateMemoryTool, CreateReminderTool, HealthCheckTool, ListMemoriesTool,
    ProcessTranscriptTool,
};
