//! XDB tool implementations.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use xdb_client::{MemoryRecord, RsaDecryptor, XdbApi, XdbResponse};
use xdb_protocols::error::ToolError;
use xdb_protocols::tool::{Tool, ToolContext, ToolDefinition, ToolResult};
use xdb_protocols::types::RiskLevel;

use crate::presenter::{describe_error, format_accepted, format_memories};

pub const EXTENSION_ID: &str = "tools-xdb";

/// Decode tool arguments. Field names accept both snake_case and the
/// camelCase used on the wire.
fn decode<P: DeserializeOwned>(params: &serde_json::Value) -> Result<P, serde_json::Error> {
    P::deserialize(params)
}

fn require_user_key(user_key: &str) -> Result<(), ToolError> {
    if user_key.trim().is_empty() {
        return Err(ToolError::InvalidParameters(
            "user_key must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn structured(response: &XdbResponse) -> serde_json::Value {
    serde_json::to_value(response).unwrap_or(serde_json::Value::Null)
}

fn user_key_property() -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": "The user key whose memories are addressed"
    })
}

// ---------------------------------------------------------------------------
// list_memories
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ListMemoriesParams {
    #[serde(alias = "userKey")]
    user_key: String,
    #[serde(default)]
    tokens: Option<Vec<String>>,
    #[serde(default)]
    query: Option<String>,
}

/// Lists a user's memories, decrypting encrypted records when a decryption
/// key is available.
pub struct ListMemoriesTool {
    definition: ToolDefinition,
    api: Arc<dyn XdbApi>,
    decryptor: Option<Arc<RsaDecryptor>>,
}

impl ListMemoriesTool {
    pub fn new(api: Arc<dyn XdbApi>, decryptor: Option<Arc<RsaDecryptor>>) -> Self {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {
                "user_key": user_key_property(),
                "tokens": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Optional list of tokens to filter memories"
                },
                "query": {
                    "type": "string",
                    "description": "Optional query string to search memories"
                }
            },
            "required": ["user_key"]
        });

        Self {
            definition: ToolDefinition::new(
                "list_memories",
                "List Memories",
                "List all memories for a user. You can optionally filter by tokens or search with a query string.",
            )
            .with_parameters_schema(schema)
            .with_risk_level(RiskLevel::Low)
            .with_extension(EXTENSION_ID),
            api,
            decryptor,
        }
    }

    fn open_records(&self, records: Vec<MemoryRecord>) -> Result<Vec<MemoryRecord>, String> {
        let Some(decryptor) = &self.decryptor else {
            if records.iter().any(|r| r.is_encrypted) {
                warn!("Encrypted memories listed but no decryption key is configured");
            }
            return Ok(records);
        };
        records
            .into_iter()
            .map(|r| decryptor.decrypt_record(r))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| describe_error("listing memories", &e))
    }
}

#[async_trait]
impl Tool for ListMemoriesTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    fn validate(&self, params: &serde_json::Value) -> Result<(), ToolError> {
        decode::<ListMemoriesParams>(params)
            .map(|_| ())
            .map_err(|e| ToolError::ValidationFailed(e.to_string()))
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: ListMemoriesParams =
            decode(&params).map_err(|e| ToolError::InvalidParameters(e.to_string()))?;
        require_user_key(&params.user_key)?;

        let tokens = params.tokens.unwrap_or_default();
        let query = params.query.unwrap_or_default();
        debug!(user_key = %params.user_key, tokens = tokens.len(), "list_memories");

        let mut response = match self
            .api
            .list_memories(&params.user_key, &tokens, &query)
            .await
        {
            Ok(response) => response,
            Err(e) => return Ok(ToolResult::error(describe_error("listing memories", &e))),
        };

        if !response.is_success() {
            return Ok(ToolResult::error(format!("Error: {}", response.message)));
        }

        if let Some(data) = response.data.as_mut() {
            let records = std::mem::take(&mut data.memories);
            match self.open_records(records) {
                Ok(opened) => data.memories = opened,
                Err(text) => return Ok(ToolResult::error(text)),
            }
        }

        let text = format_memories(response.memories());
        Ok(ToolResult::success_json(text, structured(&response))
            .with_metadata("count", serde_json::json!(response.memories().len())))
    }
}

// ---------------------------------------------------------------------------
// create_memory / create_reminder
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CreateEntryParams {
    #[serde(alias = "userKey")]
    user_key: String,
    content: String,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default, alias = "sessionId")]
    session_id: Option<String>,
}

fn create_entry_schema(content_description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "user_key": user_key_property(),
            "content": {
                "type": "string",
                "description": content_description
            },
            "tag": {
                "type": "string",
                "description": "Optional tag for categorizing the entry"
            },
            "session_id": {
                "type": "string",
                "description": "Optional session ID for grouping entries; defaults to the current hour"
            }
        },
        "required": ["user_key", "content"]
    })
}

#[derive(Clone, Copy)]
enum EntryKind {
    Memory,
    Reminder,
}

impl EntryKind {
    fn action(self) -> &'static str {
        match self {
            Self::Memory => "creating memory",
            Self::Reminder => "creating reminder",
        }
    }

    fn accepted(self) -> &'static str {
        match self {
            Self::Memory => "Memory created",
            Self::Reminder => "Reminder created",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Reminder => "reminder",
        }
    }
}

async fn run_create_entry(
    api: &dyn XdbApi,
    kind: EntryKind,
    params: serde_json::Value,
) -> Result<ToolResult, ToolError> {
    let params: CreateEntryParams =
        decode(&params).map_err(|e| ToolError::InvalidParameters(e.to_string()))?;
    require_user_key(&params.user_key)?;

    let tag = params.tag.unwrap_or_default();
    let session_id = params.session_id.as_deref();
    debug!(user_key = %params.user_key, kind = kind.noun(), "create entry");

    let result = match kind {
        EntryKind::Memory => {
            api.create_memory(&params.user_key, &params.content, &tag, session_id)
                .await
        }
        EntryKind::Reminder => {
            api.create_reminder(&params.user_key, &params.content, &tag, session_id)
                .await
        }
    };

    Ok(match result {
        Ok(response) if response.is_success() => ToolResult::success_json(
            format_accepted(kind.accepted(), &response),
            structured(&response),
        ),
        Ok(response) => ToolResult::error(format!(
            "Failed to create {}: {}",
            kind.noun(),
            response.message
        )),
        Err(e) => ToolResult::error(describe_error(kind.action(), &e)),
    })
}

/// Stores a new memory for a user.
pub struct CreateMemoryTool {
    definition: ToolDefinition,
    api: Arc<dyn XdbApi>,
}

impl CreateMemoryTool {
    pub fn new(api: Arc<dyn XdbApi>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "create_memory",
                "Create Memory",
                "Create a new memory for a user. Requires user key and content. Optional tag and session ID can be provided.",
            )
            .with_parameters_schema(create_entry_schema("The content/text of the memory to store"))
            .with_risk_level(RiskLevel::Medium)
            .with_extension(EXTENSION_ID),
            api,
        }
    }
}

#[async_trait]
impl Tool for CreateMemoryTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    fn validate(&self, params: &serde_json::Value) -> Result<(), ToolError> {
        decode::<CreateEntryParams>(params)
            .map(|_| ())
            .map_err(|e| ToolError::ValidationFailed(e.to_string()))
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        run_create_entry(self.api.as_ref(), EntryKind::Memory, params).await
    }
}

/// Stores a reminder for a user.
pub struct CreateReminderTool {
    definition: ToolDefinition,
    api: Arc<dyn XdbApi>,
}

impl CreateReminderTool {
    pub fn new(api: Arc<dyn XdbApi>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "create_reminder",
                "Create Reminder",
                "Create a reminder for a user. Requires user key and content. Optional tag and session ID can be provided.",
            )
            .with_parameters_schema(create_entry_schema("What the user should be reminded of"))
            .with_risk_level(RiskLevel::Medium)
            .with_extension(EXTENSION_ID),
            api,
        }
    }
}

#[async_trait]
impl Tool for CreateReminderTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    fn validate(&self, params: &serde_json::Value) -> Result<(), ToolError> {
        decode::<CreateEntryParams>(params)
            .map(|_| ())
            .map_err(|e| ToolError::ValidationFailed(e.to_string()))
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        run_create_entry(self.api.as_ref(), EntryKind::Reminder, params).await
    }
}

// ---------------------------------------------------------------------------
// process_transcript
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ProcessTranscriptParams {
    #[serde(alias = "userKey")]
    user_key: String,
    path: String,
    tag: String,
}

/// Reads a transcript file and submits its text for summary extraction.
pub struct ProcessTranscriptTool {
    definition: ToolDefinition,
    api: Arc<dyn XdbApi>,
}

impl ProcessTranscriptTool {
    pub fn new(api: Arc<dyn XdbApi>) -> Self {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {
                "user_key": user_key_property(),
                "path": {
                    "type": "string",
                    "description": "Path of the transcript file (.json, .vtt, .txt); relative paths resolve against the working directory"
                },
                "tag": {
                    "type": "string",
                    "description": "Tag for the extracted memories"
                }
            },
            "required": ["user_key", "path", "tag"]
        });

        Self {
            definition: ToolDefinition::new(
                "process_transcript",
                "Process Transcript",
                "Read a meeting transcript file and submit its text to XDB for memory extraction.",
            )
            .with_parameters_schema(schema)
            .with_risk_level(RiskLevel::Medium)
            .with_extension(EXTENSION_ID),
            api,
        }
    }
}

#[async_trait]
impl Tool for ProcessTranscriptTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    fn validate(&self, params: &serde_json::Value) -> Result<(), ToolError> {
        decode::<ProcessTranscriptParams>(params)
            .map(|_| ())
            .map_err(|e| ToolError::ValidationFailed(e.to_string()))
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: ProcessTranscriptParams =
            decode(&params).map_err(|e| ToolError::InvalidParameters(e.to_string()))?;
        require_user_key(&params.user_key)?;

        let path = ctx.resolve_path(&params.path);
        debug!(path = %path.display(), "process_transcript");

        Ok(
            match self
                .api
                .process_transcript(&params.user_key, &path, &params.tag)
                .await
            {
                Ok(response) if response.is_success() => ToolResult::success_json(
                    format_accepted("Transcript processed", &response),
                    structured(&response),
                )
                .with_metadata("path", serde_json::json!(path.display().to_string())),
                Ok(response) => ToolResult::error(format!(
                    "Failed to process transcript: {}",
                    response.message
                )),
                Err(e) => ToolResult::error(describe_error("processing transcript", &e)),
            },
        )
    }
}

// ---------------------------------------------------------------------------
// health_check
// ---------------------------------------------------------------------------

/// Pings the XDB API.
pub struct HealthCheckTool {
    definition: ToolDefinition,
    api: Arc<dyn XdbApi>,
}

impl HealthCheckTool {
    pub fn new(api: Arc<dyn XdbApi>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "health_check",
                "Health Check",
                "Check whether the XDB memory API is reachable and healthy.",
            )
            .with_risk_level(RiskLevel::Low)
            .with_extension(EXTENSION_ID),
            api,
        }
    }
}

#[async_trait]
impl Tool for HealthCheckTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        _params: serde_json::Value,
        _ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        Ok(match self.api.health_check().await {
            Ok(response) if response.is_success() => ToolResult::success_json(
                format!("XDB API is healthy: {}", response.message),
                structured(&response),
            ),
            Ok(response) => ToolResult::error(format!(
                "XDB API reported status {}: {}",
                response.status, response.message
            )),
            Err(e) => ToolResult::error(describe_error("checking health", &e)),
        })
    }
}

#[cfg(test)]
#[path = "tools_tests.rs"]
mod tests;
