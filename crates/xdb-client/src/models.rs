//! Request and response shapes of the XDB HTTP API.

use serde::{Deserialize, Deserializer, Serialize};

/// Status string the API returns for a successful call.
pub const STATUS_SUCCESS: &str = "Success";

/// Envelope returned by every XDB endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XdbResponse {
    pub status: String,

    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,

    #[serde(default)]
    pub error: bool,

    #[serde(default, alias = "processId", skip_serializing_if = "Option::is_none")]
    pub process_id: Option<String>,
}

impl XdbResponse {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Memories carried in `data`, empty when there is no payload.
    pub fn memories(&self) -> &[MemoryRecord] {
        self.data.as_ref().map(|d| d.memories.as_slice()).unwrap_or(&[])
    }
}

/// The `data` payload. Only `memories` is typed; anything else the server
/// sends is kept verbatim in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub memories: Vec<MemoryRecord>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One stored memory as listed by `/api/memory/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub memory: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,

    #[serde(
        default,
        rename = "transactionNumber",
        alias = "transaction_number",
        deserialize_with = "null_as_default"
    )]
    pub transaction_number: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tokens: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    #[serde(
        default,
        rename = "sessionId",
        alias = "session_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub session_id: Option<String>,

    /// When set, `memory` and every token are hex-encoded RSA ciphertext.
    #[serde(default, rename = "isEncrypted", alias = "is_encrypted")]
    pub is_encrypted: bool,
}

impl MemoryRecord {
    pub fn new(memory: impl Into<String>) -> Self {
        Self {
            memory: memory.into(),
            date: String::new(),
            transaction_number: String::new(),
            tokens: Vec::new(),
            language: None,
            tag: None,
            session_id: None,
            is_encrypted: false,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `/api/memory/list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMemoriesRequest<'a> {
    pub user_key: &'a str,
    pub tokens: &'a [String],
    pub query: &'a str,
}

/// Body of `/api/memory/create` and `/api/reminder/create`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest<'a> {
    pub user_key: &'a str,
    pub content: &'a str,
    pub tag: &'a str,
    pub session_id: String,
}

/// Body of `/api/extraction/process-summary`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSummaryRequest<'a> {
    pub user_key: &'a str,
    pub metadata: SummaryMetadata<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryMetadata<'a> {
    pub source: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub tag: &'a str,
    pub message: String,
}

impl<'a> SummaryMetadata<'a> {
    /// Metadata for a manually submitted transcript summary.
    pub fn manual_summary(tag: &'a str, message: String) -> Self {
        Self {
            source: "MANUAL",
            kind: "SUMMARY",
            tag,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_minimal() {
        let resp: XdbResponse = serde_json::from_value(json!({"status": "Success"})).unwrap();
        assert!(resp.is_success());
        assert!(resp.message.is_empty());
        assert!(!resp.error);
        assert!(resp.memories().is_empty());
    }

    #[test]
    fn test_response_process_id_alias() {
        let resp: XdbResponse = serde_json::from_value(json!({
            "status": "Success",
            "message": "queued",
            "processId": "p-42"
        }))
        .unwrap();
        assert_eq!(resp.process_id.as_deref(), Some("p-42"));
    }

    #[test]
    fn test_response_ignores_unknown_fields() {
        let resp: XdbResponse = serde_json::from_value(json!({
            "status": "Failed",
            "message": "nope",
            "error": true,
            "traceId": "abc"
        }))
        .unwrap();
        assert!(!resp.is_success());
        assert!(resp.error);
    }

    #[test]
    fn test_memories_parse_and_extra_kept() {
        let resp: XdbResponse = serde_json::from_value(json!({
            "status": "Success",
            "message": "ok",
            "data": {
                "memories": [{
                    "memory": "likes tea",
                    "date": "2024-05-01",
                    "transactionNumber": "tx-1",
                    "tokens": ["tea"],
                    "sessionId": "2024050110",
                    "unexpected": 1
                }],
                "total": 1
            }
        }))
        .unwrap();

        let memories = resp.memories();
        assert_eq!(memories.len(), 1);
        assert_eq!(memories[0].transaction_number, "tx-1");
        assert_eq!(memories[0].session_id.as_deref(), Some("2024050110"));
        assert!(!memories[0].is_encrypted);
        assert_eq!(resp.data.unwrap().extra["total"], 1);
    }

    #[test]
    fn test_record_null_fields_default() {
        let record: MemoryRecord = serde_json::from_value(json!({
            "memory": "m",
            "date": null,
            "tokens": null,
            "isEncrypted": true
        }))
        .unwrap();
        assert!(record.date.is_empty());
        assert!(record.tokens.is_empty());
        assert!(record.is_encrypted);
    }

    #[test]
    fn test_record_without_memory_keeps_list_intact() {
        let resp: XdbResponse = serde_json::from_value(json!({
            "status": "Success",
            "data": {"memories": [
                {"date": "x"},
                {"memory": null},
                {"memory": "likes tea"}
            ]}
        }))
        .unwrap();
        let memories = resp.memories();
        assert_eq!(memories.len(), 3);
        assert!(memories[0].memory.is_empty());
        assert!(memories[1].memory.is_empty());
        assert_eq!(memories[2].memory, "likes tea");
    }

    #[test]
    fn test_request_bodies_use_wire_names() {
        let tokens = vec!["a".to_string()];
        let list = serde_json::to_value(ListMemoriesRequest {
            user_key: "u1",
            tokens: &tokens,
            query: "",
        })
        .unwrap();
        assert_eq!(list, json!({"userKey": "u1", "tokens": ["a"], "query": ""}));

        let summary = serde_json::to_value(ProcessSummaryRequest {
            user_key: "u1",
            metadata: SummaryMetadata::manual_summary("meeting", "A: hi ".to_string()),
        })
        .unwrap();
        assert_eq!(
            summary,
            json!({
                "userKey": "u1",
                "metadata": {"source": "MANUAL", "type": "SUMMARY", "tag": "meeting", "message": "A: hi "}
            })
        );
    }
}
