//! Text rendering of client results for agents.

use xdb_client::{ClientError, MemoryRecord, XdbResponse};

/// Render a client failure as text an agent can show to a user.
///
/// `action` is a gerund phrase such as `"listing memories"`.
pub fn describe_error(action: &str, err: &ClientError) -> String {
    let detail = match err {
        ClientError::Api(msg) => format!("Request failed: {}", msg),
        ClientError::Configuration(e) => format!("invalid client configuration: {}", e),
        ClientError::KeyLoad(msg) | ClientError::Signing(msg) => {
            format!("request signing is unavailable: {}", msg)
        }
        ClientError::FileNotFound(path) => format!("file not found: {}", path.display()),
        ClientError::FileAccess { path, message } => {
            format!("could not read {}: {}", path.display(), message)
        }
        ClientError::InvalidTranscript(msg) => format!("transcript could not be parsed: {}", msg),
        ClientError::Decryption(msg) => format!("could not decrypt memory: {}", msg),
    };
    format!("Error {}: {}", action, detail)
}

fn or_na(value: &str) -> &str {
    if value.is_empty() { "N/A" } else { value }
}

/// Numbered listing of memories, or the empty-list notice.
pub fn format_memories(memories: &[MemoryRecord]) -> String {
    if memories.is_empty() {
        return "No memories found for this user.".to_string();
    }

    let blocks: Vec<String> = memories
        .iter()
        .enumerate()
        .map(|(i, m)| {
            format!(
                "Memory {}:\n- Content: {}\n- Date: {}\n- Transaction: {}\n- Tokens: {}\n- Language: {}",
                i + 1,
                or_na(&m.memory),
                or_na(&m.date),
                or_na(&m.transaction_number),
                m.tokens.join(", "),
                m.language.as_deref().filter(|l| !l.is_empty()).unwrap_or("Not specified"),
            )
        })
        .collect();

    format!(
        "Found {} memories:\n\n{}",
        memories.len(),
        blocks.join("\n\n")
    )
}

/// Confirmation for a write call (`what` is e.g. `"Memory created"`).
pub fn format_accepted(what: &str, response: &XdbResponse) -> String {
    format!(
        "{} successfully!\nMessage: {}\nProcess ID: {}",
        what,
        response.message,
        response.process_id.as_deref().unwrap_or("N/A")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_describe_each_error_kind() {
        let cases = [
            (ClientError::Api("HTTP 502: bad gateway".into()), "Request failed: HTTP 502"),
            (ClientError::FileNotFound(PathBuf::from("/t/a.json")), "file not found: /t/a.json"),
            (
                ClientError::FileAccess {
                    path: PathBuf::from("/t/b.vtt"),
                    message: "denied".into(),
                },
                "could not read /t/b.vtt: denied",
            ),
            (ClientError::InvalidTranscript("eof".into()), "transcript could not be parsed"),
            (ClientError::Decryption("oaep".into()), "could not decrypt memory"),
            (ClientError::KeyLoad("pem".into()), "signing is unavailable"),
        ];
        for (err, expected) in cases {
            let text = describe_error("listing memories", &err);
            assert!(text.starts_with("Error listing memories: "), "{}", text);
            assert!(text.contains(expected), "{}", text);
        }
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_memories(&[]), "No memories found for this user.");
    }

    #[test]
    fn test_format_memories() {
        let mut first = MemoryRecord::new("likes tea");
        first.date = "2024-05-01".into();
        first.transaction_number = "tx-1".into();
        first.tokens = vec!["tea".into(), "drinks".into()];
        first.language = Some("en".into());
        let second = MemoryRecord::new("walks daily");

        let text = format_memories(&[first, second]);
        assert!(text.starts_with("Found 2 memories:\n\nMemory 1:\n- Content: likes tea\n"));
        assert!(text.contains("- Tokens: tea, drinks\n- Language: en"));
        assert!(text.contains("Memory 2:\n- Content: walks daily\n- Date: N/A\n- Transaction: N/A"));
        assert!(text.ends_with("- Language: Not specified"));
    }

    #[test]
    fn test_format_record_without_content() {
        let record: MemoryRecord =
            serde_json::from_value(serde_json::json!({"memory": null, "date": "2024-05-01"}))
                .unwrap();
        let text = format_memories(&[record]);
        assert!(text.contains("Memory 1:\n- Content: N/A\n- Date: 2024-05-01"));
    }

    #[test]
    fn test_format_accepted() {
        let response: XdbResponse = serde_json::from_value(serde_json::json!({
            "status": "Success",
            "message": "stored"
        }))
        .unwrap();
        assert_eq!(
            format_accepted("Memory created", &response),
            "Memory created successfully!\nMessage: stored\nProcess ID: N/A"
        );
    }
}
