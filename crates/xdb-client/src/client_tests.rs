use super::*;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use p256::SecretKey;
use p256::ecdsa::Signature;
use p256::ecdsa::signature::Verifier;
use p256::pkcs8::LineEnding;
use rand::rngs::OsRng;
use serde_json::json;
use std::io::Write;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

const API_KEY: &str = "test-api-key";

fn signing_pem() -> String {
    SecretKey::random(&mut OsRng)
        .to_sec1_pem(LineEnding::LF)
        .unwrap()
        .to_string()
}

fn signed_client(base_url: &str) -> XdbApiClient {
    let config = XdbConfig::new(base_url, API_KEY).with_private_key_content(signing_pem());
    XdbApiClient::new(config).unwrap()
}

fn unsigned_client(base_url: &str) -> XdbApiClient {
    let config = XdbConfig::new(base_url, API_KEY).with_timeout_seconds(5);
    XdbApiClient::with_signer(config, RequestSigner::unsigned()).unwrap()
}

fn ok_body() -> serde_json::Value {
    json!({"status": "Success", "message": "ok", "processId": "p-1"})
}

async fn single_request(server: &MockServer) -> wiremock::Request {
    let mut requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    requests.remove(0)
}

#[test]
fn test_new_rejects_invalid_config() {
    let err = XdbApiClient::new(XdbConfig::new("http://localhost:5000", "")).unwrap_err();
    assert!(matches!(err, ClientError::Configuration(_)));
}

#[test]
fn test_new_with_unreadable_key_degrades_to_unsigned() {
    let config = XdbConfig::new("http://localhost:5000", API_KEY).with_private_key_content("junk");
    let client = XdbApiClient::new(config).unwrap();
    assert!(!client.is_key_loaded());
}

#[test]
fn test_new_loads_key_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(signing_pem().as_bytes()).unwrap();
    let config = XdbConfig::new("http://localhost:5000", API_KEY)
        .with_private_key_path(file.path().to_string_lossy());
    assert!(XdbApiClient::new(config).unwrap().is_key_loaded());
}

#[test]
fn test_session_or_default() {
    assert_eq!(session_or_default(Some("s-1")), "s-1");
    let bucket = session_or_default(Some("  "));
    assert_eq!(bucket.len(), 10);
    assert!(bucket.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(session_or_default(None).len(), 10);
}

#[tokio::test]
async fn test_signature_covers_exact_body() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path(LIST_MEMORIES_PATH))
        .and(matchers::header("apikey", API_KEY))
        .and(matchers::header("content-type", "application/json"))
        .and(matchers::header_exists("signature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_client(&server.uri());
    let verifying_key = client.signer.verifying_key().unwrap();
    let tokens = vec!["tea".to_string()];
    let resp = client.list_memories("u1", &tokens, "drinks").await.unwrap();
    assert!(resp.is_success());

    let request = single_request(&server).await;
    let header = request.headers.get("signature").unwrap().to_str().unwrap();
    let der = STANDARD.decode(header).unwrap();
    let signature = Signature::from_der(&der).unwrap();
    assert!(verifying_key.verify(&request.body, &signature).is_ok());

    let mut tampered = request.body.clone();
    tampered.push(b' ');
    assert!(verifying_key.verify(&tampered, &signature).is_err());
}

#[tokio::test]
async fn test_unsigned_request_omits_signature_header() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path(HEALTH_PATH))
        .and(matchers::body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Success", "message": "healthy"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = unsigned_client(&server.uri());
    let resp = client.health_check().await.unwrap();
    assert_eq!(resp.message, "healthy");

    let request = single_request(&server).await;
    assert!(request.headers.get("signature").is_none());
    assert_eq!(request.headers.get("apikey").unwrap(), API_KEY);
}

#[tokio::test]
async fn test_list_memories_body_and_response() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path(LIST_MEMORIES_PATH))
        .and(matchers::body_json(json!({"userKey": "u1", "tokens": [], "query": ""})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Success",
            "message": "ok",
            "data": {"memories": [
                {"memory": "likes tea", "date": "2024-05-01", "transactionNumber": "tx-1", "tokens": ["tea"]}
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = unsigned_client(&server.uri());
    let resp = client.list_memories("u1", &[], "").await.unwrap();
    assert_eq!(resp.memories().len(), 1);
    assert_eq!(resp.memories()[0].memory, "likes tea");
}

#[tokio::test]
async fn test_create_memory_explicit_session() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path(CREATE_MEMORY_PATH))
        .and(matchers::body_json(json!({
            "userKey": "u1",
            "content": "likes tea",
            "tag": "prefs",
            "sessionId": "s-9"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = unsigned_client(&server.uri());
    let resp = client
        .create_memory("u1", "likes tea", "prefs", Some("s-9"))
        .await
        .unwrap();
    assert_eq!(resp.process_id.as_deref(), Some("p-1"));
}

#[tokio::test]
async fn test_create_memory_defaults_session_to_hour_bucket() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path(CREATE_MEMORY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .mount(&server)
        .await;

    let client = unsigned_client(&server.uri());
    let before = hour_bucket_session_id();
    client.create_memory("u1", "c", "", None).await.unwrap();
    let after = hour_bucket_session_id();

    let request = single_request(&server).await;
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    let session = body["sessionId"].as_str().unwrap();
    assert!(session == before || session == after);
}

#[tokio::test]
async fn test_create_reminder_endpoint() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path(CREATE_REMINDER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = unsigned_client(&server.uri());
    client
        .create_reminder("u1", "call mom", "todo", Some(""))
        .await
        .unwrap();

    let request = single_request(&server).await;
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body["content"], "call mom");
    assert_eq!(body["sessionId"].as_str().unwrap().len(), 10);
}

#[tokio::test]
async fn test_process_transcript_sends_extracted_text() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("call.json");
    std::fs::write(
        &path,
        r#"[{"speaker_name": "A", "sentence": "hi", "startTime": 0, "endTime": 1}]"#,
    )
    .unwrap();

    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path(PROCESS_SUMMARY_PATH))
        .and(matchers::body_json(json!({
            "userKey": "u1",
            "metadata": {"source": "MANUAL", "type": "SUMMARY", "tag": "standup", "message": "A[0-1]: hi "}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = unsigned_client(&server.uri());
    let resp = client.process_transcript("u1", &path, "standup").await.unwrap();
    assert!(resp.is_success());
}

#[tokio::test]
async fn test_process_transcript_missing_file_sends_nothing() {
    let server = MockServer::start().await;
    let client = unsigned_client(&server.uri());

    let err = client
        .process_transcript("u1", Path::new("/nonexistent/xdb/call.json"), "t")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::FileNotFound(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_non_success_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = unsigned_client(&server.uri());
    match client.health_check().await.unwrap_err() {
        ClientError::Api(msg) => {
            assert!(msg.contains("500"));
            assert!(msg.contains("upstream exploded"));
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_json_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = unsigned_client(&server.uri());
    let err = client.list_memories("u1", &[], "").await.unwrap_err();
    assert!(matches!(err, ClientError::Api(_)));
}

#[tokio::test]
async fn test_connection_refused_is_api_error() {
    let client = unsigned_client("http://127.0.0.1:1");
    let err = client.create_memory("u1", "c", "", None).await.unwrap_err();
    assert!(matches!(err, ClientError::Api(_)));
}

#[tokio::test]
async fn test_failed_status_is_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Failed",
            "message": "quota exceeded",
            "error": true
        })))
        .mount(&server)
        .await;

    let client = unsigned_client(&server.uri());
    let resp = client.create_memory("u1", "c", "", None).await.unwrap();
    assert!(!resp.is_success());
    assert!(resp.error);
}

#[test]
fn test_debug_redacts_api_key() {
    let client = unsigned_client("http://localhost:5000");
    let debug = format!("{:?}", client);
    assert!(!debug.contains(API_KEY));
    assert!(debug.contains("key_loaded: false"));
}
