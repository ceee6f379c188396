//! Signed HTTP client for the XDB API.

use std::path::Path;

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Serialize;
use tracing::{debug, info};
use xdb_config::XdbConfig;

use crate::api::XdbApi;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    CreateEntryRequest, ListMemoriesRequest, ProcessSummaryRequest, SummaryMetadata, XdbResponse,
};
use crate::signer::RequestSigner;
use crate::transcript;

pub const LIST_MEMORIES_PATH: &str = "/api/memory/list";
pub const CREATE_MEMORY_PATH: &str = "/api/memory/create";
pub const CREATE_REMINDER_PATH: &str = "/api/reminder/create";
pub const PROCESS_SUMMARY_PATH: &str = "/api/extraction/process-summary";
pub const HEALTH_PATH: &str = "/api/health";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "apikey";
/// Header carrying the base64 DER body signature.
pub const SIGNATURE_HEADER: &str = "signature";

/// Session id used when the caller supplies none: the current local hour.
pub fn hour_bucket_session_id() -> String {
    chrono::Local::now().format("%Y%m%d%H").to_string()
}

fn session_or_default(session_id: Option<&str>) -> String {
    match session_id.map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => hour_bucket_session_id(),
    }
}

/// Client for one XDB deployment.
///
/// Every call is a single POST with no retries. Cloning the configuration
/// into the client makes it immutable for the client's lifetime.
pub struct XdbApiClient {
    http: Client,
    config: XdbConfig,
    signer: RequestSigner,
}

impl XdbApiClient {
    /// Validate the configuration, build the HTTP client and load the
    /// signing key.
    pub fn new(config: XdbConfig) -> ClientResult<Self> {
        config.validate()?;
        let signer = RequestSigner::load(&config);
        Self::with_signer(config, signer)
    }

    /// Build a client around an already constructed signer.
    pub fn with_signer(config: XdbConfig, signer: RequestSigner) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Api(format!("HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            signed = signer.is_key_loaded(),
            "XDB client ready"
        );
        Ok(Self {
            http,
            config,
            signer,
        })
    }

    pub fn config(&self) -> &XdbConfig {
        &self.config
    }

    /// Whether requests carry a signature.
    pub fn is_key_loaded(&self) -> bool {
        self.signer.is_key_loaded()
    }

    /// POST `data` as JSON to `endpoint` and parse the reply.
    ///
    /// The body is serialised exactly once; the signature covers those bytes
    /// and those bytes are what goes on the wire.
    pub async fn request<T>(&self, endpoint: &str, data: &T) -> ClientResult<XdbResponse>
    where
        T: Serialize + ?Sized,
    {
        let url = self.config.endpoint_url(endpoint);
        let body = serde_json::to_vec(data)
            .map_err(|e| ClientError::Api(format!("could not encode request: {}", e)))?;
        let signature = self.signer.sign(&body);

        let mut req = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.config.api_key);
        if !signature.is_empty() {
            req = req.header(SIGNATURE_HEADER, signature);
        }

        debug!(url = %url, bytes = body.len(), "Sending XDB request");
        let response = req
            .body(body)
            .send()
            .await
            .map_err(|e| ClientError::Api(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Api(e.to_string()))?;
        if !status.is_success() {
            return Err(ClientError::Api(format!("HTTP {}: {}", status, text)));
        }

        let parsed: XdbResponse = serde_json::from_str(&text)
            .map_err(|e| ClientError::Api(format!("malformed response: {}", e)))?;
        debug!(url = %url, status = %parsed.status, "XDB response");
        Ok(parsed)
    }

    async fn create_entry(
        &self,
        endpoint: &str,
        user_key: &str,
        content: &str,
        tag: &str,
        session_id: Option<&str>,
    ) -> ClientResult<XdbResponse> {
        let body = CreateEntryRequest {
            user_key,
            content,
            tag,
            session_id: session_or_default(session_id),
        };
        self.request(endpoint, &body).await
    }
}

#[async_trait]
impl XdbApi for XdbApiClient {
    async fn list_memories(
        &self,
        user_key: &str,
        tokens: &[String],
        query: &str,
    ) -> ClientResult<XdbResponse> {
        let body = ListMemoriesRequest {
            user_key,
            tokens,
            query,
        };
        self.request(LIST_MEMORIES_PATH, &body).await
    }

    async fn create_memory(
        &self,
        user_key: &str,
        content: &str,
        tag: &str,
        session_id: Option<&str>,
    ) -> ClientResult<XdbResponse> {
        self.create_entry(CREATE_MEMORY_PATH, user_key, content, tag, session_id)
            .await
    }

    async fn create_reminder(
        &self,
        user_key: &str,
        content: &str,
        tag: &str,
        session_id: Option<&str>,
    ) -> ClientResult<XdbResponse> {
        self.create_entry(CREATE_REMINDER_PATH, user_key, content, tag, session_id)
            .await
    }

    async fn process_transcript(
        &self,
        user_key: &str,
        path: &Path,
        tag: &str,
    ) -> ClientResult<XdbResponse> {
        let owned = path.to_path_buf();
        let message = tokio::task::spawn_blocking(move || transcript::extract_content(&owned))
            .await
            .map_err(|e| ClientError::file_access(path, e))??;

        debug!(path = %path.display(), chars = message.len(), "Extracted transcript");
        let body = ProcessSummaryRequest {
            user_key,
            metadata: SummaryMetadata::manual_summary(tag, message),
        };
        self.request(PROCESS_SUMMARY_PATH, &body).await
    }

    async fn health_check(&self) -> ClientResult<XdbResponse> {
        self.request(HEALTH_PATH, &serde_json::json!({})).await
    }
}

impl std::fmt::Debug for XdbApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XdbApiClient")
            .field("config", &self.config)
            .field("signer", &self.signer)
            .finish()
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
