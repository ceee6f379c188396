//! The operations the tool layer needs from the XDB API.

use std::path::Path;

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::models::XdbResponse;

/// XDB memory API.
///
/// [`crate::XdbApiClient`] is the HTTP implementation; tools depend on this
/// trait so they can be driven by a stub in tests.
#[async_trait]
pub trait XdbApi: Send + Sync {
    async fn list_memories(
        &self,
        user_key: &str,
        tokens: &[String],
        query: &str,
    ) -> ClientResult<XdbResponse>;

    /// Store a memory. A missing or empty `session_id` is replaced by the
    /// current local hour (`YYYYMMDDHH`).
    async fn create_memory(
        &self,
        user_key: &str,
        content: &str,
        tag: &str,
        session_id: Option<&str>,
    ) -> ClientResult<XdbResponse>;

    /// Store a reminder. Session handling matches [`XdbApi::create_memory`].
    async fn create_reminder(
        &self,
        user_key: &str,
        content: &str,
        tag: &str,
        session_id: Option<&str>,
    ) -> ClientResult<XdbResponse>;

    /// Extract the text of a transcript file and submit it for summary
    /// extraction.
    async fn process_transcript(
        &self,
        user_key: &str,
        path: &Path,
        tag: &str,
    ) -> ClientResult<XdbResponse>;

    async fn health_check(&self) -> ClientResult<XdbResponse>;
}
