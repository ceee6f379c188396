//! # XDB Client
//!
//! Client side of the XDB memory API:
//!
//! - [`XdbApiClient`] signs each JSON body with the configured P-256 key and
//!   posts it to the API
//! - [`transcript`] classifies files and flattens transcripts into text
//! - [`RsaDecryptor`] opens records the API returns encrypted
//! - [`XdbApi`] is the seam the tool layer is written against

pub mod api;
pub mod client;
pub mod decrypt;
pub mod error;
pub mod models;
pub mod signer;
pub mod transcript;

pub use api::XdbApi;
pub use client::XdbApiClient;
pub use decrypt::RsaDecryptor;
pub use error::{ClientError, ClientResult};
pub use models::{MemoryRecord, ResponseData, XdbResponse};
pub use signer::RequestSigner;
pub use transcript::{FileInfo, TranscriptDocument, TranscriptFormat, TranscriptSegment};
