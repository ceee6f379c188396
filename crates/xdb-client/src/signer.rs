//! ECDSA request signing.
//!
//! The XDB API authenticates request bodies with an ECDSA P-256 / SHA-256
//! signature carried in the `signature` header as base64 of the DER
//! encoding. Signing is best effort: a key that cannot be loaded leaves the
//! signer empty and requests go out unsigned.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use p256::SecretKey;
use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey};
use p256::pkcs8::DecodePrivateKey;
use tracing::{debug, error, warn};
use xdb_config::XdbConfig;

use crate::error::{ClientError, ClientResult};

/// Holds the optional signing key for one client.
pub struct RequestSigner {
    key: Option<SigningKey>,
}

impl RequestSigner {
    /// A signer that never produces signatures.
    pub fn unsigned() -> Self {
        Self { key: None }
    }

    /// Load the signing key named by the configuration.
    ///
    /// `private_key_path` wins when it points at an existing file, otherwise
    /// `private_key_content` is used. Failures are logged and produce an
    /// unsigned signer.
    pub fn load(config: &XdbConfig) -> Self {
        let loaded = match (
            config.private_key_path.as_deref().filter(|p| Path::new(p).exists()),
            config.private_key_content.as_deref().filter(|c| !c.trim().is_empty()),
        ) {
            (Some(path), _) => {
                debug!(path = %path, "Loading signing key from file");
                Self::read_key_file(Path::new(path))
            }
            (None, Some(pem)) => Self::parse_pem(pem),
            (None, None) => {
                warn!("No private key provided, requests will not be signed");
                return Self::unsigned();
            }
        };

        match loaded {
            Ok(key) => Self { key: Some(key) },
            Err(e) => {
                warn!(error = %e, "Requests will not be signed");
                Self::unsigned()
            }
        }
    }

    /// Build a signer from PEM text.
    pub fn from_pem(pem: &str) -> ClientResult<Self> {
        Ok(Self {
            key: Some(Self::parse_pem(pem)?),
        })
    }

    fn read_key_file(path: &Path) -> ClientResult<SigningKey> {
        let pem = std::fs::read_to_string(path)
            .map_err(|e| ClientError::KeyLoad(format!("{}: {}", path.display(), e)))?;
        Self::parse_pem(&pem)
    }

    /// Accepts PKCS#8 (`PRIVATE KEY`) or SEC1 (`EC PRIVATE KEY`) encodings.
    fn parse_pem(pem: &str) -> ClientResult<SigningKey> {
        if let Ok(key) = SigningKey::from_pkcs8_pem(pem) {
            return Ok(key);
        }
        SecretKey::from_sec1_pem(pem)
            .map(SigningKey::from)
            .map_err(|e| ClientError::KeyLoad(e.to_string()))
    }

    pub fn is_key_loaded(&self) -> bool {
        self.key.is_some()
    }

    /// Signature over `payload`, or an empty string when there is no key or
    /// signing fails.
    pub fn sign(&self, payload: &[u8]) -> String {
        match self.try_sign(payload) {
            Ok(signature) => signature,
            Err(e) => {
                error!(error = %e, "Sending request without signature");
                String::new()
            }
        }
    }

    fn try_sign(&self, payload: &[u8]) -> ClientResult<String> {
        let Some(key) = &self.key else {
            return Ok(String::new());
        };
        let signature: Signature = key
            .try_sign(payload)
            .map_err(|e| ClientError::Signing(e.to_string()))?;
        Ok(STANDARD.encode(signature.to_der().as_bytes()))
    }

    /// Public half of the loaded key.
    pub fn verifying_key(&self) -> Option<p256::ecdsa::VerifyingKey> {
        self.key.as_ref().map(p256::ecdsa::VerifyingKey::from)
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("key_loaded", &self.is_key_loaded())
            .finish()
    }
}
