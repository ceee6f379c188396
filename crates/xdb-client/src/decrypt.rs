//! RSA-OAEP decryption of encrypted memory fields.

use std::path::Path;

use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Oaep, RsaPrivateKey};
use tracing::{debug, warn};
use xdb_config::XdbConfig;

use crate::error::{ClientError, ClientResult};
use crate::models::MemoryRecord;

/// Decrypts hex-encoded RSA-OAEP ciphertext (SHA-1 digest, MGF1-SHA-1).
pub struct RsaDecryptor {
    key: RsaPrivateKey,
}

impl RsaDecryptor {
    pub fn new(key: RsaPrivateKey) -> Self {
        Self { key }
    }

    /// Parse a PKCS#8 (`PRIVATE KEY`) or PKCS#1 (`RSA PRIVATE KEY`) PEM.
    pub fn from_pem(pem: &str) -> ClientResult<Self> {
        let key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|e| ClientError::KeyLoad(format!("RSA key: {}", e)))?;
        Ok(Self::new(key))
    }

    pub fn from_file(path: &Path) -> ClientResult<Self> {
        let pem = std::fs::read_to_string(path)
            .map_err(|e| ClientError::KeyLoad(format!("{}: {}", path.display(), e)))?;
        Self::from_pem(&pem)
    }

    /// Build the decryptor named by the `decryption_key_*` settings.
    ///
    /// Returns `Ok(None)` when no decryption key is configured.
    pub fn from_config(config: &XdbConfig) -> ClientResult<Option<Self>> {
        if let Some(path) = config.decryption_key_path.as_deref().filter(|p| !p.is_empty()) {
            if Path::new(path).exists() {
                debug!(path = %path, "Loading decryption key from file");
                return Self::from_file(Path::new(path)).map(Some);
            }
            warn!(path = %path, "Decryption key file does not exist");
        }
        match config
            .decryption_key_content
            .as_deref()
            .filter(|c| !c.trim().is_empty())
        {
            Some(pem) => Self::from_pem(pem).map(Some),
            None => Ok(None),
        }
    }

    /// Decrypt one hex-encoded ciphertext into UTF-8 text.
    pub fn decrypt(&self, hex_ciphertext: &str) -> ClientResult<String> {
        let ciphertext = hex::decode(hex_ciphertext.trim())
            .map_err(|e| ClientError::Decryption(format!("invalid hex: {}", e)))?;
        let plaintext = self
            .key
            .decrypt(Oaep::new::<sha1::Sha1>(), &ciphertext)
            .map_err(|e| ClientError::Decryption(e.to_string()))?;
        String::from_utf8(plaintext)
            .map_err(|e| ClientError::Decryption(format!("plaintext is not UTF-8: {}", e)))
    }

    /// Decrypt the memory text and every token of a record flagged as
    /// encrypted. Unflagged records are returned untouched.
    pub fn decrypt_record(&self, mut record: MemoryRecord) -> ClientResult<MemoryRecord> {
        if !record.is_encrypted {
            return Ok(record);
        }
        record.memory = self.decrypt(&record.memory)?;
        record.tokens = record
            .tokens
            .iter()
            .map(|t| self.decrypt(t))
            .collect::<ClientResult<Vec<_>>>()?;
        record.is_encrypted = false;
        Ok(record)
    }
}

impl std::fmt::Debug for RsaDecryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaDecryptor").finish_non_exhaustive()
    }
}
