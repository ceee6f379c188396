//! Configuration validation.

use std::path::Path;

use crate::error::ConfigError;
use crate::schema::{XdbConfig, is_set};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
    missing: bool,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            missing: false,
        }
    }

    /// A required field that has no value at all.
    pub fn missing(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            missing: true,
            ..Self::new(path, message)
        }
    }
}

impl From<ValidationError> for ConfigError {
    fn from(error: ValidationError) -> Self {
        if error.missing {
            ConfigError::MissingField(error.path)
        } else {
            ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration, collecting every error and warning.
    pub fn validate(config: &XdbConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_credentials(config, &mut result);
        Self::validate_endpoint(config, &mut result);
        Self::validate_keys(config, &mut result);

        result
    }

    fn validate_credentials(config: &XdbConfig, result: &mut ValidationResult) {
        if config.api_key.trim().is_empty() {
            result.add_error(ValidationError::missing("api_key", "API key is required"));
        }

        if !config.has_signing_key_source() {
            result.add_error(ValidationError::missing(
                "private_key_path | private_key_content",
                "Either private_key_path or private_key_content must be provided",
            ));
        }
    }

    fn validate_endpoint(config: &XdbConfig, result: &mut ValidationResult) {
        match url::Url::parse(&config.base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                let local = matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "::1"));
                if url.scheme() == "http" && !local {
                    result.add_warning(ValidationWarning::new(
                        "base_url",
                        "API key will be sent over plain HTTP",
                    ));
                }
            }
            Ok(url) => result.add_error(ValidationError::new(
                "base_url",
                format!("Unsupported scheme '{}', expected http or https", url.scheme()),
            )),
            Err(e) => result.add_error(ValidationError::new(
                "base_url",
                format!("Invalid URL: {}", e),
            )),
        }

        if config.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }
    }

    fn validate_keys(config: &XdbConfig, result: &mut ValidationResult) {
        if let Some(path) = config.private_key_path.as_deref().filter(|p| !p.is_empty()) {
            if !Path::new(path).exists() && !is_set(&config.private_key_content) {
                result.add_warning(ValidationWarning::new(
                    "private_key_path",
                    format!("Key file does not exist: {}, requests will be unsigned", path),
                ));
            }
        }

        if !config.has_decryption_key_source() {
            result.add_warning(ValidationWarning::new(
                "decryption_key_path",
                "No decryption key configured, encrypted memories stay as ciphertext",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
