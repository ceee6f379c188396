//! Configuration loader.

use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::{DEFAULT_BASE_URL, XdbConfig};

pub const ENV_BASE_URL: &str = "XDB_BASE_URL";
pub const ENV_API_KEY: &str = "XDB_API_KEY";
pub const ENV_PRIVATE_KEY_PATH: &str = "XDB_PRIVATE_KEY_PATH";
pub const ENV_PRIVATE_KEY_CONTENT: &str = "XDB_PRIVATE_KEY_CONTENT";
pub const ENV_DECRYPTION_KEY_PATH: &str = "XDB_DECRYPTION_KEY_PATH";
pub const ENV_DECRYPTION_KEY_CONTENT: &str = "XDB_DECRYPTION_KEY_CONTENT";
pub const ENV_TIMEOUT_SECONDS: &str = "XDB_TIMEOUT_SECONDS";

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file.
    ///
    /// `.json` files are parsed as JSON, everything else as TOML. `${VAR}`
    /// references inside string values are expanded after parsing.
    pub fn load(path: &Path) -> Result<XdbConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            Self::load_json_str(&content)
        } else {
            Self::load_str(&content)
        }
    }

    /// Load configuration from a TOML string.
    pub fn load_str(content: &str) -> Result<XdbConfig, ConfigError> {
        let mut value: toml::Value = toml::from_str(content)?;
        expand_toml_strings(&mut value, &env_var_pattern()?)?;
        let config = value.try_into::<XdbConfig>()?;
        Ok(Self::expand_key_paths(config))
    }

    /// Load configuration from a JSON string.
    pub fn load_json_str(content: &str) -> Result<XdbConfig, ConfigError> {
        let mut value: serde_json::Value = serde_json::from_str(content)?;
        if !value.is_object() {
            return Err(ConfigError::InvalidFormat(
                "top-level JSON value must be an object".to_string(),
            ));
        }
        expand_json_strings(&mut value, &env_var_pattern()?)?;
        let config: XdbConfig = serde_json::from_value(value)?;
        Ok(Self::expand_key_paths(config))
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<XdbConfig, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// Unset variables fall back to defaults; validation is left to the
    /// caller.
    pub fn from_lookup<F>(lookup: F) -> Result<XdbConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let mut config = XdbConfig::new(
            get(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            get(ENV_API_KEY).unwrap_or_default(),
        );
        config.private_key_path = get(ENV_PRIVATE_KEY_PATH);
        config.private_key_content = get(ENV_PRIVATE_KEY_CONTENT);
        config.decryption_key_path = get(ENV_DECRYPTION_KEY_PATH);
        config.decryption_key_content = get(ENV_DECRYPTION_KEY_CONTENT);

        if let Some(raw) = get(ENV_TIMEOUT_SECONDS) {
            config.timeout_seconds = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: ENV_TIMEOUT_SECONDS.to_string(),
                message: format!("expected a whole number of seconds, got '{}'", raw),
            })?;
        }

        Ok(Self::expand_key_paths(config))
    }

    fn expand_key_paths(mut config: XdbConfig) -> XdbConfig {
        config.private_key_path = config.private_key_path.map(|p| Self::expand_path(&p));
        config.decryption_key_path = config.decryption_key_path.map(|p| Self::expand_path(&p));
        config
    }

    /// Expand shell-style paths (e.g., `~/.xdb/keys/sign.pem`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

fn env_var_pattern() -> Result<Regex, ConfigError> {
    Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::InvalidFormat(e.to_string()))
}

/// Expand `${VAR}` references in one string value.
///
/// Values are substituted verbatim, so multi-line PEM keys and quotes
/// survive unchanged.
fn expand_env_vars(text: &str, pattern: &Regex) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for cap in pattern.captures_iter(text) {
        let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        let value = std::env::var(name.as_str())
            .map_err(|_| ConfigError::EnvVarNotSet(name.as_str().to_string()))?;
        result.push_str(&text[last..whole.start()]);
        result.push_str(&value);
        last = whole.end();
    }
    result.push_str(&text[last..]);
    Ok(result)
}

fn expand_toml_strings(value: &mut toml::Value, pattern: &Regex) -> Result<(), ConfigError> {
    match value {
        toml::Value::String(s) => *s = expand_env_vars(s, pattern)?,
        toml::Value::Array(items) => {
            for item in items {
                expand_toml_strings(item, pattern)?;
            }
        }
        toml::Value::Table(table) => {
            for (_, item) in table.iter_mut() {
                expand_toml_strings(item, pattern)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn expand_json_strings(value: &mut serde_json::Value, pattern: &Regex) -> Result<(), ConfigError> {
    match value {
        serde_json::Value::String(s) => *s = expand_env_vars(s, pattern)?,
        serde_json::Value::Array(items) => {
            for item in items {
                expand_json_strings(item, pattern)?;
            }
        }
        serde_json::Value::Object(map) => {
            for (_, item) in map.iter_mut() {
                expand_json_strings(item, pattern)?;
            }
        }
        _ => {}
    }
    Ok(())
}
