//! # XDB Config
//!
//! Connection settings for the XDB memory API: endpoint, API key, and the
//! key material used for request signing and memory decryption.
//!
//! Settings come from `XDB_*` environment variables or from a TOML/JSON file
//! with `${VAR}` substitution.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
