//! # XDB Protocols
//!
//! The seam between the XDB connector and whatever agent framework drives it.
//! Contains only interface definitions - the tools themselves live in
//! extension crates.
//!
//! ## Core Traits
//!
//! - [`Tool`] - A named, schema-typed action an agent can invoke
//! - [`Extension`] - A bundle of tools registered at startup
//! - [`ToolRegistryAccess`] - Registration surface handed to extensions

pub mod error;
pub mod extension;
pub mod tool;
pub mod types;

pub use error::{ExtensionError, ToolError};
pub use extension::{Extension, ExtensionContext, ExtensionManifest, ToolRegistryAccess};
pub use tool::{Tool, ToolContext, ToolDefinition, ToolResult};
pub use types::*;
