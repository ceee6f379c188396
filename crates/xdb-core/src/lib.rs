//! # XDB Core
//!
//! Runtime pieces shared by the CLI and any embedding agent: a concurrent
//! tool registry and the dispatch path that validates and runs a tool call.

pub mod registry;

pub use registry::{BaseRegistry, Registerable, ToolRegistry};
