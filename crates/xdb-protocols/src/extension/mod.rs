//! Extension protocol definitions.
//!
//! An extension bundles related tools and registers them during startup.

mod context;
mod manifest;
mod traits;

pub use context::*;
pub use manifest::*;
pub use traits::*;
