//! Tool protocol definitions.
//!
//! A tool is how an agent reaches the XDB API: it declares a JSON schema for
//! its arguments and always answers with text the agent can show a user.

mod context;
mod definition;
mod result;
mod traits;

pub use context::*;
pub use definition::*;
pub use result::*;
pub use traits::*;
