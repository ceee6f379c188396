//! Configuration loading and tool registration for the CLI host.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use xdb_client::{RsaDecryptor, XdbApiClient};
use xdb_config::{ConfigLoader, ConfigValidator, XdbConfig};
use xdb_core::ToolRegistry;
use xdb_protocols::extension::{Extension, ExtensionContext};
use xdb_tools::XdbToolsExtension;

/// Load the configuration from `path`, or from `XDB_*` variables when no
/// file is given, and log validation warnings.
pub(crate) fn load_config(path: Option<&Path>) -> Result<XdbConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration file");
            ConfigLoader::load(path)?
        }
        None => ConfigLoader::from_env()?,
    };

    for warning in ConfigValidator::validate(&config).warnings {
        warn!(field = %warning.path, "{}", warning.message);
    }
    Ok(config)
}

/// Build the client and register every XDB tool.
pub(crate) async fn build_registry(
    config: XdbConfig,
    work_dir: PathBuf,
) -> Result<Arc<ToolRegistry>, Box<dyn std::error::Error>> {
    let decryptor = RsaDecryptor::from_config(&config)?.map(Arc::new);
    let client = Arc::new(XdbApiClient::new(config)?);

    let registry = Arc::new(ToolRegistry::new());
    let mut extension = XdbToolsExtension::new(client, decryptor);
    let ctx = ExtensionContext::new(registry.clone(), work_dir);
    extension.initialize(ctx).await?;

    Ok(registry)
}
