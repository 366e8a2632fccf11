//! Backend location and credentials, resolved from the environment

use crate::product::ProductConfig;
use std::path::PathBuf;

/// Backend executable used when no override is set
pub const DEFAULT_BACKEND: &str = "nim";

/// Oldest backend release the serverless commands work with
pub const MIN_BACKEND_VERSION: &str = "4.2.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerlessConfig {
    /// Executable that performs deploy, watch and get-metadata
    pub backend: PathBuf,
    /// JSON credentials file holding the API host and auth key
    pub credentials_file: PathBuf,
    pub min_backend_version: String,
    pub user_agent: String,
}

impl ServerlessConfig {
    /// Resolve config for a product, honouring its environment overrides
    pub fn from_config<C: ProductConfig>(config: &C) -> Self {
        let backend = std::env::var(config.backend_env())
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_BACKEND));

        let credentials_file = std::env::var(config.credentials_env())
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_credentials_file(config.name()));

        Self {
            backend,
            credentials_file,
            min_backend_version: MIN_BACKEND_VERSION.to_string(),
            user_agent: config.user_agent().to_string(),
        }
    }
}

fn default_credentials_file(product: &str) -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(product)
        .join("credentials.json")
}
