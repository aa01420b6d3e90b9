//! Server configuration
//!
//! Supports loading the backend location from (in order of priority):
//! 1. JSON file (~/.config/quill/server.json)
//! 2. Runtime environment variable (QUILL_SERVER_URL)
//! 3. Built-in default (local development server)

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

/// Server config filename in the Quill config directory
const SERVER_CONFIG_FILE: &str = "server.json";

/// Base URL of the local development backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Location of the document Q&A backend
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Base URL all request paths are appended to (e.g. `…/api`)
    pub base_url: String,
}

impl ServerConfig {
    /// Load the server location using the priority order above
    pub fn load() -> Result<Self> {
        if config::config_exists(SERVER_CONFIG_FILE) {
            let cfg: ServerConfig = config::load_json(SERVER_CONFIG_FILE)?;
            cfg.validate()?;
            return Ok(cfg);
        }

        if let Ok(base_url) = std::env::var("QUILL_SERVER_URL") {
            let cfg = ServerConfig { base_url };
            cfg.validate()?;
            return Ok(cfg);
        }

        Ok(Self::default())
    }

    /// Build a config for an explicit base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Reject base URLs the transport could not dial
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)
            .with_context(|| format!("Invalid server base URL: {}", self.base_url))?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}
